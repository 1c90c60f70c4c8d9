use crate::cli::CompareArgs;
use crate::config::builder::build_compare_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use std::fs;
use std::path::Path;
use tracing::info;
use voxeler::{
    core::io::{discover::collect_pdb_files, pdb::read_structure},
    engine::progress::ProgressReporter,
    workflows,
    workflows::compare::ComparisonResult,
};

const MATRIX_FILE: &str = "similarity_matrix.csv";

pub fn run(args: CompareArgs) -> Result<()> {
    let config = build_compare_config(&args)?;

    let paths = collect_pdb_files(&config.input_dir).map_err(CliError::Io)?;
    if paths.len() < 2 {
        return Err(CliError::Input(format!(
            "found {} PDB file(s) under '{}', comparison needs at least two",
            paths.len(),
            config.input_dir.display()
        )));
    }

    info!("Loading {} structures from {:?}", paths.len(), &config.input_dir);
    let structures = paths
        .iter()
        .map(|path| {
            read_structure(path, &config.core.filter).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.callback());

    println!("Starting structure comparison...");
    info!("Invoking the core comparison workflow...");
    let result = workflows::compare::run(&structures, &config.core, &reporter)?;

    fs::create_dir_all(&config.output_dir)?;
    let output_path = config.output_dir.join(MATRIX_FILE);
    write_matrix(&output_path, &result)?;

    println!(
        "✓ Similarity matrix ({} structures) written to: {}",
        result.names.len(),
        output_path.display()
    );
    Ok(())
}

fn write_matrix(path: &Path, result: &ComparisonResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| CliError::Other(e.into()))?;

    let mut header = vec!["structure".to_string()];
    header.extend(result.names.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| CliError::Other(e.into()))?;

    for (name, row) in result.names.iter().zip(&result.matrix) {
        let mut record = vec![name.clone()];
        record.extend(row.iter().map(|score| format!("{score:.6}")));
        writer
            .write_record(&record)
            .map_err(|e| CliError::Other(e.into()))?;
    }
    writer.flush().map_err(CliError::Io)?;
    info!("Similarity matrix written to {:?}", path);
    Ok(())
}
