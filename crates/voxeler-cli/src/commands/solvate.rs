use crate::cli::SolvateArgs;
use crate::config::builder::build_solvate_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use std::fs;
use tracing::{info, warn};
use voxeler::{
    core::io::{discover::collect_pdb_files, pdb::read_structure, pdb::write_structure},
    engine::progress::ProgressReporter,
    workflows,
    workflows::solvate::{consensus_atoms, water_atoms},
};

pub fn run(args: SolvateArgs) -> Result<()> {
    let config = build_solvate_config(&args)?;

    let paths = collect_pdb_files(&config.input_dir).map_err(CliError::Io)?;
    if paths.is_empty() {
        return Err(CliError::Input(format!(
            "no PDB file found under '{}'",
            config.input_dir.display()
        )));
    }

    info!("Loading empirical density tables...");
    let table = workflows::solvate::load_score_table(&config.core)?;
    fs::create_dir_all(&config.output_dir)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.callback());

    println!(
        "Starting solvation of {} structure(s) ({} method)...",
        paths.len(),
        config.core.method.as_str()
    );
    for path in &paths {
        let structure =
            read_structure(path, &config.core.filter).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })?;
        info!("Invoking the core solvation workflow for '{}'", structure.name);

        let result = workflows::solvate::run(&structure, &table, &config.core, &reporter)?;

        let waters = match &result.consensus {
            Some(consensus) => consensus_atoms(consensus, config.core.occurrence_b_factor),
            None => water_atoms(&result.runs[0].waters),
        };
        if waters.is_empty() {
            warn!("No water placed around '{}'", result.structure_name);
            println!("Warning: no water placed around '{}'.", result.structure_name);
        }

        let output_path = config.output_dir.join(format!(
            "{}_{}.pdb",
            config.core.method.as_str(),
            result.structure_name
        ));
        write_structure(&output_path, &structure, &waters).map_err(|e| CliError::FileParsing {
            path: output_path.clone(),
            source: e.into(),
        })?;

        println!(
            "✓ '{}' solvated with {} water(s), written to: {}",
            result.structure_name,
            waters.len(),
            output_path.display()
        );
    }

    Ok(())
}
