use super::file::FileConfig;
use super::models::{CompareRunConfig, SolvateRunConfig};
use crate::cli::{CompareArgs, SolvateArgs};
use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use voxeler::engine::config::{
    CompareConfigBuilder, ConfigError, Metric, Normalization, SolvateConfigBuilder,
    SolvationMethod, SphereGeometry,
};

const DEFAULT_SPACING: f64 = 0.1;
const DEFAULT_DENSITY_DIR: &str = "resources/densities";

pub fn build_compare_config(args: &CompareArgs) -> Result<CompareRunConfig> {
    let section = load_file(args.config.as_deref())?.compare;
    let spacing = args.spacing.or(section.spacing).unwrap_or(DEFAULT_SPACING);
    let geometry = parse_override::<SphereGeometry>(&args.geometry, &section.geometry)?;
    let normalization = parse_override::<Normalization>(&args.normalization, &section.normalization)?;

    let mut builder = CompareConfigBuilder::new()
        .spacing(spacing)
        .filter(section.filter);
    if let Some(geometry) = geometry {
        builder = builder.geometry(geometry);
    }
    if let Some(normalization) = normalization {
        builder = builder.normalization(normalization);
    }
    if args.volume_only {
        builder = builder.consider_elements(false);
    } else if let Some(consider) = section.consider_elements {
        builder = builder.consider_elements(consider);
    }
    if let Some(budget) = args.memory_budget.or(section.memory_budget_gib) {
        builder = builder.memory_budget_gib(budget);
    }

    Ok(CompareRunConfig {
        input_dir: args.input.clone(),
        output_dir: args.output.clone(),
        core: builder.build().map_err(config_error)?,
    })
}

pub fn build_solvate_config(args: &SolvateArgs) -> Result<SolvateRunConfig> {
    let section = load_file(args.config.as_deref())?.solvate;
    let spacing = args.spacing.or(section.spacing).unwrap_or(DEFAULT_SPACING);
    let density_dir = args
        .densities
        .clone()
        .or_else(|| section.density_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DENSITY_DIR));
    let geometry = parse_override::<SphereGeometry>(&args.geometry, &section.geometry)?;
    let method = parse_override::<SolvationMethod>(&args.method, &section.method)?;
    let metric = parse_override::<Metric>(&None, &section.scoring_metric)?;

    let mut builder = SolvateConfigBuilder::new()
        .spacing(spacing)
        .density_dir(density_dir)
        .filter(section.filter.clone());
    if let Some(geometry) = geometry {
        builder = builder.geometry(geometry);
    }
    if let Some(method) = method {
        builder = builder.method(method);
    }
    if let Some(metric) = metric {
        builder = builder.metric(metric);
    }
    if let Some([min_radius, max_radius]) = section.solubilization_radius {
        builder = builder.shell(min_radius, max_radius);
    }
    if let Some(runs) = args.runs.or(section.runs) {
        builder = builder.runs(runs);
    }
    if let Some(threshold) = section.acceptance_threshold {
        builder = builder.acceptance_threshold(threshold);
    }
    if let Some(threshold) = section.occurrence_threshold {
        builder = builder.occurrence_threshold(threshold);
    }
    if let Some(occurrence) = section.occurrence_b_factor {
        builder = builder.occurrence_b_factor(occurrence);
    }
    if let Some(distance) = section.max_neighbor_distance {
        builder = builder.max_neighbor_distance(distance);
    }
    if let Some(count) = section.max_neighbor_number {
        builder = builder.max_neighbor_number(count);
    }
    if let Some(only_first) = section.only_first_neighbor {
        builder = builder.only_first_neighbor(only_first);
    }
    if let Some(per_residue) = section.per_residue {
        builder = builder.per_residue(per_residue);
    }
    if let Some(mean) = section.mean_score {
        builder = builder.mean_score(mean);
    }
    if let Some(score) = args.min_water_score.or(section.min_water_score) {
        builder = builder.min_water_score(score);
    }
    if let Some(normalize) = section.normalize_densities {
        builder = builder.normalize_densities(normalize);
    }

    Ok(SolvateRunConfig {
        input_dir: args.input.clone(),
        output_dir: args.output.clone(),
        core: builder.build().map_err(config_error)?,
    })
}

fn load_file(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => FileConfig::from_file(path),
        None => Ok(FileConfig::default()),
    }
}

/// CLI flags win over the configuration file.
fn parse_override<T: FromStr<Err = ConfigError>>(
    cli_value: &Option<String>,
    file_value: &Option<String>,
) -> Result<Option<T>> {
    cli_value
        .as_deref()
        .or(file_value.as_deref())
        .map(|value| value.parse().map_err(config_error))
        .transpose()
}

fn config_error(error: ConfigError) -> CliError {
    CliError::Config(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn compare_args(config: Option<PathBuf>) -> CompareArgs {
        CompareArgs {
            input: PathBuf::from("in"),
            output: PathBuf::from("out"),
            config,
            spacing: None,
            geometry: None,
            normalization: None,
            volume_only: false,
            memory_budget: None,
        }
    }

    fn solvate_args(config: Option<PathBuf>) -> SolvateArgs {
        SolvateArgs {
            input: PathBuf::from("in"),
            output: PathBuf::from("out"),
            config,
            spacing: None,
            geometry: None,
            method: None,
            runs: None,
            min_water_score: None,
            densities: None,
        }
    }

    #[test]
    fn defaults_apply_without_a_configuration_file() {
        let config = build_compare_config(&compare_args(None)).unwrap();
        assert_eq!(config.core.spacing, DEFAULT_SPACING);
        assert_eq!(config.core.normalization, Normalization::Max);

        let config = build_solvate_config(&solvate_args(None)).unwrap();
        assert_eq!(config.core.spacing, DEFAULT_SPACING);
        assert_eq!(config.core.density_dir, PathBuf::from(DEFAULT_DENSITY_DIR));
        assert_eq!(config.core.method, SolvationMethod::Itermax);
    }

    #[test]
    fn cli_overrides_beat_the_configuration_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(
            &path,
            "[compare]\nspacing = 0.5\nnormalization = \"min\"\n",
        )
        .unwrap();

        let mut args = compare_args(Some(path));
        args.spacing = Some(1.0);
        let config = build_compare_config(&args).unwrap();
        assert_eq!(config.core.spacing, 1.0);
        assert_eq!(config.core.normalization, Normalization::Min);
    }

    #[test]
    fn invalid_enum_names_become_config_errors() {
        let mut args = compare_args(None);
        args.geometry = Some("dodecahedron".to_string());
        assert!(matches!(
            build_compare_config(&args),
            Err(CliError::Config(_))
        ));

        let mut args = solvate_args(None);
        args.method = Some("montecarlo".to_string());
        assert!(matches!(
            build_solvate_config(&args),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn solvate_file_settings_reach_the_core_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(
            &path,
            r#"
[solvate]
spacing = 0.5
method = "randomax"
runs = 5
solubilization-radius = [2.0, 1.0]
scoring-metric = "minkowski"
min-water-score = 0.2
"#,
        )
        .unwrap();

        let config = build_solvate_config(&solvate_args(Some(path))).unwrap();
        assert_eq!(config.core.method, SolvationMethod::Randomax);
        assert_eq!(config.core.runs, 5);
        assert_eq!(config.core.shell.min_radius, 1.0);
        assert_eq!(config.core.shell.max_radius, 2.0);
        assert_eq!(config.core.scoring.metric, Metric::Chebyshev);
        assert_eq!(config.core.min_water_score, 0.2);
    }
}
