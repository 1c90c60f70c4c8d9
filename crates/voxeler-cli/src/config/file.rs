use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use voxeler::core::io::filter::AtomFilter;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub compare: CompareSection,
    #[serde(default)]
    pub solvate: SolvateSection,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(CliError::Io)?;
        let config = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        debug!("Loaded run configuration from {:?}", path);
        Ok(config)
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CompareSection {
    pub spacing: Option<f64>,
    pub geometry: Option<String>,
    pub normalization: Option<String>,
    pub consider_elements: Option<bool>,
    pub memory_budget_gib: Option<f64>,
    #[serde(default)]
    pub filter: AtomFilter,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SolvateSection {
    pub spacing: Option<f64>,
    pub geometry: Option<String>,
    pub method: Option<String>,
    pub runs: Option<u32>,
    pub acceptance_threshold: Option<f64>,
    pub occurrence_threshold: Option<f64>,
    pub occurrence_b_factor: Option<bool>,
    pub solubilization_radius: Option<[f64; 2]>,
    pub scoring_metric: Option<String>,
    pub max_neighbor_distance: Option<f64>,
    pub max_neighbor_number: Option<usize>,
    pub only_first_neighbor: Option<bool>,
    pub per_residue: Option<bool>,
    pub mean_score: Option<bool>,
    pub min_water_score: Option<f64>,
    pub density_dir: Option<PathBuf>,
    pub normalize_densities: Option<bool>,
    #[serde(default)]
    pub filter: AtomFilter,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn full_configuration_round_trips_through_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(
            &path,
            r#"
[compare]
spacing = 0.5
geometry = "taxicab"
normalization = "global_max"
consider-elements = false

[compare.filter]
discard-hydrogen = true
chain-white-list = ["A", "B"]

[solvate]
spacing = 0.25
method = "randomax"
runs = 20
solubilization-radius = [1.0, 2.5]
density-dir = "resources/densities"
"#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(config.compare.spacing, Some(0.5));
        assert_eq!(config.compare.geometry.as_deref(), Some("taxicab"));
        assert_eq!(config.compare.consider_elements, Some(false));
        assert!(config.compare.filter.discard_hydrogen);
        assert_eq!(config.compare.filter.chain_white_list, ["A", "B"]);
        assert_eq!(config.solvate.runs, Some(20));
        assert_eq!(config.solvate.solubilization_radius, Some([1.0, 2.5]));
        assert_eq!(
            config.solvate.density_dir,
            Some(PathBuf::from("resources/densities"))
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(&path, "[compare]\ngrid-resolution = 0.5\n").unwrap();

        assert!(matches!(
            FileConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(&path, "[compare]\nspacing = 1.0\n").unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(config.solvate.spacing, None);
        assert_eq!(config.solvate.filter, AtomFilter::default());
    }
}
