use std::path::PathBuf;
use voxeler::engine::config as core_config;

pub struct CompareRunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub core: core_config::CompareConfig,
}

pub struct SolvateRunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub core: core_config::SolvateConfig,
}
