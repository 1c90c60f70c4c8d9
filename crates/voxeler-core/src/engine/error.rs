use crate::core::tables::density::ScoreTableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Grid spacing {spacing} is not a positive finite number")]
    InvalidSpacing { spacing: f64 },

    #[error("Grid of {voxels} voxels exceeds the limit of {limit}; increase the grid spacing")]
    GridTooLarge { voxels: u128, limit: u128 },

    #[error("Structure '{name}' contains no atoms")]
    EmptyStructure { name: String },

    #[error("At least two structures are required for comparison, found {found}")]
    InsufficientStructures { found: usize },

    #[error("Zero similarity normalizer for pair '{first}' / '{second}'")]
    ZeroNormalizer { first: String, second: String },

    #[error("Score table error: {source}")]
    ScoreTable {
        #[from]
        source: ScoreTableError,
    },
}
