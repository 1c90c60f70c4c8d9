//! Empirical interaction score tables.
//!
//! A score table maps an interaction label (for example `OOW_OC_1`, the first
//! neighbor of a candidate water being a carbonyl oxygen) to a sampled
//! distance-to-density curve. Curves are loaded from whitespace-separated
//! resource files, one file per label, named after the label with an `Oow`
//! prefix.

use crate::core::io::discover;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading empirical score tables.
#[derive(Debug, Error)]
pub enum ScoreTableError {
    /// No density file was found under the resource directory.
    #[error("no density file matching 'Oow*' found under '{path}'")]
    NoFiles {
        /// The directory that was searched.
        path: PathBuf,
    },
    /// A file system operation failed.
    #[error("failed to read density file '{path}': {source}")]
    Io {
        /// The file or directory being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A record in a density file could not be parsed.
    #[error("invalid density record in '{path}' at line {line}: {message}")]
    Parse {
        /// The file containing the bad record.
        path: PathBuf,
        /// One-based line number of the record.
        line: usize,
        /// Description of the problem.
        message: String,
    },
}

/// Empirical distance-to-density curves keyed by interaction label.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    curves: HashMap<String, Vec<(f64, f64)>>,
}

impl ScoreTable {
    /// Loads every `Oow*` file found recursively under `dir`.
    ///
    /// Each file holds one curve: a header line followed by records whose
    /// second and third whitespace-separated fields are the distance and the
    /// density. The curve is keyed by the uppercased file stem. With
    /// `normalize` set, densities are divided by the file's maximum value.
    pub fn load(dir: &Path, normalize: bool) -> Result<Self, ScoreTableError> {
        let files = discover::collect_files(dir, true, |path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("Oow"))
        })
        .map_err(|source| ScoreTableError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        if files.is_empty() {
            return Err(ScoreTableError::NoFiles {
                path: dir.to_path_buf(),
            });
        }

        let mut curves = HashMap::with_capacity(files.len());
        for path in files {
            let label = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default()
                .to_uppercase();
            let curve = Self::load_curve(&path, normalize)?;
            debug!(label = %label, samples = curve.len(), "loaded density curve");
            curves.insert(label, curve);
        }

        Ok(Self { curves })
    }

    fn load_curve(path: &Path, normalize: bool) -> Result<Vec<(f64, f64)>, ScoreTableError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|error| match error.into_kind() {
                csv::ErrorKind::Io(source) => ScoreTableError::Io {
                    path: path.to_path_buf(),
                    source,
                },
                other => ScoreTableError::Parse {
                    path: path.to_path_buf(),
                    line: 1,
                    message: format!("{other:?}"),
                },
            })?;

        let mut curve = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let line = index + 2;
            let record = record.map_err(|error| ScoreTableError::Parse {
                path: path.to_path_buf(),
                line,
                message: error.to_string(),
            })?;
            let field = |position: usize| -> Result<f64, ScoreTableError> {
                record
                    .get(position)
                    .ok_or_else(|| ScoreTableError::Parse {
                        path: path.to_path_buf(),
                        line,
                        message: format!("missing field {position}"),
                    })?
                    .parse::<f64>()
                    .map_err(|error| ScoreTableError::Parse {
                        path: path.to_path_buf(),
                        line,
                        message: error.to_string(),
                    })
            };
            curve.push((field(1)?, field(2)?));
        }

        if normalize {
            let max = curve.iter().map(|&(_, d)| d).fold(f64::NEG_INFINITY, f64::max);
            if max > 0.0 {
                for (_, density) in &mut curve {
                    *density /= max;
                }
            }
        }

        Ok(curve)
    }

    /// Builds a table directly from labeled curves.
    pub fn from_curves(curves: HashMap<String, Vec<(f64, f64)>>) -> Self {
        Self { curves }
    }

    /// Returns the number of loaded curves.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Returns true if no curve is loaded.
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Returns the density recorded at the distance nearest to the query.
    ///
    /// Unknown labels and empty curves score 0.0, which callers count as a
    /// skipped interaction rather than an error.
    pub fn nearest_score(&self, label: &str, distance: f64) -> f64 {
        let Some(curve) = self.curves.get(label) else {
            return 0.0;
        };
        curve
            .iter()
            .min_by(|(a, _), (b, _)| {
                let da = (a - distance).abs();
                let db = (b - distance).abs();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map_or(0.0, |&(_, density)| density)
    }
}
