use nalgebra::Point3;
use std::collections::HashMap;

/// A consensus water position retained after repeated stochastic runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsensusWater {
    pub position: Point3<f64>,
    pub occurrence: u32,
    pub score: f32,
}

/// Counts how often each position received a water across stochastic runs.
///
/// Positions are quantized to a tenth of an Angstrom so placements landing on
/// the same cell across regenerated grids share one key. The score kept per
/// key is the one from the latest run that placed there.
#[derive(Debug, Clone, Default)]
pub struct OccupancyLedger {
    entries: HashMap<[i64; 3], (u32, f32)>,
}

impl OccupancyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn quantize(position: &Point3<f64>) -> [i64; 3] {
        [
            (position.x * 10.0).round() as i64,
            (position.y * 10.0).round() as i64,
            (position.z * 10.0).round() as i64,
        ]
    }

    pub fn record(&mut self, position: &Point3<f64>, score: f32) {
        let entry = self
            .entries
            .entry(Self::quantize(position))
            .or_insert((0, score));
        entry.0 += 1;
        entry.1 = score;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Positions whose occurrence fraction strictly exceeds `threshold`.
    pub fn selected(&self, runs: u32, threshold: f64) -> Vec<ConsensusWater> {
        if runs == 0 {
            return Vec::new();
        }
        let mut picked: Vec<([i64; 3], ConsensusWater)> = self
            .entries
            .iter()
            .filter(|&(_, &(occurrence, _))| occurrence as f64 / runs as f64 > threshold)
            .map(|(&key, &(occurrence, score))| {
                (
                    key,
                    ConsensusWater {
                        position: Point3::new(
                            key[0] as f64 / 10.0,
                            key[1] as f64 / 10.0,
                            key[2] as f64 / 10.0,
                        ),
                        occurrence,
                        score,
                    },
                )
            })
            .collect();
        picked.sort_by_key(|(key, _)| *key);
        picked.into_iter().map(|(_, water)| water).collect()
    }
}
