use crate::core::models::atom::{Atom, RecordKind};
use crate::core::models::classify::AtomClass;
use crate::core::models::structure::Structure;
use crate::core::tables::density::ScoreTable;
use crate::engine::config::SolvateConfig;
use crate::engine::consensus::{ConsensusWater, OccupancyLedger};
use crate::engine::error::EngineError;
use crate::engine::frame::GridFrame;
use crate::engine::placement::{place_waters, PlacedWater, PlacementOptions};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::rasterizer::rasterize_tracked;
use crate::engine::scoring::score_positions;
use crate::engine::sphere::SphereCache;
use crate::engine::surface::{effective_shell, extract_shell};
use nalgebra::Point3;
use rand::Rng;
use tracing::{info, instrument};

// Sentinel PDB fields marking water pseudo-atoms appended to the output.
const WATER_SERIAL: u32 = 65_424;
const WATER_RES_SEQ: i32 = 9_888;

/// One placement pass over the structure.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvationRun {
    pub waters: Vec<PlacedWater>,
    pub mean_score: f64,
}

/// The outcome of the solvation workflow on one structure.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvationResult {
    pub structure_name: String,
    pub runs: Vec<SolvationRun>,
    /// Positions retained across stochastic runs, absent for the
    /// deterministic method.
    pub consensus: Option<Vec<ConsensusWater>>,
}

/// Loads the empirical score table the configuration points at.
pub fn load_score_table(config: &SolvateConfig) -> Result<ScoreTable, EngineError> {
    let table = ScoreTable::load(&config.density_dir, config.normalize_densities)?;
    info!(curves = table.len(), dir = %config.density_dir.display(), "score table loaded");
    Ok(table)
}

#[instrument(skip_all, name = "solvation_workflow")]
pub fn run(
    structure: &Structure,
    table: &ScoreTable,
    config: &SolvateConfig,
    reporter: &ProgressReporter,
) -> Result<SolvationResult, EngineError> {
    execute(structure, table, config, reporter, &mut rand::thread_rng())
}

fn execute(
    structure: &Structure,
    table: &ScoreTable,
    config: &SolvateConfig,
    reporter: &ProgressReporter,
    rng: &mut impl Rng,
) -> Result<SolvationResult, EngineError> {
    // === Phase 0: Grid frame ===
    let (min, max) = structure
        .extents()
        .ok_or_else(|| EngineError::EmptyStructure {
            name: structure.name.clone(),
        })?;
    let (_, outer_radius) = effective_shell(&config.shell);
    let frame = GridFrame::for_solvation(min, max, config.spacing, outer_radius)?;
    info!(
        structure = %structure.name,
        voxels = frame.len(),
        method = config.method.as_str(),
        "solvation grid frame ready"
    );

    let options = PlacementOptions {
        metric: config.scoring.metric,
        min_score: config.min_water_score,
        stochastic: config.is_stochastic(),
        acceptance_threshold: config.acceptance_threshold,
    };
    let mut cache = SphereCache::new();
    let mut ledger = OccupancyLedger::new();
    let mut runs = Vec::with_capacity(config.run_count() as usize);

    for run_number in 1..=config.run_count() {
        // === Phase 1: Rasterization ===
        reporter.report(Progress::PhaseStart {
            name: "Rasterizing structure",
        });
        let mut grid = rasterize_tracked(structure, frame, config.geometry, &mut cache);
        reporter.report(Progress::PhaseFinish);

        // === Phase 2: Shell extraction ===
        reporter.report(Progress::PhaseStart {
            name: "Extracting solvation shell",
        });
        let candidates = extract_shell(
            &mut grid,
            structure,
            &config.shell,
            config.geometry,
            &mut cache,
        );
        reporter.report(Progress::PhaseFinish);

        // === Phase 3: Candidate scoring ===
        reporter.report(Progress::PhaseStart {
            name: "Scoring candidate positions",
        });
        let scored = score_positions(&mut grid, structure, table, &config.scoring, reporter);
        reporter.report(Progress::PhaseFinish);

        // === Phase 4: Greedy placement ===
        reporter.report(Progress::PhaseStart {
            name: "Placing waters",
        });
        let waters = place_waters(&mut grid, &options, &mut cache, rng);
        reporter.report(Progress::PhaseFinish);

        let mean_score = if waters.is_empty() {
            0.0
        } else {
            waters.iter().map(|water| water.score as f64).sum::<f64>() / waters.len() as f64
        };
        info!(
            run = run_number,
            candidates,
            scored,
            placed = waters.len(),
            mean_score,
            "solubilization run finished"
        );

        if config.is_stochastic() {
            for water in &waters {
                ledger.record(&water.position, water.score);
            }
        }
        runs.push(SolvationRun { waters, mean_score });
    }

    let consensus = config.is_stochastic().then(|| {
        let selected = ledger.selected(config.runs, config.occurrence_threshold);
        info!(
            recorded = ledger.len(),
            selected = selected.len(),
            "consensus positions selected"
        );
        selected
    });

    Ok(SolvationResult {
        structure_name: structure.name.clone(),
        runs,
        consensus,
    })
}

fn water_atom(index: usize, position: Point3<f64>, temp_factor: f64) -> Atom {
    let mut atom = Atom::new(WATER_SERIAL, "O", position);
    atom.kind = RecordKind::Hetatm;
    atom.name = "OOW".to_string();
    atom.res_name = "HOH".to_string();
    atom.res_seq = WATER_RES_SEQ;
    atom.temp_factor = temp_factor;
    // The charge column carries the placement order instead of a charge.
    atom.charge = (index + 1).to_string();
    atom.class = AtomClass::WaterOxygen;
    atom
}

/// Water pseudo-atoms for the placements of one run, in placement order.
///
/// The score lands in the temperature factor column and the one-based
/// placement index in the charge column.
pub fn water_atoms(waters: &[PlacedWater]) -> Vec<Atom> {
    waters
        .iter()
        .enumerate()
        .map(|(index, water)| water_atom(index, water.position, water.score as f64))
        .collect()
}

/// Water pseudo-atoms for the consensus positions of a stochastic batch.
///
/// With `occurrence_b_factor` set, the temperature factor column carries the
/// occurrence count instead of the score.
pub fn consensus_atoms(waters: &[ConsensusWater], occurrence_b_factor: bool) -> Vec<Atom> {
    waters
        .iter()
        .enumerate()
        .map(|(index, water)| {
            let temp_factor = if occurrence_b_factor {
                water.occurrence as f64
            } else {
                water.score as f64
            };
            water_atom(index, water.position, temp_factor)
        })
        .collect()
}
