//! # Engine Module
//!
//! This module implements the voxel grid engine of Voxeler, providing the
//! computational machinery for volumetric structure comparison and solvent
//! placement workflows.
//!
//! ## Overview
//!
//! The engine turns parsed molecular structures into dense 3D voxel grids and
//! operates on them: it sizes and offsets grid frames, stamps van der Waals
//! spheres, extracts solvation shells, scores candidate water positions
//! against empirical density tables, and greedily places water molecules in
//! descending score order.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules that handle different
//! aspects of the grid pipeline:
//!
//! - **Configuration** ([`config`]) - Typed run parameters, geometry and metric selection
//! - **Grid Frames** ([`frame`]) - Grid sizing, offsets, and real/grid coordinate transforms
//! - **Voxel Grids** ([`grid`]) - Dense single-channel and tracked grid storage
//! - **Sphere Stamping** ([`sphere`]) - Offset set generation and memoization per radius
//! - **Rasterization** ([`rasterizer`]) - Projection of atoms and their spheres into grids
//! - **Surface Extraction** ([`surface`]) - Solvation shell computation by sphere difference
//! - **Position Scoring** ([`scoring`]) - Parallel empirical scoring of shell voxels
//! - **Greedy Placement** ([`placement`]) - Iterative score-descending water placement
//! - **Consensus** ([`consensus`]) - Occurrence bookkeeping across stochastic runs
//! - **Progress Monitoring** ([`progress`]) - Progress reporting callbacks
//! - **Error Handling** ([`error`]) - Engine-specific error types and propagation
//!
//! ## Key Capabilities
//!
//! - **Three sphere geometries** (taxicab, uniform, euclidean) selectable per run
//! - **Congruent grid frames** so every structure of a batch shares one coordinate space
//! - **Parallel scoring** of candidate voxels over a shared read-only spatial index
//! - **Stochastic placement** with acceptance draws and multi-run consensus selection
//! - **Memory backpressure** gating grid allocation against a configured budget
//! - **Fail-fast validation** of spacings, radii, and grid sizes before allocation

pub mod config;
pub mod consensus;
pub mod error;
pub(crate) mod frame;
pub(crate) mod grid;
pub(crate) mod memory;
pub mod placement;
pub mod progress;
pub(crate) mod rasterizer;
pub(crate) mod scoring;
pub(crate) mod sphere;
pub(crate) mod surface;
