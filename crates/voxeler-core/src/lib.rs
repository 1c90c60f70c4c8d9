//! # Voxeler Core Library
//!
//! A library for projecting molecular structures onto discretized 3D voxel grids,
//! comparing structures by volumetric overlap, and solvating them by placing water
//! molecules at empirically scored surface positions.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`Structure`,
//!   `Atom`), static chemical lookup tables, empirical density score tables, and
//!   PDB I/O utilities.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer implements the voxel grid
//!   machinery: grid frame geometry, sphere stamping, rasterization, surface-shell
//!   extraction, parallel position scoring, and the iterative greedy placer.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing
//!   layer. It ties the `engine` and `core` together to execute the two complete
//!   pipelines: pairwise structure comparison and structure solubilization.

pub mod core;
pub mod engine;
pub mod workflows;
