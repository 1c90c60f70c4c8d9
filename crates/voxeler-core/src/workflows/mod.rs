//! # Workflows Module
//!
//! This module provides the high-level pipelines of Voxeler, orchestrating the
//! engine and the core layers into the two complete operations the tool ships.
//!
//! ## Overview
//!
//! Workflows are the top-level entry points for users of the library. They
//! validate inputs, build shared grid frames, drive the engine phases in
//! order, report progress, and organize results, providing a simple API over
//! the voxel grid machinery.
//!
//! ## Architecture
//!
//! The module is organized around the two pipelines:
//!
//! - **Comparison Workflow** ([`compare`]) - Pairwise volumetric overlap scoring
//!   of a structure batch over a shared grid frame, assembled into a symmetric
//!   similarity matrix.
//! - **Solvation Workflow** ([`solvate`]) - Surface-shell extraction, empirical
//!   candidate scoring, and greedy water placement, optionally repeated across
//!   stochastic runs with consensus selection.
//!
//! ## Key Capabilities
//!
//! - **Congruent grids** so every structure of a batch shares one coordinate frame
//! - **Parallel dispatch** of independent comparison and scoring tasks
//! - **Memory backpressure** gating grid allocation against a configured budget
//! - **Progress monitoring** with detailed phase and task reporting
//! - **Water pseudo-atom assembly** ready for PDB serialization

pub mod compare;
pub mod solvate;
