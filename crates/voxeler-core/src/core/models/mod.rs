//! # Core Models Module
//!
//! This module contains the fundamental data structures used to represent parsed
//! molecular structures, providing the foundation for rasterization and scoring.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom representation with the fifteen positional PDB
//!   fields plus derived properties
//! - [`classify`] - Chemical-role classification of atoms used as empirical score
//!   lookup keys
//! - [`structure`] - A complete parsed structure with per-element atom groups and
//!   preserved non-atom text

pub mod atom;
pub mod classify;
pub mod structure;
