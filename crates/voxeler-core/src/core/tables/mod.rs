//! # Static Tables Module
//!
//! This module holds the static chemical data the engine depends on: element
//! properties keyed by symbol, and empirical distance-to-density score tables
//! loaded from resource files.
//!
//! ## Key Components
//!
//! - [`elements`] - Atomic number, mass, and van der Waals radius per element
//!   symbol, plus the reserved grid cell codes for metals and water
//! - [`density`] - Empirical interaction score tables mapping an interaction
//!   label and a distance to a density value

pub mod density;
pub mod elements;
