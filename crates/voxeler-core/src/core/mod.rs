//! # Core Module
//!
//! This module provides the fundamental building blocks for voxel-grid analysis of
//! molecular structures, serving as the stateless foundation of the library.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules that handle different aspects
//! of molecular data handling:
//!
//! - **Molecular Representation** ([`models`]) - Data structures for atoms, their
//!   chemical-role classification, and whole parsed structures
//! - **Static Tables** ([`tables`]) - Element properties (atomic number, VdW radius,
//!   mass) and empirical distance→density score tables
//! - **File I/O** ([`io`]) - Fixed-column PDB reading/writing with verbatim
//!   round-trip of non-atom records, atom filtering, and input discovery
//!
//! ## Key Capabilities
//!
//! - **Fixed-layout atom records** validated once at parse time
//! - **Deterministic chemical-role classification** driven by a fixed priority table
//! - **Empirical score lookup** by interaction label and nearest recorded distance
//! - **Round-trip-safe PDB serialization** compatible with the input text format

pub mod io;
pub mod models;
pub mod tables;
