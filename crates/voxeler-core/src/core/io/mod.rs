//! # File I/O Module
//!
//! This module handles everything that crosses the file system boundary:
//! discovering input files, parsing fixed-column PDB records into structures,
//! filtering atoms during parsing, and writing structures back out.
//!
//! ## Key Components
//!
//! - [`discover`] - File discovery under input directories
//! - [`filter`] - Declarative atom filters applied while parsing
//! - [`pdb`] - Fixed-column PDB reading and writing

pub mod discover;
pub mod filter;
pub mod pdb;
