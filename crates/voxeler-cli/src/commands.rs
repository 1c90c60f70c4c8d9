pub mod compare;
pub mod solvate;
