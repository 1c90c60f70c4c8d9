//! Fixed-column PDB reading and writing.
//!
//! Only `ATOM` and `HETATM` records carry data the engine uses; every other
//! line is kept verbatim so a parsed structure retains its header and trailer.
//! Fields live at fixed byte columns, and writing reproduces the same layout.

use super::filter::AtomFilter;
use crate::core::models::atom::{Atom, RecordKind};
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading or writing PDB files.
#[derive(Debug, Error)]
pub enum PdbError {
    /// A file system operation failed.
    #[error("failed to access '{path}': {source}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file holds no usable content.
    #[error("the PDB file '{path}' is empty")]
    Empty {
        /// The offending file.
        path: PathBuf,
    },
    /// An atom record field could not be converted.
    #[error("invalid atom record in '{path}' at line {line}: {message}")]
    InvalidRecord {
        /// The file containing the bad record.
        path: PathBuf,
        /// One-based line number of the record.
        line: usize,
        /// Description of the problem.
        message: String,
    },
}

/// Reads a structure from a PDB file, applying `filter` to each atom record.
///
/// Atom records failing a numeric conversion are fatal and reported with their
/// line number. Non-atom lines before the first atom record become the leading
/// block, the rest the trailing block.
pub fn read_structure(path: &Path, filter: &AtomFilter) -> Result<Structure, PdbError> {
    let content = fs::read_to_string(path).map_err(|source| PdbError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 2 {
        return Err(PdbError::Empty {
            path: path.to_path_buf(),
        });
    }

    let mut atoms = Vec::new();
    let mut leading = Vec::new();
    let mut trailing = Vec::new();
    let mut atom_seen = false;

    for (index, line) in lines.iter().enumerate() {
        if line.starts_with("ATOM") || line.starts_with("HETATM") {
            atom_seen = true;
            let atom = parse_atom_line(line).map_err(|message| PdbError::InvalidRecord {
                path: path.to_path_buf(),
                line: index + 1,
                message,
            })?;
            if filter.accepts(&atom) {
                atoms.push(atom);
            }
        } else if atom_seen {
            trailing.push((*line).to_string());
        } else {
            leading.push((*line).to_string());
        }
    }

    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .split('.')
        .next()
        .unwrap_or_default();
    debug!(structure = name, atoms = atoms.len(), "parsed PDB file");

    let mut structure = Structure::new(name, atoms);
    structure.leading_lines = leading;
    structure.trailing_lines = trailing;
    Ok(structure)
}

fn parse_atom_line(line: &str) -> Result<Atom, String> {
    let padded = format!("{line:<80}");
    let column = |range: std::ops::Range<usize>| -> Result<&str, String> {
        padded
            .get(range.clone())
            .map(str::trim)
            .ok_or_else(|| format!("columns {}..{} are not valid text", range.start, range.end))
    };
    let numeric = |range: std::ops::Range<usize>, field: &str| -> Result<f64, String> {
        let text = column(range)?;
        f64::from_str(text).map_err(|_| format!("invalid {field} '{text}'"))
    };

    let kind = RecordKind::from_str(column(0..6)?)
        .map_err(|()| format!("unknown record name '{}'", column(0..6).unwrap_or("")))?;
    let serial = column(6..11)?
        .parse::<u32>()
        .map_err(|_| format!("invalid atom serial '{}'", column(6..11).unwrap_or("")))?;
    let res_seq = column(22..26)?
        .parse::<i32>()
        .map_err(|_| format!("invalid residue number '{}'", column(22..26).unwrap_or("")))?;

    let mut atom = Atom::new(
        serial,
        &column(76..78)?.to_uppercase(),
        Point3::new(
            numeric(30..38, "x coordinate")?,
            numeric(38..46, "y coordinate")?,
            numeric(46..54, "z coordinate")?,
        ),
    );
    atom.kind = kind;
    atom.name = column(12..16)?.to_string();
    atom.alt_loc = column(16..17)?.to_string();
    atom.res_name = column(17..20)?.to_string();
    atom.chain_id = column(21..22)?.to_string();
    atom.res_seq = res_seq;
    atom.i_code = column(26..27)?.to_string();
    atom.occupancy = numeric(54..60, "occupancy")?;
    atom.temp_factor = numeric(60..66, "temperature factor")?;
    atom.charge = column(78..80)?.to_string();
    Ok(atom)
}

/// Formats one atom as a fixed-column `ATOM`/`HETATM` line.
pub fn format_atom_line(atom: &Atom) -> String {
    format!(
        "{:<6}{:>5} {:^4}{:<1}{:<3} {:<1}{:>4}{:<1}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}{:<2}",
        atom.kind.as_str(),
        atom.serial,
        atom.name,
        atom.alt_loc,
        atom.res_name,
        atom.chain_id,
        atom.res_seq,
        atom.i_code,
        atom.position.x,
        atom.position.y,
        atom.position.z,
        atom.occupancy,
        atom.temp_factor,
        atom.element,
        atom.charge,
    )
}

/// Writes a structure back out in its original shape.
///
/// The preserved leading block comes first, then the structure's atoms and
/// any extra records, then the preserved trailing block.
pub fn write_structure(path: &Path, structure: &Structure, extra: &[Atom]) -> Result<(), PdbError> {
    let io_error = |source| PdbError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    for line in &structure.leading_lines {
        writeln!(writer, "{line}").map_err(io_error)?;
    }
    for atom in structure.atoms.iter().chain(extra) {
        writeln!(writer, "{}", format_atom_line(atom)).map_err(io_error)?;
    }
    for line in &structure.trailing_lines {
        writeln!(writer, "{line}").map_err(io_error)?;
    }
    writer.flush().map_err(io_error)?;
    debug!(
        path = %path.display(),
        atoms = structure.atoms.len() + extra.len(),
        "wrote PDB file"
    );
    Ok(())
}
