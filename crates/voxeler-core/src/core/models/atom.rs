use super::classify::AtomClass;
use nalgebra::Point3;
use std::str::FromStr;

/// Distinguishes the two atom record kinds of the PDB format.
///
/// The distinction is preserved through parsing and serialization so that a
/// round-tripped structure keeps its original record types, and it drives the
/// `discard_atom` / `discard_hetatm` filter flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordKind {
    /// A standard `ATOM` record, typically a polymer atom.
    #[default]
    Atom,
    /// A `HETATM` record: ligands, ions, waters, and other hetero groups.
    Hetatm,
}

impl RecordKind {
    /// Returns the fixed-column record name as written in PDB files.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Atom => "ATOM",
            RecordKind::Hetatm => "HETATM",
        }
    }
}

impl FromStr for RecordKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ATOM" => Ok(RecordKind::Atom),
            "HETATM" => Ok(RecordKind::Hetatm),
            _ => Err(()),
        }
    }
}

/// Represents a single parsed atom with its PDB fields and derived properties.
///
/// This struct is a fixed-layout record of the fifteen positional fields of an
/// ATOM/HETATM line, plus two properties computed once after parsing: the atomic
/// mass (element table lookup) and the chemical-role [`AtomClass`] used as an
/// empirical score key. Atoms are immutable once the owning structure is built;
/// grid-space coordinates are derived per grid frame and live outside this type.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Whether this atom came from an `ATOM` or `HETATM` record.
    pub kind: RecordKind,
    /// Atom serial number.
    pub serial: u32,
    /// The atom name (e.g., "CA", "OG1").
    pub name: String,
    /// Alternate location indicator (single character column, often blank).
    pub alt_loc: String,
    /// Residue name (e.g., "ALA", "HOH").
    pub res_name: String,
    /// Chain identifier.
    pub chain_id: String,
    /// Residue sequence number.
    pub res_seq: i32,
    /// Code for insertion of residues.
    pub i_code: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Occupancy.
    pub occupancy: f64,
    /// Temperature factor (B-factor).
    pub temp_factor: f64,
    /// Element symbol, uppercased.
    pub element: String,
    /// Charge on the atom, kept as the raw two-character field.
    pub charge: String,
    /// Atomic mass in Daltons, resolved from the element table.
    pub mass: f64,
    /// The derived chemical-role classification of this atom.
    pub class: AtomClass,
}

impl Atom {
    /// Creates a new `Atom` with default values for most fields.
    ///
    /// This constructor initializes an atom with the provided serial, element
    /// symbol, and position. Other fields are set to their default values and
    /// can be filled afterward by the parser.
    pub fn new(serial: u32, element: &str, position: Point3<f64>) -> Self {
        Self {
            kind: RecordKind::default(),
            serial,
            name: element.to_string(),
            alt_loc: String::new(),
            res_name: String::new(),
            chain_id: String::new(),
            res_seq: 0,
            i_code: String::new(),
            position,
            occupancy: 1.0,
            temp_factor: 0.0,
            element: element.to_string(),
            charge: String::new(),
            mass: 0.0,
            class: AtomClass::default(),
        }
    }

    /// Returns the key identifying this atom's residue within its chain.
    ///
    /// Used by the per-residue scoring mode to consider at most one atom per
    /// residue when walking a candidate position's neighbors.
    pub fn residue_key(&self) -> String {
        format!("{}_{}", self.res_seq, self.chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let atom = Atom::new(7, "C", Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.kind, RecordKind::Atom);
        assert_eq!(atom.serial, 7);
        assert_eq!(atom.element, "C");
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.occupancy, 1.0);
        assert_eq!(atom.temp_factor, 0.0);
        assert_eq!(atom.class, AtomClass::default());
    }

    #[test]
    fn record_kind_parses_and_formats() {
        assert_eq!(RecordKind::from_str("ATOM"), Ok(RecordKind::Atom));
        assert_eq!(RecordKind::from_str("HETATM"), Ok(RecordKind::Hetatm));
        assert_eq!(RecordKind::from_str("REMARK"), Err(()));
        assert_eq!(RecordKind::Atom.as_str(), "ATOM");
        assert_eq!(RecordKind::Hetatm.as_str(), "HETATM");
    }

    #[test]
    fn residue_key_combines_sequence_and_chain() {
        let mut atom = Atom::new(1, "N", Point3::origin());
        atom.res_seq = 42;
        atom.chain_id = "B".to_string();
        assert_eq!(atom.residue_key(), "42_B");
    }
}
