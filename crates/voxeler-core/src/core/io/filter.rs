//! Declarative atom filters applied during PDB parsing.

use crate::core::models::atom::{Atom, RecordKind};
use serde::Deserialize;

/// Residue names treated as water for the `discard_water` flag.
const WATER_RESIDUES: [&str; 2] = ["HOH", "OOW"];

/// A set of rules deciding which atom records survive parsing.
///
/// All rules default to pass-through. Empty white lists accept everything;
/// a non-empty white list rejects anything not on it. Black lists always
/// reject their members. Atom white and black lists match the element symbol,
/// not the atom name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct AtomFilter {
    /// Drops every `ATOM` record.
    pub discard_atom: bool,
    /// Drops every `HETATM` record.
    pub discard_hetatm: bool,
    /// Drops hydrogens.
    pub discard_hydrogen: bool,
    /// Drops water molecules.
    pub discard_water: bool,
    /// Keeps only the primary alternate location (blank or `A`).
    pub discard_alternative: bool,
    /// Chains to keep, all when empty.
    pub chain_white_list: Vec<String>,
    /// Chains to drop.
    pub chain_black_list: Vec<String>,
    /// Residue names to keep, all when empty.
    pub residue_white_list: Vec<String>,
    /// Residue names to drop.
    pub residue_black_list: Vec<String>,
    /// Residue sequence numbers to keep, all when empty.
    pub residue_id_white_list: Vec<i32>,
    /// Residue sequence numbers to drop.
    pub residue_id_black_list: Vec<i32>,
    /// Element symbols to keep, all when empty.
    pub atom_white_list: Vec<String>,
    /// Element symbols to drop.
    pub atom_black_list: Vec<String>,
}

impl AtomFilter {
    /// Returns true if the atom passes every configured rule.
    pub fn accepts(&self, atom: &Atom) -> bool {
        if self.discard_atom && atom.kind == RecordKind::Atom {
            return false;
        }
        if self.discard_hetatm && atom.kind == RecordKind::Hetatm {
            return false;
        }
        if self.discard_hydrogen && atom.element == "H" {
            return false;
        }
        if self.discard_water && WATER_RESIDUES.contains(&atom.res_name.as_str()) {
            return false;
        }
        if self.discard_alternative && !(atom.alt_loc.is_empty() || atom.alt_loc == "A") {
            return false;
        }
        if !self.chain_white_list.is_empty() && !self.chain_white_list.contains(&atom.chain_id) {
            return false;
        }
        if self.chain_black_list.contains(&atom.chain_id) {
            return false;
        }
        if !self.residue_white_list.is_empty() && !self.residue_white_list.contains(&atom.res_name)
        {
            return false;
        }
        if self.residue_black_list.contains(&atom.res_name) {
            return false;
        }
        if !self.residue_id_white_list.is_empty()
            && !self.residue_id_white_list.contains(&atom.res_seq)
        {
            return false;
        }
        if self.residue_id_black_list.contains(&atom.res_seq) {
            return false;
        }
        if !self.atom_white_list.is_empty() && !self.atom_white_list.contains(&atom.element) {
            return false;
        }
        if self.atom_black_list.contains(&atom.element) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn atom(kind: RecordKind, element: &str, res_name: &str, chain: &str) -> Atom {
        let mut atom = Atom::new(1, element, Point3::origin());
        atom.kind = kind;
        atom.res_name = res_name.to_string();
        atom.chain_id = chain.to_string();
        atom
    }

    #[test]
    fn default_filter_accepts_everything() {
        let filter = AtomFilter::default();
        assert!(filter.accepts(&atom(RecordKind::Atom, "C", "ALA", "A")));
        assert!(filter.accepts(&atom(RecordKind::Hetatm, "O", "HOH", "")));
    }

    #[test]
    fn record_kind_flags_discard_their_kind() {
        let filter = AtomFilter {
            discard_hetatm: true,
            ..Default::default()
        };
        assert!(filter.accepts(&atom(RecordKind::Atom, "C", "ALA", "A")));
        assert!(!filter.accepts(&atom(RecordKind::Hetatm, "O", "HOH", "")));
    }

    #[test]
    fn water_residue_names_are_both_recognized() {
        let filter = AtomFilter {
            discard_water: true,
            ..Default::default()
        };
        assert!(!filter.accepts(&atom(RecordKind::Hetatm, "O", "HOH", "")));
        assert!(!filter.accepts(&atom(RecordKind::Hetatm, "O", "OOW", "")));
        assert!(filter.accepts(&atom(RecordKind::Atom, "O", "ALA", "A")));
    }

    #[test]
    fn alternate_location_keeps_blank_and_primary() {
        let filter = AtomFilter {
            discard_alternative: true,
            ..Default::default()
        };
        let mut primary = atom(RecordKind::Atom, "C", "ALA", "A");
        primary.alt_loc = "A".to_string();
        let mut secondary = primary.clone();
        secondary.alt_loc = "B".to_string();

        assert!(filter.accepts(&atom(RecordKind::Atom, "C", "ALA", "A")));
        assert!(filter.accepts(&primary));
        assert!(!filter.accepts(&secondary));
    }

    #[test]
    fn white_list_rejects_everything_not_listed() {
        let filter = AtomFilter {
            chain_white_list: vec!["A".to_string()],
            ..Default::default()
        };
        assert!(filter.accepts(&atom(RecordKind::Atom, "C", "ALA", "A")));
        assert!(!filter.accepts(&atom(RecordKind::Atom, "C", "ALA", "B")));
    }

    #[test]
    fn element_lists_match_the_symbol_not_the_name() {
        let filter = AtomFilter {
            atom_black_list: vec!["S".to_string()],
            ..Default::default()
        };
        let mut sulfur = atom(RecordKind::Atom, "S", "MET", "A");
        sulfur.name = "SD".to_string();
        assert!(!filter.accepts(&sulfur));
        assert!(filter.accepts(&atom(RecordKind::Atom, "C", "MET", "A")));
    }

    #[test]
    fn residue_id_lists_filter_by_sequence_number() {
        let filter = AtomFilter {
            residue_id_white_list: vec![10, 11],
            ..Default::default()
        };
        let mut inside = atom(RecordKind::Atom, "C", "ALA", "A");
        inside.res_seq = 10;
        let mut outside = inside.clone();
        outside.res_seq = 12;
        assert!(filter.accepts(&inside));
        assert!(!filter.accepts(&outside));
    }
}
