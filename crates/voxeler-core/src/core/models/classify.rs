use crate::core::tables::elements;
use std::fmt;

/// The chemical-role classification of an atom within a structure.
///
/// Classes are the lookup keys for the empirical interaction score tables: a
/// candidate water position scored against a neighboring atom uses the label
/// `OOW_<class>_<rank>`. Classification is a pure function of (residue name,
/// atom name, element symbol) evaluated once at structure load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AtomClass {
    /// Hydrogen.
    Hydrogen,
    /// Oxygen in a carbonyl group (including the main-chain O).
    Carbonyl,
    /// Nitrogen in an amide group (including the main-chain N).
    Amide,
    /// Basic nitrogen: Arg guanidinium, His imidazole, Lys amino.
    BasicNitrogen,
    /// SP2 carbon in an aromatic ring, or the central carbon of a charged group.
    AromaticCarbon,
    /// Oxygen in a hydroxyl or phenol group.
    Hydroxyl,
    /// Oxygen in a carboxylate group or the C-terminal OXT.
    Carboxylate,
    /// Any other atom inside a standard amino-acid residue.
    #[default]
    OtherResidue,
    /// A metallic element.
    Metal,
    /// A halogen element.
    Halogen,
    /// The oxygen of a water molecule.
    WaterOxygen,
    /// Unclassified hetero atom.
    Hetero,
}

impl AtomClass {
    /// Returns the label used in empirical interaction score keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            AtomClass::Hydrogen => "H",
            AtomClass::Carbonyl => "OC",
            AtomClass::Amide => "NAM",
            AtomClass::BasicNitrogen => "NBAS",
            AtomClass::AromaticCarbon => "CAR",
            AtomClass::Hydroxyl => "OH",
            AtomClass::Carboxylate => "OOX",
            AtomClass::OtherResidue => "XOT",
            AtomClass::Metal => "META",
            AtomClass::Halogen => "HALO",
            AtomClass::WaterOxygen => "OOW",
            AtomClass::Hetero => "HETATM",
        }
    }
}

impl fmt::Display for AtomClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The twenty standard amino-acid residue names.
const STANDARD_RESIDUES: [&str; 20] = [
    "ALA", "ILE", "LEU", "VAL", "MET", "CYS", "PHE", "TRP", "TYR", "HIS", "THR", "SER", "ASN",
    "GLN", "ASP", "GLU", "ARG", "LYS", "PRO", "GLY",
];

/// Main-chain and backup conversions from atom or element names.
fn main_chain_class(name: &str) -> Option<AtomClass> {
    match name {
        "O" => Some(AtomClass::Carbonyl),
        "H" => Some(AtomClass::Hydrogen),
        "N" => Some(AtomClass::Amide),
        "C" | "CA" | "CB" | "OXT" => Some(AtomClass::OtherResidue),
        _ => None,
    }
}

fn is_arginine_nitrogen(res: &str, name: &str) -> bool {
    res == "ARG" && matches!(name, "NH1" | "NH2" | "NE")
}

fn is_aromatic_carbon(res: &str, name: &str) -> bool {
    match res {
        "PHE" => matches!(name, "CG" | "CD1" | "CD2" | "CE1" | "CE2" | "CZ"),
        "TYR" => matches!(name, "CG" | "CD1" | "CD2" | "CE1" | "CE2" | "CZ"),
        "TRP" => matches!(
            name,
            "CG" | "CD1" | "CD2" | "CE1" | "CE2" | "CE3" | "CZ2" | "CZ3" | "CH2"
        ),
        "HIS" => matches!(name, "CG" | "CD2" | "CE1"),
        _ => false,
    }
}

fn is_hydroxyl_oxygen(res: &str, name: &str) -> bool {
    matches!(
        (res, name),
        ("THR", "OG1") | ("SER", "OG") | ("TYR", "OH")
    )
}

fn is_amide_nitrogen(res: &str, name: &str) -> bool {
    matches!(
        (res, name),
        ("ASN", "ND2") | ("GLN", "NE2") | ("TRP", "NE1")
    )
}

fn is_histidine_nitrogen(res: &str, name: &str) -> bool {
    res == "HIS" && matches!(name, "NE2" | "ND1")
}

fn is_central_carbon(res: &str, name: &str) -> bool {
    matches!(
        (res, name),
        ("ARG", "CZ") | ("GLN", "CD") | ("GLU", "CD") | ("ASP", "CG") | ("ASN", "CG")
    )
}

fn is_carbonyl_oxygen(res: &str, name: &str) -> bool {
    matches!((res, name), ("ASN", "OD1") | ("GLN", "OE1"))
}

fn is_carboxylate_oxygen(res: &str, name: &str) -> bool {
    matches!(
        (res, name),
        ("GLU", "OE1") | ("GLU", "OE2") | ("ASP", "OD1") | ("ASP", "OD2")
    )
}

fn is_lysine_nitrogen(res: &str, name: &str) -> bool {
    res == "LYS" && name == "NZ"
}

/// Classifies an atom by its chemical role.
///
/// Rules are not mutually exclusive; the first matching rule in a fixed priority
/// order wins. Inside a standard residue the order is: hydrogen, main-chain
/// table, Arg guanidinium N, aromatic C, hydroxyl O, amide N, His imidazole N,
/// central C, carbonyl O, carboxylate O, Lys amino N, then the residue fallback.
/// Outside a residue: metal, halogen, water oxygen, element-symbol backup
/// conversion, then the generic hetero fallback.
pub fn classify(res_name: &str, atom_name: &str, element: &str) -> AtomClass {
    if STANDARD_RESIDUES.contains(&res_name) {
        if element == "H" {
            return AtomClass::Hydrogen;
        }
        if let Some(class) = main_chain_class(atom_name) {
            return class;
        }
        if is_arginine_nitrogen(res_name, atom_name) {
            return AtomClass::BasicNitrogen;
        }
        if is_aromatic_carbon(res_name, atom_name) {
            return AtomClass::AromaticCarbon;
        }
        if is_hydroxyl_oxygen(res_name, atom_name) {
            return AtomClass::Hydroxyl;
        }
        if is_amide_nitrogen(res_name, atom_name) {
            return AtomClass::Amide;
        }
        if is_histidine_nitrogen(res_name, atom_name) {
            return AtomClass::BasicNitrogen;
        }
        if is_central_carbon(res_name, atom_name) {
            return AtomClass::AromaticCarbon;
        }
        if is_carbonyl_oxygen(res_name, atom_name) {
            return AtomClass::Carbonyl;
        }
        if is_carboxylate_oxygen(res_name, atom_name) {
            return AtomClass::Carboxylate;
        }
        if is_lysine_nitrogen(res_name, atom_name) {
            return AtomClass::BasicNitrogen;
        }
        return AtomClass::OtherResidue;
    }

    if elements::is_metal(element) {
        return AtomClass::Metal;
    }
    if elements::is_halogen(element) {
        return AtomClass::Halogen;
    }
    if res_name == "HOH" && atom_name == "O" {
        return AtomClass::WaterOxygen;
    }
    if let Some(class) = main_chain_class(element) {
        return class;
    }
    AtomClass::Hetero
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_chain_atoms_use_the_conversion_table() {
        assert_eq!(classify("ALA", "O", "O"), AtomClass::Carbonyl);
        assert_eq!(classify("ALA", "N", "N"), AtomClass::Amide);
        assert_eq!(classify("ALA", "CA", "C"), AtomClass::OtherResidue);
        assert_eq!(classify("GLY", "OXT", "O"), AtomClass::OtherResidue);
    }

    #[test]
    fn hydrogen_wins_over_every_other_rule() {
        // Name collides with the main-chain table, but the element is H.
        assert_eq!(classify("ARG", "H", "H"), AtomClass::Hydrogen);
        assert_eq!(classify("LYS", "HZ1", "H"), AtomClass::Hydrogen);
    }

    #[test]
    fn side_chain_functional_atoms_are_classified() {
        assert_eq!(classify("ARG", "NH1", "N"), AtomClass::BasicNitrogen);
        assert_eq!(classify("HIS", "ND1", "N"), AtomClass::BasicNitrogen);
        assert_eq!(classify("LYS", "NZ", "N"), AtomClass::BasicNitrogen);
        assert_eq!(classify("PHE", "CZ", "C"), AtomClass::AromaticCarbon);
        assert_eq!(classify("ARG", "CZ", "C"), AtomClass::AromaticCarbon);
        assert_eq!(classify("SER", "OG", "O"), AtomClass::Hydroxyl);
        assert_eq!(classify("ASN", "ND2", "N"), AtomClass::Amide);
        assert_eq!(classify("ASN", "OD1", "O"), AtomClass::Carbonyl);
        assert_eq!(classify("GLU", "OE2", "O"), AtomClass::Carboxylate);
    }

    #[test]
    fn priority_order_resolves_overlapping_rules() {
        // ASP CG is both "central carbon" and a plausible side-chain carbon;
        // the central-carbon rule fires first.
        assert_eq!(classify("ASP", "CG", "C"), AtomClass::AromaticCarbon);
        // GLU OE1 is carboxylate, not carbonyl, because GLU is not in the
        // carbonyl table.
        assert_eq!(classify("GLU", "OE1", "O"), AtomClass::Carboxylate);
    }

    #[test]
    fn unknown_residue_atoms_fall_back_by_element() {
        assert_eq!(classify("HOH", "O", "O"), AtomClass::WaterOxygen);
        assert_eq!(classify("HEM", "FE", "FE"), AtomClass::Metal);
        assert_eq!(classify("LIG", "CL1", "CL"), AtomClass::Halogen);
        assert_eq!(classify("LIG", "C1", "C"), AtomClass::OtherResidue);
        assert_eq!(classify("LIG", "SE1", "SE"), AtomClass::Hetero);
    }

    #[test]
    fn in_residue_unknown_atom_is_other_residue() {
        assert_eq!(classify("VAL", "CG1", "C"), AtomClass::OtherResidue);
    }

    #[test]
    fn labels_match_score_table_keys() {
        assert_eq!(AtomClass::BasicNitrogen.as_str(), "NBAS");
        assert_eq!(AtomClass::WaterOxygen.as_str(), "OOW");
        assert_eq!(AtomClass::Hetero.as_str(), "HETATM");
    }
}
