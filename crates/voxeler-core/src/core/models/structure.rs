use super::atom::Atom;
use super::classify;
use crate::core::tables::elements;
use nalgebra::Point3;

/// A group of atom indices sharing one element, ordered by atomic number.
///
/// Rasterization and sphere stamping work element by element: every atom of a
/// group shares the same scaled radius and the same precomputed sphere offsets,
/// so per-atom work reduces to a translation of the cached offset set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementGroup {
    /// Element symbol shared by all members, uppercased.
    pub symbol: String,
    /// Grid cell code of the element (atomic number, or a reserved code).
    pub code: u8,
    /// Indices into the owning structure's atom list.
    pub indices: Vec<usize>,
}

/// Represents a complete parsed molecular structure.
///
/// Holds the atoms in file order together with the non-atom text surrounding
/// them, so a structure can be written back with its header and trailer intact.
/// Derived fields (extents, mass, element groups) are computed once at load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Structure {
    /// Name of the structure, usually the input file stem.
    pub name: String,
    /// Non-atom lines found before the first atom record, kept verbatim.
    pub leading_lines: Vec<String>,
    /// Non-atom lines found after the last atom record, kept verbatim.
    pub trailing_lines: Vec<String>,
    /// Atoms in file order.
    pub atoms: Vec<Atom>,
    /// Atom indices grouped by element, ascending atomic number.
    pub element_groups: Vec<ElementGroup>,
    /// Total mass of the structure in Daltons.
    pub mass: f64,
}

impl Structure {
    /// Builds a structure from parsed atoms, resolving derived properties.
    ///
    /// Masses are resolved from the element table with the atom name as a
    /// backup symbol, every atom receives its chemical-role class, and atoms
    /// are grouped per element in ascending atomic number order.
    pub fn new(name: impl Into<String>, mut atoms: Vec<Atom>) -> Self {
        for atom in &mut atoms {
            atom.mass = elements::mass_of(&atom.element)
                .or_else(|| elements::mass_of(&atom.name))
                .unwrap_or(0.0);
            atom.class = classify::classify(&atom.res_name, &atom.name, &atom.element);
        }
        let mass = atoms.iter().map(|a| a.mass).sum();
        let element_groups = Self::group_by_element(&atoms);

        Self {
            name: name.into(),
            leading_lines: Vec::new(),
            trailing_lines: Vec::new(),
            atoms,
            element_groups,
            mass,
        }
    }

    fn group_by_element(atoms: &[Atom]) -> Vec<ElementGroup> {
        // One slot per possible cell code, so groups come out ordered by
        // atomic number without an explicit sort.
        let mut slots: Vec<Option<ElementGroup>> = vec![None; elements::CODE_COUNT];
        for (index, atom) in atoms.iter().enumerate() {
            let code = elements::code_of(&atom.element)
                .or_else(|| elements::code_of(&atom.name))
                .unwrap_or(0);
            let slot = &mut slots[code as usize];
            match slot {
                Some(group) => group.indices.push(index),
                None => {
                    *slot = Some(ElementGroup {
                        symbol: atom.element.clone(),
                        code,
                        indices: vec![index],
                    });
                }
            }
        }
        slots.into_iter().flatten().collect()
    }

    /// Returns the number of atoms in the structure.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Computes the per-axis minimum and maximum coordinates over all atoms.
    ///
    /// Returns `None` for an empty structure; grid construction treats that as
    /// a fatal input error upstream.
    pub fn extents(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut iter = self.atoms.iter();
        let first = iter.next()?.position;
        let (mut min, mut max) = (first, first);
        for atom in iter {
            for axis in 0..3 {
                min[axis] = min[axis].min(atom.position[axis]);
                max[axis] = max[axis].max(atom.position[axis]);
            }
        }
        Some((min, max))
    }
}
