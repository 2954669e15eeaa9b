use super::ids::AtomId;
use std::collections::HashMap;

/// A residue of a [`Protein`](super::protein::Protein): its identity as read from
/// the structure file plus the IDs of its atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    /// Sequence number from the structure file; may be negative or repeat across chains.
    pub number: isize,
    pub name: String,
    pub chain_id: char,
    atoms: Vec<AtomId>,
    by_name: HashMap<String, AtomId>,
}

impl Residue {
    pub(crate) fn new(number: isize, name: &str, chain_id: char) -> Self {
        Self {
            number,
            name: name.to_string(),
            chain_id,
            atoms: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Appends an atom. A repeated name keeps both atoms in order but only the
    /// latest one is reachable by name.
    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.by_name.insert(atom_name.to_string(), atom_id);
    }

    /// Atom IDs in file order.
    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.by_name.get(name).copied()
    }
}
