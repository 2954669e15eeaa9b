use super::atom::Atom;
use super::ids::{AtomId, ResidueId};
use super::residue::Residue;
use super::topology::{Angle, Bond, Torsion};
use itertools::Itertools;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::{HashMap, HashSet, VecDeque};

/// Represents a complete protein structure with atoms, residues, and bonds.
///
/// Atoms are stored in an arena keyed by [`AtomId`]; residues keep the ordered
/// list of their atom IDs. Cloning a `Protein` produces an independent copy, which
/// is what the minimizer relies on for trial moves.
#[derive(Debug, Clone, Default)]
pub struct Protein {
    /// Name of the structure (usually the source file stem).
    pub name: String,
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Residues in file order.
    residue_order: Vec<ResidueId>,
    /// List of all bonds in the structure.
    bonds: Vec<Bond>,
    /// Lookup map from atom serial index to its ID.
    index_map: HashMap<usize, AtomId>,
    /// Cached adjacency list for bond connectivity, indexed by atom ID.
    bond_adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
}

impl Protein {
    /// Creates a new, empty protein with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Retrieves an immutable reference to an atom by its ID.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Retrieves a mutable reference to an atom by its ID.
    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    /// Finds an atom ID by the serial index read from the structure file.
    pub fn find_atom_by_index(&self, index: usize) -> Option<AtomId> {
        self.index_map.get(&index).copied()
    }

    /// Returns the IDs of all atoms, residue by residue in file order.
    pub fn atom_ids(&self) -> Vec<AtomId> {
        self.residue_order
            .iter()
            .flat_map(|&res_id| self.residues[res_id].atoms().iter().copied())
            .collect()
    }

    /// Returns an iterator over all atoms, residue by residue in file order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.residue_order.iter().flat_map(move |&res_id| {
            self.residues[res_id]
                .atoms()
                .iter()
                .map(move |&atom_id| (atom_id, &self.atoms[atom_id]))
        })
    }

    /// Returns a mutable iterator over all atoms in arena order.
    pub fn atoms_iter_mut(&mut self) -> impl Iterator<Item = (AtomId, &mut Atom)> {
        self.atoms.iter_mut()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Retrieves an immutable reference to a residue by its ID.
    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Returns an iterator over all residues in file order.
    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residue_order
            .iter()
            .map(move |&res_id| (res_id, &self.residues[res_id]))
    }

    pub fn residue_count(&self) -> usize {
        self.residue_order.len()
    }

    /// Returns the residue that follows `id` in file order, if it is on the same chain.
    pub fn next_residue_in_chain(&self, id: ResidueId) -> Option<ResidueId> {
        let pos = self.residue_order.iter().position(|&r| r == id)?;
        let next = *self.residue_order.get(pos + 1)?;
        (self.residues[next].chain_id == self.residues[id].chain_id).then_some(next)
    }

    /// Returns the residue that precedes `id` in file order, if it is on the same chain.
    pub fn previous_residue_in_chain(&self, id: ResidueId) -> Option<ResidueId> {
        let pos = self.residue_order.iter().position(|&r| r == id)?;
        let prev = *self.residue_order.get(pos.checked_sub(1)?)?;
        (self.residues[prev].chain_id == self.residues[id].chain_id).then_some(prev)
    }

    /// Appends a new residue at the end of the structure.
    ///
    /// # Arguments
    ///
    /// * `residue_number` - The sequence number of the residue.
    /// * `name` - The name of the residue.
    /// * `chain_id` - The chain the residue belongs to.
    pub fn add_residue(&mut self, residue_number: isize, name: &str, chain_id: char) -> ResidueId {
        let residue_id = self
            .residues
            .insert(Residue::new(residue_number, name, chain_id));
        self.residue_order.push(residue_id);
        residue_id
    }

    /// Adds an atom to a specific residue.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if successful, otherwise `None` (e.g., if the residue doesn't exist).
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, mut atom: Atom) -> Option<AtomId> {
        let residue = self.residues.get_mut(residue_id)?;
        atom.residue_id = residue_id;
        let name = atom.name.clone();
        let index = atom.index;

        let atom_id = self.atoms.insert(atom);
        residue.add_atom(&name, atom_id);
        self.index_map.insert(index, atom_id);
        self.bond_adjacency.insert(atom_id, Vec::new());

        Some(atom_id)
    }

    /// Adds a bond between two atoms.
    ///
    /// Adding an existing bond succeeds without creating a duplicate.
    ///
    /// # Return
    ///
    /// Returns `Some(())` if successful, otherwise `None` (e.g., if atoms don't exist
    /// or both IDs name the same atom).
    pub fn add_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId) -> Option<()> {
        if atom1_id == atom2_id
            || !self.atoms.contains_key(atom1_id)
            || !self.atoms.contains_key(atom2_id)
        {
            return None;
        }

        if self.bond_adjacency[atom1_id].contains(&atom2_id) {
            return Some(());
        }

        self.bonds.push(Bond::new(atom1_id, atom2_id));
        self.bond_adjacency[atom1_id].push(atom2_id);
        self.bond_adjacency[atom2_id].push(atom1_id);
        Some(())
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn get_bonded_neighbors(&self, atom_id: AtomId) -> Option<&[AtomId]> {
        self.bond_adjacency.get(atom_id).map(|v| v.as_slice())
    }

    /// Enumerates every `i-j-k` angle implied by the bond graph.
    ///
    /// Each angle is reported once, with the vertex in the middle.
    pub fn angles(&self) -> Vec<Angle> {
        self.atom_ids()
            .into_iter()
            .flat_map(|center| {
                self.bond_adjacency[center]
                    .iter()
                    .copied()
                    .tuple_combinations()
                    .map(move |(a, c)| Angle {
                        atom1_id: a,
                        atom2_id: center,
                        atom3_id: c,
                    })
            })
            .collect()
    }

    /// Enumerates every proper `i-j-k-l` torsion implied by the bond graph.
    ///
    /// Each torsion is reported once per central bond direction in `bonds()` order.
    pub fn torsions(&self) -> Vec<Torsion> {
        let mut torsions = Vec::new();
        for bond in &self.bonds {
            let (j, k) = (bond.atom1_id, bond.atom2_id);
            for &i in self.bond_adjacency[j].iter().filter(|&&i| i != k) {
                for &l in self.bond_adjacency[k].iter().filter(|&&l| l != j && l != i) {
                    torsions.push(Torsion {
                        atom1_id: i,
                        atom2_id: j,
                        atom3_id: k,
                        atom4_id: l,
                    });
                }
            }
        }
        torsions
    }

    /// Collects every atom reachable from `atom_id` through at most `max_bonds` bonds.
    ///
    /// The starting atom itself is not included.
    pub fn atoms_within_bonds(&self, atom_id: AtomId, max_bonds: usize) -> HashSet<AtomId> {
        let mut visited = HashSet::from([atom_id]);
        let mut queue = VecDeque::from([(atom_id, 0usize)]);

        while let Some((current, depth)) = queue.pop_front() {
            if depth == max_bonds {
                continue;
            }
            if let Some(neighbors) = self.get_bonded_neighbors(current) {
                for &next in neighbors {
                    if visited.insert(next) {
                        queue.push_back((next, depth + 1));
                    }
                }
            }
        }

        visited.remove(&atom_id);
        visited
    }
}
