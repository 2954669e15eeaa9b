use crate::core::models::ids::AtomId;
use crate::core::models::protein::Protein;
use crate::core::utils::vector::distance;
use serde::Deserialize;
use slotmap::SecondaryMap;
use std::collections::HashSet;
use tracing::debug;

/// Atoms this close in sequence index or bond count never form a non-bonded pair.
pub const EXCLUSION_SEPARATION: usize = 3;

/// Which atom pairs are left out of the neighbor list as bonded neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionPolicy {
    /// Skip pairs whose serial indices differ by three or less.
    #[default]
    SequentialIndex,
    /// Skip pairs connected by three or fewer bonds. Without bonds nothing is skipped.
    BondGraph,
}

/// Per-atom neighbor lists within `cutoff + buffer`.
///
/// Both directions of a pair are stored, so every neighbor relation appears once
/// in each atom's list. The list is rebuilt from scratch on every [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct VerletList {
    pub cutoff: f64,
    pub buffer: f64,
    pub exclusion: ExclusionPolicy,
    neighbors: SecondaryMap<AtomId, Vec<AtomId>>,
}

impl VerletList {
    pub fn new(cutoff: f64, buffer: f64) -> Self {
        Self {
            cutoff,
            buffer,
            ..Self::default()
        }
    }

    pub fn with_exclusion(mut self, exclusion: ExclusionPolicy) -> Self {
        self.exclusion = exclusion;
        self
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.cutoff + self.buffer
    }

    /// Clears the list and records, for every atom, each other atom within
    /// `cutoff + buffer` that the exclusion policy does not remove.
    pub fn build(&mut self, protein: &Protein) {
        self.neighbors.clear();
        let radius = self.radius();
        let atom_ids = protein.atom_ids();

        let excluded: SecondaryMap<AtomId, HashSet<AtomId>> = match self.exclusion {
            ExclusionPolicy::BondGraph => atom_ids
                .iter()
                .map(|&id| (id, protein.atoms_within_bonds(id, EXCLUSION_SEPARATION)))
                .collect(),
            ExclusionPolicy::SequentialIndex => SecondaryMap::new(),
        };

        let mut pair_count = 0;
        for &id1 in &atom_ids {
            let Some(atom1) = protein.atom(id1) else {
                continue;
            };
            let mut list = Vec::new();
            for &id2 in &atom_ids {
                if id1 == id2 {
                    continue;
                }
                let Some(atom2) = protein.atom(id2) else {
                    continue;
                };
                let skip = match self.exclusion {
                    ExclusionPolicy::SequentialIndex => {
                        atom1.index.abs_diff(atom2.index) <= EXCLUSION_SEPARATION
                    }
                    ExclusionPolicy::BondGraph => excluded
                        .get(id1)
                        .is_some_and(|set| set.contains(&id2)),
                };
                if skip {
                    continue;
                }
                if distance(&atom1.position, &atom2.position) <= radius {
                    list.push(id2);
                }
            }
            pair_count += list.len();
            self.neighbors.insert(id1, list);
        }

        debug!(
            "Built Verlet list for {} atoms with {} directed pairs (radius {:.2})",
            atom_ids.len(),
            pair_count,
            radius
        );
    }

    /// Neighbors of `atom_id`, empty if the atom was not part of the last build.
    pub fn neighbors(&self, atom_id: AtomId) -> &[AtomId] {
        self.neighbors
            .get(atom_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of stored (directed) neighbor entries.
    pub fn pair_count(&self) -> usize {
        self.neighbors.values().map(Vec::len).sum()
    }
}
