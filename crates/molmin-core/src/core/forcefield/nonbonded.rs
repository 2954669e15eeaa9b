use super::params::{Forcefield, TermKind};
use super::potentials;
use super::term::EnergyTerm;
use super::verlet::{ExclusionPolicy, VerletList};
use crate::core::models::ids::AtomId;
use crate::core::models::protein::Protein;
use crate::core::utils::vector::{displacement, distance, unit};
use nalgebra::Vector3;
use slotmap::SecondaryMap;
use tracing::trace;

/// Per-atom force accumulator.
pub type ForceMap = SecondaryMap<AtomId, Vector3<f64>>;

/// Lennard-Jones and Coulomb evaluation over Verlet-list pairs.
#[derive(Debug, Clone)]
pub struct NonBondedCalculator<'a> {
    forcefield: &'a Forcefield,
    cutoff: f64,
    buffer: f64,
    permittivity: f64,
    exclusion: ExclusionPolicy,
}

impl<'a> NonBondedCalculator<'a> {
    pub fn new(forcefield: &'a Forcefield, cutoff: f64, buffer: f64, permittivity: f64) -> Self {
        Self {
            forcefield,
            cutoff,
            buffer,
            permittivity,
            exclusion: ExclusionPolicy::default(),
        }
    }

    pub fn with_exclusion(mut self, exclusion: ExclusionPolicy) -> Self {
        self.exclusion = exclusion;
        self
    }

    /// Builds a fresh neighbor list for `protein` and evaluates every listed pair.
    ///
    /// Each directed pair contributes to the energy and to the force on its first
    /// atom, so a symmetric pair is counted once from each side. The returned map
    /// has an entry (possibly zero) for every atom.
    pub fn energy_and_forces(&self, protein: &Protein) -> (EnergyTerm, ForceMap) {
        let mut verlet = VerletList::new(self.cutoff, self.buffer).with_exclusion(self.exclusion);
        verlet.build(protein);
        self.evaluate(protein, &verlet)
    }

    /// Evaluates the pairs of an already built neighbor list.
    pub fn evaluate(&self, protein: &Protein, verlet: &VerletList) -> (EnergyTerm, ForceMap) {
        let mut forces = ForceMap::new();
        let mut lj_energy = 0.0;
        let mut coulomb_energy = 0.0;

        for (id1, atom1) in protein.atoms_iter() {
            let mut force = Vector3::zeros();

            for &id2 in verlet.neighbors(id1) {
                let Some(atom2) = protein.atom(id2) else {
                    continue;
                };
                let r = distance(&atom1.position, &atom2.position);
                let direction = unit(&displacement(&atom1.position, &atom2.position));

                match self
                    .forcefield
                    .lookup(TermKind::LennardJones, &[atom1.type_label(), atom2.type_label()])
                {
                    Some(&[c6, c12]) => {
                        lj_energy += potentials::lennard_jones_12_6(r, c12, c6);
                        force += potentials::lennard_jones_force_scale(r, c12, c6) * direction;
                    }
                    _ => trace!(
                        "No Lennard-Jones parameters for {}-{}",
                        atom1.type_label(),
                        atom2.type_label()
                    ),
                }

                if atom1.charge == 0.0 || atom2.charge == 0.0 {
                    continue;
                }
                coulomb_energy += potentials::coulomb(r, atom1.charge, atom2.charge, self.permittivity);
                force += potentials::coulomb_force_scale(r, atom1.charge, atom2.charge, self.permittivity)
                    * direction;
            }

            forces.insert(id1, force);
        }

        (EnergyTerm::nonbonded(lj_energy, coulomb_energy), forces)
    }
}
