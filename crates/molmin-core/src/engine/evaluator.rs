use super::config::NonBondedConfig;
use crate::core::forcefield::bonded;
use crate::core::forcefield::nonbonded::{ForceMap, NonBondedCalculator};
use crate::core::forcefield::params::{Forcefield, TermKind};
use crate::core::forcefield::potentials;
use crate::core::forcefield::term::EnergyTerm;
use crate::core::models::ids::AtomId;
use crate::core::models::protein::Protein;
use crate::core::utils::vector::distance;
use nalgebra::Vector3;
use tracing::trace;

/// Energy breakdown and per-atom net force of one structure.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub energy: EnergyTerm,
    pub forces: ForceMap,
}

impl Evaluation {
    /// Net force on `atom_id`, zero if the atom was not evaluated.
    pub fn force(&self, atom_id: AtomId) -> Vector3<f64> {
        self.forces.get(atom_id).copied().unwrap_or_else(Vector3::zeros)
    }
}

/// Sums every bonded and non-bonded contribution of a structure.
///
/// Bonds come from the protein's bond list; angles and torsions are derived from
/// the same bond graph. Interactions without matching parameters are skipped.
pub struct Evaluator<'a> {
    forcefield: &'a Forcefield,
    nonbonded: NonBondedCalculator<'a>,
}

fn zero_forces(protein: &Protein) -> ForceMap {
    protein
        .atoms_iter()
        .map(|(id, _)| (id, Vector3::zeros()))
        .collect()
}

fn accumulate(forces: &mut ForceMap, atom_id: AtomId, force: Vector3<f64>) {
    if let Some(total) = forces.get_mut(atom_id) {
        *total += force;
    }
}

impl<'a> Evaluator<'a> {
    pub fn new(forcefield: &'a Forcefield, config: &NonBondedConfig) -> Self {
        Self {
            forcefield,
            nonbonded: NonBondedCalculator::new(
                forcefield,
                config.cutoff,
                config.buffer,
                config.permittivity,
            )
            .with_exclusion(config.exclusion),
        }
    }

    pub fn evaluate(&self, protein: &Protein) -> Evaluation {
        let (bonded_energy, mut forces) = self.bonded(protein);
        let (nonbonded_energy, nonbonded_forces) = self.nonbonded.energy_and_forces(protein);

        for (atom_id, force) in nonbonded_forces {
            accumulate(&mut forces, atom_id, force);
        }

        Evaluation {
            energy: bonded_energy + nonbonded_energy,
            forces,
        }
    }

    #[inline]
    pub fn total_energy(&self, protein: &Protein) -> f64 {
        self.evaluate(protein).energy.total()
    }

    /// Bond, angle and torsion energies with their forces.
    pub fn bonded(&self, protein: &Protein) -> (EnergyTerm, ForceMap) {
        let mut forces = zero_forces(protein);
        let (mut bond_energy, mut angle_energy, mut torsion_energy) = (0.0, 0.0, 0.0);

        for bond in protein.bonds() {
            let (Some(a1), Some(a2)) = (protein.atom(bond.atom1_id), protein.atom(bond.atom2_id)) else {
                continue;
            };
            let Some(&[b0, kb, ..]) = self
                .forcefield
                .lookup(TermKind::Bond, &[a1.type_label(), a2.type_label()])
            else {
                trace!("No bond parameters for {}-{}", a1.type_label(), a2.type_label());
                continue;
            };

            let r = distance(&a1.position, &a2.position);
            bond_energy += potentials::bond_stretch(kb, r, b0);
            let f1 = bonded::bond_force(kb, r, b0, &a1.position, &a2.position);
            accumulate(&mut forces, bond.atom1_id, f1);
            accumulate(&mut forces, bond.atom2_id, -f1);
        }

        for angle in protein.angles() {
            let (Some(a1), Some(a2), Some(a3)) = (
                protein.atom(angle.atom1_id),
                protein.atom(angle.atom2_id),
                protein.atom(angle.atom3_id),
            ) else {
                continue;
            };
            let types = [a1.type_label(), a2.type_label(), a3.type_label()];
            let Some(&[theta0_deg, k, ..]) = self.forcefield.lookup(TermKind::Angle, &types) else {
                trace!("No angle parameters for {}", types.join("-"));
                continue;
            };

            let theta0 = theta0_deg.to_radians();
            let theta = bonded::bend_angle(&a1.position, &a2.position, &a3.position);
            angle_energy += potentials::angle_bend(k, theta, theta0);
            let (fi, fj, fk) =
                bonded::angle_force(k, theta, theta0, &a1.position, &a2.position, &a3.position);
            accumulate(&mut forces, angle.atom1_id, fi);
            accumulate(&mut forces, angle.atom2_id, fj);
            accumulate(&mut forces, angle.atom3_id, fk);
        }

        for torsion in protein.torsions() {
            let ids = [
                torsion.atom1_id,
                torsion.atom2_id,
                torsion.atom3_id,
                torsion.atom4_id,
            ];
            let (Some(a1), Some(a2), Some(a3), Some(a4)) = (
                protein.atom(ids[0]),
                protein.atom(ids[1]),
                protein.atom(ids[2]),
                protein.atom(ids[3]),
            ) else {
                continue;
            };
            let types = [a1.type_label(), a2.type_label(), a3.type_label(), a4.type_label()];
            let Some(&[phase_deg, kd, pn, ..]) = self.forcefield.lookup(TermKind::ProperDihedral, &types)
            else {
                trace!("No dihedral parameters for {}", types.join("-"));
                continue;
            };

            let phase = phase_deg.to_radians();
            let phi = bonded::dihedral_angle(&a1.position, &a2.position, &a3.position, &a4.position)
                .to_radians();
            torsion_energy += potentials::proper_torsion(kd, phi, pn, phase);
            let torsion_forces = bonded::torsion_force(
                kd,
                phi,
                pn,
                phase,
                &a1.position,
                &a2.position,
                &a3.position,
                &a4.position,
            );
            for (id, force) in ids.into_iter().zip(torsion_forces) {
                accumulate(&mut forces, id, force);
            }
        }

        (EnergyTerm::bonded(bond_energy, angle_energy, torsion_energy), forces)
    }

    pub fn nonbonded(&self, protein: &Protein) -> (EnergyTerm, ForceMap) {
        self.nonbonded.energy_and_forces(protein)
    }
}

/// Stores each atom's net force from `evaluation` on the atom itself.
pub fn apply_forces(protein: &mut Protein, evaluation: &Evaluation) {
    for (atom_id, atom) in protein.atoms_iter_mut() {
        atom.force = evaluation.force(atom_id);
    }
}
