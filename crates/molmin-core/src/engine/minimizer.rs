use super::config::MinimizationConfig;
use super::error::EngineError;
use super::evaluator::{Evaluation, Evaluator, apply_forces};
use super::progress::{Progress, ProgressReporter};
use crate::core::models::protein::Protein;
use crate::core::utils::vector::unit;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizationReport {
    pub initial_energy: f64,
    pub final_energy: f64,
    pub iterations: usize,
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub final_step_size: f64,
}

impl MinimizationReport {
    pub fn energy_change(&self) -> f64 {
        self.final_energy - self.initial_energy
    }
}

/// Steepest descent with an adaptive step size.
///
/// Each iteration moves every atom by `h` along the unit vector of its net force and
/// keeps the move only if the total energy drops. Atoms with zero net force stay put.
pub struct SteepestDescent<'a> {
    evaluator: &'a Evaluator<'a>,
    config: MinimizationConfig,
}

fn checked_energy(evaluation: &Evaluation, iteration: usize, stage: &'static str) -> Result<f64, EngineError> {
    let energy = evaluation.energy.total();
    if energy.is_finite() {
        Ok(energy)
    } else {
        Err(EngineError::NonFiniteEnergy {
            iteration,
            stage,
            energy,
        })
    }
}

/// Copy of `protein` with every atom displaced by `step·unit(force)`.
fn trial_structure(protein: &Protein, evaluation: &Evaluation, step: f64) -> Protein {
    let mut trial = protein.clone();
    for (atom_id, atom) in trial.atoms_iter_mut() {
        atom.position += step * unit(&evaluation.force(atom_id));
    }
    trial
}

impl<'a> SteepestDescent<'a> {
    pub fn new(evaluator: &'a Evaluator<'a>, config: MinimizationConfig) -> Self {
        Self { evaluator, config }
    }

    /// Relaxes `protein` in place and leaves the net force of the final structure
    /// on each atom.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NonFiniteEnergy`] if the current or a trial structure
    /// evaluates to a NaN or infinite energy.
    #[instrument(skip_all, name = "steepest_descent")]
    pub fn minimize(
        &self,
        protein: &mut Protein,
        reporter: &ProgressReporter,
    ) -> Result<MinimizationReport, EngineError> {
        let max_iterations = self.config.max_iterations;
        reporter.report(Progress::PhaseStart {
            name: "Steepest Descent",
        });
        reporter.report(Progress::TaskStart {
            total_steps: max_iterations as u64,
        });

        let mut current = self.evaluator.evaluate(protein);
        let initial_energy = checked_energy(&current, 0, "initial")?;
        let mut energy = initial_energy;
        let mut step = self.config.initial_step;
        let mut accepted_steps = 0;
        let mut rejected_steps = 0;

        info!(
            "Starting minimization: {} atoms, E = {:.6}, h = {}",
            protein.atom_count(),
            initial_energy,
            step
        );

        for iteration in 1..=max_iterations {
            let trial = trial_structure(protein, &current, step);
            let trial_evaluation = self.evaluator.evaluate(&trial);
            let trial_energy = checked_energy(&trial_evaluation, iteration, "trial")?;

            let accepted = trial_energy < energy;
            if accepted {
                *protein = trial;
                current = trial_evaluation;
                energy = trial_energy;
                step *= self.config.step_growth;
                accepted_steps += 1;
            } else {
                step = self.config.step_shrink * step * step;
                rejected_steps += 1;
            }

            debug!(
                "Iteration {}: {} (E = {:.6}, trial E = {:.6}, next h = {:e})",
                iteration,
                if accepted { "accepted" } else { "rejected" },
                energy,
                trial_energy,
                step
            );
            reporter.report(Progress::Iteration {
                iteration,
                energy,
                step_size: step,
                accepted,
            });
            reporter.report(Progress::TaskIncrement);
        }

        apply_forces(protein, &current);
        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);

        let report = MinimizationReport {
            initial_energy,
            final_energy: energy,
            iterations: max_iterations,
            accepted_steps,
            rejected_steps,
            final_step_size: step,
        };
        info!(
            "Minimization finished: E {:.6} -> {:.6} ({} accepted, {} rejected)",
            report.initial_energy, report.final_energy, report.accepted_steps, report.rejected_steps
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::params::{Forcefield, ParameterDatabase, ParameterPair};
    use crate::core::models::atom::Atom;
    use crate::core::models::ids::AtomId;
    use crate::engine::config::NonBondedConfig;
    use nalgebra::Point3;
    use std::sync::Mutex;

    /// Two `CT` atoms on the x axis, far apart in sequence.
    fn atom_pair(serials: [usize; 2], separation: f64) -> (Protein, AtomId, AtomId) {
        let mut protein = Protein::new("pair");
        let res_id = protein.add_residue(1, "UNK", 'A');
        let mut ids = Vec::new();
        for (serial, x) in serials.into_iter().zip([0.0, separation]) {
            let mut atom = Atom::new(serial, "C", res_id, Point3::new(x, 0.0, 0.0));
            atom.force_field_type = "CT".into();
            ids.push(protein.add_atom_to_residue(res_id, atom).unwrap());
        }
        (protein, ids[0], ids[1])
    }

    /// Purely repulsive pair: c6 = 0, c12 = 1.
    fn repulsive_forcefield() -> Forcefield {
        Forcefield {
            nonbonded: ParameterDatabase::new(vec![ParameterPair::new(&["CT", "CT"], 1, &[0.0, 1.0])]),
            ..Forcefield::default()
        }
    }

    fn stretched_bond() -> (Protein, AtomId, AtomId) {
        let (mut protein, a, b) = atom_pair([1, 2], 1.5);
        protein.add_bond(a, b).unwrap();
        (protein, a, b)
    }

    fn bond_forcefield() -> Forcefield {
        Forcefield {
            bonds: ParameterDatabase::new(vec![ParameterPair::new(&["CT", "CT"], 1, &[1.0, 100.0])]),
            ..Forcefield::default()
        }
    }

    #[test]
    fn minimization_separates_a_repulsive_pair() {
        let ff = repulsive_forcefield();
        let evaluator = Evaluator::new(&ff, &NonBondedConfig::default());
        let (mut protein, a, b) = atom_pair([1, 10], 1.0);

        let report = SteepestDescent::new(&evaluator, MinimizationConfig::default())
            .minimize(&mut protein, &ProgressReporter::new())
            .unwrap();

        // 1/r^12 counted once from each side.
        assert!((report.initial_energy - 2.0).abs() < 1e-9);
        assert!(report.final_energy < report.initial_energy);
        assert!(report.energy_change() < 0.0);
        assert_eq!(report.iterations, 100);
        assert_eq!(report.accepted_steps + report.rejected_steps, 100);

        let r = (protein.atom(b).unwrap().position - protein.atom(a).unwrap().position).norm();
        assert!(r > 1.0);
        assert!((evaluator.total_energy(&protein) - report.final_energy).abs() < 1e-9);
        assert!(protein.atom(a).unwrap().force.x < 0.0);
    }

    #[test]
    fn accepted_step_moves_each_atom_by_h_and_grows_the_step() {
        let ff = repulsive_forcefield();
        let evaluator = Evaluator::new(&ff, &NonBondedConfig::default());
        let (mut protein, a, b) = atom_pair([1, 10], 1.0);
        let config = MinimizationConfig {
            max_iterations: 1,
            ..MinimizationConfig::default()
        };

        let report = SteepestDescent::new(&evaluator, config)
            .minimize(&mut protein, &ProgressReporter::new())
            .unwrap();

        assert_eq!(report.accepted_steps, 1);
        assert!((report.final_step_size - 0.012).abs() < 1e-12);
        assert!((protein.atom(a).unwrap().position.x + 0.01).abs() < 1e-12);
        assert!((protein.atom(b).unwrap().position.x - 1.01).abs() < 1e-12);
    }

    #[test]
    fn rejected_step_shrinks_quadratically_and_keeps_the_structure() {
        let ff = bond_forcefield();
        let evaluator = Evaluator::new(&ff, &NonBondedConfig::default());
        let (mut protein, a, b) = stretched_bond();
        // The bond force on a stretched bond points away from the partner, so the
        // trial move lengthens the bond and raises the energy.
        let config = MinimizationConfig {
            max_iterations: 1,
            ..MinimizationConfig::default()
        };

        let report = SteepestDescent::new(&evaluator, config)
            .minimize(&mut protein, &ProgressReporter::new())
            .unwrap();

        assert_eq!(report.rejected_steps, 1);
        assert_eq!(report.final_energy, report.initial_energy);
        assert!((report.final_step_size - 0.2 * 0.01 * 0.01).abs() < 1e-15);
        assert_eq!(protein.atom(a).unwrap().position, Point3::origin());
        assert_eq!(protein.atom(b).unwrap().position, Point3::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn accepted_energy_never_increases() {
        let ff = repulsive_forcefield();
        let evaluator = Evaluator::new(&ff, &NonBondedConfig::default());
        let (mut protein, _, _) = atom_pair([1, 10], 1.0);
        let energies = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Iteration { energy, .. } = event {
                energies.lock().unwrap().push(energy);
            }
        }));

        let config = MinimizationConfig {
            max_iterations: 30,
            initial_step: 0.3,
            ..MinimizationConfig::default()
        };
        SteepestDescent::new(&evaluator, config)
            .minimize(&mut protein, &reporter)
            .unwrap();
        drop(reporter);

        let energies = energies.into_inner().unwrap();
        assert_eq!(energies.len(), 30);
        assert!(energies.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn atoms_without_force_do_not_move() {
        let ff = repulsive_forcefield();
        let evaluator = Evaluator::new(&ff, &NonBondedConfig::default());
        let (mut protein, _, _) = atom_pair([1, 10], 1.0);
        let res_id = protein.residues_iter().next().map(|(id, _)| id).unwrap();
        let lone = protein
            .add_atom_to_residue(res_id, Atom::new(50, "O", res_id, Point3::new(0.0, 30.0, 0.0)))
            .unwrap();

        let report = SteepestDescent::new(&evaluator, MinimizationConfig::default())
            .minimize(&mut protein, &ProgressReporter::new())
            .unwrap();

        assert!(report.accepted_steps > 0);
        assert_eq!(protein.atom(lone).unwrap().position, Point3::new(0.0, 30.0, 0.0));
    }

    #[test]
    fn non_finite_energy_is_reported() {
        let ff = bond_forcefield();
        let evaluator = Evaluator::new(&ff, &NonBondedConfig::default());
        let (mut protein, a, _) = stretched_bond();
        protein.atom_mut(a).unwrap().position = Point3::new(f64::NAN, 0.0, 0.0);

        let result = SteepestDescent::new(&evaluator, MinimizationConfig::default())
            .minimize(&mut protein, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(EngineError::NonFiniteEnergy { iteration: 0, .. })
        ));
    }
}
