use super::setup::prepare;
use crate::core::forcefield::parameterization::ParameterizationSummary;
use crate::core::forcefield::term::EnergyTerm;
use crate::core::models::protein::Protein;
use crate::engine::config::WorkflowConfig;
use crate::engine::error::EngineError;
use crate::engine::evaluator::Evaluator;
use crate::engine::minimizer::{MinimizationReport, SteepestDescent};
use crate::engine::progress::ProgressReporter;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct MinimizationResult {
    /// The relaxed structure; each atom carries its final net force.
    pub protein: Protein,
    pub report: MinimizationReport,
    pub initial_energy: EnergyTerm,
    pub final_energy: EnergyTerm,
    pub summary: ParameterizationSummary,
}

#[instrument(skip_all, name = "minimization_workflow")]
pub fn run(
    config: &WorkflowConfig,
    reporter: &ProgressReporter,
) -> Result<MinimizationResult, EngineError> {
    let prepared = prepare(config, reporter)?;
    let mut protein = prepared.protein;
    let evaluator = Evaluator::new(&prepared.forcefield, &config.nonbonded);

    let initial_energy = evaluator.evaluate(&protein).energy;
    let report = SteepestDescent::new(&evaluator, config.minimization).minimize(&mut protein, reporter)?;
    let final_energy = evaluator.evaluate(&protein).energy;

    info!(
        "Minimized '{}' in {} iterations: {:.6} -> {:.6} kcal/mol",
        protein.name,
        report.iterations,
        report.initial_energy,
        report.final_energy
    );

    Ok(MinimizationResult {
        protein,
        report,
        initial_energy,
        final_energy,
        summary: prepared.summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::WorkflowConfigBuilder;
    use crate::engine::progress::Progress;
    use crate::workflows::setup::fixtures::write_inputs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[test]
    fn minimization_never_raises_the_energy() {
        let dir = tempdir().unwrap();
        let files = write_inputs(dir.path());
        let config = WorkflowConfigBuilder::new()
            .structure_path(files.structure)
            .charge_table_path(Some(files.charges))
            .bond_table_path(Some(files.bonds))
            .angle_table_path(Some(files.angles))
            .dihedral_table_path(Some(files.dihedrals))
            .nonbonded_table_path(Some(files.nonbonded))
            .max_iterations(20)
            .build()
            .unwrap();

        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|e| events.lock().unwrap().push(e)));
        let result = run(&config, &reporter).unwrap();
        drop(reporter);

        assert_eq!(result.report.iterations, 20);
        assert!(result.report.final_energy <= result.report.initial_energy);
        assert!((result.initial_energy.total() - result.report.initial_energy).abs() < 1e-9);
        assert!((result.final_energy.total() - result.report.final_energy).abs() < 1e-9);
        assert_eq!(result.protein.atom_count(), 8);

        let iterations = events
            .into_inner()
            .unwrap()
            .into_iter()
            .filter(|e| matches!(e, Progress::Iteration { .. }))
            .count();
        assert_eq!(iterations, 20);
    }

    #[test]
    fn zero_iterations_leave_the_structure_unchanged() {
        let dir = tempdir().unwrap();
        let files = write_inputs(dir.path());
        let config = WorkflowConfigBuilder::new()
            .structure_path(files.structure)
            .bond_table_path(Some(files.bonds))
            .max_iterations(0)
            .build()
            .unwrap();

        let result = run(&config, &ProgressReporter::new()).unwrap();
        assert_eq!(result.report.accepted_steps + result.report.rejected_steps, 0);
        assert_eq!(result.initial_energy, result.final_energy);
        let first = result.protein.atoms_iter().next().map(|(_, a)| a.position).unwrap();
        assert_eq!(first, nalgebra::Point3::origin());
    }
}
