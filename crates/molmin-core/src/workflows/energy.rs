use super::setup::prepare;
use crate::core::forcefield::parameterization::ParameterizationSummary;
use crate::core::forcefield::term::EnergyTerm;
use crate::core::models::protein::Protein;
use crate::engine::config::WorkflowConfig;
use crate::engine::error::EngineError;
use crate::engine::evaluator::{Evaluator, apply_forces};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

/// Energy breakdown of a structure, with the net force stored on each atom.
#[derive(Debug, Clone)]
pub struct EnergyResult {
    pub protein: Protein,
    pub energy: EnergyTerm,
    pub summary: ParameterizationSummary,
}

#[instrument(skip_all, name = "energy_workflow")]
pub fn run(config: &WorkflowConfig, reporter: &ProgressReporter) -> Result<EnergyResult, EngineError> {
    let prepared = prepare(config, reporter)?;
    let mut protein = prepared.protein;

    reporter.report(Progress::PhaseStart {
        name: "Energy Evaluation",
    });
    let evaluator = Evaluator::new(&prepared.forcefield, &config.nonbonded);
    let evaluation = evaluator.evaluate(&protein);
    apply_forces(&mut protein, &evaluation);
    reporter.report(Progress::PhaseFinish);

    let energy = evaluation.energy;
    if !energy.total().is_finite() {
        return Err(EngineError::NonFiniteEnergy {
            iteration: 0,
            stage: "input",
            energy: energy.total(),
        });
    }
    info!(
        "Total energy {:.6} (bonded {:.6}, non-bonded {:.6})",
        energy.total(),
        energy.bonded_total(),
        energy.nonbonded_total()
    );

    Ok(EnergyResult {
        protein,
        energy,
        summary: prepared.summary,
    })
}
