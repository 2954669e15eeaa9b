use super::energy::format_energy_table;
use crate::cli::MinimizeArgs;
use crate::config::PartialRunConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use molmin::core::io::{pdb::PdbFile, traits::MolecularFile};
use molmin::engine::progress::ProgressReporter;
use molmin::workflows;
use tracing::{info, warn};

pub fn run(args: MinimizeArgs, progress_handler: CliProgressHandler) -> Result<()> {
    let partial_config = PartialRunConfig::load(&args.input)?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args.input, args.minimization)?;

    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting steepest-descent minimization...");
    let result = workflows::minimize::run(&config, &reporter)?;
    let report = result.report;

    if report.accepted_steps == 0 {
        warn!("No step lowered the energy; the output matches the input coordinates.");
    }

    info!("Writing minimized structure to {:?}", &args.output);
    PdbFile::write_protein_to_path(&result.protein, &args.output).map_err(|e| {
        CliError::FileParsing {
            path: args.output.clone(),
            source: e.into(),
        }
    })?;

    println!("\nInitial energy:");
    print!("{}", format_energy_table(&result.initial_energy));
    println!("\nFinal energy:");
    print!("{}", format_energy_table(&result.final_energy));
    println!(
        "\n{} iterations ({} accepted, {} rejected), final step size {:.3e}",
        report.iterations, report.accepted_steps, report.rejected_steps, report.final_step_size
    );
    println!(
        "✓ Minimized structure (ΔE = {:.4} kcal/mol) written to: {}",
        report.energy_change(),
        args.output.display()
    );
    Ok(())
}
