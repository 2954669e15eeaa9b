use crate::cli::{EnergyArgs, MinimizationOverrides};
use crate::config::PartialRunConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use molmin::core::forcefield::term::EnergyTerm;
use molmin::core::models::protein::Protein;
use molmin::engine::progress::ProgressReporter;
use molmin::workflows;
use std::fmt::Write;
use tracing::info;

pub fn run(args: EnergyArgs, progress_handler: CliProgressHandler) -> Result<()> {
    let partial_config = PartialRunConfig::load(&args.input)?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args.input, MinimizationOverrides::default())?;

    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let result = workflows::energy::run(&config, &reporter)?;

    print!("{}", format_energy_table(&result.energy));
    if args.forces {
        print!("{}", format_forces(&result.protein));
    }
    Ok(())
}

pub fn format_energy_table(energy: &EnergyTerm) -> String {
    let rows = [
        ("Bond", energy.bond),
        ("Angle", energy.angle),
        ("Torsion", energy.torsion),
        ("Lennard-Jones", energy.lj),
        ("Coulomb", energy.coulomb),
    ];
    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "{:<16}{:>16.6}", label, value);
    }
    let _ = writeln!(out, "{:-<32}", "");
    let _ = writeln!(out, "{:<16}{:>16.6}", "Total", energy.total());
    out
}

fn format_forces(protein: &Protein) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n{:>6} {:<4} {:>12} {:>12} {:>12}",
        "Serial", "Name", "Fx", "Fy", "Fz"
    );
    for (_, atom) in protein.atoms_iter() {
        let _ = writeln!(
            out,
            "{:>6} {:<4} {:>12.4} {:>12.4} {:>12.4}",
            atom.index, atom.name, atom.force.x, atom.force.y, atom.force.z
        );
    }
    out
}
