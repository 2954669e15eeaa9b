use crate::cli::{InputArgs, MinimizationOverrides};
use crate::error::{CliError, Result};
use molmin::core::forcefield::verlet::ExclusionPolicy;
use molmin::engine::config::{WorkflowConfig, WorkflowConfigBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialForcefieldConfig {
    charges: Option<PathBuf>,
    bonds: Option<PathBuf>,
    angles: Option<PathBuf>,
    dihedrals: Option<PathBuf>,
    nonbonded: Option<PathBuf>,
}

impl PartialForcefieldConfig {
    /// Resolves relative table paths against the directory of the config file.
    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [
            &mut self.charges,
            &mut self.bonds,
            &mut self.angles,
            &mut self.dihedrals,
            &mut self.nonbonded,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialNonBondedConfig {
    cutoff: Option<f64>,
    buffer: Option<f64>,
    permittivity: Option<f64>,
    exclusion: Option<ExclusionPolicy>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialMinimizationConfig {
    max_iterations: Option<usize>,
    initial_step: Option<f64>,
    step_growth: Option<f64>,
    step_shrink: Option<f64>,
}

/// Settings read from a TOML file. Every field is optional; whatever is missing
/// falls back to CLI arguments and then to the engine defaults.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    forcefield: Option<PartialForcefieldConfig>,
    nonbonded: Option<PartialNonBondedConfig>,
    minimization: Option<PartialMinimizationConfig>,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        if let (Some(ff), Some(base)) = (config.forcefield.as_mut(), path.parent()) {
            ff.resolve_relative_to(base);
        }
        Ok(config)
    }

    /// Loads the file named by `--config`, or starts empty when none is given.
    pub fn load(args: &InputArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// CLI arguments win over `--set` values, which win over the file.
    pub fn merge_with_cli(
        mut self,
        args: &InputArgs,
        overrides: MinimizationOverrides,
    ) -> Result<WorkflowConfig> {
        self.apply_set_values(&args.set_values)?;

        let ff = self.forcefield.take().unwrap_or_default();
        let nb = self.nonbonded.take().unwrap_or_default();
        let min = self.minimization.take().unwrap_or_default();

        let mut builder = WorkflowConfigBuilder::new()
            .structure_path(args.input.clone())
            .charge_table_path(args.charges.clone().or(ff.charges))
            .bond_table_path(args.bonds.clone().or(ff.bonds))
            .angle_table_path(args.angles.clone().or(ff.angles))
            .dihedral_table_path(args.dihedrals.clone().or(ff.dihedrals))
            .nonbonded_table_path(args.nonbonded.clone().or(ff.nonbonded));

        if let Some(cutoff) = args.cutoff.or(nb.cutoff) {
            builder = builder.cutoff(cutoff);
        }
        if let Some(buffer) = args.buffer.or(nb.buffer) {
            builder = builder.buffer(buffer);
        }
        if let Some(permittivity) = args.permittivity.or(nb.permittivity) {
            builder = builder.permittivity(permittivity);
        }
        if let Some(exclusion) = args.exclusion.map(ExclusionPolicy::from).or(nb.exclusion) {
            builder = builder.exclusion(exclusion);
        }

        if let Some(iterations) = overrides.max_iterations.or(min.max_iterations) {
            builder = builder.max_iterations(iterations);
        }
        if let Some(step) = overrides.initial_step.or(min.initial_step) {
            builder = builder.initial_step(step);
        }
        if let Some(factor) = overrides.step_growth.or(min.step_growth) {
            builder = builder.step_growth(factor);
        }
        if let Some(factor) = overrides.step_shrink.or(min.step_shrink) {
            builder = builder.step_shrink(factor);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            let float = || {
                value_str.parse::<f64>().map_err(|_| {
                    CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                })
            };

            match key {
                "nonbonded.cutoff" => {
                    self.nonbonded.get_or_insert_with(Default::default).cutoff = Some(float()?);
                }
                "nonbonded.buffer" => {
                    self.nonbonded.get_or_insert_with(Default::default).buffer = Some(float()?);
                }
                "nonbonded.permittivity" => {
                    self.nonbonded
                        .get_or_insert_with(Default::default)
                        .permittivity = Some(float()?);
                }
                "nonbonded.exclusion" => {
                    let policy = match value_str {
                        "sequential-index" => ExclusionPolicy::SequentialIndex,
                        "bond-graph" => ExclusionPolicy::BondGraph,
                        _ => {
                            return Err(CliError::Config(format!(
                                "Invalid exclusion policy: '{}'. Expected 'sequential-index' or 'bond-graph'.",
                                value_str
                            )));
                        }
                    };
                    self.nonbonded.get_or_insert_with(Default::default).exclusion = Some(policy);
                }
                "minimization.max-iterations" => {
                    self.minimization
                        .get_or_insert_with(Default::default)
                        .max_iterations = Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!(
                            "Invalid integer value for {}: {}",
                            key, value_str
                        ))
                    })?);
                }
                "minimization.initial-step" => {
                    self.minimization
                        .get_or_insert_with(Default::default)
                        .initial_step = Some(float()?);
                }
                "minimization.step-growth" => {
                    self.minimization
                        .get_or_insert_with(Default::default)
                        .step_growth = Some(float()?);
                }
                "minimization.step-shrink" => {
                    self.minimization
                        .get_or_insert_with(Default::default)
                        .step_shrink = Some(float()?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
