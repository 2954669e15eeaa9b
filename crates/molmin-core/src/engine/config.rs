use crate::core::forcefield::params::ForcefieldPaths;
use crate::core::forcefield::verlet::ExclusionPolicy;
use std::f64::consts::PI;
use std::path::PathBuf;
use thiserror::Error;

/// Coulomb constant in kcal·Å/(mol·e²).
pub const COULOMB_CONSTANT: f64 = 332.0637;
/// Permittivity that makes `q1·q2 / (4π·ε·r)` come out in kcal/mol for charges in e
/// and distances in Å.
pub const DEFAULT_PERMITTIVITY: f64 = 1.0 / (4.0 * PI * COULOMB_CONSTANT);
pub const DEFAULT_CUTOFF: f64 = 10.0;
pub const DEFAULT_BUFFER: f64 = 2.0;

pub const DEFAULT_MAX_ITERATIONS: usize = 100;
pub const DEFAULT_INITIAL_STEP: f64 = 0.01;
pub const DEFAULT_STEP_GROWTH: f64 = 1.2;
pub const DEFAULT_STEP_SHRINK: f64 = 0.2;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value {value} for '{name}': {reason}")]
    InvalidValue {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonBondedConfig {
    pub cutoff: f64,
    pub buffer: f64,
    pub permittivity: f64,
    pub exclusion: ExclusionPolicy,
}

impl Default for NonBondedConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            buffer: DEFAULT_BUFFER,
            permittivity: DEFAULT_PERMITTIVITY,
            exclusion: ExclusionPolicy::default(),
        }
    }
}

impl NonBondedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("cutoff", self.cutoff)?;
        non_negative("buffer", self.buffer)?;
        positive("permittivity", self.permittivity)
    }
}

/// Steepest-descent settings.
///
/// An accepted step grows the step size to `step_growth·h`; a rejected step shrinks
/// it to `step_shrink·h²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizationConfig {
    pub max_iterations: usize,
    pub initial_step: f64,
    pub step_growth: f64,
    pub step_shrink: f64,
}

impl Default for MinimizationConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            initial_step: DEFAULT_INITIAL_STEP,
            step_growth: DEFAULT_STEP_GROWTH,
            step_shrink: DEFAULT_STEP_SHRINK,
        }
    }
}

impl MinimizationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("initial_step", self.initial_step)?;
        positive("step_growth", self.step_growth)?;
        positive("step_shrink", self.step_shrink)
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            name,
            value,
            reason: "must be a finite, non-negative number",
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            name,
            value,
            reason: "must be a finite, positive number",
        })
    }
}

/// Everything a workflow run needs: input files and engine settings.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowConfig {
    pub structure_path: PathBuf,
    pub charge_table_path: Option<PathBuf>,
    pub forcefield: ForcefieldPaths,
    pub nonbonded: NonBondedConfig,
    pub minimization: MinimizationConfig,
}

#[derive(Default)]
pub struct WorkflowConfigBuilder {
    structure_path: Option<PathBuf>,
    charge_table_path: Option<PathBuf>,
    forcefield: ForcefieldPaths,
    nonbonded: NonBondedConfig,
    minimization: MinimizationConfig,
}

impl WorkflowConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn structure_path(mut self, path: PathBuf) -> Self {
        self.structure_path = Some(path);
        self
    }
    pub fn charge_table_path(mut self, path: Option<PathBuf>) -> Self {
        self.charge_table_path = path;
        self
    }
    pub fn bond_table_path(mut self, path: Option<PathBuf>) -> Self {
        self.forcefield.bonds = path;
        self
    }
    pub fn angle_table_path(mut self, path: Option<PathBuf>) -> Self {
        self.forcefield.angles = path;
        self
    }
    pub fn dihedral_table_path(mut self, path: Option<PathBuf>) -> Self {
        self.forcefield.dihedrals = path;
        self
    }
    pub fn nonbonded_table_path(mut self, path: Option<PathBuf>) -> Self {
        self.forcefield.nonbonded = path;
        self
    }
    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.nonbonded.cutoff = cutoff;
        self
    }
    pub fn buffer(mut self, buffer: f64) -> Self {
        self.nonbonded.buffer = buffer;
        self
    }
    pub fn permittivity(mut self, permittivity: f64) -> Self {
        self.nonbonded.permittivity = permittivity;
        self
    }
    pub fn exclusion(mut self, exclusion: ExclusionPolicy) -> Self {
        self.nonbonded.exclusion = exclusion;
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.minimization.max_iterations = iterations;
        self
    }
    pub fn initial_step(mut self, step: f64) -> Self {
        self.minimization.initial_step = step;
        self
    }
    pub fn step_growth(mut self, factor: f64) -> Self {
        self.minimization.step_growth = factor;
        self
    }
    pub fn step_shrink(mut self, factor: f64) -> Self {
        self.minimization.step_shrink = factor;
        self
    }

    pub fn build(self) -> Result<WorkflowConfig, ConfigError> {
        self.nonbonded.validate()?;
        self.minimization.validate()?;
        Ok(WorkflowConfig {
            structure_path: self
                .structure_path
                .ok_or(ConfigError::MissingParameter("structure_path"))?,
            charge_table_path: self.charge_table_path,
            forcefield: self.forcefield,
            nonbonded: self.nonbonded,
            minimization: self.minimization,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let nb = NonBondedConfig::default();
        assert_eq!(nb.cutoff, 10.0);
        assert_eq!(nb.buffer, 2.0);
        assert_eq!(nb.exclusion, ExclusionPolicy::SequentialIndex);
        assert!((nb.permittivity - 2.3965e-4).abs() < 1e-7);

        let min = MinimizationConfig::default();
        assert_eq!(min.max_iterations, 100);
        assert_eq!(min.initial_step, 0.01);
        assert_eq!(min.step_growth, 1.2);
        assert_eq!(min.step_shrink, 0.2);
    }

    #[test]
    fn build_requires_structure_path() {
        let result = WorkflowConfigBuilder::new().build();
        assert_eq!(result, Err(ConfigError::MissingParameter("structure_path")));
    }

    #[test]
    fn build_applies_overrides() {
        let config = WorkflowConfigBuilder::new()
            .structure_path("in.pdb".into())
            .charge_table_path(Some("charges.rtp".into()))
            .bond_table_path(Some("bonds.itp".into()))
            .cutoff(8.0)
            .buffer(1.0)
            .exclusion(ExclusionPolicy::BondGraph)
            .max_iterations(5)
            .initial_step(0.1)
            .build()
            .unwrap();

        assert_eq!(config.structure_path, PathBuf::from("in.pdb"));
        assert_eq!(config.forcefield.bonds, Some(PathBuf::from("bonds.itp")));
        assert!(config.forcefield.angles.is_none());
        assert_eq!(config.nonbonded.cutoff, 8.0);
        assert_eq!(config.nonbonded.exclusion, ExclusionPolicy::BondGraph);
        assert_eq!(config.minimization.max_iterations, 5);
        assert_eq!(config.minimization.initial_step, 0.1);
        assert_eq!(config.minimization.step_growth, DEFAULT_STEP_GROWTH);
    }

    #[test]
    fn build_rejects_invalid_values() {
        let base = || WorkflowConfigBuilder::new().structure_path("in.pdb".into());

        assert!(matches!(
            base().cutoff(-1.0).build(),
            Err(ConfigError::InvalidValue { name: "cutoff", .. })
        ));
        assert!(matches!(
            base().permittivity(0.0).build(),
            Err(ConfigError::InvalidValue { name: "permittivity", .. })
        ));
        assert!(matches!(
            base().initial_step(f64::NAN).build(),
            Err(ConfigError::InvalidValue { name: "initial_step", .. })
        ));
        assert!(base().cutoff(0.0).buffer(0.0).build().is_ok());
    }
}
