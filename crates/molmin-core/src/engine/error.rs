use thiserror::Error;

use super::config::ConfigError;
use crate::core::forcefield::params::ParamLoadError;
use crate::core::io::pdb::PdbError;
use crate::core::io::rtp::ChargeTableError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Failed to read structure: {source}")]
    Structure {
        #[from]
        source: PdbError,
    },

    #[error("Failed to load force field parameters: {source}")]
    Parameters {
        #[from]
        source: ParamLoadError,
    },

    #[error("Failed to read charge table: {source}")]
    ChargeTable {
        #[from]
        source: ChargeTableError,
    },

    #[error("Energy became non-finite ({energy}) while evaluating the {stage} structure at iteration {iteration}")]
    NonFiniteEnergy {
        iteration: usize,
        stage: &'static str,
        energy: f64,
    },
}
