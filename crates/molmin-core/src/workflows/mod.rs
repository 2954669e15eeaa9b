//! # Workflows Module
//!
//! Top-level entry points that run a complete procedure from a [`WorkflowConfig`]:
//! read the structure, load the parameter and charge tables, assign parameters, then
//! evaluate or minimize.
//!
//! - **Energy Workflow** ([`energy`]) - Energy breakdown of the input structure
//! - **Minimization Workflow** ([`minimize`]) - Steepest-descent relaxation
//!
//! [`WorkflowConfig`]: crate::engine::config::WorkflowConfig

pub mod energy;
pub mod minimize;
mod setup;
