//! # Engine Module
//!
//! Evaluates a parameterized protein and drives the steepest-descent minimizer.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Non-bonded and minimization settings with validation
//! - **Evaluation** ([`evaluator`]) - Total energy breakdown and per-atom net force from the
//!   bonded and non-bonded terms
//! - **Minimization** ([`minimizer`]) - Adaptive-step steepest descent over the evaluator
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-level error type wrapping the input errors

pub mod config;
pub mod error;
pub mod evaluator;
pub mod minimizer;
pub mod progress;
