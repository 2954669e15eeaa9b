//! # molmin Core Library
//!
//! Evaluation and steepest-descent minimization of a classical molecular-mechanics
//! force field (bond stretch, angle bend, proper torsion, Lennard-Jones, Coulomb) over
//! protein structures.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three layers throughout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Protein`), the force field
//!   formulas (`potentials`, `bonded`, `nonbonded`), the Verlet neighbor list and the
//!   file readers and writers.
//!
//! - **[`engine`]: The Logic Core.** Wires the force field terms into a total-energy and
//!   net-force evaluator and runs the steepest-descent minimizer on top of it.
//!
//! - **[`workflows`]: The Public API.** Loads inputs, assigns parameters and runs a
//!   complete energy report or minimization from a single configuration.

pub mod core;
pub mod engine;
pub mod workflows;
