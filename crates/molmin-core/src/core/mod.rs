//! # Core Module
//!
//! Data structures, file formats and force field mathematics for molmin.
//!
//! ## Architecture
//!
//! - **Structure Representation** ([`models`]) - Atoms, residues, proteins and bonded topology
//! - **Energy and Forces** ([`forcefield`]) - Bonded and non-bonded terms, neighbor lists,
//!   parameter lookup and parameter assignment
//! - **File I/O** ([`io`]) - PDB structures, parameter tables and residue charge tables
//! - **Utilities** ([`utils`]) - Vector algebra on positions and displacements
//!
//! Nothing in this layer keeps state between calls; the optimization loop lives in
//! [`crate::engine`].

pub mod forcefield;
pub mod io;
pub mod models;
pub mod utils;
