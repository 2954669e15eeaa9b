//! Provides input/output for structure files and force field tables.
//!
//! Structures are read and written through the [`traits::MolecularFile`] trait
//! ([`pdb::PdbFile`]). Force field data comes from GROMACS-style parameter tables
//! ([`itp`]) and residue charge tables ([`rtp`]).

pub mod itp;
pub mod pdb;
pub mod rtp;
pub mod traits;
