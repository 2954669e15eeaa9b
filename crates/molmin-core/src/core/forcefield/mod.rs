//! # Force Field Module
//!
//! Energy and force evaluation for a classical molecular-mechanics force field.
//!
//! ## Key Components
//!
//! - [`potentials`] - Scalar energy formulas (harmonic bond and angle, periodic torsion,
//!   12-6 Lennard-Jones, Coulomb)
//! - [`bonded`] - Bend/dihedral geometry and the analytic bonded forces
//! - [`verlet`] - Cutoff neighbor list with configurable bonded exclusions
//! - [`nonbonded`] - Lennard-Jones and Coulomb evaluation over neighbor-list pairs
//! - [`params`] - Parameter tables and type lookup with `X` wildcards
//! - [`parameterization`] - Charge, type, mass and template-bond assignment
//! - [`term`] - Energy breakdown by interaction kind
//!
//! ## Units
//!
//! Lengths follow the structure file (Å for PDB input). Bend angles are handled in
//! radians; dihedral angles are reported in degrees and converted to radians before
//! entering the torsion energy.

pub mod bonded;
pub mod nonbonded;
pub mod parameterization;
pub mod params;
pub mod potentials;
pub mod term;
pub mod verlet;
