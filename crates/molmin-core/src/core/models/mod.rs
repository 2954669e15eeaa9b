//! # Core Models Module
//!
//! Data structures used to represent a protein structure in molmin.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom with position, velocity, force, mass, type label and charge
//! - [`residue`] - Residue container holding its atoms in file order
//! - [`protein`] - Complete structure: atom arena, ordered residues and bond graph
//! - [`topology`] - Bonds, angles and torsions
//! - [`ids`] - Arena keys for atoms and residues
//!
//! ## Usage
//!
//! ```ignore
//! use molmin::core::models::{protein::Protein, atom::Atom};
//!
//! let mut protein = Protein::new("1CLL");
//! let residue_id = protein.add_residue(1, "ALA", 'A');
//! let atom = Atom::new(1, "N", residue_id, Point3::new(0.0, 0.0, 0.0));
//! protein.add_atom_to_residue(residue_id, atom);
//! ```

pub mod atom;
pub mod ids;
pub mod protein;
pub mod residue;
pub mod topology;
