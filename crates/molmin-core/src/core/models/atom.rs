use super::ids::ResidueId;
use nalgebra::{Point3, Vector3};

/// Represents an atom in a molecular structure with its kinematic and force-field state.
///
/// The `index` is the serial number read from the structure file. Besides
/// identifying the atom it doubles as a topology proxy: atoms whose indices differ
/// by three or fewer are treated as bonded neighbors by the default non-bonded
/// exclusion rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial number from the source file.
    pub index: usize,
    /// The atom label as written in the structure file (e.g., "CA", "N", "HB1").
    pub name: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The force field atom type (e.g., "CT", "N3"), assigned from the charge table.
    pub force_field_type: String,
    /// The 3D coordinates of the atom.
    pub position: Point3<f64>,
    pub velocity: Vector3<f64>,
    /// Net force from the most recent evaluation.
    pub force: Vector3<f64>,
    pub acceleration: Vector3<f64>,
    /// Atomic mass in g/mol.
    pub mass: f64,
    /// The partial atomic charge in elementary charge units.
    pub charge: f64,
}

impl Atom {
    /// Creates a new `Atom` at rest, with zero mass and charge and no force field type.
    ///
    /// # Arguments
    ///
    /// * `index` - The serial number of the atom.
    /// * `name` - The atom label.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(index: usize, name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            index,
            name: name.to_string(),
            residue_id,
            force_field_type: String::new(),
            position,
            velocity: Vector3::zeros(),
            force: Vector3::zeros(),
            acceleration: Vector3::zeros(),
            mass: 0.0,
            charge: 0.0,
        }
    }

    /// The label used for parameter lookups.
    ///
    /// Falls back to the atom name when no force field type has been assigned.
    pub fn type_label(&self) -> &str {
        if self.force_field_type.is_empty() {
            &self.name
        } else {
            &self.force_field_type
        }
    }
}
