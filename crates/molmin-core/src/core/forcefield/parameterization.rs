use crate::core::io::rtp::ChargeTable;
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::protein::Protein;
use phf::{Map, phf_map};
use tracing::{debug, warn};

/// Atomic masses in g/mol, keyed by element symbol.
pub static ELEMENT_MASSES: Map<&'static str, f64> = phf_map! {
    "H" => 1.0079,
    "C" => 12.0107,
    "N" => 14.0067,
    "O" => 15.9994,
    "S" => 32.065,
};

/// Mass of the element named by the first character of an atom label.
pub fn element_mass(atom_label: &str) -> Option<f64> {
    let first = atom_label.get(..1)?;
    ELEMENT_MASSES.get(first).copied()
}

/// Counts of what [`Parameterizer::parameterize_protein`] could not assign or added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParameterizationSummary {
    pub unmatched_charges: usize,
    pub unmatched_masses: usize,
    pub template_bonds: usize,
}

/// Assigns masses to every atom; unknown elements get a mass of zero.
///
/// Returns the number of atoms left without a mass.
pub fn assign_masses(protein: &mut Protein) -> usize {
    let mut unmatched = 0;
    for (_, atom) in protein.atoms_iter_mut() {
        match element_mass(&atom.name) {
            Some(mass) => atom.mass = mass,
            None => {
                warn!(
                    "Mass not found for atom '{}' (serial {}); using 0.0",
                    atom.name, atom.index
                );
                atom.mass = 0.0;
                unmatched += 1;
            }
        }
    }
    unmatched
}

pub struct Parameterizer<'a> {
    charge_table: &'a ChargeTable,
}

impl<'a> Parameterizer<'a> {
    pub fn new(charge_table: &'a ChargeTable) -> Self {
        Self { charge_table }
    }

    /// Assigns masses, charges and force field types, then adds the bonds the
    /// residue templates declare.
    pub fn parameterize_protein(&self, protein: &mut Protein) -> ParameterizationSummary {
        let unmatched_masses = assign_masses(protein);
        let unmatched_charges = self.assign_charges(protein);
        let template_bonds = self.apply_template_bonds(protein);

        ParameterizationSummary {
            unmatched_charges,
            unmatched_masses,
            template_bonds,
        }
    }

    /// Assigns charge and force field type by residue and atom name.
    ///
    /// Atoms without a table entry get a charge of zero and keep an empty force
    /// field type. Returns the number of such atoms.
    pub fn assign_charges(&self, protein: &mut Protein) -> usize {
        let residues: Vec<(String, Vec<AtomId>)> = protein
            .residues_iter()
            .map(|(_, r)| (r.name.clone(), r.atoms().to_vec()))
            .collect();

        let mut unmatched = 0;
        for (residue_name, atom_ids) in residues {
            for atom_id in atom_ids {
                let Some(atom) = protein.atom_mut(atom_id) else {
                    continue;
                };
                match self.charge_table.atom(&residue_name, &atom.name) {
                    Some(data) => {
                        atom.charge = data.charge;
                        atom.force_field_type = data.atom_type.clone();
                    }
                    None => {
                        warn!(
                            "No charge entry for atom '{}' in residue '{}'; using 0.0",
                            atom.name, residue_name
                        );
                        atom.charge = 0.0;
                        unmatched += 1;
                    }
                }
            }
        }
        unmatched
    }

    /// Adds the bonds listed in each residue's template.
    ///
    /// Names prefixed with `-`/`+` resolve in the previous/next residue of the same
    /// chain. Bonds whose atoms are absent (e.g. `-C` on an N-terminus) are skipped.
    /// Returns the number of template bonds that resolved.
    pub fn apply_template_bonds(&self, protein: &mut Protein) -> usize {
        let residue_ids: Vec<ResidueId> = protein.residues_iter().map(|(id, _)| id).collect();
        let mut pairs = Vec::new();

        for residue_id in residue_ids {
            let Some(residue) = protein.residue(residue_id) else {
                continue;
            };
            let Some(template) = self.charge_table.residue(&residue.name) else {
                continue;
            };
            for (name1, name2) in &template.bonds {
                match (
                    resolve_template_atom(protein, residue_id, name1),
                    resolve_template_atom(protein, residue_id, name2),
                ) {
                    (Some(a1), Some(a2)) => pairs.push((a1, a2)),
                    _ => debug!(
                        "Skipping template bond {}-{} in residue {} {}",
                        name1, name2, residue.name, residue.number
                    ),
                }
            }
        }

        pairs
            .into_iter()
            .filter(|&(a1, a2)| protein.add_bond(a1, a2).is_some())
            .count()
    }
}

fn resolve_template_atom(protein: &Protein, residue_id: ResidueId, name: &str) -> Option<AtomId> {
    let (target, atom_name) = if let Some(rest) = name.strip_prefix('-') {
        (protein.previous_residue_in_chain(residue_id)?, rest)
    } else if let Some(rest) = name.strip_prefix('+') {
        (protein.next_residue_in_chain(residue_id)?, rest)
    } else {
        (residue_id, name)
    };
    protein.residue(target)?.get_atom_id_by_name(atom_name)
}
