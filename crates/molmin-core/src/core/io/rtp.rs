use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChargeTableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: ChargeTableParseErrorKind,
    },
}

#[derive(Debug, Error)]
pub enum ChargeTableParseErrorKind {
    #[error("Atom row appears before any residue header")]
    RowBeforeHeader,
    #[error("Atom row must have exactly 4 columns (name type charge charge_group), found {0}")]
    WrongColumnCount(usize),
    #[error("Bond row must name two atoms")]
    IncompleteBond,
    #[error("Invalid charge '{0}'")]
    InvalidCharge(String),
    #[error("Invalid charge group '{0}'")]
    InvalidChargeGroup(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtomChargeData {
    pub atom_type: String,
    pub charge: f64,
    pub charge_group: i32,
}

/// Per-residue charges, force field types and intra-residue bonds.
///
/// Bond partners prefixed with `-` or `+` refer to the previous or next residue
/// of the same chain (e.g. the peptide bond `-C N`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResidueTemplate {
    pub atoms: HashMap<String, AtomChargeData>,
    pub bonds: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargeTable {
    residues: HashMap<String, ResidueTemplate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Atoms,
    Bonds,
    Ignored,
}

impl Section {
    fn from_header(name: &str) -> Option<Self> {
        match name {
            "atoms" => Some(Section::Atoms),
            "bonds" => Some(Section::Bonds),
            "angles" | "dihedrals" | "impropers" | "all_dihedrals" | "cmap" | "HH14"
            | "RemoveDih" | "bondedtypes" | "exclusions" => Some(Section::Ignored),
            _ => None,
        }
    }
}

impl ChargeTable {
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ChargeTableError> {
        let file = File::open(path)?;
        Self::read_from(&mut BufReader::new(file))
    }

    /// Parses a residue charge table.
    ///
    /// Accepts both the flat layout, where each `[ RES ]` header is directly followed
    /// by `name type charge charge_group` rows, and the `.rtp` layout with
    /// `[ atoms ]` and `[ bonds ]` subsections under each residue.
    pub fn read_from(reader: &mut impl BufRead) -> Result<Self, ChargeTableError> {
        let mut table = Self::default();
        let mut current: Option<String> = None;
        let mut section = Section::Atoms;

        for (line_idx, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_idx + 1;
            let content = line.split(';').next().unwrap_or("").trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }

            if let Some(header) = content
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                let name = header.trim();
                match Section::from_header(name) {
                    Some(sub) => section = sub,
                    None => {
                        table.residues.entry(name.to_string()).or_default();
                        current = Some(name.to_string());
                        section = Section::Atoms;
                    }
                }
                continue;
            }

            if section == Section::Ignored {
                continue;
            }
            let Some(residue_name) = current.as_deref() else {
                return Err(ChargeTableError::Parse {
                    line: line_num,
                    kind: ChargeTableParseErrorKind::RowBeforeHeader,
                });
            };
            let template = table.residues.entry(residue_name.to_string()).or_default();

            let fields: Vec<_> = content.split_whitespace().collect();
            match section {
                Section::Atoms => {
                    let (name, data) = parse_atom_row(&fields, line_num)?;
                    template.atoms.insert(name, data);
                }
                Section::Bonds => {
                    let [a, b, ..] = fields.as_slice() else {
                        return Err(ChargeTableError::Parse {
                            line: line_num,
                            kind: ChargeTableParseErrorKind::IncompleteBond,
                        });
                    };
                    template.bonds.push((a.to_string(), b.to_string()));
                }
                Section::Ignored => {}
            }
        }

        Ok(table)
    }

    pub fn residue(&self, residue_name: &str) -> Option<&ResidueTemplate> {
        self.residues.get(residue_name)
    }

    pub fn atom(&self, residue_name: &str, atom_name: &str) -> Option<&AtomChargeData> {
        self.residues.get(residue_name)?.atoms.get(atom_name)
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

fn parse_atom_row(fields: &[&str], line: usize) -> Result<(String, AtomChargeData), ChargeTableError> {
    let &[name, atom_type, charge_str, group_str] = fields else {
        return Err(ChargeTableError::Parse {
            line,
            kind: ChargeTableParseErrorKind::WrongColumnCount(fields.len()),
        });
    };
    let charge = charge_str.parse().map_err(|_| ChargeTableError::Parse {
        line,
        kind: ChargeTableParseErrorKind::InvalidCharge(charge_str.to_string()),
    })?;
    let charge_group = group_str.parse().map_err(|_| ChargeTableError::Parse {
        line,
        kind: ChargeTableParseErrorKind::InvalidChargeGroup(group_str.to_string()),
    })?;

    Ok((
        name.to_string(),
        AtomChargeData {
            atom_type: atom_type.to_string(),
            charge,
            charge_group,
        },
    ))
}
