use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::ids::ResidueId;
use crate::core::models::protein::Protein;
use nalgebra::Point3;
use std::collections::{BTreeMap, HashSet};
use std::io::{self, BufRead, Write};
use thiserror::Error;

const DEFAULT_CHAIN_ID: char = 'A';
const HEADER_RECORDS: &[&str] = &["HEADER", "TITLE", "COMPND", "REMARK", "CRYST1"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// Header records (`HEADER`, `TITLE`, `REMARK`, ...) in file order.
    pub header_lines: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("ATOM record has {found} fields, expected at least {expected}")]
    TooFewFields { expected: usize, found: usize },
    #[error("Invalid integer in field '{field}' (value: '{value}')")]
    InvalidInt { field: &'static str, value: String },
    #[error("Invalid coordinate in field '{field}' (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },
}

/// Fields of one `ATOM`/`HETATM` record.
#[derive(Debug, Clone, PartialEq)]
struct AtomRecord<'a> {
    serial: usize,
    name: &'a str,
    res_name: &'a str,
    chain_id: char,
    res_seq: isize,
    position: Point3<f64>,
}

fn parse_int<T: std::str::FromStr>(value: &str, field: &'static str, line: usize) -> Result<T, PdbError> {
    value.parse().map_err(|_| PdbError::Parse {
        line,
        kind: PdbParseErrorKind::InvalidInt {
            field,
            value: value.to_string(),
        },
    })
}

fn parse_float(value: &str, field: &'static str, line: usize) -> Result<f64, PdbError> {
    value.parse().map_err(|_| PdbError::Parse {
        line,
        kind: PdbParseErrorKind::InvalidFloat {
            field,
            value: value.to_string(),
        },
    })
}

/// Splits a chain identifier fused with a four-digit residue number (`A1000`).
fn split_fused_chain(field: &str) -> Option<(char, isize)> {
    let mut chars = field.chars();
    let chain = chars.next().filter(|c| c.is_ascii_alphabetic())?;
    let number = chars.as_str().parse().ok()?;
    Some((chain, number))
}

/// Parses a whitespace-separated `ATOM` record.
///
/// Layout: `ATOM serial name resName [chainID] resSeq x y z ...`. The chain column
/// is optional; when the fifth field is an integer it is taken as the residue number.
fn parse_atom_record(line: &str, line_num: usize) -> Result<AtomRecord<'_>, PdbError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let too_few = |expected: usize| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::TooFewFields {
            expected,
            found: fields.len(),
        },
    };
    if fields.len() < 8 {
        return Err(too_few(8));
    }

    let serial = parse_int(fields[1], "serial", line_num)?;
    let (chain_id, res_seq, coord_start) = if let Ok(res_seq) = fields[4].parse::<isize>() {
        (DEFAULT_CHAIN_ID, res_seq, 5)
    } else if let Some((chain, res_seq)) = split_fused_chain(fields[4]) {
        (chain, res_seq, 5)
    } else {
        if fields.len() < 9 {
            return Err(too_few(9));
        }
        let chain = fields[4].chars().next().unwrap_or(DEFAULT_CHAIN_ID);
        (chain, parse_int(fields[5], "resSeq", line_num)?, 6)
    };

    let x = parse_float(fields[coord_start], "x", line_num)?;
    let y = parse_float(fields[coord_start + 1], "y", line_num)?;
    let z = parse_float(fields[coord_start + 2], "z", line_num)?;

    Ok(AtomRecord {
        serial,
        name: fields[2],
        res_name: fields[3],
        chain_id,
        res_seq,
        position: Point3::new(x, y, z),
    })
}

/// Guesses the element column from the atom label (first alphabetic character).
fn element_of(name: &str) -> String {
    name.chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_string())
        .unwrap_or_default()
}

pub struct PdbFile;

impl MolecularFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Protein, Self::Metadata), Self::Error> {
        let mut protein = Protein::default();
        let mut metadata = PdbMetadata::default();
        let mut seen_serials = HashSet::new();
        let mut conect: Vec<(usize, usize)> = Vec::new();
        let mut current: Option<(char, isize, String, ResidueId)> = None;

        for (line_idx, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_idx + 1;
            let record_type = line.split_whitespace().next().unwrap_or("");

            match record_type {
                "ATOM" | "HETATM" => {
                    let record = parse_atom_record(&line, line_num)?;
                    if !seen_serials.insert(record.serial) {
                        return Err(PdbError::Inconsistency(format!(
                            "Duplicate atom serial: {}",
                            record.serial
                        )));
                    }

                    let residue_id = match &current {
                        Some((chain, seq, name, id))
                            if *chain == record.chain_id
                                && *seq == record.res_seq
                                && name == record.res_name =>
                        {
                            *id
                        }
                        _ => {
                            let id = protein.add_residue(record.res_seq, record.res_name, record.chain_id);
                            current = Some((record.chain_id, record.res_seq, record.res_name.to_string(), id));
                            id
                        }
                    };

                    let atom = Atom::new(record.serial, record.name, residue_id, record.position);
                    protein.add_atom_to_residue(residue_id, atom);
                }
                "CONECT" => {
                    let mut serials = line.split_whitespace().skip(1);
                    let Some(source) = serials.next() else {
                        continue;
                    };
                    let source: usize = parse_int(source, "CONECT serial", line_num)?;
                    for partner in serials {
                        let partner: usize = parse_int(partner, "CONECT partner", line_num)?;
                        conect.push((source.min(partner), source.max(partner)));
                    }
                }
                "END" | "ENDMDL" => break,
                r if HEADER_RECORDS.contains(&r) => metadata.header_lines.push(line.clone()),
                _ => {}
            }
        }

        if seen_serials.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }

        conect.sort_unstable();
        conect.dedup();
        for (s1, s2) in conect {
            let (Some(a1), Some(a2)) = (protein.find_atom_by_index(s1), protein.find_atom_by_index(s2)) else {
                return Err(PdbError::Inconsistency(format!(
                    "CONECT references unknown atom serial in pair ({}, {})",
                    s1, s2
                )));
            };
            protein.add_bond(a1, a2);
        }

        Ok((protein, metadata))
    }

    fn write_to(
        protein: &Protein,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for line in &metadata.header_lines {
            writeln!(writer, "{}", line)?;
        }

        for (_, residue) in protein.residues_iter() {
            for &atom_id in residue.atoms() {
                let atom = protein.atom(atom_id).ok_or_else(|| {
                    PdbError::Inconsistency(format!("Residue {} lists a missing atom", residue.number))
                })?;
                let name = if atom.name.len() < 4 {
                    format!(" {:<3}", atom.name)
                } else {
                    format!("{:<4}", atom.name)
                };
                writeln!(
                    writer,
                    "{:<6}{:>5} {} {:>3} {:1}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                    "ATOM",
                    atom.index,
                    name,
                    residue.name,
                    residue.chain_id,
                    residue.number,
                    atom.position.x,
                    atom.position.y,
                    atom.position.z,
                    1.0,
                    0.0,
                    element_of(&atom.name),
                )?;
            }
        }

        let mut bond_map: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for bond in protein.bonds() {
            let (Some(a1), Some(a2)) = (protein.atom(bond.atom1_id), protein.atom(bond.atom2_id)) else {
                return Err(PdbError::Inconsistency("Bond references a missing atom".into()));
            };
            bond_map.entry(a1.index).or_default().push(a2.index);
            bond_map.entry(a2.index).or_default().push(a1.index);
        }
        for (serial, partners) in &bond_map {
            write!(writer, "CONECT{:>5}", serial)?;
            for partner in partners {
                write!(writer, "{:>5}", partner)?;
            }
            writeln!(writer)?;
        }

        writeln!(writer, "END")?;
        Ok(())
    }

    fn write_protein_to(protein: &Protein, writer: &mut impl Write) -> Result<(), Self::Error> {
        let metadata = PdbMetadata {
            header_lines: vec![format!("REMARK   1 Generated by molmin: {}", protein.name)],
        };
        Self::write_to(protein, &metadata, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
HEADER    CALCIUM-BINDING PROTEIN
ATOM      1  N   ALA A   1      11.104   6.134  -6.504  1.00  0.00           N
ATOM      2  CA  ALA A   1      11.639   6.071  -5.147  1.00  0.00           C
ATOM      3  C   ALA A   1      13.149   5.971  -5.187  1.00  0.00           C
ATOM      4  N   GLY A   2      13.700   5.900  -4.000  1.00  0.00           N
TER
ATOM      5  N   SER B   1       1.000   2.000   3.000  1.00  0.00           N
CONECT    1    2
CONECT    2    1    3
CONECT    3    2    4
END
ATOM      6  N   SER B   2       1.000   2.000   3.000  1.00  0.00           N
";

    fn read(content: &str) -> Result<(Protein, PdbMetadata), PdbError> {
        PdbFile::read_from(&mut Cursor::new(content))
    }

    #[test]
    fn reads_atoms_residues_and_bonds() {
        let (protein, metadata) = read(SAMPLE).unwrap();

        assert_eq!(protein.atom_count(), 5);
        assert_eq!(protein.residue_count(), 3);
        assert_eq!(protein.bonds().len(), 3);
        assert_eq!(metadata.header_lines.len(), 1);

        let residues: Vec<_> = protein.residues_iter().map(|(_, r)| r).collect();
        assert_eq!(residues[0].name, "ALA");
        assert_eq!(residues[0].atoms().len(), 3);
        assert_eq!(residues[2].chain_id, 'B');

        let ca = protein.atom(protein.find_atom_by_index(2).unwrap()).unwrap();
        assert_eq!(ca.name, "CA");
        assert_eq!(ca.position, Point3::new(11.639, 6.071, -5.147));
    }

    #[test]
    fn chain_column_is_optional() {
        let (protein, _) = read("ATOM 1 N ALA 7 1.0 2.0 3.0\nATOM 2 CA ALA 7 2.0 2.0 3.0\n").unwrap();
        let (_, residue) = protein.residues_iter().next().unwrap();
        assert_eq!(residue.number, 7);
        assert_eq!(residue.chain_id, DEFAULT_CHAIN_ID);
        assert_eq!(residue.atoms().len(), 2);
    }

    #[test]
    fn fused_chain_and_residue_number_is_split() {
        let (protein, _) = read("ATOM   9999  CA  LYS A1000      1.000   2.000   3.000\n").unwrap();
        let (_, residue) = protein.residues_iter().next().unwrap();
        assert_eq!((residue.chain_id, residue.number), ('A', 1000));
    }

    #[test]
    fn malformed_coordinate_reports_line_number() {
        let result = read("REMARK test\nATOM 1 N ALA A 1 1.0 abc 3.0\n");
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                line: 2,
                kind: PdbParseErrorKind::InvalidFloat { field: "y", .. }
            })
        ));
    }

    #[test]
    fn short_record_and_empty_file_are_errors() {
        assert!(matches!(
            read("ATOM 1 N ALA\n"),
            Err(PdbError::Parse {
                kind: PdbParseErrorKind::TooFewFields { .. },
                ..
            })
        ));
        assert!(matches!(read("REMARK nothing\n"), Err(PdbError::MissingRecord(_))));
    }

    #[test]
    fn duplicate_serial_and_dangling_conect_are_inconsistent() {
        let dup = "ATOM 1 N ALA A 1 0 0 0\nATOM 1 CA ALA A 1 1 0 0\n";
        assert!(matches!(read(dup), Err(PdbError::Inconsistency(_))));

        let dangling = "ATOM 1 N ALA A 1 0 0 0\nCONECT 1 7\n";
        assert!(matches!(read(dangling), Err(PdbError::Inconsistency(_))));
    }

    #[test]
    fn written_structure_reads_back_identically() {
        let (protein, _) = read(SAMPLE).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.pdb");
        PdbFile::write_protein_to_path(&protein, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("REMARK"));
        assert!(text.trim_end().ends_with("END"));
        assert!(text.contains("ATOM      2  CA  ALA A   1      11.639   6.071  -5.147  1.00  0.00           C"));

        let (reread, _) = PdbFile::read_from_path(&path).unwrap();
        assert_eq!(reread.atom_count(), protein.atom_count());
        assert_eq!(reread.residue_count(), protein.residue_count());
        assert_eq!(reread.bonds().len(), protein.bonds().len());
        for ((_, a), (_, b)) in protein.atoms_iter().zip(reread.atoms_iter()) {
            assert_eq!(a.index, b.index);
            assert_eq!(a.name, b.name);
            assert_eq!(a.position, b.position);
        }
    }
}
