use crate::core::forcefield::params::{ParameterDatabase, ParameterPair};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

const FUNC_COLUMN: &str = "func";

#[derive(Debug, Error)]
pub enum ItpError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parameter table is empty")]
    Empty,
    #[error("First line must be a ';' comment naming the columns, found: '{0}'")]
    MissingHeader(String),
    #[error("Header line does not contain a '{FUNC_COLUMN}' column: '{0}'")]
    MissingFuncColumn(String),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ItpParseErrorKind },
}

#[derive(Debug, Error)]
pub enum ItpParseErrorKind {
    #[error("Expected at least {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },
    #[error("Invalid function code '{0}'")]
    InvalidFunction(String),
    #[error("Invalid coefficient '{0}'")]
    InvalidCoefficient(String),
}

/// Column layout described by the header comment of a parameter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    type_columns: usize,
    coefficient_columns: usize,
}

impl ColumnLayout {
    fn from_header(line: &str) -> Result<Self, ItpError> {
        let trimmed = line.trim();
        let Some(columns) = trimmed.strip_prefix(';') else {
            return Err(ItpError::MissingHeader(trimmed.to_string()));
        };
        let fields: Vec<_> = columns.split_whitespace().collect();
        let func_pos = fields
            .iter()
            .position(|&f| f == FUNC_COLUMN)
            .ok_or_else(|| ItpError::MissingFuncColumn(trimmed.to_string()))?;

        Ok(Self {
            type_columns: func_pos,
            coefficient_columns: fields.len() - func_pos - 1,
        })
    }

    fn min_columns(&self) -> usize {
        self.type_columns + 1 + self.coefficient_columns
    }
}

pub fn read_parameter_table(path: &Path) -> Result<ParameterDatabase, ItpError> {
    let file = File::open(path)?;
    parse_parameter_table(&mut BufReader::new(file))
}

/// Parses a GROMACS-style parameter table.
///
/// The first line is a comment naming the columns, e.g. `; ai aj ak func th0 cth`.
/// The position of `func` gives the number of atom-type columns; the header
/// columns after it give the number of coefficients. Blank lines, comments,
/// `[ section ]` headers and `#` directives are skipped.
pub fn parse_parameter_table(reader: &mut impl BufRead) -> Result<ParameterDatabase, ItpError> {
    let mut lines = reader.lines().enumerate();
    let (_, header) = lines.next().ok_or(ItpError::Empty)?;
    let layout = ColumnLayout::from_header(&header?)?;

    let mut entries = Vec::new();
    for (line_idx, line_res) in lines {
        let line = line_res?;
        let line_num = line_idx + 1;

        let content = line.split(';').next().unwrap_or("").trim();
        if content.is_empty() || content.starts_with('[') || content.starts_with('#') {
            continue;
        }

        entries.push(parse_entry(content, layout, line_num)?);
    }

    Ok(ParameterDatabase::new(entries))
}

fn parse_entry(content: &str, layout: ColumnLayout, line: usize) -> Result<ParameterPair, ItpError> {
    let fields: Vec<_> = content.split_whitespace().collect();
    if fields.len() < layout.min_columns() {
        return Err(ItpError::Parse {
            line,
            kind: ItpParseErrorKind::TooFewColumns {
                expected: layout.min_columns(),
                found: fields.len(),
            },
        });
    }

    let func_str = fields[layout.type_columns];
    let function: u8 = func_str.parse().map_err(|_| ItpError::Parse {
        line,
        kind: ItpParseErrorKind::InvalidFunction(func_str.to_string()),
    })?;

    let coefficient_start = layout.type_columns + 1;
    let parameters = fields[coefficient_start..coefficient_start + layout.coefficient_columns]
        .iter()
        .map(|s| {
            s.parse::<f64>().map_err(|_| ItpError::Parse {
                line,
                kind: ItpParseErrorKind::InvalidCoefficient(s.to_string()),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParameterPair {
        atom_types: fields[..layout.type_columns]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        function,
        parameters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(content: &str) -> Result<ParameterDatabase, ItpError> {
        parse_parameter_table(&mut Cursor::new(content))
    }

    #[test]
    fn header_determines_type_and_coefficient_columns() {
        let db = parse(
            "; i j k l func phase kd pn\n\
             [ dihedraltypes ]\n\
             X CT CT X 9 0.0 0.65084 3 ; generic\n\
             \n\
             ; a comment\n\
             HC CT CT OH 9 0.0 0.20920 3\n",
        )
        .unwrap();

        assert_eq!(db.len(), 2);
        assert_eq!(
            db.entries[0],
            ParameterPair::new(&["X", "CT", "CT", "X"], 9, &[0.0, 0.65084, 3.0])
        );
        assert_eq!(db.entries[1].atom_types, vec!["HC", "CT", "CT", "OH"]);
    }

    #[test]
    fn header_without_space_after_semicolon_is_accepted() {
        let db = parse(";ai aj func b0 kb\nCT HC 1 0.109 284512.0\n").unwrap();
        assert_eq!(db.entries[0], ParameterPair::new(&["CT", "HC"], 1, &[0.109, 284512.0]));
    }

    #[test]
    fn extra_trailing_columns_are_ignored() {
        let db = parse("; i j func c6 c12\nCT CT 1 0.001 1e-6 extra\n").unwrap();
        assert_eq!(db.entries[0].parameters, vec![0.001, 1e-6]);
    }

    #[test]
    fn missing_header_is_an_error() {
        assert!(matches!(parse("CT HC 1 0.1 2.0\n"), Err(ItpError::MissingHeader(_))));
        assert!(matches!(parse(""), Err(ItpError::Empty)));
    }

    #[test]
    fn header_without_func_column_is_an_error() {
        assert!(matches!(
            parse("; i j b0 kb\nCT HC 1 0.1 2.0\n"),
            Err(ItpError::MissingFuncColumn(_))
        ));
    }

    #[test]
    fn malformed_rows_report_line_numbers() {
        let result = parse("; i j func b0 kb\nCT HC 1 0.1 2.0\nCT N 1 abc 2.0\n");
        assert!(matches!(
            result,
            Err(ItpError::Parse {
                line: 3,
                kind: ItpParseErrorKind::InvalidCoefficient(_)
            })
        ));

        let result = parse("; i j func b0 kb\nCT HC one 0.1 2.0\n");
        assert!(matches!(
            result,
            Err(ItpError::Parse {
                line: 2,
                kind: ItpParseErrorKind::InvalidFunction(_)
            })
        ));

        let result = parse("; i j func b0 kb\nCT HC 1 0.1\n");
        assert!(matches!(
            result,
            Err(ItpError::Parse {
                line: 2,
                kind: ItpParseErrorKind::TooFewColumns { expected: 5, found: 4 }
            })
        ));
    }
}
