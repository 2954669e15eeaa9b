use crate::core::io::itp::{self, ItpError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Atom-type label that matches any type in a parameter entry.
pub const WILDCARD_TYPE: &str = "X";

/// One row of a parameter table: atom types, function code and coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterPair {
    pub atom_types: Vec<String>,
    pub function: u8,
    pub parameters: Vec<f64>,
}

impl ParameterPair {
    pub fn new(atom_types: &[&str], function: u8, parameters: &[f64]) -> Self {
        Self {
            atom_types: atom_types.iter().map(|s| s.to_string()).collect(),
            function,
            parameters: parameters.to_vec(),
        }
    }

    /// Number of wildcards needed to match `types` in the given order, or `None`.
    fn match_cost<'a>(&self, types: impl Iterator<Item = &'a str>) -> Option<usize> {
        let mut cost = 0;
        let mut len = 0;
        for (entry, query) in self.atom_types.iter().zip(types) {
            len += 1;
            if entry == query {
                continue;
            }
            if entry == WILDCARD_TYPE {
                cost += 1;
                continue;
            }
            return None;
        }
        (len == self.atom_types.len()).then_some(cost)
    }
}

/// An unordered collection of parameter rows for one interaction table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterDatabase {
    pub entries: Vec<ParameterPair>,
}

impl ParameterDatabase {
    pub fn new(entries: Vec<ParameterPair>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the coefficients that best match `function` and the ordered `types`.
    ///
    /// An exact match in the given order wins, then an exact match in reverse order,
    /// then the entry needing the fewest `X` wildcards (given order before reverse).
    /// Returns `None` when nothing matches; callers skip the interaction.
    pub fn search(&self, function: u8, types: &[&str]) -> Option<&[f64]> {
        let mut best: Option<(usize, &ParameterPair)> = None;

        for entry in &self.entries {
            if entry.function != function || entry.atom_types.len() != types.len() {
                continue;
            }
            let forward = entry.match_cost(types.iter().copied()).map(|c| 2 * c);
            let reverse = entry
                .match_cost(types.iter().rev().copied())
                .map(|c| 2 * c + 1);
            let Some(rank) = forward.into_iter().chain(reverse).min() else {
                continue;
            };
            if best.is_none_or(|(best_rank, _)| rank < best_rank) {
                best = Some((rank, entry));
            }
        }

        best.map(|(_, entry)| entry.parameters.as_slice())
    }
}

/// The interaction a parameter lookup is performed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// Harmonic bond, coefficients `[b0, kb]`.
    Bond,
    /// Harmonic angle, coefficients `[theta0 (deg), k]`.
    Angle,
    /// Periodic proper dihedral, coefficients `[phase (deg), kd, multiplicity]`.
    ProperDihedral,
    /// Lennard-Jones pair, coefficients `[c6, c12]`.
    LennardJones,
}

impl TermKind {
    /// The function code of this term in its parameter table.
    pub fn function_code(&self) -> u8 {
        match self {
            TermKind::Bond => 1,
            TermKind::Angle => 1,
            TermKind::ProperDihedral => 9,
            TermKind::LennardJones => 1,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            TermKind::Bond | TermKind::LennardJones => 2,
            TermKind::Angle => 3,
            TermKind::ProperDihedral => 4,
        }
    }

    pub fn coefficient_count(&self) -> usize {
        match self {
            TermKind::Bond | TermKind::Angle | TermKind::LennardJones => 2,
            TermKind::ProperDihedral => 3,
        }
    }
}

/// Paths of the individual parameter tables. A missing table means every
/// interaction of that kind is skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForcefieldPaths {
    pub bonds: Option<PathBuf>,
    pub angles: Option<PathBuf>,
    pub dihedrals: Option<PathBuf>,
    pub nonbonded: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forcefield {
    pub bonds: ParameterDatabase,
    pub angles: ParameterDatabase,
    pub dihedrals: ParameterDatabase,
    pub nonbonded: ParameterDatabase,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("Parameter table error for '{path}': {source}")]
    Table {
        path: String,
        #[source]
        source: ItpError,
    },
}

impl Forcefield {
    pub fn load(paths: &ForcefieldPaths) -> Result<Self, ParamLoadError> {
        Ok(Self {
            bonds: Self::load_table(paths.bonds.as_deref())?,
            angles: Self::load_table(paths.angles.as_deref())?,
            dihedrals: Self::load_table(paths.dihedrals.as_deref())?,
            nonbonded: Self::load_table(paths.nonbonded.as_deref())?,
        })
    }

    fn load_table(path: Option<&Path>) -> Result<ParameterDatabase, ParamLoadError> {
        let Some(path) = path else {
            return Ok(ParameterDatabase::default());
        };
        itp::read_parameter_table(path).map_err(|e| ParamLoadError::Table {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn database(&self, kind: TermKind) -> &ParameterDatabase {
        match kind {
            TermKind::Bond => &self.bonds,
            TermKind::Angle => &self.angles,
            TermKind::ProperDihedral => &self.dihedrals,
            TermKind::LennardJones => &self.nonbonded,
        }
    }

    /// Looks up the coefficients of `kind` for the given atom types.
    ///
    /// Returns `None` when the arity does not fit the term, when no entry matches,
    /// or when the matching entry has too few coefficients.
    pub fn lookup(&self, kind: TermKind, types: &[&str]) -> Option<&[f64]> {
        if types.len() != kind.arity() {
            return None;
        }
        self.database(kind)
            .search(kind.function_code(), types)
            .filter(|params| params.len() >= kind.coefficient_count())
    }
}
