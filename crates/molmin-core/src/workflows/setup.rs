use crate::core::forcefield::parameterization::{ParameterizationSummary, Parameterizer};
use crate::core::forcefield::params::Forcefield;
use crate::core::io::pdb::PdbFile;
use crate::core::io::rtp::ChargeTable;
use crate::core::io::traits::MolecularFile;
use crate::core::models::protein::Protein;
use crate::engine::config::WorkflowConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, warn};

/// A structure read from disk with parameters assigned, plus its force field.
pub(crate) struct PreparedSystem {
    pub protein: Protein,
    pub forcefield: Forcefield,
    pub summary: ParameterizationSummary,
}

pub(crate) fn prepare(
    config: &WorkflowConfig,
    reporter: &ProgressReporter,
) -> Result<PreparedSystem, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });

    let (mut protein, _) = PdbFile::read_from_path(&config.structure_path)?;
    protein.name = config
        .structure_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!(
        "Read '{}': {} atoms in {} residues, {} bonds from CONECT records",
        protein.name,
        protein.atom_count(),
        protein.residue_count(),
        protein.bonds().len()
    );

    let forcefield = Forcefield::load(&config.forcefield)?;
    info!(
        "Loaded parameter tables: {} bond, {} angle, {} dihedral, {} non-bonded entries",
        forcefield.bonds.len(),
        forcefield.angles.len(),
        forcefield.dihedrals.len(),
        forcefield.nonbonded.len()
    );

    let charge_table = match &config.charge_table_path {
        Some(path) => ChargeTable::read_from_path(path)?,
        None => {
            warn!("No charge table given; all charges default to 0.0");
            ChargeTable::default()
        }
    };

    let summary = Parameterizer::new(&charge_table).parameterize_protein(&mut protein);
    if summary.unmatched_charges > 0 || summary.unmatched_masses > 0 {
        warn!(
            "{} atoms without charge entry, {} atoms without mass",
            summary.unmatched_charges, summary.unmatched_masses
        );
    }
    info!(
        "Topology: {} bonds ({} from residue templates), {} angles, {} torsions",
        protein.bonds().len(),
        summary.template_bonds,
        protein.angles().len(),
        protein.torsions().len()
    );

    reporter.report(Progress::PhaseFinish);
    Ok(PreparedSystem {
        protein,
        forcefield,
        summary,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::fs;
    use std::path::{Path, PathBuf};

    pub const STRUCTURE: &str = "\
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  ALA A   1       1.460   0.000   0.000  1.00  0.00           C
ATOM      3  C   ALA A   1       2.010   1.420   0.000  1.00  0.00           C
ATOM      4  O   ALA A   1       1.250   2.390   0.000  1.00  0.00           O
ATOM      5  N   GLY A   2       3.330   1.540   0.000  1.00  0.00           N
ATOM      6  CA  GLY A   2       3.970   2.850   0.000  1.00  0.00           C
ATOM      7  C   GLY A   2       5.480   2.700   0.000  1.00  0.00           C
ATOM      8  O   GLY A   2       6.010   1.590   0.000  1.00  0.00           O
END
";

    pub const CHARGES: &str = "\
[ ALA ]
 [ atoms ]
   N    N   -0.4157  1
   CA   CT   0.0337  2
   C    C    0.5973  3
   O    O   -0.5679  4
 [ bonds ]
   N    CA
   CA   C
   C    O
  -C    N
[ GLY ]
 [ atoms ]
   N    N   -0.4157  1
   CA   CT  -0.0252  2
   C    C    0.5973  3
   O    O   -0.5679  4
 [ bonds ]
   N    CA
   CA   C
   C    O
  -C    N
";

    pub const BONDS: &str = "\
; i j func b0 kb
N  CT 1 1.449 300.0
CT C  1 1.522 300.0
C  O  1 1.229 500.0
C  N  1 1.335 450.0
";

    pub const ANGLES: &str = "\
; i j k func th0 cth
N  CT C  1 110.1 60.0
CT C  O  1 120.4 80.0
CT C  N  1 116.6 70.0
O  C  N  1 122.9 80.0
C  N  CT 1 121.9 50.0
";

    pub const DIHEDRALS: &str = "\
; i j k l func phase kd pn
X  C  N  X  9 180.0 2.5 2
X  CT C  X  9   0.0 0.1 2
X  N  CT X  9   0.0 0.1 2
";

    pub const NONBONDED: &str = "\
; i j func c6 c12
N  O  1 500.0 600000.0
CT O  1 600.0 900000.0
";

    pub struct InputFiles {
        pub structure: PathBuf,
        pub charges: PathBuf,
        pub bonds: PathBuf,
        pub angles: PathBuf,
        pub dihedrals: PathBuf,
        pub nonbonded: PathBuf,
    }

    pub fn write_inputs(dir: &Path) -> InputFiles {
        let write = |name: &str, content: &str| {
            let path = dir.join(name);
            fs::write(&path, content).unwrap();
            path
        };
        InputFiles {
            structure: write("dipeptide.pdb", STRUCTURE),
            charges: write("charges.rtp", CHARGES),
            bonds: write("bonds.itp", BONDS),
            angles: write("angles.itp", ANGLES),
            dihedrals: write("dihedrals.itp", DIHEDRALS),
            nonbonded: write("nonbonded.itp", NONBONDED),
        }
    }
}
