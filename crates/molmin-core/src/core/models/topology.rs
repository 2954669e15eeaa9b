use super::ids::AtomId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1_id: AtomId, // ID of the first atom
    pub atom2_id: AtomId, // ID of the second atom
}

impl Bond {
    pub fn new(atom1_id: AtomId, atom2_id: AtomId) -> Self {
        Self { atom1_id, atom2_id }
    }
}

/// Three atoms `i-j-k` bonded in sequence; `j` is the vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Angle {
    pub atom1_id: AtomId,
    pub atom2_id: AtomId,
    pub atom3_id: AtomId,
}

/// Four atoms `i-j-k-l` bonded in sequence; rotation is about the `j-k` bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Torsion {
    pub atom1_id: AtomId,
    pub atom2_id: AtomId,
    pub atom3_id: AtomId,
    pub atom4_id: AtomId,
}
