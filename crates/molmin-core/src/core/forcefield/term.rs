use std::ops::{Add, AddAssign};

/// Potential energy split by interaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyTerm {
    pub bond: f64,
    pub angle: f64,
    pub torsion: f64,
    pub lj: f64,
    pub coulomb: f64,
}

impl EnergyTerm {
    pub fn bonded(bond: f64, angle: f64, torsion: f64) -> Self {
        Self {
            bond,
            angle,
            torsion,
            ..Self::default()
        }
    }

    pub fn nonbonded(lj: f64, coulomb: f64) -> Self {
        Self {
            lj,
            coulomb,
            ..Self::default()
        }
    }

    #[inline]
    pub fn bonded_total(&self) -> f64 {
        self.bond + self.angle + self.torsion
    }

    #[inline]
    pub fn nonbonded_total(&self) -> f64 {
        self.lj + self.coulomb
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.bonded_total() + self.nonbonded_total()
    }
}

impl Add for EnergyTerm {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            bond: self.bond + rhs.bond,
            angle: self.angle + rhs.angle,
            torsion: self.torsion + rhs.torsion,
            lj: self.lj + rhs.lj,
            coulomb: self.coulomb + rhs.coulomb,
        }
    }
}

impl AddAssign for EnergyTerm {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
