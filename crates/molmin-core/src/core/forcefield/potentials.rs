use std::f64::consts::PI;

const MIN_DISTANCE: f64 = 1e-6;
const CLASH_ENERGY: f64 = 1e10;

/// Harmonic bond stretch `½·k·(r − r0)²`.
#[inline]
pub fn bond_stretch(k: f64, r: f64, r0: f64) -> f64 {
    0.5 * k * (r - r0) * (r - r0)
}

/// Harmonic angle bend `½·k·(θ − θ0)²`, angles in radians.
#[inline]
pub fn angle_bend(k: f64, theta: f64, theta0: f64) -> f64 {
    0.5 * k * (theta - theta0) * (theta - theta0)
}

/// Periodic proper torsion `kd·(1 + cos(pn·φ − phase))`, `phi` and `phase` in radians.
#[inline]
pub fn proper_torsion(kd: f64, phi: f64, pn: f64, phase: f64) -> f64 {
    kd * (1.0 + (pn * phi - phase).cos())
}

/// Magnitude of the 12-6 pair energy `|A/r¹² − B/r⁶|`.
#[inline]
pub fn lennard_jones_12_6(dist: f64, a: f64, b: f64) -> f64 {
    if dist < MIN_DISTANCE {
        return CLASH_ENERGY;
    }
    let r6 = dist.powi(6);
    let r12 = r6 * r6;
    (a / r12 - b / r6).abs()
}

/// Signed radial force scale `(−12A/r¹² + 6B/r⁶)/r` of the 12-6 pair.
#[inline]
pub fn lennard_jones_force_scale(dist: f64, a: f64, b: f64) -> f64 {
    if dist < MIN_DISTANCE {
        return 0.0;
    }
    let r6 = dist.powi(6);
    let r12 = r6 * r6;
    (-12.0 * a / r12 + 6.0 * b / r6) / dist
}

/// Magnitude of the Coulomb energy `|q1·q2| / (4π·ε·r)`.
#[inline]
pub fn coulomb(dist: f64, q1: f64, q2: f64, permittivity: f64) -> f64 {
    if dist < MIN_DISTANCE {
        return CLASH_ENERGY;
    }
    (q1 * q2).abs() / (4.0 * PI * permittivity * dist)
}

/// Signed radial force scale `q1·q2 / (4π·ε·r²)`; positive for like charges.
#[inline]
pub fn coulomb_force_scale(dist: f64, q1: f64, q2: f64, permittivity: f64) -> f64 {
    if dist < MIN_DISTANCE {
        return 0.0;
    }
    q1 * q2 / (4.0 * PI * permittivity * dist * dist)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn bond_stretch_matches_reference_scenario() {
        assert!(f64_approx_equal(bond_stretch(100.0, 1.5, 1.0), 12.5));
    }

    #[test]
    fn bond_stretch_is_zero_only_at_equilibrium() {
        assert_eq!(bond_stretch(250.0, 1.2, 1.2), 0.0);
        assert!(bond_stretch(250.0, 1.19, 1.2) > 0.0);
        assert!(bond_stretch(250.0, 1.21, 1.2) > 0.0);
    }

    #[test]
    fn bond_stretch_depends_only_on_deviation() {
        let (k, r0) = (80.0, 1.53);
        for r in [0.9, 1.4, 1.53, 2.2] {
            let shifted = r0 + (r - r0);
            assert!(f64_approx_equal(bond_stretch(k, r, r0), bond_stretch(k, shifted, r0)));
        }
        assert!(f64_approx_equal(bond_stretch(k, r0 + 0.2, r0), bond_stretch(k, r0 - 0.2, r0)));
    }

    #[test]
    fn angle_bend_is_harmonic_in_radians() {
        let energy = angle_bend(2.0, PI / 2.0, PI / 3.0);
        assert!(f64_approx_equal(energy, (PI / 6.0).powi(2)));
    }

    #[test]
    fn proper_torsion_spans_zero_to_twice_barrier() {
        assert!(f64_approx_equal(proper_torsion(1.5, 0.0, 3.0, 0.0), 3.0));
        assert!(f64_approx_equal(proper_torsion(1.5, PI / 3.0, 3.0, 0.0), 0.0));
        assert!(f64_approx_equal(proper_torsion(1.5, PI, 1.0, PI), 3.0));
    }

    #[test]
    fn lennard_jones_reports_magnitude_only() {
        // A/r^12 - B/r^6 = 1 - 4 = -3 at r = 1.
        assert!(f64_approx_equal(lennard_jones_12_6(1.0, 1.0, 4.0), 3.0));
        // Repulsive side keeps its sign.
        assert!(f64_approx_equal(lennard_jones_12_6(1.0, 4.0, 1.0), 3.0));
    }

    #[test]
    fn lennard_jones_at_very_small_distance_returns_large_positive_energy() {
        assert!(f64_approx_equal(lennard_jones_12_6(1e-7, 1.0, 1.0), 1e10));
        assert_eq!(lennard_jones_force_scale(1e-7, 1.0, 1.0), 0.0);
    }

    #[test]
    fn lennard_jones_force_scale_is_signed() {
        // (-12*1 + 6*4) / 1 = 12 at r = 1.
        assert!(f64_approx_equal(lennard_jones_force_scale(1.0, 1.0, 4.0), 12.0));
        assert!(lennard_jones_force_scale(1.0, 4.0, 1.0) < 0.0);
    }

    #[test]
    fn coulomb_energy_is_magnitude_for_both_signs() {
        let eps = 1.0 / (4.0 * PI);
        assert!(f64_approx_equal(coulomb(2.0, 1.0, 1.0, eps), 0.5));
        assert!(f64_approx_equal(coulomb(2.0, 1.0, -1.0, eps), 0.5));
    }

    #[test]
    fn coulomb_force_scale_is_positive_for_like_charges() {
        let eps = 1.0 / (4.0 * PI);
        assert!(f64_approx_equal(coulomb_force_scale(2.0, 1.0, 1.0, eps), 0.25));
        assert!(f64_approx_equal(coulomb_force_scale(2.0, -1.0, 1.0, eps), -0.25));
    }
}
