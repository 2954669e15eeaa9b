//! Geometry and analytic forces of the bonded terms.
//!
//! Every routine takes atom positions directly. Force routines return the force on
//! each participating atom; the caller is responsible for accumulating them.

use crate::core::utils::vector::{
    displacement, distance, dot, elementwise_product, magnitude, plane_normal, unit,
};
use nalgebra::{Point3, Vector3};

const DEGENERATE_SINE: f64 = 1e-8;

/// Force on the first atom of a harmonic bond.
///
/// Equal to `−k·(r − r0)·unit(atom1 → atom2)`. The second atom receives the negation.
pub fn bond_force(k: f64, r: f64, r0: f64, atom1: &Point3<f64>, atom2: &Point3<f64>) -> Vector3<f64> {
    -k * (r - r0) * unit(&displacement(atom1, atom2))
}

/// Bend angle in radians for the `atom1-atom2-atom3` triple.
///
/// The cosine is `dot(atom1 − atom2, atom1 − atom3) / (|atom1 − atom2|·|atom2 − atom3|)`:
/// the numerator vectors are anchored at `atom1` while the denominator distances are
/// anchored at `atom2`. The analytic gradient in [`angle_force`] is derived against the
/// same convention. The ratio is clamped to `[-1, 1]` before `acos`.
pub fn bend_angle(atom1: &Point3<f64>, atom2: &Point3<f64>, atom3: &Point3<f64>) -> f64 {
    let v1 = displacement(atom2, atom1);
    let v2 = displacement(atom3, atom1);

    let numerator = dot(&v1, &v2);
    let denominator = distance(atom1, atom2) * distance(atom2, atom3);

    (numerator / denominator).clamp(-1.0, 1.0).acos()
}

/// Partial derivatives of `cosθ` with respect to the coordinates of `outer`.
///
/// `(1/d(outer,vertex))·[(other − vertex)/d(other,vertex) − (outer − vertex)/d(outer,vertex)·cosθ]`
fn cosine_gradient(
    outer: &Point3<f64>,
    vertex: &Point3<f64>,
    other: &Point3<f64>,
    theta: f64,
) -> Vector3<f64> {
    let d_outer = distance(outer, vertex);
    let d_other = distance(other, vertex);
    ((other - vertex) / d_other - (outer - vertex) / d_outer * theta.cos()) / d_outer
}

/// Forces on the three atoms of a harmonic angle term, in `(atom1, atom2, atom3)` order.
///
/// `theta` and `theta0` are in radians. The vertex force is the negated sum of the
/// outer forces. A linear or fully folded angle (`sinθ = 0`) yields zero forces.
pub fn angle_force(
    k: f64,
    theta: f64,
    theta0: f64,
    atom1: &Point3<f64>,
    atom2: &Point3<f64>,
    atom3: &Point3<f64>,
) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
    let sin_theta = theta.sin();
    if sin_theta.abs() < DEGENERATE_SINE {
        return (Vector3::zeros(), Vector3::zeros(), Vector3::zeros());
    }

    let du_dtheta = k * (theta - theta0);
    let dtheta_dcos = -1.0 / sin_theta;
    let scale = du_dtheta * dtheta_dcos;

    let force_i = scale * cosine_gradient(atom1, atom2, atom3, theta);
    let force_k = scale * cosine_gradient(atom3, atom2, atom1, theta);
    let force_j = -force_i - force_k;

    (force_i, force_j, force_k)
}

/// Dihedral angle in degrees for the `atom1-atom2-atom3-atom4` quadruple.
pub fn dihedral_angle(
    atom1: &Point3<f64>,
    atom2: &Point3<f64>,
    atom3: &Point3<f64>,
    atom4: &Point3<f64>,
) -> f64 {
    let v1 = displacement(atom2, atom1);
    let v2 = displacement(atom3, atom2);
    let v3 = displacement(atom4, atom3);

    let n1 = plane_normal(&v1, &v2);
    let n2 = plane_normal(&v2, &v3);
    let n3 = plane_normal(&n1, &n2);

    let x = dot(&n1, &n2);
    let y = dot(&n3, &v2) / magnitude(&v2);

    y.atan2(x).to_degrees()
}

/// Derivative of `cosφ` with respect to the auxiliary vector `v1`, paired with `v2`.
fn torsion_cosine_gradient(v1: &Vector3<f64>, v2: &Vector3<f64>, phi: f64) -> Vector3<f64> {
    let m1 = magnitude(v1);
    let m2 = magnitude(v2);
    (v2 / m2 - v1 / m1 * phi.cos()) / m1
}

/// Forces on the four atoms of a periodic proper torsion, in atom order.
///
/// `phi` and `phase` are in radians. The auxiliary vectors `t = v12 ∘ v32` and
/// `u = v43 ∘ v32` are built with the element-wise product. The four forces sum to
/// zero. A degenerate torsion (`sinφ = 0`, or a vanishing auxiliary vector) yields
/// zero forces.
pub fn torsion_force(
    kd: f64,
    phi: f64,
    pn: f64,
    phase: f64,
    atom1: &Point3<f64>,
    atom2: &Point3<f64>,
    atom3: &Point3<f64>,
    atom4: &Point3<f64>,
) -> [Vector3<f64>; 4] {
    let zero = [Vector3::zeros(); 4];

    let sin_phi = phi.sin();
    if sin_phi.abs() < DEGENERATE_SINE {
        return zero;
    }

    let v12 = displacement(atom1, atom2);
    let v32 = displacement(atom3, atom2);
    let v43 = displacement(atom4, atom3);

    let t = elementwise_product(&v12, &v32);
    let u = elementwise_product(&v43, &v32);
    if magnitude(&t) < DEGENERATE_SINE || magnitude(&u) < DEGENERATE_SINE {
        return zero;
    }

    let du_dphi = -0.5 * kd * pn * (pn * phi - phase).sin();
    let dphi_dcos = -1.0 / sin_phi;
    let scale = du_dphi * dphi_dcos;

    let dcos_dt = torsion_cosine_gradient(&t, &u, phi);
    let dcos_du = torsion_cosine_gradient(&u, &t, phi);

    let force_i = plane_normal(&v32, &dcos_dt);
    let force_j = plane_normal(&dcos_dt, &(v32 - v12)) + plane_normal(&v43, &dcos_du);
    let force_k = plane_normal(&dcos_dt, &v12) + plane_normal(&dcos_du, &(v32 + v43));
    let force_l = plane_normal(&v32, &dcos_du);

    [
        scale * force_i,
        scale * force_j,
        scale * force_k,
        scale * force_l,
    ]
}
