use nalgebra::Point3;

/// Euclidean distance between two positions.
pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (b - a).norm()
}

/// Angle in degrees at `b` across the triple (a, b, c).
///
/// The cosine is clamped before `acos` so collinear triples with floating
/// point noise do not produce NaN.
pub fn angle_deg(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let ba = a - b;
    let bc = c - b;
    let cos = ba.dot(&bc) / (ba.norm() * bc.norm());
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Signed dihedral (torsion) angle in degrees across the quadruple
/// (a, b, c, d): the angle between the half-plane through (a, b, c) and the
/// half-plane through (b, c, d), measured around the b-c axis.
pub fn dihedral_deg(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>, d: &Point3<f64>) -> f64 {
    let b1 = b - a;
    let b2 = c - b;
    let b3 = d - c;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);
    let m1 = n1.cross(&b2.normalize());

    let x = n1.dot(&n2);
    let y = m1.dot(&n2);
    y.atan2(x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn distance_is_euclidean_norm() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 0.0);
        assert!((distance(&a, &b) - 5.0).abs() < TOL);
    }

    #[test]
    fn right_angle_measures_ninety_degrees() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let b = Point3::new(0.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        assert!((angle_deg(&a, &b, &c) - 90.0).abs() < TOL);
    }

    #[test]
    fn collinear_triple_measures_straight_angle() {
        let a = Point3::new(-1.0, 0.0, 0.0);
        let b = Point3::new(0.0, 0.0, 0.0);
        let c = Point3::new(2.0, 0.0, 0.0);
        assert!((angle_deg(&a, &b, &c) - 180.0).abs() < TOL);
    }

    #[test]
    fn trans_dihedral_measures_180_degrees() {
        let a = Point3::new(-1.0, 1.0, 0.0);
        let b = Point3::new(0.0, 0.0, 0.0);
        let c = Point3::new(1.0, 0.0, 0.0);
        let d = Point3::new(2.0, -1.0, 0.0);
        assert!((dihedral_deg(&a, &b, &c, &d).abs() - 180.0).abs() < TOL);
    }

    #[test]
    fn dihedral_sign_follows_torsion_convention() {
        let a = Point3::new(-1.0, 1.0, 0.0);
        let b = Point3::new(0.0, 0.0, 0.0);
        let c = Point3::new(1.0, 0.0, 0.0);
        let d_up = Point3::new(2.0, 0.0, 1.0);
        let d_down = Point3::new(2.0, 0.0, -1.0);

        let up = dihedral_deg(&a, &b, &c, &d_up);
        let down = dihedral_deg(&a, &b, &c, &d_down);
        assert!((up + down).abs() < TOL, "opposite displacements mirror sign");
        assert!((up.abs() - 90.0).abs() < TOL);
    }
}
