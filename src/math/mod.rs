pub mod angle;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 3D rotation type.
///
/// Rows of the matrix are the local axes expressed in the global frame, so
/// `rotation * global_vector` yields local components.
pub type Rotation3 = nalgebra::Rotation3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Distance of a point from the longitudinal (z) axis.
#[must_use]
pub fn perp(v: &Vector3) -> f64 {
    v.x.hypot(v.y)
}

/// Azimuthal angle of a point around the longitudinal (z) axis, in (−π, π].
#[must_use]
pub fn phi(v: &Vector3) -> f64 {
    v.y.atan2(v.x)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn perp_ignores_z() {
        let v = Vector3::new(3.0, 4.0, 100.0);
        assert!((perp(&v) - 5.0).abs() < TOLERANCE);
    }

    #[test]
    fn phi_of_y_axis() {
        assert!((phi(&Vector3::y()) - FRAC_PI_2).abs() < TOLERANCE);
    }
}
