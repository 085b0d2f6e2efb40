use nalgebra::Matrix3;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Rotation3, Vector3, TOLERANCE};

/// A local reference frame: an origin plus an orthonormal, right-handed
/// orientation.
///
/// The rotation maps global components to local ones; its rows are the local
/// axes expressed in global coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    position: Point3,
    rotation: Rotation3,
}

impl Frame {
    /// Creates a frame from an origin and an existing rotation.
    #[must_use]
    pub fn new(position: Point3, rotation: Rotation3) -> Self {
        Self { position, rotation }
    }

    /// Creates a frame aligned with the global axes.
    #[must_use]
    pub fn identity_at(position: Point3) -> Self {
        Self::new(position, Rotation3::identity())
    }

    /// Creates a frame from its local x and y axes given in global coordinates.
    ///
    /// The z axis is `x × y`. Both inputs are normalized; `y_axis` is
    /// re-orthogonalized against `x_axis`.
    ///
    /// # Errors
    ///
    /// Returns an error if either axis is zero-length or the two are parallel.
    pub fn from_axes(position: Point3, x_axis: Vector3, y_axis: Vector3) -> Result<Self> {
        let x_len = x_axis.norm();
        if x_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let x_axis = x_axis / x_len;

        let z_axis = x_axis.cross(&y_axis);
        let z_len = z_axis.norm();
        if z_len < TOLERANCE {
            return Err(GeometryError::Degenerate("frame axes are parallel".into()).into());
        }
        let z_axis = z_axis / z_len;
        let y_axis = z_axis.cross(&x_axis);

        let matrix = Matrix3::from_rows(&[
            x_axis.transpose(),
            y_axis.transpose(),
            z_axis.transpose(),
        ]);
        Ok(Self::new(position, Rotation3::from_matrix_unchecked(matrix)))
    }

    /// Returns the origin of the frame.
    #[must_use]
    pub fn position(&self) -> &Point3 {
        &self.position
    }

    /// Returns the orientation of the frame.
    #[must_use]
    pub fn rotation(&self) -> &Rotation3 {
        &self.rotation
    }

    /// Local x axis in global coordinates.
    #[must_use]
    pub fn x_axis(&self) -> Vector3 {
        self.rotation.matrix().row(0).transpose()
    }

    /// Local y axis in global coordinates.
    #[must_use]
    pub fn y_axis(&self) -> Vector3 {
        self.rotation.matrix().row(1).transpose()
    }

    /// Local z axis in global coordinates.
    #[must_use]
    pub fn z_axis(&self) -> Vector3 {
        self.rotation.matrix().row(2).transpose()
    }

    /// Expresses a global point in local coordinates.
    #[must_use]
    pub fn to_local_point(&self, global: &Point3) -> Point3 {
        Point3::from(self.rotation * (global - self.position))
    }

    /// Expresses a local point in global coordinates.
    #[must_use]
    pub fn to_global_point(&self, local: &Point3) -> Point3 {
        self.position + self.rotation.inverse() * local.coords
    }

    /// Expresses a global direction in local coordinates.
    #[must_use]
    pub fn to_local_vector(&self, global: &Vector3) -> Vector3 {
        self.rotation * global
    }

    /// Expresses a local direction in global coordinates.
    #[must_use]
    pub fn to_global_vector(&self, local: &Vector3) -> Vector3 {
        self.rotation.inverse() * local
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn axes_are_recovered() {
        let f = Frame::from_axes(p(1.0, 2.0, 3.0), Vector3::y(), -Vector3::x()).unwrap();
        assert_relative_eq!(f.x_axis(), Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(f.y_axis(), -Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(f.z_axis(), Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn local_x_maps_to_global_x_axis() {
        let f = Frame::from_axes(p(0.0, 0.0, 0.0), Vector3::y(), Vector3::z()).unwrap();
        let g = f.to_global_vector(&Vector3::x());
        assert_relative_eq!(g, Vector3::y(), epsilon = 1e-12);
        let l = f.to_local_vector(&Vector3::z());
        assert_relative_eq!(l, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn point_roundtrip() {
        let f = Frame::from_axes(
            p(10.0, -4.0, 250.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(-1.0, 1.0, 0.5),
        )
        .unwrap();
        let g = p(3.0, 7.0, -2.0);
        let back = f.to_global_point(&f.to_local_point(&g));
        assert_relative_eq!(back, g, epsilon = 1e-9);
    }

    #[test]
    fn non_orthogonal_y_is_corrected() {
        let f = Frame::from_axes(p(0.0, 0.0, 0.0), Vector3::x(), Vector3::new(1.0, 1.0, 0.0))
            .unwrap();
        assert_relative_eq!(f.y_axis(), Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(f.rotation().matrix().determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn parallel_axes_rejected() {
        let r = Frame::from_axes(p(0.0, 0.0, 0.0), Vector3::x(), Vector3::x() * 2.0);
        assert!(r.is_err());
    }

    #[test]
    fn zero_axis_rejected() {
        let r = Frame::from_axes(p(0.0, 0.0, 0.0), Vector3::zeros(), Vector3::y());
        assert!(r.is_err());
    }
}
