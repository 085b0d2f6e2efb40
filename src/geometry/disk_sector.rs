use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::angle::delta_phi;
use crate::math::{perp, phi, Point3, Rotation3, Vector3};

use super::Frame;

/// Wedge-shaped bounds of a disk sector.
///
/// Radial, longitudinal and azimuthal ranges are expressed in the frame whose
/// z axis is the disk axis. `phi_center` locates the middle of the azimuthal
/// window in that frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskSectorBounds {
    rmin: f64,
    rmax: f64,
    zmin: f64,
    zmax: f64,
    phi_window: f64,
    phi_center: f64,
}

impl DiskSectorBounds {
    /// Creates disk-sector bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if `rmin > rmax`, `zmin > zmax`, or the azimuthal
    /// window is not in `(0, 2π]`.
    pub fn new(
        rmin: f64,
        rmax: f64,
        zmin: f64,
        zmax: f64,
        phi_window: f64,
        phi_center: f64,
    ) -> Result<Self> {
        if rmin.is_nan() || rmax.is_nan() || rmin > rmax {
            return Err(GeometryError::Degenerate(format!("rmin {rmin} exceeds rmax {rmax}")).into());
        }
        if zmin.is_nan() || zmax.is_nan() || zmin > zmax {
            return Err(GeometryError::Degenerate(format!("zmin {zmin} exceeds zmax {zmax}")).into());
        }
        if !(phi_window > 0.0 && phi_window <= TAU) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "phi_window",
                value: phi_window,
                min: 0.0,
                max: TAU,
            }
            .into());
        }
        Ok(Self {
            rmin,
            rmax,
            zmin,
            zmax,
            phi_window,
            phi_center,
        })
    }

    #[must_use]
    pub fn rmin(&self) -> f64 {
        self.rmin
    }

    #[must_use]
    pub fn rmax(&self) -> f64 {
        self.rmax
    }

    #[must_use]
    pub fn zmin(&self) -> f64 {
        self.zmin
    }

    #[must_use]
    pub fn zmax(&self) -> f64 {
        self.zmax
    }

    /// Full azimuthal opening angle.
    #[must_use]
    pub fn phi_window(&self) -> f64 {
        self.phi_window
    }

    /// Azimuth of the window centre.
    #[must_use]
    pub fn phi_center(&self) -> f64 {
        self.phi_center
    }

    /// Radial extent.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.rmax - self.rmin
    }

    /// Longitudinal extent.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.zmax - self.zmin
    }

    #[must_use]
    pub fn mid_radius(&self) -> f64 {
        0.5 * (self.rmin + self.rmax)
    }

    #[must_use]
    pub fn mid_z(&self) -> f64 {
        0.5 * (self.zmin + self.zmax)
    }

    /// Offset of the sector centre from the disk-axis origin, in the disk frame.
    #[must_use]
    pub fn center_offset(&self) -> Vector3 {
        let r = self.mid_radius();
        Vector3::new(
            r * self.phi_center.cos(),
            r * self.phi_center.sin(),
            self.mid_z(),
        )
    }

    /// Tests whether a point, given relative to the sector centre in the
    /// sector frame, lies within the wedge.
    #[must_use]
    pub fn inside(&self, local: &Point3) -> bool {
        let v = local.coords + self.center_offset();
        let r = perp(&v);
        r >= self.rmin
            && r <= self.rmax
            && v.z >= self.zmin
            && v.z <= self.zmax
            && delta_phi(phi(&v), self.phi_center).abs() <= 0.5 * self.phi_window
    }
}

/// A placed disk sector: the bounding volume built around a group of
/// detector elements.
///
/// The frame origin is the sector centre (the global anchor position).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundDiskSector {
    frame: Frame,
    bounds: DiskSectorBounds,
}

impl BoundDiskSector {
    #[must_use]
    pub fn new(frame: Frame, bounds: DiskSectorBounds) -> Self {
        Self { frame, bounds }
    }

    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[must_use]
    pub fn bounds(&self) -> &DiskSectorBounds {
        &self.bounds
    }

    /// Global anchor position of the sector.
    #[must_use]
    pub fn position(&self) -> &Point3 {
        self.frame.position()
    }

    #[must_use]
    pub fn rotation(&self) -> &Rotation3 {
        self.frame.rotation()
    }

    /// Tests whether a global point lies inside the sector.
    #[must_use]
    pub fn contains(&self, global: &Point3) -> bool {
        self.bounds.inside(&self.frame.to_local_point(global))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_relative_eq;

    use super::*;

    fn sector() -> DiskSectorBounds {
        DiskSectorBounds::new(95.0, 105.0, -1.0, 1.0, 0.2, FRAC_PI_2).unwrap()
    }

    #[test]
    fn extents() {
        let b = sector();
        assert_relative_eq!(b.length(), 10.0);
        assert_relative_eq!(b.thickness(), 2.0);
        assert_relative_eq!(b.center_offset(), Vector3::new(0.0, 100.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn inside_relative_to_centre() {
        let b = sector();
        assert!(b.inside(&Point3::origin()));
        assert!(b.inside(&Point3::new(0.0, 4.9, 0.9)));
        assert!(!b.inside(&Point3::new(0.0, 5.1, 0.0)));
        assert!(!b.inside(&Point3::new(0.0, 0.0, 1.1)));
        // 0.15 rad off-centre at r = 100 is outside a 0.2 rad window.
        assert!(!b.inside(&Point3::new(-100.0 * 0.15_f64.sin(), 100.0 * 0.15_f64.cos() - 100.0, 0.0)));
    }

    #[test]
    fn inside_across_branch_cut() {
        let b = DiskSectorBounds::new(10.0, 20.0, 0.0, 1.0, 0.4, PI).unwrap();
        let offset = b.center_offset();
        let just_past_cut = Vector3::new(15.0 * (-PI + 0.1).cos(), 15.0 * (-PI + 0.1).sin(), 0.5);
        assert!(b.inside(&Point3::from(just_past_cut - offset)));
    }

    #[test]
    fn invalid_ranges_rejected() {
        assert!(DiskSectorBounds::new(2.0, 1.0, 0.0, 1.0, 0.1, 0.0).is_err());
        assert!(DiskSectorBounds::new(1.0, 2.0, 1.0, 0.0, 0.1, 0.0).is_err());
        assert!(DiskSectorBounds::new(1.0, 2.0, 0.0, 1.0, 0.0, 0.0).is_err());
        assert!(DiskSectorBounds::new(1.0, 2.0, 0.0, 1.0, -0.3, 0.0).is_err());
    }

    #[test]
    fn contains_uses_frame() {
        let frame = Frame::identity_at(Point3::new(0.0, 100.0, 0.0));
        let s = BoundDiskSector::new(frame, sector());
        assert!(s.contains(&Point3::new(0.0, 100.0, 0.0)));
        assert!(!s.contains(&Point3::new(0.0, 0.0, 0.0)));
    }
}
