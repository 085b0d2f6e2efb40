use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;

use tracing::{debug, error};

use crate::det::GeomDet;
use crate::error::{OperationError, Result};
use crate::geometry::{BoundDiskSector, DiskSectorBounds, Frame};
use crate::math::angle::{normalize_phi, phi_less};
use crate::math::{perp, phi, Point3, Vector3};

const LOG_TARGET: &str = "MTDDetLayers";

/// A non-fatal inconsistency found while bounding a group of elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SectorDiagnostic {
    /// The circular comparator does not place `phimin` before `phimax`.
    PhiOrdering { phimin: f64, phimax: f64 },
    /// The window straddles ±π but the extrema are not where a wedge across
    /// the branch cut would put them.
    WrapAround {
        phimin: f64,
        phimax: f64,
        phi_window: f64,
    },
}

impl fmt::Display for SectorDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhiOrdering { phimin, phimax } => {
                write!(f, "phi sorting failed: phimin {phimin} phimax {phimax}")
            }
            Self::WrapAround {
                phimin,
                phimax,
                phi_window,
            } => write!(
                f,
                "inconsistent wedge at pi: phimin {phimin} phimax {phimax} window {phi_window}"
            ),
        }
    }
}

/// Result of [`DiskSectorBuilder::execute`].
#[derive(Debug, Clone, PartialEq)]
pub struct DiskSectorBuild {
    /// The bounding sector, placed at its global anchor.
    pub sector: BoundDiskSector,
    /// Temporary frame on the disk axis in which the bounds were measured.
    pub reference: Frame,
    /// Sector centre relative to `reference`, in its local coordinates.
    pub local_offset: Vector3,
    /// Inconsistencies reported while bounding. Empty for clean geometry.
    pub diagnostics: Vec<SectorDiagnostic>,
}

/// Builds the disk sector enclosing an ordered group of detector elements.
///
/// The sector frame is derived from the first element; the bounds cover
/// every element's corners as seen from the disk axis.
pub struct DiskSectorBuilder<'a, D> {
    dets: &'a [D],
}

impl<'a, D: GeomDet> DiskSectorBuilder<'a, D> {
    /// Creates a new `DiskSectorBuilder` over `dets`.
    #[must_use]
    pub fn new(dets: &'a [D]) -> Self {
        Self { dets }
    }

    /// Executes the build.
    ///
    /// # Errors
    ///
    /// Returns an error if `dets` is empty, or if the elements are so
    /// degenerate that no frame or non-empty wedge can be formed.
    pub fn execute(&self) -> Result<DiskSectorBuild> {
        let Some(first) = self.dets.first() else {
            return Err(
                OperationError::InvalidInput("cannot build a disk sector from no elements".into())
                    .into(),
            );
        };

        #[allow(clippy::cast_precision_loss)]
        let mean_z = self.dets.iter().map(|d| d.position().z).sum::<f64>() / self.dets.len() as f64;
        let mean_pos = Point3::new(0.0, 0.0, mean_z);

        let reference = compute_frame(first, mean_pos)?;
        let extent = compute_bounds(self.dets, &reference);

        let anchor = reference.to_global_point(&Point3::from(extent.local_offset));
        debug!(target: LOG_TARGET, ?anchor, "global position of disk sector");

        let bounds = DiskSectorBounds::new(
            extent.rmin,
            extent.rmax,
            extent.zmin,
            extent.zmax,
            extent.phi_window,
            extent.phi_center,
        )?;

        Ok(DiskSectorBuild {
            sector: BoundDiskSector::new(Frame::new(anchor, *reference.rotation()), bounds),
            reference,
            local_offset: extent.local_offset,
            diagnostics: extent.diagnostics,
        })
    }
}

/// Frame at `origin` whose axes are the first element's axes, flipped to
/// face away from the disk axis and the interaction point.
fn compute_frame<D: GeomDet>(first: &D, origin: Point3) -> Result<Frame> {
    let plane = first.surface().frame();
    let position = plane.position();

    // Local x of the element becomes the sector's y, pointing outward.
    let plane_x = plane.x_axis();
    let y_axis = if position.x * plane_x.x + position.y * plane_x.y > 0.0 {
        plane_x
    } else {
        -plane_x
    };

    let plane_z = plane.z_axis();
    let z_axis = if plane_z.z * position.z > 0.0 {
        plane_z
    } else {
        -plane_z
    };

    let x_axis = y_axis.cross(&z_axis);
    Frame::from_axes(origin, x_axis, y_axis)
}

/// Wedge extrema measured in the reference frame.
struct SectorExtent {
    rmin: f64,
    rmax: f64,
    zmin: f64,
    zmax: f64,
    phi_window: f64,
    phi_center: f64,
    local_offset: Vector3,
    diagnostics: Vec<SectorDiagnostic>,
}

fn compute_bounds<D: GeomDet>(dets: &[D], reference: &Frame) -> SectorExtent {
    let mut diagnostics = Vec::new();

    let seed = dets
        .first()
        .map_or_else(Vector3::zeros, |d| reference.to_local_point(d.position()).coords);
    let (mut rmin, mut rmax) = (perp(&seed), perp(&seed));
    let (mut zmin, mut zmax) = (seed.z, seed.z);
    let (mut phimin, mut phimax) = (phi(&seed), phi(&seed));

    for det in dets {
        for corner in det.surface().corners() {
            let local = reference.to_local_point(&corner).coords;
            let r = perp(&local);
            let p = phi(&local);
            rmin = rmin.min(r);
            rmax = rmax.max(r);
            zmin = zmin.min(local.z);
            zmax = zmax.max(local.z);
            if phi_less(p, phimin) {
                phimin = p;
            }
            if phi_less(phimax, p) {
                phimax = p;
            }
        }

        // Forward elements reach their radial extremes mid-edge, not at a corner.
        // Radius about the disk axis; for endcap disks (axis along global z)
        // this is the global transverse radius of the element centre.
        let rdet = perp(&reference.to_local_point(det.position()).coords);
        let half_width = 0.5 * det.surface().bounds().width();
        rmin = rmin.min(rdet - half_width);
        rmax = rmax.max(rdet + half_width);
    }

    if !phi_less(phimin, phimax) {
        let diag = SectorDiagnostic::PhiOrdering { phimin, phimax };
        error!(target: LOG_TARGET, "disk sector builder: {diag}");
        diagnostics.push(diag);
    }

    let z_pos = 0.5 * (zmin + zmax);
    let rmed = 0.5 * (rmin + rmax);
    let mut phi_window = phimax - phimin;
    let mut phi_pos = 0.5 * (phimax + phimin);
    if phi_window < 0.0 {
        if phimin < FRAC_PI_2 || phimax > -FRAC_PI_2 {
            let diag = SectorDiagnostic::WrapAround {
                phimin,
                phimax,
                phi_window,
            };
            error!(target: LOG_TARGET, "disk sector builder: {diag}");
            diagnostics.push(diag);
        }
        phi_window += TAU;
        phi_pos += PI;
    }

    let local_offset = Vector3::new(rmed * phi_pos.cos(), rmed * phi_pos.sin(), z_pos);

    debug!(
        target: LOG_TARGET,
        ?local_offset, rmin, rmax, zmin, zmax, phi_window,
        "disk sector bounds"
    );
    debug!(
        target: LOG_TARGET,
        x = ?reference.x_axis(),
        y = ?reference.y_axis(),
        z = ?reference.z_axis(),
        "local axes in global frame"
    );

    SectorExtent {
        rmin,
        rmax,
        zmin,
        zmax,
        phi_window,
        phi_center: normalize_phi(phi_pos),
        local_offset,
        diagnostics,
    }
}
