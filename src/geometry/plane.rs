use crate::error::{GeometryError, Result};
use crate::math::{Point3, Rotation3};

use super::Frame;

/// Physical extent of a flat rectangular detector element.
///
/// `width` runs along the local x axis, `length` along local y and
/// `thickness` along the normal (local z). All values are full extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangularBounds {
    width: f64,
    length: f64,
    thickness: f64,
}

impl RectangularBounds {
    /// Creates new rectangular bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if any extent is negative or not finite.
    pub fn new(width: f64, length: f64, thickness: f64) -> Result<Self> {
        for (parameter, value) in [("width", width), ("length", length), ("thickness", thickness)] {
            if !value.is_finite() || value < 0.0 {
                return Err(GeometryError::ParameterOutOfRange {
                    parameter,
                    value,
                    min: 0.0,
                    max: f64::INFINITY,
                }
                .into());
            }
        }
        Ok(Self {
            width,
            length,
            thickness,
        })
    }

    /// Full extent along local x.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Full extent along local y.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Full extent along local z.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }
}

/// A finite plane: a placed frame carrying rectangular bounds.
///
/// This is the surface of every flat detector element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundPlane {
    frame: Frame,
    bounds: RectangularBounds,
}

impl BoundPlane {
    /// Creates a bound plane.
    #[must_use]
    pub fn new(frame: Frame, bounds: RectangularBounds) -> Self {
        Self { frame, bounds }
    }

    /// Returns the placement of the plane.
    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Returns the rectangular extent.
    #[must_use]
    pub fn bounds(&self) -> &RectangularBounds {
        &self.bounds
    }

    /// Returns the global position of the plane centre.
    #[must_use]
    pub fn position(&self) -> &Point3 {
        self.frame.position()
    }

    /// Returns the orientation of the plane.
    #[must_use]
    pub fn rotation(&self) -> &Rotation3 {
        self.frame.rotation()
    }

    /// The four corners of the rectangle in global coordinates.
    ///
    /// Corners lie in the mid-plane (local z = 0), ordered counter-clockwise
    /// starting at local `(-w/2, -l/2)`.
    #[must_use]
    pub fn corners(&self) -> [Point3; 4] {
        let hw = self.bounds.width * 0.5;
        let hl = self.bounds.length * 0.5;
        [(-hw, -hl), (hw, -hl), (hw, hl), (-hw, hl)]
            .map(|(x, y)| self.frame.to_global_point(&Point3::new(x, y, 0.0)))
    }
}
