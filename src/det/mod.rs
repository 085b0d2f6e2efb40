//! Detector elements and the capability interface shared by all of them.

pub mod dt;

use crate::geometry::BoundPlane;
use crate::math::{Point3, Rotation3};

/// Which sub-detector an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubDetector {
    /// Drift-tube muon chambers.
    Dt,
    /// Cathode strip chambers.
    Csc,
    /// Resistive plate chambers.
    Rpc,
    /// Gas electron multipliers.
    Gem,
    /// Innermost endcap muon station.
    Me0,
    /// Barrel timing layer.
    TimingBarrel,
    /// Endcap timing layer.
    TimingEndcap,
}

/// A placed detector element with a flat rectangular surface.
pub trait GeomDet {
    /// The element's surface: placement plus physical extent.
    fn surface(&self) -> &BoundPlane;

    /// Which sub-detector the element belongs to.
    fn sub_detector(&self) -> SubDetector;

    /// Global position of the element centre.
    fn position(&self) -> &Point3 {
        self.surface().position()
    }

    /// Orientation of the element.
    fn rotation(&self) -> &Rotation3 {
        self.surface().rotation()
    }
}

impl<T: GeomDet + ?Sized> GeomDet for &T {
    fn surface(&self) -> &BoundPlane {
        (**self).surface()
    }

    fn sub_detector(&self) -> SubDetector {
        (**self).sub_detector()
    }
}

/// A sensor module of the endcap timing layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MtdModule {
    id: u32,
    surface: BoundPlane,
}

impl MtdModule {
    #[must_use]
    pub fn new(id: u32, surface: BoundPlane) -> Self {
        Self { id, surface }
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl GeomDet for MtdModule {
    fn surface(&self) -> &BoundPlane {
        &self.surface
    }

    fn sub_detector(&self) -> SubDetector {
        SubDetector::TimingEndcap
    }
}
