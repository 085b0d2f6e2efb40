mod disk_sector;
mod frame;
mod plane;

pub use disk_sector::{BoundDiskSector, DiskSectorBounds};
pub use frame::Frame;
pub use plane::{BoundPlane, RectangularBounds};
