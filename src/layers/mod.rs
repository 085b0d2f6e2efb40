//! Composite detector layers built from groups of elements.

mod disk_sector_builder;

pub use disk_sector_builder::{DiskSectorBuild, DiskSectorBuilder, SectorDiagnostic};
