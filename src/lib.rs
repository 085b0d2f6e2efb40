pub mod calibration;
pub mod det;
pub mod error;
pub mod geometry;
pub mod layers;
pub mod math;

pub use error::{DetGeomError, Result};
