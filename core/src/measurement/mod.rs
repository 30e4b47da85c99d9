//! Calibration parameters for measurements on classified images
//!
//! - [`extract_linear`]: distance calibration for single-frame 2D images
//! - [`extract_velocity`]: velocity/time calibration for spectral Doppler
//!
//! Both select the region by kind rather than position, and report a missing
//! calibration field as [`NotApplicable`] instead of assuming a scale.

mod linear;
mod velocity;

pub use linear::{extract_linear, LinearParams};
pub use velocity::{extract_velocity, TimeAxis, VelocityParams};

use crate::error::NotApplicable;

/// Returns the value or the named missing field
pub(crate) fn require<T>(value: Option<T>, field: &'static str) -> Result<T, NotApplicable> {
    value.ok_or(NotApplicable::CalibrationMissing(field))
}
