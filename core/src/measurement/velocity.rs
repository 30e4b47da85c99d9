use super::require;
use crate::error::NotApplicable;
use crate::types::{EchoCategory, MetadataRecord, PhysicalUnits};
use log::debug;

/// Time calibration along the x axis of a spectral region
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct TimeAxis {
    pub ref_pixel_x: i32,
    pub ref_time: f64,
    /// Time per pixel column
    pub delta_x: f64,
    pub units: PhysicalUnits,
}

impl TimeAxis {
    /// Time at pixel column `x`
    pub fn time_at(&self, x: i32) -> f64 {
        self.ref_time + (f64::from(x) - f64::from(self.ref_pixel_x)) * self.delta_x
    }

    /// Pixel column (fractional) at time `t`; `None` for a zero delta
    pub fn pixel_for_time(&self, t: f64) -> Option<f64> {
        (self.delta_x != 0.0).then(|| self.ref_pixel_x as f64 + (t - self.ref_time) / self.delta_x)
    }
}

/// Velocity calibration of a spectral Doppler region
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct VelocityParams {
    pub region_index: usize,
    /// Pixel row of the velocity baseline
    pub ref_pixel_y: i32,
    /// Velocity at `ref_pixel_y`
    pub ref_velocity: f64,
    /// Velocity per pixel row
    pub delta_y: f64,
    pub units: PhysicalUnits,
    pub time: Option<TimeAxis>,
}

impl VelocityParams {
    pub fn new(ref_pixel_y: i32, ref_velocity: f64, delta_y: f64) -> Self {
        Self {
            region_index: 0,
            ref_pixel_y,
            ref_velocity,
            delta_y,
            units: PhysicalUnits::CentimeterPerSecond,
            time: None,
        }
    }

    /// Velocity at pixel row `y`
    ///
    /// ```
    /// use echocat_core::measurement::VelocityParams;
    ///
    /// let params = VelocityParams::new(90, 0.0, -0.351);
    /// assert!((params.velocity_at(200) - -38.61).abs() < 1e-9);
    /// ```
    pub fn velocity_at(&self, y: i32) -> f64 {
        self.ref_velocity + (f64::from(y) - f64::from(self.ref_pixel_y)) * self.delta_y
    }

    /// Pixel row (fractional) showing velocity `v`; `None` for a zero delta
    pub fn pixel_for_velocity(&self, v: f64) -> Option<f64> {
        (self.delta_y != 0.0).then(|| self.ref_pixel_y as f64 + (v - self.ref_velocity) / self.delta_y)
    }

    /// Time at pixel column `x`, when the region has a time axis
    pub fn time_at(&self, x: i32) -> Option<f64> {
        self.time.map(|axis| axis.time_at(x))
    }

    /// Largest absolute velocity along a traced `(x, y)` pixel path
    pub fn peak_velocity(&self, trace: &[(i32, i32)]) -> Option<f64> {
        trace
            .iter()
            .map(|&(_, y)| self.velocity_at(y).abs())
            .reduce(f64::max)
    }

    /// Calculation formula for reports
    pub fn formula(&self) -> String {
        format!(
            "velocity = {} + (pixel_y - {}) × {} {}",
            self.ref_velocity, self.ref_pixel_y, self.delta_y, self.units
        )
    }
}

/// Extracts velocity calibration from the spectral Doppler region
///
/// Applies to CW, PW and tissue Doppler categories. The time axis is attached
/// when the region also calibrates x.
pub fn extract_velocity(
    record: &MetadataRecord,
    category: EchoCategory,
) -> Result<VelocityParams, NotApplicable> {
    if !category.supports_velocity_measurement() {
        return Err(NotApplicable::Category(category));
    }

    let (region_index, region) = record
        .regions
        .iter()
        .enumerate()
        .find(|(_, r)| r.kind.is_spectral())
        .ok_or(NotApplicable::NoMatchingRegion("spectral doppler"))?;

    let scale = &region.scale;
    let ref_pixel_y = require(scale.reference_pixel_y, "ReferencePixelY0")?;
    let ref_velocity = require(scale.reference_physical_y, "ReferencePixelPhysicalValueY")?;
    let delta_y = require(scale.delta_y, "PhysicalDeltaY")?;

    let time = match (scale.reference_pixel_x, scale.reference_physical_x, scale.delta_x) {
        (Some(ref_pixel_x), Some(ref_time), Some(delta_x)) => Some(TimeAxis {
            ref_pixel_x,
            ref_time,
            delta_x,
            units: scale.units_x.unwrap_or(PhysicalUnits::Seconds),
        }),
        _ => None,
    };

    let params = VelocityParams {
        region_index,
        ref_pixel_y,
        ref_velocity,
        delta_y,
        units: scale.units_y.unwrap_or(PhysicalUnits::CentimeterPerSecond),
        time,
    };
    debug!("velocity scale from region {}: {}", region_index, params.formula());

    Ok(params)
}
