use super::require;
use crate::error::NotApplicable;
use crate::types::{EchoCategory, MetadataRecord, PhysicalUnits, RegionBounds, RegionKind};
use log::debug;

/// Distance calibration of an anatomical region
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct LinearParams {
    /// Position of the region in SequenceOfUltrasoundRegions
    pub region_index: usize,
    /// Physical units per pixel along x
    pub scale_x: f64,
    /// Physical units per pixel along y
    pub scale_y: f64,
    pub units_x: PhysicalUnits,
    pub units_y: PhysicalUnits,
    pub reference_pixel: Option<(i32, i32)>,
    pub bounds: RegionBounds,
}

impl LinearParams {
    pub fn new(scale_x: f64, scale_y: f64) -> Self {
        Self {
            region_index: 0,
            scale_x,
            scale_y,
            units_x: PhysicalUnits::Centimeter,
            units_y: PhysicalUnits::Centimeter,
            reference_pixel: None,
            bounds: RegionBounds::default(),
        }
    }

    /// Physical distance between two pixel coordinates
    ///
    /// ```
    /// use echocat_core::measurement::LinearParams;
    ///
    /// let params = LinearParams::new(0.058594, 0.058594);
    /// let d = params.distance((100, 200), (250, 350));
    /// assert!((d - 12.4297).abs() < 1e-3);
    /// ```
    pub fn distance(&self, p1: (i32, i32), p2: (i32, i32)) -> f64 {
        let dx = (f64::from(p2.0) - f64::from(p1.0)) * self.scale_x;
        let dy = (f64::from(p2.1) - f64::from(p1.1)) * self.scale_y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Scale along x, e.g. "0.058594 cm/pixel"
    pub fn scale_string_x(&self) -> String {
        format!("{:.6} {}/pixel", self.scale_x, self.units_x)
    }

    /// Scale along y, e.g. "0.058594 cm/pixel"
    pub fn scale_string_y(&self) -> String {
        format!("{:.6} {}/pixel", self.scale_y, self.units_y)
    }
}

/// Extracts distance calibration from the B-mode region
///
/// Only single-frame 2D images without color flow qualify.
pub fn extract_linear(
    record: &MetadataRecord,
    category: EchoCategory,
) -> Result<LinearParams, NotApplicable> {
    if !category.supports_linear_measurement() {
        return Err(NotApplicable::Category(category));
    }

    let (region_index, region) = record
        .regions
        .iter()
        .enumerate()
        .find(|(_, r)| r.kind == RegionKind::BMode)
        .ok_or(NotApplicable::NoMatchingRegion("b-mode"))?;

    let scale = &region.scale;
    let scale_x = require(scale.delta_x, "PhysicalDeltaX")?;
    let scale_y = require(scale.delta_y, "PhysicalDeltaY")?;

    let reference_pixel = match (scale.reference_pixel_x, scale.reference_pixel_y) {
        (Some(x), Some(y)) => Some((x, y)),
        _ => None,
    };

    debug!(
        "linear scale from region {}: {} x {}",
        region_index, scale_x, scale_y
    );

    Ok(LinearParams {
        region_index,
        scale_x,
        scale_y,
        units_x: scale.units_x.unwrap_or(PhysicalUnits::Centimeter),
        units_y: scale.units_y.unwrap_or(PhysicalUnits::Centimeter),
        reference_pixel,
        bounds: region.bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PhysicalScale, Region};

    fn calibrated_bmode(delta: f64) -> Region {
        Region::new(RegionKind::BMode, RegionBounds::new(0, 0, 640, 480)).with_scale(
            PhysicalScale {
                reference_pixel_x: Some(320),
                reference_pixel_y: Some(0),
                delta_x: Some(delta),
                delta_y: Some(delta),
                units_x: Some(PhysicalUnits::Centimeter),
                units_y: Some(PhysicalUnits::Centimeter),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_distance_example() {
        let params = LinearParams::new(0.058594, 0.058594);
        // 150 px on both axes: 0.058594 * 150 * sqrt(2)
        let d = params.distance((100, 200), (250, 350));
        assert!((d - 0.058594 * 150.0 * std::f64::consts::SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let params = LinearParams::new(0.03, 0.045);
        let pairs = [((0, 0), (10, 20)), ((-5, 7), (30, -2)), ((100, 200), (250, 350))];
        for (a, b) in pairs {
            assert_eq!(params.distance(a, b), params.distance(b, a));
        }
        assert_eq!(params.distance((4, 4), (4, 4)), 0.0);
    }

    #[test]
    fn test_distance_across_full_i32_range() {
        let params = LinearParams::new(1.0, 1.0);
        let d = params.distance((i32::MIN, 0), (i32::MAX, 0));
        assert_eq!(d, 4_294_967_295.0);
    }

    #[test]
    fn test_anisotropic_scale() {
        let params = LinearParams::new(0.1, 0.2);
        assert!((params.distance((0, 0), (30, 0)) - 3.0).abs() < 1e-9);
        assert!((params.distance((0, 0), (0, 30)) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_extract_selects_bmode_region() {
        let record = MetadataRecord {
            regions: vec![
                Region::new(RegionKind::Other, RegionBounds::new(0, 500, 640, 560)),
                calibrated_bmode(0.04),
            ],
            ..Default::default()
        };
        let params = extract_linear(&record, EchoCategory::SingleFrameNoDoppler).unwrap();
        assert_eq!(params.region_index, 1);
        assert_eq!(params.scale_x, 0.04);
        assert_eq!(params.reference_pixel, Some((320, 0)));
        assert_eq!(params.scale_string_x(), "0.040000 cm/pixel");
    }

    #[test]
    fn test_wrong_category() {
        let record = MetadataRecord {
            regions: vec![calibrated_bmode(0.04)],
            ..Default::default()
        };
        assert_eq!(
            extract_linear(&record, EchoCategory::MultiFrameNoDoppler),
            Err(NotApplicable::Category(EchoCategory::MultiFrameNoDoppler))
        );
    }

    #[test]
    fn test_missing_calibration_is_not_defaulted() {
        let record = MetadataRecord {
            regions: vec![Region::new(
                RegionKind::BMode,
                RegionBounds::new(0, 0, 640, 480),
            )],
            ..Default::default()
        };
        assert_eq!(
            extract_linear(&record, EchoCategory::SingleFrameNoDoppler),
            Err(NotApplicable::CalibrationMissing("PhysicalDeltaX"))
        );

        let empty = MetadataRecord::default();
        assert_eq!(
            extract_linear(&empty, EchoCategory::SingleFrameNoDoppler),
            Err(NotApplicable::NoMatchingRegion("b-mode"))
        );
    }
}
