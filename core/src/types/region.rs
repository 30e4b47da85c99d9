use std::fmt;

/// Semantic kind of an ultrasound region
///
/// Mapped from the DICOM RegionDataType code through [`REGION_KIND_TABLE`].
/// Codes missing from the table map to [`RegionKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "snake_case"))]
pub enum RegionKind {
    /// Tissue (grayscale B-mode) image
    BMode,
    /// Color flow image
    ColorDoppler,
    /// Pulsed-wave spectral Doppler trace
    PwSpectralDoppler,
    /// Continuous-wave spectral Doppler trace
    CwSpectralDoppler,
    Other,
}

/// RegionDataType code to kind lookup
pub const REGION_KIND_TABLE: [(i32, RegionKind); 4] = [
    (0x0001, RegionKind::BMode),
    (0x0002, RegionKind::ColorDoppler),
    (0x0003, RegionKind::PwSpectralDoppler),
    (0x0004, RegionKind::CwSpectralDoppler),
];

impl RegionKind {
    /// Maps a RegionDataType code to a kind
    pub fn from_code(code: i32) -> Self {
        REGION_KIND_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, kind)| *kind)
            .unwrap_or(RegionKind::Other)
    }

    /// Spectral regions carry velocity on the y axis and time on the x axis
    pub fn is_spectral(&self) -> bool {
        matches!(
            self,
            RegionKind::PwSpectralDoppler | RegionKind::CwSpectralDoppler
        )
    }

    pub fn simple_name(&self) -> &'static str {
        match self {
            RegionKind::BMode => "b-mode",
            RegionKind::ColorDoppler => "color doppler",
            RegionKind::PwSpectralDoppler => "pw spectral",
            RegionKind::CwSpectralDoppler => "cw spectral",
            RegionKind::Other => "other",
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// DICOM physical units code (PhysicalUnitsXDirection / YDirection)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "snake_case"))]
pub enum PhysicalUnits {
    None,
    Percent,
    Decibel,
    Centimeter,
    Seconds,
    Hertz,
    DecibelPerSecond,
    CentimeterPerSecond,
    SquareCentimeter,
    SquareCentimeterPerSecond,
    CubicCentimeter,
    CubicCentimeterPerSecond,
    Degrees,
    Unknown(i32),
}

const PHYSICAL_UNITS_TABLE: [PhysicalUnits; 13] = [
    PhysicalUnits::None,
    PhysicalUnits::Percent,
    PhysicalUnits::Decibel,
    PhysicalUnits::Centimeter,
    PhysicalUnits::Seconds,
    PhysicalUnits::Hertz,
    PhysicalUnits::DecibelPerSecond,
    PhysicalUnits::CentimeterPerSecond,
    PhysicalUnits::SquareCentimeter,
    PhysicalUnits::SquareCentimeterPerSecond,
    PhysicalUnits::CubicCentimeter,
    PhysicalUnits::CubicCentimeterPerSecond,
    PhysicalUnits::Degrees,
];

impl PhysicalUnits {
    pub fn from_code(code: i32) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|idx| PHYSICAL_UNITS_TABLE.get(idx).copied())
            .unwrap_or(PhysicalUnits::Unknown(code))
    }

    /// Short unit label used in scale strings
    pub fn abbreviation(&self) -> &'static str {
        match self {
            PhysicalUnits::None => "units",
            PhysicalUnits::Percent => "%",
            PhysicalUnits::Decibel => "dB",
            PhysicalUnits::Centimeter => "cm",
            PhysicalUnits::Seconds => "s",
            PhysicalUnits::Hertz => "Hz",
            PhysicalUnits::DecibelPerSecond => "dB/s",
            PhysicalUnits::CentimeterPerSecond => "cm/s",
            PhysicalUnits::SquareCentimeter => "cm²",
            PhysicalUnits::SquareCentimeterPerSecond => "cm²/s",
            PhysicalUnits::CubicCentimeter => "cm³",
            PhysicalUnits::CubicCentimeterPerSecond => "cm³/s",
            PhysicalUnits::Degrees => "deg",
            PhysicalUnits::Unknown(_) => "units",
        }
    }
}

impl fmt::Display for PhysicalUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Pixel rectangle of a region, inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl RegionBounds {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Columns covered, both edges included
    pub fn width(&self) -> i64 {
        i64::from(self.max_x) - i64::from(self.min_x) + 1
    }

    /// Rows covered, both edges included
    pub fn height(&self) -> i64 {
        i64::from(self.max_y) - i64::from(self.min_y) + 1
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (f64::from(self.min_x) + f64::from(self.max_x)) / 2.0,
            (f64::from(self.min_y) + f64::from(self.max_y)) / 2.0,
        )
    }

    /// Rows shared with `other`; zero or negative when disjoint
    pub fn y_overlap(&self, other: &RegionBounds) -> i64 {
        shared(
            (self.min_y, self.max_y),
            (other.min_y, other.max_y),
        )
    }

    /// Columns shared with `other`; zero or negative when disjoint
    pub fn x_overlap(&self, other: &RegionBounds) -> i64 {
        shared(
            (self.min_x, self.max_x),
            (other.min_x, other.max_x),
        )
    }
}

/// Length of the intersection of two inclusive intervals
fn shared(a: (i32, i32), b: (i32, i32)) -> i64 {
    i64::from(a.1.min(b.1)) - i64::from(a.0.max(b.0)) + 1
}

impl fmt::Display for RegionBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// Calibration block of a region
///
/// Every field is optional in the header, so each is kept optional here;
/// extractors decide which subset they need.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicalScale {
    pub reference_pixel_x: Option<i32>,
    pub reference_pixel_y: Option<i32>,
    pub reference_physical_x: Option<f64>,
    pub reference_physical_y: Option<f64>,
    pub delta_x: Option<f64>,
    pub delta_y: Option<f64>,
    pub units_x: Option<PhysicalUnits>,
    pub units_y: Option<PhysicalUnits>,
}

impl PhysicalScale {
    pub fn is_empty(&self) -> bool {
        *self == PhysicalScale::default()
    }
}

/// One acquisition sub-image from SequenceOfUltrasoundRegions
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Region {
    pub kind: RegionKind,
    /// Raw RegionDataType code
    pub data_type: Option<i32>,
    /// Raw RegionSpatialFormat code
    pub spatial_format: Option<i32>,
    /// Raw RegionFlags bit field
    pub flags: Option<i32>,
    pub bounds: RegionBounds,
    pub scale: PhysicalScale,
}

impl Region {
    /// Creates an uncalibrated region
    pub fn new(kind: RegionKind, bounds: RegionBounds) -> Self {
        Self {
            kind,
            data_type: None,
            spatial_format: None,
            flags: None,
            bounds,
            scale: PhysicalScale::default(),
        }
    }

    pub fn with_scale(mut self, scale: PhysicalScale) -> Self {
        self.scale = scale;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_kind_lookup() {
        assert_eq!(RegionKind::from_code(1), RegionKind::BMode);
        assert_eq!(RegionKind::from_code(2), RegionKind::ColorDoppler);
        assert_eq!(RegionKind::from_code(3), RegionKind::PwSpectralDoppler);
        assert_eq!(RegionKind::from_code(4), RegionKind::CwSpectralDoppler);
        assert_eq!(RegionKind::from_code(0), RegionKind::Other);
        assert_eq!(RegionKind::from_code(0x0E), RegionKind::Other);
        assert_eq!(RegionKind::from_code(-1), RegionKind::Other);
    }

    #[test]
    fn test_physical_units_lookup() {
        assert_eq!(PhysicalUnits::from_code(3), PhysicalUnits::Centimeter);
        assert_eq!(PhysicalUnits::from_code(4), PhysicalUnits::Seconds);
        assert_eq!(PhysicalUnits::from_code(7), PhysicalUnits::CentimeterPerSecond);
        assert_eq!(PhysicalUnits::from_code(42), PhysicalUnits::Unknown(42));
        assert_eq!(PhysicalUnits::from_code(-3), PhysicalUnits::Unknown(-3));
        assert_eq!(PhysicalUnits::CentimeterPerSecond.abbreviation(), "cm/s");
    }

    #[test]
    fn test_bounds_geometry() {
        let b = RegionBounds::new(0, 50, 456, 686);
        assert_eq!(b.width(), 457);
        assert_eq!(b.height(), 637);
        assert_eq!(b.center(), (228.0, 368.0));

        let c = RegionBounds::new(497, 50, 954, 686);
        assert_eq!(b.y_overlap(&c), 637);
        assert!(b.x_overlap(&c) < 0);
    }

    #[test]
    fn test_single_shared_row_overlaps() {
        let top = RegionBounds::new(0, 0, 400, 300);
        let bottom = RegionBounds::new(0, 300, 400, 600);
        assert_eq!(top.y_overlap(&bottom), 1);
        assert_eq!(bottom.y_overlap(&top), 1);

        let below = RegionBounds::new(0, 301, 400, 600);
        assert_eq!(top.y_overlap(&below), 0);
    }

    #[test]
    fn test_bounds_near_i32_max() {
        let b = RegionBounds::new(1_200_000_010, 1_100_000_000, 2_000_000_000, 2_000_000_000);
        assert_eq!(b.center(), (1_600_000_005.0, 1_550_000_000.0));
        assert_eq!(b.width(), 799_999_991);

        let full = RegionBounds::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(full.width(), 1 << 32);
        assert_eq!(full.center(), (-0.5, -0.5));
        assert_eq!(full.x_overlap(&full), 1 << 32);
    }

    #[test]
    fn test_empty_scale() {
        assert!(PhysicalScale::default().is_empty());
        let scale = PhysicalScale {
            delta_x: Some(0.05),
            ..Default::default()
        };
        assert!(!scale.is_empty());
    }
}
