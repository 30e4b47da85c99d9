use std::fmt;

/// Echocardiography display category
///
/// Exactly one category is assigned to every classified record. The variant
/// order here follows the historical category numbering, not the priority in
/// which the classifier tests them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "snake_case"))]
pub enum EchoCategory {
    /// Cine loop with color flow overlay (vendor code 0011)
    MultiFrameWithDoppler,
    /// Cine loop without color flow (vendor code 0001)
    MultiFrameNoDoppler,
    /// Still 2D image without color flow (vendor code 0001)
    #[cfg_attr(feature = "json", serde(rename = "2d_single_no_doppler"))]
    SingleFrameNoDoppler,
    /// Still 2D image with color flow (vendor code 0011)
    #[cfg_attr(feature = "json", serde(rename = "2d_single_with_doppler"))]
    SingleFrameWithDoppler,
    /// Continuous-wave spectral Doppler
    CwDoppler,
    /// Pulsed-wave spectral Doppler
    PwDoppler,
    /// Color M-mode
    ColorMMode,
    /// Tissue Doppler imaging
    TissueDoppler,
    /// B-mode and color Doppler regions laid out next to each other
    SideBySideDoppler,
    /// Marked invalid by the vendor
    Excluded,
}

impl EchoCategory {
    /// All categories in numbering order
    pub const ALL: [EchoCategory; 10] = [
        EchoCategory::MultiFrameWithDoppler,
        EchoCategory::MultiFrameNoDoppler,
        EchoCategory::SingleFrameNoDoppler,
        EchoCategory::SingleFrameWithDoppler,
        EchoCategory::CwDoppler,
        EchoCategory::PwDoppler,
        EchoCategory::ColorMMode,
        EchoCategory::TissueDoppler,
        EchoCategory::SideBySideDoppler,
        EchoCategory::Excluded,
    ];

    /// Returns the stable key used in reports
    pub fn simple_name(&self) -> &'static str {
        match self {
            EchoCategory::MultiFrameWithDoppler => "multi_frame_with_doppler",
            EchoCategory::MultiFrameNoDoppler => "multi_frame_no_doppler",
            EchoCategory::SingleFrameNoDoppler => "2d_single_no_doppler",
            EchoCategory::SingleFrameWithDoppler => "2d_single_with_doppler",
            EchoCategory::CwDoppler => "cw_doppler",
            EchoCategory::PwDoppler => "pw_doppler",
            EchoCategory::ColorMMode => "color_m_mode",
            EchoCategory::TissueDoppler => "tissue_doppler",
            EchoCategory::SideBySideDoppler => "side_by_side_doppler",
            EchoCategory::Excluded => "excluded",
        }
    }

    /// Returns a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            EchoCategory::MultiFrameWithDoppler => "Multi-frame with Color Doppler (0011)",
            EchoCategory::MultiFrameNoDoppler => "Multi-frame without Color Doppler (0001)",
            EchoCategory::SingleFrameNoDoppler => "2D Single-frame without Color Doppler (0001)",
            EchoCategory::SingleFrameWithDoppler => "2D Single-frame with Color Doppler (0011)",
            EchoCategory::CwDoppler => "CW Doppler (0002,0004,0005,0015)",
            EchoCategory::PwDoppler => "PW Doppler (0008,0009)",
            EchoCategory::ColorMMode => "Color M-Mode (0020)",
            EchoCategory::TissueDoppler => "Tissue Doppler (0019,0003)",
            EchoCategory::SideBySideDoppler => "Side-by-side B-mode + Color Doppler",
            EchoCategory::Excluded => "Excluded (ImageType[10]==I1 or ImageType[2]==INVALID)",
        }
    }

    /// Categories produced by the frame-count split
    pub fn is_frame_based(&self) -> bool {
        matches!(
            self,
            EchoCategory::MultiFrameWithDoppler
                | EchoCategory::MultiFrameNoDoppler
                | EchoCategory::SingleFrameNoDoppler
                | EchoCategory::SingleFrameWithDoppler
        )
    }

    /// Whether the category implies a color flow overlay
    ///
    /// `None` for categories where color state is not part of the label.
    pub fn implied_color(&self) -> Option<bool> {
        match self {
            EchoCategory::MultiFrameWithDoppler | EchoCategory::SingleFrameWithDoppler => Some(true),
            EchoCategory::MultiFrameNoDoppler | EchoCategory::SingleFrameNoDoppler => Some(false),
            _ => None,
        }
    }

    /// Single-frame anatomical images that carry distance calibration
    pub fn supports_linear_measurement(&self) -> bool {
        matches!(self, EchoCategory::SingleFrameNoDoppler)
    }

    /// Spectral categories that carry velocity calibration
    pub fn supports_velocity_measurement(&self) -> bool {
        matches!(
            self,
            EchoCategory::CwDoppler | EchoCategory::PwDoppler | EchoCategory::TissueDoppler
        )
    }

    /// Parses a category from its report key
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        Self::ALL.iter().copied().find(|c| c.simple_name() == key)
    }
}

impl fmt::Display for EchoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}
