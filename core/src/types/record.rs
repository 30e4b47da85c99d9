use super::{ImageType, Region};

/// Cine timing information used to derive a per-frame cardiac signal
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct CardiacTiming {
    /// R wave times in ms from the start of the cine loop
    pub r_wave_times: Vec<f64>,
    /// Nominal time per frame in ms
    pub frame_time: Option<f64>,
    pub heart_rate: Option<i32>,
    pub cine_rate: Option<i32>,
}

impl CardiacTiming {
    /// Mean RR interval in ms, if at least two R waves are present
    pub fn mean_rr_interval(&self) -> Option<f64> {
        if self.r_wave_times.len() < 2 {
            return None;
        }
        let first = self.r_wave_times.first()?;
        let last = self.r_wave_times.last()?;
        Some((last - first) / (self.r_wave_times.len() - 1) as f64)
    }

    /// Heart rate derived from the mean RR interval
    pub fn derived_heart_rate(&self) -> Option<f64> {
        self.mean_rr_interval()
            .filter(|rr| *rr > 0.0)
            .map(|rr| 60_000.0 / rr)
    }
}

/// Normalized header view of one ultrasound file
///
/// Built by an external header reader (see [`MetadataSource`](crate::MetadataSource));
/// nothing in the classifier looks at pixel data.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct MetadataRecord {
    pub modality: Option<String>,
    pub image_type: ImageType,
    pub number_of_frames: Option<i32>,
    /// UltrasoundColorDataPresent, when the header carries it
    pub color_data_present: Option<bool>,
    pub regions: Vec<Region>,

    // Fallback evidence only
    pub has_graphic_annotation: bool,
    pub has_text_object: bool,
    pub has_overlay: bool,

    pub series_description: Option<String>,
    pub study_description: Option<String>,
    pub manufacturer: Option<String>,

    pub cardiac_timing: Option<CardiacTiming>,
}

impl MetadataRecord {
    /// Cine loops have more than one frame; absent counts as single
    pub fn is_multi_frame(&self) -> bool {
        self.number_of_frames.is_some_and(|n| n > 1)
    }

    /// Whether any annotation or measurement marker is present
    pub fn has_annotations(&self) -> bool {
        let description_hint = self.series_description.as_deref().is_some_and(|desc| {
            let desc = desc.to_uppercase();
            ["MEASUREMENT", "CALIBRATION", "REPORT"]
                .iter()
                .any(|hint| desc.contains(hint))
        });

        self.has_graphic_annotation
            || self.has_text_object
            || self.has_overlay
            || self.image_type.contains("ANNOTATION")
            || description_hint
    }

    /// Whether the study description names an echo exam
    pub fn is_echo_study(&self) -> bool {
        self.study_description
            .as_deref()
            .is_some_and(|desc| desc.to_uppercase().contains("ECHO"))
    }
}
