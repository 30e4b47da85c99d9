use crate::cardiac::{detect_for_record, AnalysisConfig, CardiacPhaseMap, PhaseDetectorConfig};
use crate::classification::{classify, ClassificationResult};
use crate::error::{NotApplicable, Result};
use crate::extraction::extract_metadata_record;
use crate::extraction::tags::PIXEL_DATA;
use crate::measurement::{extract_linear, extract_velocity, LinearParams, VelocityParams};
use crate::types::{EchoCategory, MetadataRecord};
use dicom::object::OpenFileOptions;
use dicom_object::InMemDicomObject;
use log::debug;
use std::path::{Path, PathBuf};

/// Supplier of normalized header metadata
///
/// Anything that can describe a file's headers as a [`MetadataRecord`] can be
/// analyzed; the analyzer never sees the underlying reader.
pub trait MetadataSource {
    fn metadata_record(&self) -> MetadataRecord;
}

impl MetadataSource for MetadataRecord {
    fn metadata_record(&self) -> MetadataRecord {
        self.clone()
    }
}

impl MetadataSource for InMemDicomObject {
    fn metadata_record(&self) -> MetadataRecord {
        extract_metadata_record(self)
    }
}

/// Runs the full per-file pipeline
///
/// Classification always succeeds; the measurement and cardiac steps report
/// [`NotApplicable`] when the category or metadata does not support them.
///
/// # Example
///
/// ```
/// use echocat_core::{EchoAnalyzer, EchoCategory, ImageType, MetadataRecord};
///
/// let record = MetadataRecord {
///     modality: Some("US".to_string()),
///     image_type: ImageType::from(&["ORIGINAL", "PRIMARY", "", "0001"][..]),
///     number_of_frames: Some(1),
///     ..Default::default()
/// };
///
/// let analysis = EchoAnalyzer::default().analyze(&record);
/// assert_eq!(analysis.category(), EchoCategory::SingleFrameNoDoppler);
/// assert!(analysis.velocity.is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EchoAnalyzer {
    config: AnalysisConfig,
}

impl EchoAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn phase_config(&self) -> &PhaseDetectorConfig {
        &self.config.phases
    }

    /// Classifies a record and runs the steps its category allows
    pub fn analyze(&self, record: &MetadataRecord) -> EchoAnalysis {
        let classification = classify(record);
        let category = classification.category;

        let linear = extract_linear(record, category);
        let velocity = extract_velocity(record, category);
        let phases = detect_for_record(record, category, &self.config.phases);

        for (step, outcome) in [
            ("linear", linear.as_ref().err()),
            ("velocity", velocity.as_ref().err()),
            ("phases", phases.as_ref().err()),
        ] {
            if let Some(reason) = outcome {
                debug!("{} not applicable: {}", step, reason);
            }
        }

        EchoAnalysis {
            classification,
            linear,
            velocity,
            phases,
        }
    }

    /// Analyzes anything that supplies a [`MetadataRecord`]
    pub fn analyze_source<S: MetadataSource + ?Sized>(&self, source: &S) -> EchoAnalysis {
        self.analyze(&source.metadata_record())
    }

    /// Reads the file headers and analyzes them
    pub fn analyze_file(&self, path: impl AsRef<Path>) -> Result<EchoRecord> {
        let path = path.as_ref();
        let metadata = read_metadata(path)?;
        let analysis = self.analyze(&metadata);
        Ok(EchoRecord {
            file_path: path.to_path_buf(),
            metadata,
            analysis,
        })
    }
}

/// Result of the per-file pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct EchoAnalysis {
    pub classification: ClassificationResult,
    pub linear: std::result::Result<LinearParams, NotApplicable>,
    pub velocity: std::result::Result<VelocityParams, NotApplicable>,
    pub phases: std::result::Result<CardiacPhaseMap, NotApplicable>,
}

impl EchoAnalysis {
    pub fn category(&self) -> EchoCategory {
        self.classification.category
    }
}

/// One analyzed file
#[derive(Debug, Clone)]
pub struct EchoRecord {
    pub file_path: PathBuf,
    pub metadata: MetadataRecord,
    pub analysis: EchoAnalysis,
}

impl EchoRecord {
    /// Reads and analyzes a file with the default configuration
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        EchoAnalyzer::default().analyze_file(path)
    }
}

/// Reads a file's headers into a [`MetadataRecord`]
///
/// Parsing stops before PixelData.
pub fn read_metadata(path: &Path) -> Result<MetadataRecord> {
    let dcm = OpenFileOptions::new()
        .read_until(PIXEL_DATA)
        .open_file(path)?;
    Ok(extract_metadata_record(&dcm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImageType, PhysicalScale, Region, RegionBounds, RegionKind};
    use dicom_core::{DataElement, PrimitiveValue, VR};

    fn image_type(code: &str) -> ImageType {
        ImageType::from(&["ORIGINAL", "PRIMARY", "", code][..])
    }

    #[test]
    fn test_single_frame_pipeline() {
        let record = MetadataRecord {
            modality: Some("US".to_string()),
            image_type: image_type("0001"),
            number_of_frames: Some(1),
            regions: vec![
                Region::new(RegionKind::BMode, RegionBounds::new(0, 0, 640, 480)).with_scale(
                    PhysicalScale {
                        delta_x: Some(0.058594),
                        delta_y: Some(0.058594),
                        ..Default::default()
                    },
                ),
            ],
            ..Default::default()
        };

        let analysis = EchoAnalyzer::default().analyze(&record);
        assert_eq!(analysis.category(), EchoCategory::SingleFrameNoDoppler);
        assert_eq!(analysis.linear.as_ref().unwrap().scale_x, 0.058594);
        assert_eq!(
            analysis.velocity,
            Err(NotApplicable::Category(EchoCategory::SingleFrameNoDoppler))
        );
        assert_eq!(analysis.phases, Err(NotApplicable::NotMultiFrame));
    }

    #[test]
    fn test_pw_pipeline() {
        let record = MetadataRecord {
            image_type: image_type("0008"),
            number_of_frames: Some(1),
            regions: vec![
                Region::new(RegionKind::BMode, RegionBounds::new(0, 0, 800, 290)),
                Region::new(
                    RegionKind::PwSpectralDoppler,
                    RegionBounds::new(0, 300, 800, 600),
                )
                .with_scale(PhysicalScale {
                    reference_pixel_y: Some(90),
                    reference_physical_y: Some(0.0),
                    delta_y: Some(-0.351),
                    ..Default::default()
                }),
            ],
            ..Default::default()
        };

        let analysis = EchoAnalyzer::default().analyze(&record);
        assert_eq!(analysis.category(), EchoCategory::PwDoppler);
        let velocity = analysis.velocity.unwrap();
        assert_eq!(velocity.region_index, 1);
        assert!((velocity.velocity_at(200) - -38.61).abs() < 1e-9);
        assert!(analysis.linear.is_err());
    }

    #[test]
    fn test_dicom_source() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            crate::extraction::IMAGE_TYPE,
            VR::CS,
            PrimitiveValue::Strs(
                vec![
                    "ORIGINAL".to_string(),
                    "PRIMARY".to_string(),
                    "".to_string(),
                    "0020".to_string(),
                ]
                .into(),
            ),
        ));

        let analyzer = EchoAnalyzer::default();
        let analysis = analyzer.analyze_source(&dcm);
        assert_eq!(analysis.category(), EchoCategory::ColorMMode);

        let record = dcm.metadata_record();
        assert_eq!(analyzer.analyze_source(&record), analysis);
    }

    #[test]
    fn test_unreadable_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.dcm");
        std::fs::write(&path, b"not a dicom file").unwrap();
        assert!(EchoRecord::from_file(&path).is_err());
        assert!(EchoRecord::from_file(dir.path().join("missing.dcm")).is_err());
    }
}
