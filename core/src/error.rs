use crate::types::EchoCategory;
use thiserror::Error;

/// Result type for echocat operations
pub type Result<T> = std::result::Result<T, EchocatError>;

/// Error types for echocat operations
///
/// These are hard failures that happen while turning a file into a
/// [`MetadataRecord`](crate::types::MetadataRecord). Once a record exists,
/// classification never fails.
#[derive(Error, Debug)]
pub enum EchocatError {
    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// Invalid tag value
    #[error("Invalid tag value: {0}")]
    InvalidValue(String),

    /// Generic extraction error
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// Helper conversions
impl From<String> for EchocatError {
    fn from(s: String) -> Self {
        EchocatError::ExtractionError(s)
    }
}

impl From<&str> for EchocatError {
    fn from(s: &str) -> Self {
        EchocatError::ExtractionError(s.to_string())
    }
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for EchocatError {
    fn from(e: dicom_object::ReadError) -> Self {
        EchocatError::DicomError(format!("{}", e))
    }
}

impl From<dicom_core::value::ConvertValueError> for EchocatError {
    fn from(e: dicom_core::value::ConvertValueError) -> Self {
        EchocatError::InvalidValue(format!("{}", e))
    }
}

/// Reason a measurement or cardiac extraction does not apply to a record
///
/// This is an expected outcome, not a failure: callers report it and move on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotApplicable {
    /// The category does not carry this kind of parameter
    #[error("not applicable to category {0}")]
    Category(EchoCategory),

    /// No ultrasound region of the required kind
    #[error("no {0} region")]
    NoMatchingRegion(&'static str),

    /// The selected region lacks a calibration field
    #[error("calibration missing: {0}")]
    CalibrationMissing(&'static str),

    /// Record has a single frame
    #[error("record is not multi-frame")]
    NotMultiFrame,

    /// Record carries no usable per-frame timing signal
    #[error("no cardiac timing signal")]
    SignalMissing,

    /// Fewer than two accepted extrema
    #[error("insufficient extrema: found {0}, need at least 2")]
    InsufficientExtrema(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_conversion() {
        let err: EchocatError = "bad record".into();
        assert!(matches!(err, EchocatError::ExtractionError(_)));
        assert_eq!(err.to_string(), "Extraction error: bad record");
    }

    #[test]
    fn test_not_applicable_messages() {
        assert_eq!(
            NotApplicable::CalibrationMissing("PhysicalDeltaY").to_string(),
            "calibration missing: PhysicalDeltaY"
        );
        assert_eq!(
            NotApplicable::InsufficientExtrema(1).to_string(),
            "insufficient extrema: found 1, need at least 2"
        );
        assert_eq!(
            NotApplicable::Category(EchoCategory::ColorMMode).to_string(),
            "not applicable to category color_m_mode"
        );
    }
}
