use crate::api::{EchoAnalysis, EchoRecord};
use crate::classification::ClassificationResult;
use crate::error::NotApplicable;
use crate::types::MetadataRecord;
use serde::Serialize;

/// Either a value or the reason it does not apply
#[derive(Serialize)]
pub struct Outcome<'a, T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_applicable: Option<String>,
}

impl<'a, T> From<&'a Result<T, NotApplicable>> for Outcome<'a, T> {
    fn from(result: &'a Result<T, NotApplicable>) -> Self {
        match result {
            Ok(value) => Self {
                value: Some(value),
                not_applicable: None,
            },
            Err(reason) => Self {
                value: None,
                not_applicable: Some(reason.to_string()),
            },
        }
    }
}

#[derive(Serialize)]
pub struct AnalysisJson<'a> {
    pub classification: &'a ClassificationResult,
    pub linear: Outcome<'a, crate::LinearParams>,
    pub velocity: Outcome<'a, crate::VelocityParams>,
    pub phases: Outcome<'a, crate::CardiacPhaseMap>,
}

impl<'a> From<&'a EchoAnalysis> for AnalysisJson<'a> {
    fn from(analysis: &'a EchoAnalysis) -> Self {
        Self {
            classification: &analysis.classification,
            linear: (&analysis.linear).into(),
            velocity: (&analysis.velocity).into(),
            phases: (&analysis.phases).into(),
        }
    }
}

#[derive(Serialize)]
pub struct RecordJson<'a> {
    pub file_path: String,
    pub metadata: &'a MetadataRecord,
    pub analysis: AnalysisJson<'a>,
}

impl<'a> From<&'a EchoRecord> for RecordJson<'a> {
    fn from(record: &'a EchoRecord) -> Self {
        Self {
            file_path: record.file_path.display().to_string(),
            metadata: &record.metadata,
            analysis: (&record.analysis).into(),
        }
    }
}

/// Pretty JSON for one analyzed file
pub fn record_to_json(record: &EchoRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&RecordJson::from(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EchoAnalyzer;
    use crate::types::ImageType;
    use std::path::PathBuf;

    #[test]
    fn test_record_json() {
        let metadata = MetadataRecord {
            modality: Some("US".to_string()),
            image_type: ImageType::from(&["ORIGINAL", "PRIMARY", "", "0001"][..]),
            number_of_frames: Some(1),
            ..Default::default()
        };
        let record = EchoRecord {
            file_path: PathBuf::from("study/a.dcm"),
            analysis: EchoAnalyzer::default().analyze(&metadata),
            metadata,
        };

        let json: serde_json::Value =
            serde_json::from_str(&record_to_json(&record).unwrap()).unwrap();
        assert_eq!(json["file_path"], "study/a.dcm");
        assert_eq!(
            json["analysis"]["classification"]["category"],
            "2d_single_no_doppler"
        );
        assert_eq!(
            json["analysis"]["linear"]["not_applicable"],
            "no b-mode region"
        );
        assert!(json["analysis"]["linear"].get("value").is_none());
        assert_eq!(
            json["analysis"]["phases"]["not_applicable"],
            "record is not multi-frame"
        );
    }
}
