//! Header-only echocardiography classification
//!
//! [`classify`] runs the ordered [`rules::RULES`] through a first-match driver,
//! falls back to a low-confidence frame-based category when nothing fires, and
//! then lets the explicit color flag adjust confidence for frame-based results.

pub mod rules;

use crate::types::{EchoCategory, MetadataRecord};
use log::{debug, warn};
use rules::{first_match, RuleContext, RuleMatch, FALLBACK_CONFIDENCE, RULES};

/// Confidence added when the color flag agrees with the vendor code
pub const COLOR_AGREEMENT_BONUS: f64 = 0.05;
/// Confidence removed when the color flag contradicts the vendor code
pub const COLOR_DISAGREEMENT_PENALTY: f64 = 0.15;

/// Vendor codes that indicate color flow outside the 0011 family
const FALLBACK_COLOR_CODES: [&str; 2] = ["0010", "0100"];

/// Outcome of classifying one record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ClassificationResult {
    pub category: EchoCategory,
    /// In [0, 1]
    pub confidence: f64,
    /// Evidence trail, in the order the evidence was considered
    pub reasoning: Vec<String>,
    /// Name of the rule that fired, `None` for the fallback
    pub rule: Option<&'static str>,
}

impl ClassificationResult {
    /// Reasoning joined into a single line
    pub fn reasoning_line(&self) -> String {
        self.reasoning.join("; ")
    }

    pub fn is_fallback(&self) -> bool {
        self.rule.is_none()
    }
}

/// Classifies a record into exactly one [`EchoCategory`]
///
/// Never fails: missing or short fields read as non-matches and the worst case
/// is the fallback category at [`FALLBACK_CONFIDENCE`].
///
/// # Example
///
/// ```
/// use echocat_core::{classify, EchoCategory, ImageType, MetadataRecord};
///
/// let record = MetadataRecord {
///     modality: Some("US".to_string()),
///     image_type: ImageType::from(&["ORIGINAL", "PRIMARY", "", "0019"][..]),
///     number_of_frames: Some(50),
///     ..Default::default()
/// };
/// let result = classify(&record);
/// assert_eq!(result.category, EchoCategory::TissueDoppler);
/// ```
pub fn classify(record: &MetadataRecord) -> ClassificationResult {
    let ctx = RuleContext::new(record);

    let (rule, category, mut confidence, mut reasoning) = match first_match(RULES.iter(), &ctx) {
        Some(RuleMatch {
            rule,
            category,
            confidence,
            reasoning,
        }) => {
            debug!("rule {} fired: {}", rule.name(), category);
            (Some(rule.name()), category, confidence, reasoning)
        }
        None => {
            debug!(
                "no rule fired for ImageType {}, using fallback",
                record.image_type
            );
            let (category, reasoning) = fallback(record);
            (None, category, FALLBACK_CONFIDENCE, reasoning)
        }
    };

    // The fallback already chose its category from the color flag
    if rule.is_some() && category.is_frame_based() {
        confidence = refine_with_color_flag(record, category, confidence, &mut reasoning);
    }

    add_context_notes(record, &mut reasoning);

    ClassificationResult {
        category,
        confidence: confidence.clamp(0.0, 1.0),
        reasoning,
        rule,
    }
}

/// Picks a frame-based category when no rule fired
fn fallback(record: &MetadataRecord) -> (EchoCategory, Vec<String>) {
    let code = record.image_type.vendor_code().unwrap_or("unknown");
    let color = has_color_evidence(record);
    let category = match (record.is_multi_frame(), color) {
        (true, true) => EchoCategory::MultiFrameWithDoppler,
        (true, false) => EchoCategory::MultiFrameNoDoppler,
        (false, true) => EchoCategory::SingleFrameWithDoppler,
        (false, false) => EchoCategory::SingleFrameNoDoppler,
    };

    let mut reasoning = vec![format!("No classification rule matched (ImageType {})", code)];
    reasoning.push(format!(
        "defaulted to {} from {} and {} color evidence",
        category.simple_name(),
        if record.is_multi_frame() {
            "multiple frames"
        } else {
            "single frame"
        },
        if color { "positive" } else { "no" }
    ));

    (category, reasoning)
}

/// Color evidence used only by the fallback
fn has_color_evidence(record: &MetadataRecord) -> bool {
    record.color_data_present == Some(true)
        || record.image_type.vendor_code_in(&FALLBACK_COLOR_CODES)
        || record.image_type.contains("COLOR")
}

/// Adjusts confidence using UltrasoundColorDataPresent
///
/// The vendor code stays authoritative for the category.
fn refine_with_color_flag(
    record: &MetadataRecord,
    category: EchoCategory,
    confidence: f64,
    reasoning: &mut Vec<String>,
) -> f64 {
    let (Some(flag), Some(implied)) = (record.color_data_present, category.implied_color()) else {
        return confidence;
    };

    if flag == implied {
        reasoning.push(format!("UltrasoundColorDataPresent={} agrees", flag as u8));
        (confidence + COLOR_AGREEMENT_BONUS).min(1.0)
    } else {
        warn!(
            "UltrasoundColorDataPresent={} contradicts vendor code for {}",
            flag as u8, category
        );
        reasoning.push(format!(
            "UltrasoundColorDataPresent={} disagrees with vendor code",
            flag as u8
        ));
        (confidence - COLOR_DISAGREEMENT_PENALTY).max(0.0)
    }
}

/// Context notes that never change category or confidence
fn add_context_notes(record: &MetadataRecord, reasoning: &mut Vec<String>) {
    match record.modality.as_deref() {
        Some("US") => reasoning.push("Ultrasound modality".to_string()),
        Some(other) => {
            warn!("unexpected modality {}", other);
            reasoning.push(format!("Unexpected modality {}", other));
        }
        None => reasoning.push("Modality missing".to_string()),
    }

    if record.is_echo_study() {
        reasoning.push("Echocardiography study".to_string());
    }

    if record.has_annotations() {
        reasoning.push("Annotations or measurements present".to_string());
    }
}
