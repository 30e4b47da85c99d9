use crate::geometry::{detect_side_by_side, LayoutVerdict};
use crate::types::{EchoCategory, MetadataRecord};

/// Vendor codes for tissue Doppler
pub const TISSUE_DOPPLER_CODES: [&str; 2] = ["0019", "0003"];
/// Vendor code for 2D with color flow
pub const COLOR_2D_CODE: &str = "0011";
/// Vendor code for plain 2D
pub const PLAIN_2D_CODE: &str = "0001";
/// Vendor codes for continuous-wave Doppler
pub const CW_DOPPLER_CODES: [&str; 4] = ["0002", "0004", "0005", "0015"];
/// Vendor codes for pulsed-wave Doppler
pub const PW_DOPPLER_CODES: [&str; 2] = ["0008", "0009"];
/// Vendor code for color M-mode
pub const COLOR_M_MODE_CODE: &str = "0020";

// Per-rule confidence constants
pub const EXCLUDED_CONFIDENCE: f64 = 0.95;
pub const TISSUE_DOPPLER_CONFIDENCE: f64 = 0.95;
pub const SIDE_BY_SIDE_CONFIDENCE: f64 = 0.90;
pub const FRAME_SPLIT_CONFIDENCE: f64 = 0.90;
pub const VENDOR_LOOKUP_CONFIDENCE: f64 = 0.90;
pub const FALLBACK_CONFIDENCE: f64 = 0.60;

/// Inputs shared by every rule
///
/// The geometry verdict is computed once, before any rule runs.
pub struct RuleContext<'a> {
    pub record: &'a MetadataRecord,
    pub layout: LayoutVerdict,
}

impl<'a> RuleContext<'a> {
    pub fn new(record: &'a MetadataRecord) -> Self {
        Self {
            record,
            layout: detect_side_by_side(&record.regions),
        }
    }
}

/// A rule that fired
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub rule: Rule,
    pub category: EchoCategory,
    pub confidence: f64,
    pub reasoning: Vec<String>,
}

/// Classification rules in priority order
///
/// Evaluation order is the order of [`RULES`]; the first rule whose predicate
/// holds decides the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// ImageType[10] == "I1" or ImageType[2] == "INVALID"
    Excluded,
    /// ImageType[3] in {0019, 0003}
    TissueDoppler,
    /// One B-mode and one color Doppler region, adjacent
    SideBySide,
    /// Frame count combined with vendor code 0001/0011
    FrameSplit,
    /// Spectral and M-mode vendor codes
    VendorLookup,
}

/// Priority order of the classification rules
pub const RULES: [Rule; 5] = [
    Rule::Excluded,
    Rule::TissueDoppler,
    Rule::SideBySide,
    Rule::FrameSplit,
    Rule::VendorLookup,
];

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Excluded => "excluded",
            Rule::TissueDoppler => "tissue-doppler",
            Rule::SideBySide => "side-by-side",
            Rule::FrameSplit => "frame-split",
            Rule::VendorLookup => "vendor-lookup",
        }
    }

    /// Evaluates this rule alone
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<RuleMatch> {
        let image_type = &ctx.record.image_type;
        let code = image_type.vendor_code();

        let (category, confidence, reasoning) = match self {
            Rule::Excluded => {
                if image_type.token_is(10, "I1") || image_type.token_is(2, "INVALID") {
                    (
                        EchoCategory::Excluded,
                        EXCLUDED_CONFIDENCE,
                        vec![format!("Excluded image (ImageType: {})", image_type)],
                    )
                } else {
                    return None;
                }
            }
            Rule::TissueDoppler => {
                if image_type.vendor_code_in(&TISSUE_DOPPLER_CODES) {
                    (
                        EchoCategory::TissueDoppler,
                        TISSUE_DOPPLER_CONFIDENCE,
                        vec![format!("Tissue Doppler (ImageType {})", code?)],
                    )
                } else {
                    return None;
                }
            }
            Rule::SideBySide => {
                let layout = ctx.layout.layout?;
                let mut reasoning = vec![format!(
                    "Side-by-side B-mode + Color Doppler layout detected ({})",
                    layout
                )];
                reasoning.extend(ctx.layout.reasoning.iter().cloned());
                (
                    EchoCategory::SideBySideDoppler,
                    SIDE_BY_SIDE_CONFIDENCE,
                    reasoning,
                )
            }
            Rule::FrameSplit => {
                let with_color = match code? {
                    COLOR_2D_CODE => true,
                    PLAIN_2D_CODE => false,
                    _ => return None,
                };
                frame_split(ctx.record, with_color)
            }
            Rule::VendorLookup => {
                let code = code?;
                let category = if CW_DOPPLER_CODES.contains(&code) {
                    EchoCategory::CwDoppler
                } else if PW_DOPPLER_CODES.contains(&code) {
                    EchoCategory::PwDoppler
                } else if code == COLOR_M_MODE_CODE {
                    EchoCategory::ColorMMode
                } else {
                    return None;
                };
                let label = match category {
                    EchoCategory::CwDoppler => "CW Doppler",
                    EchoCategory::PwDoppler => "PW Doppler",
                    _ => "Color M-Mode",
                };
                (
                    category,
                    VENDOR_LOOKUP_CONFIDENCE,
                    vec![format!("{} (ImageType {})", label, code)],
                )
            }
        };

        Some(RuleMatch {
            rule: *self,
            category,
            confidence,
            reasoning,
        })
    }
}

fn frame_split(record: &MetadataRecord, with_color: bool) -> (EchoCategory, f64, Vec<String>) {
    let code = if with_color { COLOR_2D_CODE } else { PLAIN_2D_CODE };
    let category = match (record.is_multi_frame(), with_color) {
        (true, true) => EchoCategory::MultiFrameWithDoppler,
        (true, false) => EchoCategory::MultiFrameNoDoppler,
        (false, true) => EchoCategory::SingleFrameWithDoppler,
        (false, false) => EchoCategory::SingleFrameNoDoppler,
    };
    let color_text = if with_color { "with" } else { "without" };

    let reason = if record.is_multi_frame() {
        format!(
            "Multi-frame {} Color Doppler (ImageType {}, {} frames)",
            color_text,
            code,
            record.number_of_frames.unwrap_or(1)
        )
    } else {
        format!(
            "2D Single-frame {} Color Doppler (ImageType {})",
            color_text, code
        )
    };

    (category, FRAME_SPLIT_CONFIDENCE, vec![reason])
}

/// Generic first-match driver
///
/// Walks `rules` in order and returns the first match.
pub fn first_match<'r, I>(rules: I, ctx: &RuleContext<'_>) -> Option<RuleMatch>
where
    I: IntoIterator<Item = &'r Rule>,
{
    rules.into_iter().find_map(|rule| rule.evaluate(ctx))
}
