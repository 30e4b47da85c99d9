pub mod api;
pub mod cardiac;
pub mod classification;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod geometry;
pub mod measurement;
pub mod types;

pub use api::{read_metadata, EchoAnalysis, EchoAnalyzer, EchoRecord, MetadataSource};
pub use cardiac::{
    detect_for_record, detect_phases, AnalysisConfig, CardiacPhaseMap, FrameSignal,
    PhaseDetectorConfig, PhasePolarity,
};
pub use classification::{classify, ClassificationResult};
pub use cli::report::TextReport;
pub use error::{EchocatError, NotApplicable, Result};
pub use geometry::{detect_side_by_side, Layout, LayoutVerdict};
pub use measurement::{extract_linear, extract_velocity, LinearParams, VelocityParams};
pub use types::*;
