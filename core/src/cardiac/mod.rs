//! Cardiac phase detection for multi-frame echo loops
//!
//! A per-frame signal (supplied, or synthesized from the R wave time vector)
//! is reduced to alternating extrema which are labeled end-systolic (ES) and
//! end-diastolic (ED) in frame order: `ES0, ED1, ES1, ED2, ES2, ...`.

mod config;
mod extrema;
mod signal;

pub use config::{AnalysisConfig, PhaseDetectorConfig, PhasePolarity};
pub use extrema::{find_extrema, Extremum, ExtremumKind};
pub use signal::{FrameSignal, SignalSource};

use crate::error::NotApplicable;
use crate::types::{EchoCategory, MetadataRecord};
use log::{debug, warn};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum Phase {
    EndSystole,
    EndDiastole,
}

impl Phase {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Phase::EndSystole => "ES",
            Phase::EndDiastole => "ED",
        }
    }
}

/// A labeled phase frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct PhaseMarker {
    pub phase: Phase,
    /// ES markers start at cycle 0, ED markers at cycle 1
    pub cycle: usize,
    pub frame: usize,
    pub kind: ExtremumKind,
    /// Whether `kind` is the one the polarity assigns to `phase`
    pub matches_polarity: bool,
}

impl PhaseMarker {
    /// Label such as "ES0" or "ED2"
    pub fn label(&self) -> String {
        format!("{}{}", self.phase.abbreviation(), self.cycle)
    }
}

/// Labeled end-systolic and end-diastolic frames of one loop
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct CardiacPhaseMap {
    pub end_systolic_frames: Vec<usize>,
    pub end_diastolic_frames: Vec<usize>,
    /// All markers in frame order
    pub markers: Vec<PhaseMarker>,
    pub polarity: PhasePolarity,
    pub source: SignalSource,
}

impl CardiacPhaseMap {
    fn from_extrema(extrema: &[Extremum], polarity: PhasePolarity, source: SignalSource) -> Self {
        let markers: Vec<PhaseMarker> = extrema
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let (phase, cycle) = if i % 2 == 0 {
                    (Phase::EndSystole, i / 2)
                } else {
                    (Phase::EndDiastole, (i + 1) / 2)
                };
                PhaseMarker {
                    phase,
                    cycle,
                    frame: e.frame,
                    kind: e.kind,
                    matches_polarity: (e.kind == polarity.end_systolic_kind())
                        == (phase == Phase::EndSystole),
                }
            })
            .collect();

        let frames_of = |phase: Phase| -> Vec<usize> {
            markers
                .iter()
                .filter(|m| m.phase == phase)
                .map(|m| m.frame)
                .collect()
        };

        Self {
            end_systolic_frames: frames_of(Phase::EndSystole),
            end_diastolic_frames: frames_of(Phase::EndDiastole),
            markers,
            polarity,
            source,
        }
    }

    /// Number of cycles with an end-diastolic frame
    pub fn cycle_count(&self) -> usize {
        self.end_diastolic_frames.len()
    }

    /// Whether every extremum kind agrees with the configured polarity
    pub fn is_polarity_consistent(&self) -> bool {
        self.markers.iter().all(|m| m.matches_polarity)
    }

    /// Frame for a label such as "ED1"
    pub fn frame_for(&self, label: &str) -> Option<usize> {
        self.markers
            .iter()
            .find(|m| m.label() == label)
            .map(|m| m.frame)
    }
}

impl fmt::Display for CardiacPhaseMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .markers
            .iter()
            .map(|m| format!("{}: {}", m.label(), m.frame))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Labels the cardiac phases of a frame signal
///
/// Labels follow frame order alone: the first accepted extremum is always
/// ES0 and the rest alternate `ED1, ES1, ED2, ...`. The polarity only decides
/// which extremum kind each marker is expected to have; a mismatch is
/// reported on the marker and logged, never relabeled.
///
/// # Example
///
/// ```
/// use echocat_core::cardiac::{detect_phases, FrameSignal, PhaseDetectorConfig};
///
/// let signal = FrameSignal::new(vec![4.0, 2.0, 0.0, 5.0, 10.0, 5.0, 0.0, 1.0]);
/// let config = PhaseDetectorConfig::default().with_min_separation(2);
/// let phases = detect_phases(&signal, &config).unwrap();
/// assert_eq!(phases.to_string(), "ES0: 2, ED1: 4, ES1: 6");
/// ```
pub fn detect_phases(
    signal: &FrameSignal,
    config: &PhaseDetectorConfig,
) -> Result<CardiacPhaseMap, NotApplicable> {
    let extrema = find_extrema(&signal.values, config.min_separation_frames);
    if extrema.len() < 2 {
        return Err(NotApplicable::InsufficientExtrema(extrema.len()));
    }

    let phases = CardiacPhaseMap::from_extrema(&extrema, config.polarity, signal.source);
    if !phases.is_polarity_consistent() {
        warn!(
            "extremum kinds disagree with polarity {}: first extremum is a {}",
            config.polarity,
            extrema[0].kind.simple_name()
        );
    }
    Ok(phases)
}

/// Detects phases from the timing metadata of a multi-frame record
pub fn detect_for_record(
    record: &MetadataRecord,
    category: EchoCategory,
    config: &PhaseDetectorConfig,
) -> Result<CardiacPhaseMap, NotApplicable> {
    if category == EchoCategory::Excluded {
        return Err(NotApplicable::Category(category));
    }
    if !record.is_multi_frame() {
        return Err(NotApplicable::NotMultiFrame);
    }
    let timing = record
        .cardiac_timing
        .as_ref()
        .ok_or(NotApplicable::SignalMissing)?;
    let frames = record
        .number_of_frames
        .and_then(|n| usize::try_from(n).ok())
        .ok_or(NotApplicable::NotMultiFrame)?;

    let signal = FrameSignal::from_timing(timing, frames, config)?;
    let phases = detect_phases(&signal, config)?;
    debug!("{} cardiac cycles: {}", phases.cycle_count(), phases);
    Ok(phases)
}
