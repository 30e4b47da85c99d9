use super::config::{PhaseDetectorConfig, PhasePolarity};
use crate::error::NotApplicable;
use crate::types::CardiacTiming;

/// Where a frame signal came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum SignalSource {
    /// Supplied directly by the caller
    Amplitude,
    /// Synthesized from the R wave time vector
    RWaveTiming,
}

/// One value per frame, indexed by frame number
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSignal {
    pub values: Vec<f64>,
    pub source: SignalSource,
}

impl FrameSignal {
    /// Wraps an amplitude series
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            source: SignalSource::Amplitude,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Synthesizes a volume-like signal from R wave timing
    ///
    /// Each RR interval is mapped onto a triangle that bottoms out at
    /// `end_systole_fraction` and peaks at `end_diastole_fraction` of the
    /// interval (inverted for [`PhasePolarity::MaximumIsEndSystole`]). Frames
    /// before the first R wave hold its value; frames after the last one
    /// continue with the mean RR interval, or the header heart rate when only
    /// one R wave is present.
    pub fn from_timing(
        timing: &CardiacTiming,
        number_of_frames: usize,
        config: &PhaseDetectorConfig,
    ) -> Result<Self, NotApplicable> {
        let frame_time = timing
            .frame_time
            .or_else(|| {
                timing
                    .cine_rate
                    .filter(|rate| *rate > 0)
                    .map(|rate| 1000.0 / rate as f64)
            })
            .filter(|ft| *ft > 0.0)
            .ok_or(NotApplicable::SignalMissing)?;

        let mut r_waves: Vec<f64> = timing
            .r_wave_times
            .iter()
            .copied()
            .filter(|t| t.is_finite())
            .collect();
        r_waves.sort_by(f64::total_cmp);
        if r_waves.is_empty() || number_of_frames == 0 {
            return Err(NotApplicable::SignalMissing);
        }

        let mean_rr = timing
            .mean_rr_interval()
            .or_else(|| {
                timing
                    .heart_rate
                    .filter(|hr| *hr > 0)
                    .map(|hr| 60_000.0 / hr as f64)
            })
            .filter(|rr| *rr > 0.0)
            .ok_or(NotApplicable::SignalMissing)?;

        let values = (0..number_of_frames)
            .map(|frame| {
                let t = frame as f64 * frame_time;
                let phase = rr_phase(t, &r_waves, mean_rr);
                let volume = volume_proxy(
                    phase,
                    config.end_systole_fraction,
                    config.end_diastole_fraction,
                );
                match config.polarity {
                    PhasePolarity::MinimumIsEndSystole => volume,
                    PhasePolarity::MaximumIsEndSystole => 1.0 - volume,
                }
            })
            .collect();

        Ok(Self {
            values,
            source: SignalSource::RWaveTiming,
        })
    }
}

/// Position of `t` within its RR interval, 0..1
fn rr_phase(t: f64, r_waves: &[f64], mean_rr: f64) -> f64 {
    match r_waves.iter().rposition(|&r| r <= t) {
        Some(k) if k + 1 < r_waves.len() && r_waves[k + 1] > r_waves[k] => {
            (t - r_waves[k]) / (r_waves[k + 1] - r_waves[k])
        }
        Some(k) => ((t - r_waves[k]) / mean_rr).rem_euclid(1.0),
        None => 0.0,
    }
}

/// 0 at end-systole, 1 at end-diastole, linear in between
fn volume_proxy(phase: f64, es: f64, ed: f64) -> f64 {
    if (es..=ed).contains(&phase) {
        (phase - es) / (ed - es)
    } else {
        let since_ed = (phase - ed).rem_euclid(1.0);
        let span = 1.0 - ed + es;
        1.0 - since_ed / span
    }
}
