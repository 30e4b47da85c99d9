#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum ExtremumKind {
    Minimum,
    Maximum,
}

impl ExtremumKind {
    pub fn simple_name(&self) -> &'static str {
        match self {
            ExtremumKind::Minimum => "minimum",
            ExtremumKind::Maximum => "maximum",
        }
    }
}

/// Local extremum of a frame signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    pub frame: usize,
    pub value: f64,
    pub kind: ExtremumKind,
}

impl Extremum {
    fn more_extreme_than(&self, other: &Extremum) -> bool {
        match self.kind {
            ExtremumKind::Minimum => self.value < other.value,
            ExtremumKind::Maximum => self.value > other.value,
        }
    }
}

/// Finds alternating local extrema of `values`
///
/// The first and last samples are never extrema. A flat run counts once, at
/// its center frame. Consecutive extrema of the same kind keep the more
/// extreme one, and an opposite extremum closer than `min_separation` frames
/// to the last accepted one is dropped as noise.
pub fn find_extrema(values: &[f64], min_separation: usize) -> Vec<Extremum> {
    let mut accepted: Vec<Extremum> = Vec::new();

    for candidate in turning_points(values) {
        match accepted.last_mut() {
            Some(last) if last.kind == candidate.kind => {
                if candidate.more_extreme_than(last) {
                    *last = candidate;
                }
            }
            Some(last) if candidate.frame - last.frame < min_separation => {}
            _ => accepted.push(candidate),
        }
    }

    accepted
}

/// Strict turning points over run-length compressed values
fn turning_points(values: &[f64]) -> Vec<Extremum> {
    // (first frame, last frame, value)
    let mut runs: Vec<(usize, usize, f64)> = Vec::new();
    for (frame, &value) in values.iter().enumerate() {
        match runs.last_mut() {
            Some(run) if run.2 == value => run.1 = frame,
            _ => runs.push((frame, frame, value)),
        }
    }

    runs.windows(3)
        .filter_map(|w| {
            let (prev, (start, end, value), next) = (w[0].2, w[1], w[2].2);
            let kind = if value < prev && value < next {
                ExtremumKind::Minimum
            } else if value > prev && value > next {
                ExtremumKind::Maximum
            } else {
                return None;
            };
            Some(Extremum {
                frame: (start + end) / 2,
                value,
                kind,
            })
        })
        .collect()
}
