use super::extrema::ExtremumKind;
use crate::error::EchocatError;
use std::fmt;

/// Which extremum of the frame signal marks end-systole
///
/// The derived R-wave signal models ventricular volume, so its minima are
/// end-systole under the default. Signals with the opposite sign convention
/// must select [`PhasePolarity::MaximumIsEndSystole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum PhasePolarity {
    #[default]
    MinimumIsEndSystole,
    MaximumIsEndSystole,
}

impl PhasePolarity {
    /// Extremum kind expected at end-systole
    pub fn end_systolic_kind(&self) -> ExtremumKind {
        match self {
            PhasePolarity::MinimumIsEndSystole => ExtremumKind::Minimum,
            PhasePolarity::MaximumIsEndSystole => ExtremumKind::Maximum,
        }
    }
}

impl fmt::Display for PhasePolarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhasePolarity::MinimumIsEndSystole => write!(f, "minimum-is-end-systole"),
            PhasePolarity::MaximumIsEndSystole => write!(f, "maximum-is-end-systole"),
        }
    }
}

/// Configuration for cardiac phase detection
///
/// # Example
///
/// ```
/// use echocat_core::cardiac::{PhaseDetectorConfig, PhasePolarity};
///
/// let config = PhaseDetectorConfig::default()
///     .with_min_separation(5)
///     .with_polarity(PhasePolarity::MaximumIsEndSystole);
///
/// assert_eq!(config.min_separation_frames, 5);
/// assert_eq!(config.end_systole_fraction, 0.35);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct PhaseDetectorConfig {
    pub polarity: PhasePolarity,
    /// Minimum frame distance between accepted extrema
    pub min_separation_frames: usize,
    /// End-systole position within the RR interval, 0..1
    pub end_systole_fraction: f64,
    /// End-diastole position within the RR interval, 0..1
    pub end_diastole_fraction: f64,
}

impl Default for PhaseDetectorConfig {
    fn default() -> Self {
        Self {
            polarity: PhasePolarity::MinimumIsEndSystole,
            min_separation_frames: 3,
            end_systole_fraction: 0.35,
            end_diastole_fraction: 0.95,
        }
    }
}

impl PhaseDetectorConfig {
    /// Builder: Set polarity
    pub fn with_polarity(mut self, polarity: PhasePolarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Builder: Set minimum separation between extrema
    pub fn with_min_separation(mut self, frames: usize) -> Self {
        self.min_separation_frames = frames;
        self
    }

    /// Builder: Set RR fractions for end-systole and end-diastole
    ///
    /// Values outside 0..1, or with end-systole not before end-diastole,
    /// are ignored and the previous fractions kept.
    pub fn with_rr_fractions(mut self, end_systole: f64, end_diastole: f64) -> Self {
        if valid_rr_fractions(end_systole, end_diastole) {
            self.end_systole_fraction = end_systole;
            self.end_diastole_fraction = end_diastole;
        }
        self
    }

    /// Checks settings that did not come through the builders
    pub fn validate(&self) -> crate::Result<()> {
        if !valid_rr_fractions(self.end_systole_fraction, self.end_diastole_fraction) {
            return Err(EchocatError::InvalidValue(format!(
                "RR fractions must satisfy 0 <= end-systole < end-diastole < 1, got {} and {}",
                self.end_systole_fraction, self.end_diastole_fraction
            )));
        }
        if self.min_separation_frames == 0 {
            return Err(EchocatError::InvalidValue(
                "minimum separation must be at least 1 frame".to_string(),
            ));
        }
        Ok(())
    }
}

fn valid_rr_fractions(end_systole: f64, end_diastole: f64) -> bool {
    (0.0..1.0).contains(&end_systole)
        && (0.0..1.0).contains(&end_diastole)
        && end_systole < end_diastole
}

/// Top-level analysis configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct AnalysisConfig {
    pub phases: PhaseDetectorConfig,
}

#[cfg(feature = "json")]
impl AnalysisConfig {
    /// Loads configuration from a JSON file; missing keys keep defaults
    pub fn from_json_file(path: &std::path::Path) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| EchocatError::InvalidValue(format!("config: {}", e)))?;
        config.phases.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PhaseDetectorConfig::default();
        assert_eq!(config.polarity, PhasePolarity::MinimumIsEndSystole);
        assert_eq!(config.min_separation_frames, 3);
        assert_eq!(config.end_diastole_fraction, 0.95);
    }

    #[test]
    fn test_invalid_fractions_ignored() {
        let config = PhaseDetectorConfig::default().with_rr_fractions(0.9, 0.3);
        assert_eq!(config.end_systole_fraction, 0.35);
        let config = PhaseDetectorConfig::default().with_rr_fractions(0.3, 1.2);
        assert_eq!(config.end_diastole_fraction, 0.95);
        let config = PhaseDetectorConfig::default().with_rr_fractions(0.4, 0.9);
        assert_eq!(config.end_systole_fraction, 0.4);
        assert_eq!(config.end_diastole_fraction, 0.9);
    }

    #[test]
    fn test_validate() {
        assert!(PhaseDetectorConfig::default().validate().is_ok());

        let equal = PhaseDetectorConfig {
            end_systole_fraction: 0.5,
            end_diastole_fraction: 0.5,
            ..Default::default()
        };
        assert!(equal.validate().is_err());

        let reversed = PhaseDetectorConfig {
            end_systole_fraction: 0.9,
            end_diastole_fraction: 0.3,
            ..Default::default()
        };
        assert!(reversed.validate().is_err());

        let nan = PhaseDetectorConfig {
            end_systole_fraction: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());

        assert!(PhaseDetectorConfig::default()
            .with_min_separation(0)
            .validate()
            .is_err());
    }

    #[cfg(feature = "json")]
    #[rstest::rstest]
    #[case(r#"{"phases": {"end_systole_fraction": 0.5, "end_diastole_fraction": 0.5}}"#)]
    #[case(r#"{"phases": {"end_systole_fraction": 0.96}}"#)]
    #[case(r#"{"phases": {"end_diastole_fraction": 1.5}}"#)]
    #[case(r#"{"phases": {"min_separation_frames": 0}}"#)]
    fn test_json_config_rejects_invalid_phases(#[case] json: &str) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, json).unwrap();

        let err = AnalysisConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, EchocatError::InvalidValue(_)));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_partial_json_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"phases": {"polarity": "maximum-is-end-systole", "min_separation_frames": 6}}"#,
        )
        .unwrap();

        let config = AnalysisConfig::from_json_file(&path).unwrap();
        assert_eq!(config.phases.polarity, PhasePolarity::MaximumIsEndSystole);
        assert_eq!(config.phases.min_separation_frames, 6);
        assert_eq!(config.phases.end_systole_fraction, 0.35);
    }
}
