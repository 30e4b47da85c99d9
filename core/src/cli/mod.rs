#[cfg(feature = "json")]
pub mod json;
pub mod report;

use crate::cardiac::{AnalysisConfig, PhasePolarity};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for echocat
#[derive(Parser, Debug)]
#[command(name = "echocat")]
#[command(about = "Echocardiography DICOM classification and measurement tool")]
#[command(version)]
pub struct Cli {
    /// Path to DICOM file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub phases: PhaseArgs,
}

/// Cardiac phase detection options shared by the binaries
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PhaseArgs {
    /// JSON configuration file (requires the `json` feature)
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Which signal extremum marks end-systole
    #[arg(long)]
    pub polarity: Option<PolarityArg>,

    /// Minimum frame distance between accepted extrema
    #[arg(long, value_name = "FRAMES")]
    pub min_separation: Option<usize>,
}

impl PhaseArgs {
    /// Applies the flags on top of `base`
    pub fn apply(&self, mut base: AnalysisConfig) -> AnalysisConfig {
        if let Some(polarity) = self.polarity.clone() {
            base.phases = base.phases.with_polarity(polarity.into());
        }
        if let Some(frames) = self.min_separation {
            base.phases = base.phases.with_min_separation(frames);
        }
        base
    }

    /// Loads the config file, if any, and applies the flags
    pub fn resolve(&self) -> crate::Result<AnalysisConfig> {
        let base = match &self.config {
            #[cfg(feature = "json")]
            Some(path) => AnalysisConfig::from_json_file(path)?,
            #[cfg(not(feature = "json"))]
            Some(_) => {
                return Err(crate::EchocatError::InvalidValue(
                    "configuration files require the 'json' feature".to_string(),
                ))
            }
            None => AnalysisConfig::default(),
        };
        let config = self.apply(base);
        config.phases.validate()?;
        Ok(config)
    }
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

/// Phase polarity options
#[derive(Debug, Clone, ValueEnum)]
pub enum PolarityArg {
    /// Signal minima are end-systole
    MinimumIsEndSystole,
    /// Signal maxima are end-systole
    MaximumIsEndSystole,
}

impl From<PolarityArg> for PhasePolarity {
    fn from(arg: PolarityArg) -> Self {
        match arg {
            PolarityArg::MinimumIsEndSystole => PhasePolarity::MinimumIsEndSystole,
            PolarityArg::MaximumIsEndSystole => PhasePolarity::MaximumIsEndSystole,
        }
    }
}

/// Initializes env_logger; `verbose` lowers the level from Info to Debug
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_phase_flags() {
        let cli = Cli::parse_from([
            "echocat",
            "image.dcm",
            "--polarity",
            "maximum-is-end-systole",
            "--min-separation",
            "5",
        ]);
        let config = cli.phases.resolve().unwrap();
        assert_eq!(config.phases.polarity, PhasePolarity::MaximumIsEndSystole);
        assert_eq!(config.phases.min_separation_frames, 5);
        assert_eq!(config.phases.end_systole_fraction, 0.35);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["echocat", "image.dcm"]);
        assert!(!cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Text));
        assert_eq!(cli.phases.resolve().unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn test_zero_separation_rejected() {
        let cli = Cli::parse_from(["echocat", "image.dcm", "--min-separation", "0"]);
        assert!(cli.phases.resolve().is_err());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_invalid_config_file_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("echocat.json");
        std::fs::write(
            &path,
            r#"{"phases": {"end_systole_fraction": 0.5, "end_diastole_fraction": 0.5}}"#,
        )
        .unwrap();

        let args = PhaseArgs {
            config: Some(path),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("echocat.json");
        std::fs::write(&path, r#"{"phases": {"min_separation_frames": 8}}"#).unwrap();

        let args = PhaseArgs {
            config: Some(path),
            polarity: Some(PolarityArg::MaximumIsEndSystole),
            min_separation: None,
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.phases.min_separation_frames, 8);
        assert_eq!(config.phases.polarity, PhasePolarity::MaximumIsEndSystole);
    }
}
