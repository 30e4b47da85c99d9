use clap::{Parser, ValueEnum};
use echocat_core::cli::{setup_logging, PhaseArgs};
use echocat_core::{EchoAnalyzer, EchoCategory, EchoRecord};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process;

/// CLI tool for classifying every echo DICOM file under a directory
#[derive(Parser, Debug)]
#[command(name = "echobatch")]
#[command(about = "Classify a directory of echocardiography DICOM files")]
#[command(version)]
struct Cli {
    /// Directory containing DICOM files (searched recursively)
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Only report files of this category (e.g. pw_doppler)
    #[arg(long, value_parser = parse_category)]
    category: Option<EchoCategory>,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(flatten)]
    phases: PhaseArgs,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
    /// File paths only (one per line)
    Paths,
    /// CSV summary, one row per file
    Csv,
}

fn parse_category(s: &str) -> Result<EchoCategory, String> {
    EchoCategory::from_str(s).ok_or_else(|| {
        let keys: Vec<&str> = EchoCategory::ALL.iter().map(|c| c.simple_name()).collect();
        format!("unknown category '{}', expected one of: {}", s, keys.join(", "))
    })
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    // Verify directory exists
    if !cli.directory.is_dir() {
        eprintln!("Error: {} is not a directory", cli.directory.display());
        process::exit(1);
    }

    let config = match cli.phases.resolve() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    info!("Processing directory: {}", cli.directory.display());

    let dicom_files = match collect_dicom_files(&cli.directory) {
        Ok(files) => files,
        Err(e) => {
            error!("Failed to read directory: {}", e);
            eprintln!("Error: Failed to read directory: {}", e);
            process::exit(1);
        }
    };

    if dicom_files.is_empty() {
        eprintln!("Error: No DICOM files found in directory");
        process::exit(1);
    }

    info!("Found {} DICOM files", dicom_files.len());

    let analyzer = EchoAnalyzer::new(config);
    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        progress_bar(dicom_files.len())
    };
    let mut records = analyze_files(&analyzer, &dicom_files, progress);

    if records.is_empty() {
        eprintln!("Error: No valid DICOM files could be processed");
        process::exit(1);
    }

    info!(
        "Successfully processed {} of {} files",
        records.len(),
        dicom_files.len()
    );

    let stats = CategoryStats::from_records(&records);
    if let Some(category) = cli.category {
        records.retain(|r| r.analysis.category() == category);
        info!("{} files in category {}", records.len(), category);
    }

    output_records(&records, &stats, cli.format);
}

fn progress_bar(len: usize) -> ProgressBar {
    let style = ProgressStyle::with_template("{bar:40} {pos}/{len} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(len as u64).with_style(style)
}

/// Runs the pipeline over all files in parallel
///
/// Unreadable files are logged and skipped. Results are sorted by path so
/// output does not depend on scheduling.
fn analyze_files(analyzer: &EchoAnalyzer, files: &[PathBuf], progress: ProgressBar) -> Vec<EchoRecord> {
    let mut records: Vec<EchoRecord> = files
        .par_iter()
        .progress_with(progress)
        .filter_map(|path| match analyzer.analyze_file(path) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    records.sort_by(|a, b| a.file_path.cmp(&b.file_path));
    records
}

/// Recursively collects DICOM files
///
/// Symlinked directories are not followed, so link cycles cannot recurse.
/// Symlinks to regular files are accepted.
fn collect_dicom_files(directory: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            files.extend(collect_dicom_files(&path)?);
        } else if file_type.is_symlink() && path.is_dir() {
            debug!("Not following directory symlink: {}", path.display());
        } else if path.is_file() {
            if let Some(ext) = path.extension() {
                // Accept .dcm and .dicom extensions
                if ext.eq_ignore_ascii_case("dcm") || ext.eq_ignore_ascii_case("dicom") {
                    files.push(path);
                }
            } else if is_dicom_file(&path) {
                info!("Found headerless DICOM file: {}", path.display());
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Checks if a file has a DICOM header
///
/// DICOM files typically have:
/// - 128-byte preamble
/// - 4-byte "DICM" magic string at offset 128
fn is_dicom_file(path: &Path) -> bool {
    use std::fs::File;
    use std::io::Read;

    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    // Read first 132 bytes (128-byte preamble + 4-byte "DICM" magic)
    let mut buffer = [0u8; 132];
    match file.read_exact(&mut buffer) {
        Ok(()) => &buffer[128..132] == b"DICM",
        Err(_) => false,
    }
}

/// Per-category file counts
#[derive(Debug, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
struct CategoryStats {
    total: usize,
    fallback: usize,
    by_category: BTreeMap<EchoCategory, usize>,
}

impl CategoryStats {
    fn from_records(records: &[EchoRecord]) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.total += 1;
            if record.analysis.classification.is_fallback() {
                stats.fallback += 1;
            }
            *stats
                .by_category
                .entry(record.analysis.category())
                .or_default() += 1;
        }
        stats
    }
}

fn output_records(records: &[EchoRecord], stats: &CategoryStats, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            let report = BatchReport::new(records, stats);
            print!("{}", report);
        }
        OutputFormat::Paths => {
            for record in records {
                println!("{}", record.file_path.display());
            }
        }
        OutputFormat::Csv => {
            if let Err(e) = write_csv(records, std::io::stdout().lock()) {
                error!("Failed to write CSV: {}", e);
                eprintln!("Error: Failed to write CSV: {}", e);
                process::exit(1);
            }
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match output_json(records, stats) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}

const CSV_HEADER: [&str; 7] = [
    "File Path",
    "Category",
    "Category Description",
    "Confidence",
    "Reasoning",
    "Cardiac Cycles",
    "Cardiac Phase Frames",
];

/// Writes the classification summary with cardiac phases as CSV
///
/// Phase columns stay empty when phase detection does not apply.
fn write_csv<W: std::io::Write>(records: &[EchoRecord], writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for record in records {
        let classification = &record.analysis.classification;
        let (cycles, frames) = match &record.analysis.phases {
            Ok(phases) => (phases.cycle_count().to_string(), phases.to_string()),
            Err(_) => (String::new(), String::new()),
        };
        wtr.write_record([
            record.file_path.display().to_string(),
            classification.category.simple_name().to_string(),
            classification.category.description().to_string(),
            format!("{:.2}", classification.confidence),
            classification.reasoning_line(),
            cycles,
            frames,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(feature = "json")]
fn output_json(records: &[EchoRecord], stats: &CategoryStats) -> Result<String, serde_json::Error> {
    use echocat_core::cli::json::RecordJson;
    use serde::Serialize;

    #[derive(Serialize)]
    struct BatchJson<'a> {
        summary: &'a CategoryStats,
        records: Vec<RecordJson<'a>>,
    }

    let output = BatchJson {
        summary: stats,
        records: records.iter().map(RecordJson::from).collect(),
    };

    serde_json::to_string_pretty(&output)
}

/// Text report for a classified directory
struct BatchReport<'a> {
    records: &'a [EchoRecord],
    stats: &'a CategoryStats,
}

impl<'a> BatchReport<'a> {
    fn new(records: &'a [EchoRecord], stats: &'a CategoryStats) -> Self {
        Self { records, stats }
    }
}

impl<'a> fmt::Display for BatchReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Echo Classification")?;
        writeln!(f, "===================")?;
        writeln!(f)?;

        for record in self.records {
            let classification = &record.analysis.classification;
            writeln!(f, "{}", record.file_path.display())?;
            writeln!(
                f,
                "  Category: {} ({:.2})",
                classification.category.simple_name(),
                classification.confidence
            )?;
            writeln!(f, "  Reasoning: {}", classification.reasoning_line())?;
            if let Ok(phases) = &record.analysis.phases {
                writeln!(f, "  Phases: {}", phases)?;
            }
        }
        writeln!(f)?;

        writeln!(f, "Summary")?;
        writeln!(f, "-------")?;
        writeln!(f, "Files: {}", self.stats.total)?;
        for (category, count) in &self.stats.by_category {
            writeln!(f, "  {:<26} {}", category.simple_name(), count)?;
        }
        if self.stats.fallback > 0 {
            writeln!(f, "Fallback classifications: {}", self.stats.fallback)?;
        }

        Ok(())
    }
}
