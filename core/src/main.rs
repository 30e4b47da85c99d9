use clap::Parser;
use echocat_core::cli::{setup_logging, Cli, OutputFormat};
use echocat_core::{EchoAnalyzer, EchoRecord, TextReport};
use log::{error, info};
use std::process;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = match cli.phases.resolve() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    info!("Analyzing: {}", cli.file.display());
    let analyzer = EchoAnalyzer::new(config);
    let record = match analyzer.analyze_file(&cli.file) {
        Ok(record) => record,
        Err(e) => {
            error!("Failed to read {}: {}", cli.file.display(), e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    output_record(&record, cli.format);
}

fn output_record(record: &EchoRecord, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            let report = TextReport::new(&record.metadata, &record.analysis)
                .with_path(&record.file_path);
            print!("{}", report);
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match echocat_core::cli::json::record_to_json(record) {
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
