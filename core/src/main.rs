use clap::Parser;
use deidcopy_core::cli::{plan, usage, Cli, OutputFormat, Plan};
use deidcopy_core::{run, FolderListReport, Summary, SummaryReport};
use log::error;
use std::path::PathBuf;
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    let plan = match plan(&cli) {
        Ok(plan) => plan,
        Err(e) => {
            error!("Failed to search source directory: {}", e);
            eprintln!("Error: Failed to search source directory: {}", e);
            process::exit(1);
        }
    };

    match &plan {
        Plan::MissingSource => {
            eprintln!(
                "Error: The source directory '{}' does not exist.",
                cli.source_dir.display()
            );
            println!("{}", usage());
        }
        Plan::NoFolders => {
            println!("\nNo DICOM files found in the specified source directory.");
        }
        Plan::ListOnly(folders) => output_folders(folders, &cli.format),
        Plan::Copy(folders) => {
            println!("\nNumber of DICOM folders found: {}", folders.len());

            match run(folders, &cli.pipeline_config()) {
                Ok(summary) => output_summary(&summary, &cli.format),
                Err(e) => {
                    error!("Run aborted: {}", e);
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            }
        }
    }

    process::exit(plan.exit_code());
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn output_folders(folders: &[PathBuf], format: &OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", FolderListReport::new(folders)),
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            print_json(folders);
            #[cfg(not(feature = "json"))]
            json_unavailable();
        }
    }
}

fn output_summary(summary: &Summary, format: &OutputFormat) {
    match format {
        OutputFormat::Text => println!("\n{}", SummaryReport::new(summary)),
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            print_json(summary);
            #[cfg(not(feature = "json"))]
            json_unavailable();
        }
    }
}

#[cfg(feature = "json")]
fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Failed to serialize to JSON: {}", e);
            eprintln!("Error: Failed to serialize to JSON: {}", e);
            process::exit(1);
        }
    }
}

#[cfg(not(feature = "json"))]
fn json_unavailable() {
    eprintln!("Error: JSON output requires the 'json' feature");
    eprintln!("Rebuild with: cargo build --features json");
    process::exit(1);
}
