pub mod report;

use crate::discovery::find_dicom_folders;
use crate::error::Result;
use crate::manifest::DEFAULT_MANIFEST_NAME;
use crate::pipeline::PipelineConfig;
use clap::{CommandFactory, Parser, ValueEnum};
use log::info;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Command-line arguments for deidcopy
#[derive(Parser, Debug)]
#[command(name = "deidcopy")]
#[command(
    about = "Find, copy, and anonymize DICOM files from folders with sequential four-digit names"
)]
#[command(version)]
pub struct Cli {
    /// The directory to search for DICOM folders
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// The destination directory to copy and anonymize DICOM files
    #[arg(value_name = "DESTINATION_DIR")]
    pub destination_dir: PathBuf,

    /// List the found DICOM folders and then exit
    #[arg(long)]
    pub list_only: bool,

    /// Record acquisition metadata of each folder in the manifest
    #[arg(short, long)]
    pub metadata: bool,

    /// Manifest file name, written inside the destination directory
    #[arg(long, value_name = "NAME", default_value = DEFAULT_MANIFEST_NAME)]
    pub manifest: String,

    /// Prefix of the Patient's Name pseudonym
    #[arg(long, default_value = "P")]
    pub prefix: String,

    /// Seed of the UID substitution (defaults to one derived from the clock)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Run settings described by the arguments
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            destination: self.destination_dir.clone(),
            manifest_name: self.manifest.clone(),
            pseudonym_prefix: self.prefix.clone(),
            extract_metadata: self.metadata,
            uid_seed: self.seed.unwrap_or_else(clock_seed),
        }
    }
}

/// Usage help as printed by `--help`
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}

/// What a run will do, decided before anything is written
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// The source directory does not exist
    MissingSource,
    /// No folder under the source holds a DICOM file
    NoFolders,
    /// Print the qualifying folders and stop
    ListOnly(Vec<PathBuf>),
    /// Copy and anonymize the qualifying folders
    Copy(Vec<PathBuf>),
}

impl Plan {
    /// Process exit code when the run ends at this plan
    pub fn exit_code(&self) -> i32 {
        match self {
            Plan::MissingSource => 1,
            _ => 0,
        }
    }
}

/// Checks the source and discovers its folders
///
/// Never touches the destination.
pub fn plan(cli: &Cli) -> Result<Plan> {
    if !cli.source_dir.exists() {
        return Ok(Plan::MissingSource);
    }

    info!("Searching {}", cli.source_dir.display());
    let folders = find_dicom_folders(&cli.source_dir)?;

    Ok(if folders.is_empty() {
        Plan::NoFolders
    } else if cli.list_only {
        Plan::ListOnly(folders)
    } else {
        Plan::Copy(folders)
    })
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::tests::write_test_dicom;
    use std::fs;
    use tempfile::TempDir;

    fn parse(source: &std::path::Path, destination: &std::path::Path, extra: &[&str]) -> Cli {
        let mut args = vec![
            "deidcopy".to_string(),
            source.display().to_string(),
            destination.display().to_string(),
        ];
        args.extend(extra.iter().map(|a| a.to_string()));
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from(["deidcopy", "/src", "/dst"]).unwrap();
        assert_eq!(cli.source_dir, PathBuf::from("/src"));
        assert_eq!(cli.destination_dir, PathBuf::from("/dst"));
        assert!(!cli.list_only);
        assert!(!cli.metadata);
        assert_eq!(cli.manifest, "folders.xlsx");
    }

    #[test]
    fn test_list_only_flag() {
        let cli = Cli::try_parse_from(["deidcopy", "/src", "/dst", "--list-only"]).unwrap();
        assert!(cli.list_only);
    }

    #[test]
    fn test_destination_is_required() {
        assert!(Cli::try_parse_from(["deidcopy", "/src"]).is_err());
    }

    #[test]
    fn test_pipeline_config_from_arguments() {
        let cli = Cli::try_parse_from([
            "deidcopy",
            "/src",
            "/dst",
            "--metadata",
            "--manifest",
            "map.xlsx",
            "--prefix",
            "S",
            "--seed",
            "9",
        ])
        .unwrap();

        let config = cli.pipeline_config();
        assert_eq!(config.destination, PathBuf::from("/dst"));
        assert_eq!(config.manifest_path(), PathBuf::from("/dst/map.xlsx"));
        assert_eq!(config.pseudonym_prefix, "S");
        assert!(config.extract_metadata);
        assert_eq!(config.uid_seed, 9);
    }

    #[test]
    fn test_plan_missing_source_exits_with_usage() {
        let temp_dir = TempDir::new().unwrap();
        let cli = parse(
            &temp_dir.path().join("absent"),
            &temp_dir.path().join("out"),
            &[],
        );

        let plan = plan(&cli).unwrap();
        assert_eq!(plan, Plan::MissingSource);
        assert_eq!(plan.exit_code(), 1);
        assert!(usage().contains("SOURCE_DIR"));
        assert!(usage().contains("--list-only"));
        assert!(!temp_dir.path().join("out").exists());
    }

    #[test]
    fn test_plan_list_only_writes_nothing() {
        let source = TempDir::new().unwrap();
        let destination = TempDir::new().unwrap();
        let dest_root = destination.path().join("out");
        fs::create_dir(source.path().join("a")).unwrap();
        write_test_dicom(&source.path().join("a/image"), "A");

        let cli = parse(source.path(), &dest_root, &["--list-only"]);
        let plan = plan(&cli).unwrap();

        assert_eq!(plan, Plan::ListOnly(vec![source.path().join("a")]));
        assert_eq!(plan.exit_code(), 0);
        assert!(!dest_root.exists());
        assert!(!dest_root.join(DEFAULT_MANIFEST_NAME).exists());
    }

    #[test]
    fn test_plan_without_dicom_folders() {
        let source = TempDir::new().unwrap();
        let destination = TempDir::new().unwrap();
        let dest_root = destination.path().join("out");
        fs::write(source.path().join("notes.txt"), b"no images").unwrap();

        let plan = plan(&parse(source.path(), &dest_root, &[])).unwrap();

        assert_eq!(plan, Plan::NoFolders);
        assert_eq!(plan.exit_code(), 0);
        assert!(!dest_root.exists());
    }

    #[test]
    fn test_plan_copy_keeps_destination_untouched() {
        let source = TempDir::new().unwrap();
        let destination = TempDir::new().unwrap();
        let dest_root = destination.path().join("out");
        write_test_dicom(&source.path().join("image"), "A");

        let plan = plan(&parse(source.path(), &dest_root, &[])).unwrap();

        assert_eq!(plan, Plan::Copy(vec![source.path().to_path_buf()]));
        assert!(!dest_root.exists());
    }
}
