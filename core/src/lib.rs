pub mod anonymize;
pub mod cli;
pub mod discovery;
pub mod error;
pub mod extraction;
pub mod manifest;
pub mod pipeline;
pub mod types;

pub use anonymize::{Anonymizer, OverrideRule};
pub use cli::report::{format_size, FolderListReport, SummaryReport};
pub use discovery::{find_dicom_folders, is_dicom_file, list_dicom_files};
pub use error::{DeidError, Result};
pub use extraction::{extract_acquisition_metadata, AcquisitionMetadata};
pub use manifest::{write_manifest, FolderRecord};
pub use pipeline::{run, PipelineConfig, Summary};
pub use types::*;
