//! Sequential copy-and-anonymize run over the discovered folders

use crate::anonymize::Anonymizer;
use crate::discovery::list_dicom_files;
use crate::error::Result;
use crate::extraction::extract_acquisition_metadata;
use crate::manifest::{write_manifest, FolderRecord, DEFAULT_MANIFEST_NAME};
use crate::types::enumerate_sequenced;
use dicom_object::open_file;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings of one run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Destination root, created if missing
    pub destination: PathBuf,

    /// Manifest file name inside the destination root
    pub manifest_name: String,

    /// Prefix of the Patient's Name pseudonym
    pub pseudonym_prefix: String,

    /// Record acquisition metadata of each folder's first file
    pub extract_metadata: bool,

    /// Key of the UID substitution
    pub uid_seed: u64,
}

impl PipelineConfig {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            pseudonym_prefix: "P".to_string(),
            extract_metadata: false,
            uid_seed: 0,
        }
    }

    pub fn with_metadata(mut self, extract_metadata: bool) -> Self {
        self.extract_metadata = extract_metadata;
        self
    }

    pub fn with_uid_seed(mut self, uid_seed: u64) -> Self {
        self.uid_seed = uid_seed;
        self
    }

    /// Path of the manifest spreadsheet
    pub fn manifest_path(&self) -> PathBuf {
        self.destination.join(&self.manifest_name)
    }
}

/// Totals accumulated over a run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Summary {
    pub folders_processed: usize,
    pub files_copied: usize,
    pub bytes_copied: u64,
    pub manifest: PathBuf,
    pub records: Vec<FolderRecord>,
}

/// Copies and anonymizes every folder, then writes the manifest
///
/// `folders` must already be sorted; the n-th folder becomes `000n`. A
/// failure aborts the run and leaves the partial destination tree behind
/// without a manifest.
pub fn run(folders: &[PathBuf], config: &PipelineConfig) -> Result<Summary> {
    fs::create_dir_all(&config.destination)?;

    let anonymizer = Anonymizer::new(config.uid_seed, config.pseudonym_prefix.as_str());
    let mut files_copied = 0;
    let mut bytes_copied = 0;
    let mut records = Vec::with_capacity(folders.len());

    for (folder_seq, folder) in enumerate_sequenced(folders) {
        info!("Processing folder {}: {}", folder_seq, folder.display());

        let folder_name = folder_seq.folder_name();
        let new_folder = config.destination.join(&folder_name);
        fs::create_dir_all(&new_folder)?;

        let mut record = FolderRecord::new(folder.clone(), folder_name);

        for (file_seq, source) in enumerate_sequenced(list_dicom_files(folder)?) {
            let destination = new_folder.join(file_seq.file_name());
            anonymizer.anonymize_file(&source, &destination, folder_seq)?;

            bytes_copied += fs::metadata(&destination)?.len();
            files_copied += 1;

            if config.extract_metadata && file_seq.get() == 1 {
                record = record.with_metadata(read_metadata(&destination)?);
            }
        }

        records.push(record);
    }

    let manifest = config.manifest_path();
    write_manifest(&records, &manifest)?;
    debug!("Wrote manifest {}", manifest.display());

    Ok(Summary {
        folders_processed: records.len(),
        files_copied,
        bytes_copied,
        manifest,
        records,
    })
}

fn read_metadata(path: &Path) -> Result<crate::extraction::AcquisitionMetadata> {
    let dcm = open_file(path)?;
    Ok(extract_acquisition_metadata(&dcm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::find_dicom_folders;
    use crate::discovery::tests::{write_dicom, write_test_dicom};
    use crate::extraction::tags::{
        get_string_value, COLUMNS, MODALITY, PATIENT_NAME, PIXEL_SPACING, ROWS,
    };
    use dicom_core::{DataElement, PrimitiveValue, VR};
    use dicom_object::InMemDicomObject;
    use tempfile::TempDir;

    fn write_ct_slice(path: &Path, uid: &str) {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(MODALITY, VR::CS, PrimitiveValue::from("CT")));
        obj.put(DataElement::new(
            PATIENT_NAME,
            VR::PN,
            PrimitiveValue::from("ROE^RICHARD"),
        ));
        obj.put(DataElement::new(ROWS, VR::US, PrimitiveValue::from(512_u16)));
        obj.put(DataElement::new(COLUMNS, VR::US, PrimitiveValue::from(512_u16)));
        obj.put(DataElement::new(
            PIXEL_SPACING,
            VR::DS,
            PrimitiveValue::Strs(vec!["0.5".to_string(), "0.5".to_string()].into()),
        ));
        write_dicom(path, obj, uid);
    }

    #[test]
    fn test_run_renumbers_folders_and_files() {
        let source = TempDir::new().unwrap();
        let destination = TempDir::new().unwrap();
        let dest_root = destination.path().join("out");

        fs::create_dir_all(source.path().join("b")).unwrap();
        fs::create_dir_all(source.path().join("a")).unwrap();
        write_test_dicom(&source.path().join("b/one"), "B^ONE");
        write_test_dicom(&source.path().join("a/z_last"), "A^LAST");
        write_test_dicom(&source.path().join("a/a_first"), "A^FIRST");

        let folders = find_dicom_folders(source.path()).unwrap();
        let summary = run(&folders, &PipelineConfig::new(&dest_root)).unwrap();

        assert_eq!(summary.folders_processed, 2);
        assert_eq!(summary.files_copied, 3);
        assert!(summary.bytes_copied > 0);
        assert!(summary.manifest.exists());
        assert_eq!(summary.manifest, dest_root.join("folders.xlsx"));

        // "a" sorts before "b"
        assert_eq!(summary.records[0].original, source.path().join("a"));
        assert_eq!(summary.records[0].anonymized, "0001");
        assert_eq!(summary.records[1].original, source.path().join("b"));
        assert_eq!(summary.records[1].anonymized, "0002");

        assert!(dest_root.join("0001/0001.dcm").is_file());
        assert!(dest_root.join("0001/0002.dcm").is_file());
        assert!(dest_root.join("0002/0001.dcm").is_file());
        assert!(!dest_root.join("0002/0002.dcm").exists());

        // Pseudonym follows the folder sequence
        let first = open_file(dest_root.join("0001/0002.dcm")).unwrap();
        assert_eq!(get_string_value(&first, PATIENT_NAME).as_deref(), Some("P0001"));
        let second = open_file(dest_root.join("0002/0001.dcm")).unwrap();
        assert_eq!(get_string_value(&second, PATIENT_NAME).as_deref(), Some("P0002"));

        let copied: u64 = ["0001/0001.dcm", "0001/0002.dcm", "0002/0001.dcm"]
            .iter()
            .map(|f| fs::metadata(dest_root.join(f)).unwrap().len())
            .sum();
        assert_eq!(summary.bytes_copied, copied);
    }

    #[test]
    fn test_run_extracts_metadata_from_first_file() {
        let source = TempDir::new().unwrap();
        let destination = TempDir::new().unwrap();
        write_ct_slice(&source.path().join("slice1"), "1.2.3.1");
        write_ct_slice(&source.path().join("slice2"), "1.2.3.2");

        let folders = find_dicom_folders(source.path()).unwrap();
        let config = PipelineConfig::new(destination.path()).with_metadata(true);
        let summary = run(&folders, &config).unwrap();

        let metadata = summary.records[0].metadata.as_ref().unwrap();
        assert_eq!(metadata.modality.as_deref(), Some("CT"));
        assert_eq!(
            metadata.field_of_view.map(|fov| fov.to_string()).as_deref(),
            Some("256.0 x 256.0")
        );
    }

    #[test]
    fn test_run_without_metadata_records_none() {
        let source = TempDir::new().unwrap();
        let destination = TempDir::new().unwrap();
        write_ct_slice(&source.path().join("slice1"), "1.2.3.1");

        let folders = find_dicom_folders(source.path()).unwrap();
        let summary = run(&folders, &PipelineConfig::new(destination.path())).unwrap();

        assert!(summary.records[0].metadata.is_none());
    }

    #[test]
    fn test_run_is_reproducible_with_same_seed() {
        let source = TempDir::new().unwrap();
        write_ct_slice(&source.path().join("slice1"), "1.2.3.1");
        let folders = find_dicom_folders(source.path()).unwrap();

        let sop_uid = |dest: &Path| {
            run(&folders, &PipelineConfig::new(dest).with_uid_seed(5)).unwrap();
            let dcm = open_file(dest.join("0001/0001.dcm")).unwrap();
            get_string_value(&dcm, crate::extraction::tags::SOP_INSTANCE_UID)
        };

        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        assert_eq!(sop_uid(first.path()), sop_uid(second.path()));
    }
}
