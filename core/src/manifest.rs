//! Folder mapping manifest written as a spreadsheet

use crate::error::Result;
use crate::extraction::AcquisitionMetadata;
use log::warn;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};

/// Default manifest file name inside the destination root
pub const DEFAULT_MANIFEST_NAME: &str = "folders.xlsx";

/// One processed source folder and the name it was given
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct FolderRecord {
    /// Source folder path as discovered
    pub original: PathBuf,

    /// Four-digit destination folder name
    pub anonymized: String,

    /// Metadata of the folder's first file, when extraction is enabled
    pub metadata: Option<AcquisitionMetadata>,
}

impl FolderRecord {
    pub fn new(original: PathBuf, anonymized: String) -> Self {
        Self {
            original,
            anonymized,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: AcquisitionMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A manifest cell
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
}

const BASE_COLUMNS: [&str; 2] = ["Original", "Anonymized"];

const METADATA_COLUMNS: [&str; 13] = [
    "Modality",
    "FOV",
    "SliceThickness",
    "KVP",
    "ExposureTime",
    "XRayTubeCurrent",
    "CTDIvol",
    "BitsStored",
    "Rows",
    "Columns",
    "Manufacturer",
    "ManufacturerModelName",
    "SoftwareVersions",
];

/// Cells of the metadata columns, in [`METADATA_COLUMNS`] order
fn metadata_cells(metadata: &AcquisitionMetadata) -> [Option<Cell>; 13] {
    let text = |value: &Option<String>| value.clone().map(Cell::Text);
    let number = |value: Option<f64>| value.map(Cell::Number);
    let count = |value: Option<u16>| value.map(|v| Cell::Number(v as f64));

    [
        text(&metadata.modality),
        metadata.field_of_view.map(|fov| Cell::Text(fov.to_string())),
        number(metadata.slice_thickness),
        number(metadata.kvp),
        number(metadata.exposure_time),
        number(metadata.tube_current),
        number(metadata.ctdi_vol),
        count(metadata.bits_stored),
        count(metadata.rows),
        count(metadata.columns),
        text(&metadata.manufacturer),
        text(&metadata.model),
        text(&metadata.software_versions),
    ]
}

/// Writes one row per folder to the spreadsheet at `path`
///
/// Metadata columns are present only if at least one record carries
/// metadata. Missing values leave the cell empty.
///
/// # Errors
///
/// Returns an error if the workbook cannot be saved.
pub fn write_manifest(records: &[FolderRecord], path: &Path) -> Result<()> {
    let with_metadata = records.iter().any(|r| r.metadata.is_some());

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_rows(worksheet, records, with_metadata)?;
    workbook.save(path)?;

    Ok(())
}

fn write_rows(
    worksheet: &mut Worksheet,
    records: &[FolderRecord],
    with_metadata: bool,
) -> Result<()> {
    let header = Format::new().set_bold();

    let mut columns: Vec<&str> = BASE_COLUMNS.to_vec();
    if with_metadata {
        columns.extend(METADATA_COLUMNS);
    }
    for (col, name) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        worksheet.write_string(row, 0, path_text(&record.original))?;
        worksheet.write_string(row, 1, record.anonymized.as_str())?;

        let Some(metadata) = record.metadata.as_ref().filter(|_| with_metadata) else {
            continue;
        };
        for (offset, cell) in metadata_cells(metadata).into_iter().enumerate() {
            let col = (BASE_COLUMNS.len() + offset) as u16;
            match cell {
                Some(Cell::Text(value)) => {
                    worksheet.write_string(row, col, value)?;
                }
                Some(Cell::Number(value)) => {
                    worksheet.write_number(row, col, value)?;
                }
                None => {}
            }
        }
    }

    Ok(())
}

/// Spreadsheet text of a path, with non-UTF-8 bytes replaced
fn path_text(path: &Path) -> String {
    if path.to_str().is_none() {
        warn!(
            "Path {} is not valid UTF-8; the manifest records it with replacement characters",
            path.display()
        );
    }
    path.to_string_lossy().into_owned()
}
