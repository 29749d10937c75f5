use thiserror::Error;

/// Result type for deidcopy operations
pub type Result<T> = std::result::Result<T, DeidError>;

/// Error types for deidcopy operations
#[derive(Error, Debug)]
pub enum DeidError {
    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// DICOM writing error
    #[error("DICOM write error: {0}")]
    WriteError(String),

    /// Spreadsheet output error
    #[error("Manifest error: {0}")]
    ManifestError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for DeidError {
    fn from(e: dicom_object::ReadError) -> Self {
        DeidError::DicomError(format!("{}", e))
    }
}

impl From<dicom_object::WriteError> for DeidError {
    fn from(e: dicom_object::WriteError) -> Self {
        DeidError::WriteError(format!("{}", e))
    }
}

impl From<rust_xlsxwriter::XlsxError> for DeidError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        DeidError::ManifestError(format!("{}", e))
    }
}
