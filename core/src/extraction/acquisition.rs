use crate::types::{FieldOfView, PixelSpacing};
use dicom_object::InMemDicomObject;

use super::tags::{
    get_float_value, get_multi_float_value, get_string_value, get_u16_value, BITS_STORED,
    COLUMNS, CTDI_VOL, EXPOSURE_TIME, KVP, MANUFACTURER, MANUFACTURER_MODEL_NAME, MODALITY,
    PIXEL_SPACING, ROWS, SLICE_THICKNESS, SOFTWARE_VERSIONS, XRAY_TUBE_CURRENT,
};

/// Modalities for which a field of view is derived
const CT_MODALITIES: &[&str] = &["CT"];

/// Acquisition metadata recorded in the manifest for one folder
///
/// Every field is optional: an attribute missing from the file is left out
/// of the manifest rather than defaulted.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct AcquisitionMetadata {
    pub modality: Option<String>,
    pub field_of_view: Option<FieldOfView>,
    pub slice_thickness: Option<f64>,
    pub kvp: Option<f64>,
    pub exposure_time: Option<f64>,
    pub tube_current: Option<f64>,
    pub ctdi_vol: Option<f64>,
    pub bits_stored: Option<u16>,
    pub rows: Option<u16>,
    pub columns: Option<u16>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub software_versions: Option<String>,
}

impl AcquisitionMetadata {
    /// Whether the modality is a CT-class scan
    pub fn is_ct(&self) -> bool {
        self.modality
            .as_deref()
            .map(|m| CT_MODALITIES.contains(&m.to_uppercase().as_str()))
            .unwrap_or(false)
    }
}

/// Extracts the manifest metadata from an anonymized DICOM file
///
/// The field of view is only derived for CT; the remaining allow-listed
/// attributes are copied for any modality.
pub fn extract_acquisition_metadata(dcm: &InMemDicomObject) -> AcquisitionMetadata {
    let mut metadata = AcquisitionMetadata {
        modality: get_string_value(dcm, MODALITY).filter(|s| !s.is_empty()),
        ..Default::default()
    };

    if metadata.is_ct() {
        metadata.field_of_view = extract_field_of_view(dcm);
    }

    metadata.slice_thickness = get_float_value(dcm, SLICE_THICKNESS);
    metadata.kvp = get_float_value(dcm, KVP);
    metadata.exposure_time = get_float_value(dcm, EXPOSURE_TIME);
    metadata.tube_current = get_float_value(dcm, XRAY_TUBE_CURRENT);
    metadata.ctdi_vol = get_float_value(dcm, CTDI_VOL);
    metadata.bits_stored = get_u16_value(dcm, BITS_STORED);
    metadata.rows = get_u16_value(dcm, ROWS);
    metadata.columns = get_u16_value(dcm, COLUMNS);
    metadata.manufacturer = non_empty(get_string_value(dcm, MANUFACTURER));
    metadata.model = non_empty(get_string_value(dcm, MANUFACTURER_MODEL_NAME));
    metadata.software_versions = non_empty(get_string_value(dcm, SOFTWARE_VERSIONS));

    metadata
}

/// Derives the field of view from pixel spacing and grid size
///
/// # Algorithm
///
/// 1. Require Rows and Columns
/// 2. Two PixelSpacing values → (row, column) spacing
/// 3. Anything else → SliceThickness on both axes
/// 4. No SliceThickness → no field of view
pub fn extract_field_of_view(dcm: &InMemDicomObject) -> Option<FieldOfView> {
    let rows = get_u16_value(dcm, ROWS)?;
    let columns = get_u16_value(dcm, COLUMNS)?;

    let spacing = match get_multi_float_value(dcm, PIXEL_SPACING).as_deref() {
        Some([row, col, ..]) => PixelSpacing::new(*row, *col),
        _ => PixelSpacing::uniform(get_float_value(dcm, SLICE_THICKNESS)?),
    };

    Some(spacing.field_of_view(rows, columns))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
