use dicom_core::Tag;
use dicom_object::InMemDicomObject;

use crate::types::parse_numbers;

// Image Tags
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);

// Image Geometry Tags
pub const ROWS: Tag = Tag(0x0028, 0x0010);
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
pub const BITS_STORED: Tag = Tag(0x0028, 0x0101);
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);

// Acquisition Tags
pub const SLICE_THICKNESS: Tag = Tag(0x0018, 0x0050);
pub const KVP: Tag = Tag(0x0018, 0x0060);
pub const EXPOSURE_TIME: Tag = Tag(0x0018, 0x1150);
pub const XRAY_TUBE_CURRENT: Tag = Tag(0x0018, 0x1151);
pub const CTDI_VOL: Tag = Tag(0x0018, 0x9345);

// Device/Manufacturer Tags
pub const MANUFACTURER: Tag = Tag(0x0008, 0x0070);
pub const MANUFACTURER_MODEL_NAME: Tag = Tag(0x0008, 0x1090);
pub const SOFTWARE_VERSIONS: Tag = Tag(0x0018, 0x1020);

// Patient Tags
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim_end_matches(&['\0', ' '][..]).trim().to_string())
}

/// Helper to get u16 value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to u16
pub fn get_u16_value(dcm: &InMemDicomObject, tag: Tag) -> Option<u16> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<u16>().ok())
}

/// Helper to get the first numeric value of a DICOM tag
///
/// Handles binary numbers as well as DS/IS strings. Returns `None` if the
/// tag is absent, empty or not numeric.
pub fn get_float_value(dcm: &InMemDicomObject, tag: Tag) -> Option<f64> {
    get_multi_float_value(dcm, tag).and_then(|values| values.first().copied())
}

/// Helper to get every numeric value of a multi-valued DICOM tag
///
/// Returns `None` if the tag is absent or holds no number
pub fn get_multi_float_value(dcm: &InMemDicomObject, tag: Tag) -> Option<Vec<f64>> {
    let elem = dcm.element(tag).ok()?;
    let values = match elem.to_multi_float64() {
        Ok(values) => values,
        // Fallback: pull the numbers out of the raw string
        Err(_) => parse_numbers(&elem.to_str().ok()?).ok()?,
    };

    (!values.is_empty()).then_some(values)
}
