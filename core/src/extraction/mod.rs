pub mod acquisition;
pub mod tags;

pub use acquisition::{extract_acquisition_metadata, extract_field_of_view, AcquisitionMetadata};
pub use tags::*;
