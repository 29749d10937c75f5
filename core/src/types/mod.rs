//! Core type definitions for deidcopy
//!
//! - [`SequenceNumber`]: 1-based position used to name folders, files and pseudonyms
//! - [`PixelSpacing`]: Physical spacing between pixels
//! - [`FieldOfView`]: Physical extent of an image grid

mod pixel_spacing;
mod sequence;

pub(crate) use pixel_spacing::parse_numbers;
pub use pixel_spacing::{FieldOfView, PixelSpacing};
pub use sequence::{enumerate_sequenced, SequenceNumber};
