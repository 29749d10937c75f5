use std::fmt;

/// 1-based position of a folder or file in its sorted listing
///
/// Stable only within one run: it is derived from the sort order of the
/// paths discovered at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct SequenceNumber(u32);

impl SequenceNumber {
    /// Creates a sequence number, rejecting zero
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Sequence number for the zero-based `index` of an enumeration
    ///
    /// Saturates at `u32::MAX`.
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(1)))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Destination folder name, e.g. `0001`
    pub fn folder_name(&self) -> String {
        format!("{:04}", self.0)
    }

    /// Destination file name, e.g. `0001.dcm`
    pub fn file_name(&self) -> String {
        format!("{:04}.dcm", self.0)
    }

    /// Subject pseudonym, e.g. `P0001`
    pub fn pseudonym(&self, prefix: &str) -> String {
        format!("{}{:04}", prefix, self.0)
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pairs each item with its 1-based sequence number
pub fn enumerate_sequenced<T>(
    items: impl IntoIterator<Item = T>,
) -> impl Iterator<Item = (SequenceNumber, T)> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| (SequenceNumber::from_index(index), item))
}
