use xxhash_rust::xxh3::xxh3_128_with_seed;

/// Root for UIDs derived from a 128-bit integer (ISO/IEC 9834-8)
const UUID_DERIVED_ROOT: &str = "2.25";

/// Maps original UIDs to substitutes under the `2.25` root
///
/// The mapping is a keyed hash: one seed gives the same substitute for the
/// same UID across every file of a run.
#[derive(Debug, Clone, Copy)]
pub struct UidRemapper {
    seed: u64,
}

impl UidRemapper {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Substitute for `uid`; empty UIDs stay empty
    pub fn replace(&self, uid: &str) -> String {
        let uid = uid.trim_end_matches(&['\0', ' '][..]).trim();
        if uid.is_empty() {
            return String::new();
        }

        let hash = xxh3_128_with_seed(uid.as_bytes(), self.seed);
        format!("{}.{}", UUID_DERIVED_ROOT, hash)
    }
}
