//! Field-level de-identification of DICOM files
//!
//! Every attribute goes through the [default policy](policy::default_policy)
//! unless an [`OverrideRule`] claims its tag. Parsing and encoding is left
//! to `dicom-object`; the file meta group is rebuilt so that it follows the
//! replaced SOP Instance UID.

pub mod policy;
pub mod rules;
mod uid;

pub use policy::{default_action, default_policy, Action};
pub use rules::{birth_date_rule, pseudonym_rule, OverrideRule, TRUNCATED_BIRTH_DATE};
pub use uid::UidRemapper;

use crate::error::{DeidError, Result};
use crate::extraction::tags::{get_string_value, SOP_CLASS_UID, SOP_INSTANCE_UID};
use crate::types::SequenceNumber;
use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
use dicom_object::{open_file, FileMetaTable, FileMetaTableBuilder, InMemDicomObject};
use log::debug;
use std::collections::HashMap;
use std::path::Path;

/// Applies the default policy plus override rules to DICOM files
#[derive(Debug, Clone)]
pub struct Anonymizer {
    policy: HashMap<Tag, Action>,
    uids: UidRemapper,
    pseudonym_prefix: String,
}

impl Anonymizer {
    /// Creates an anonymizer with the default policy
    ///
    /// `uid_seed` keys the UID substitution; the same seed reproduces
    /// the same UIDs.
    pub fn new(uid_seed: u64, pseudonym_prefix: impl Into<String>) -> Self {
        Self {
            policy: default_policy(),
            uids: UidRemapper::new(uid_seed),
            pseudonym_prefix: pseudonym_prefix.into(),
        }
    }

    /// The two rules supplied for every file of folder `sequence`
    pub fn rules_for(&self, sequence: SequenceNumber) -> Vec<OverrideRule> {
        vec![
            pseudonym_rule(sequence, &self.pseudonym_prefix),
            birth_date_rule(),
        ]
    }

    /// De-identifies `source` into a new file at `destination`
    ///
    /// The source file is never modified.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed or the destination
    /// cannot be written.
    pub fn anonymize_file(
        &self,
        source: &Path,
        destination: &Path,
        sequence: SequenceNumber,
    ) -> Result<()> {
        let mut obj = open_file(source)?;
        let rules = self.rules_for(sequence);

        self.anonymize_dataset(&mut obj, &rules);
        let meta = self.rebuild_meta(obj.meta(), &obj)?;

        obj.into_inner()
            .with_exact_meta(meta)
            .write_to_file(destination)?;

        debug!("Anonymized {} -> {}", source.display(), destination.display());
        Ok(())
    }

    /// Applies the policy and `rules` to an in-memory dataset
    pub fn anonymize_dataset(&self, dcm: &mut InMemDicomObject, rules: &[OverrideRule]) {
        let present: Vec<(Tag, VR)> = dcm
            .iter()
            .map(|elem| (elem.header().tag, elem.vr()))
            .collect();

        for (tag, vr) in present {
            if rules.iter().any(|rule| rule.tag() == tag) {
                continue;
            }
            self.apply_action(dcm, tag, vr, default_action(&self.policy, tag));
        }

        for rule in rules {
            rule.apply(dcm);
        }
    }

    fn apply_action(&self, dcm: &mut InMemDicomObject, tag: Tag, vr: VR, action: Action) {
        match action {
            Action::Keep => {}
            Action::Remove => {
                dcm.remove_element(tag);
            }
            // Sequences have no primitive placeholder
            Action::Empty | Action::Dummy if vr == VR::SQ => {
                dcm.remove_element(tag);
            }
            Action::Empty => {
                dcm.put(DataElement::new(tag, vr, PrimitiveValue::Empty));
            }
            Action::Dummy if vr == VR::UI => self.replace_uids(dcm, tag, vr),
            Action::Dummy => {
                let value = dummy_value(vr).map_or(PrimitiveValue::Empty, PrimitiveValue::from);
                dcm.put(DataElement::new(tag, vr, value));
            }
            Action::ReplaceUid => self.replace_uids(dcm, tag, vr),
        }
    }

    fn replace_uids(&self, dcm: &mut InMemDicomObject, tag: Tag, vr: VR) {
        let current = dcm.element(tag).ok().and_then(|e| e.to_multi_str().ok());
        let replaced: Vec<String> = match current {
            Some(uids) => uids.iter().map(|uid| self.uids.replace(uid)).collect(),
            None => return,
        };

        let value = match replaced.len() {
            0 => PrimitiveValue::Empty,
            1 => PrimitiveValue::from(replaced[0].as_str()),
            _ => PrimitiveValue::Strs(replaced.into()),
        };
        dcm.put(DataElement::new(tag, vr, value));
    }

    /// File meta group for the anonymized dataset
    fn rebuild_meta(
        &self,
        original: &FileMetaTable,
        dcm: &InMemDicomObject,
    ) -> Result<FileMetaTable> {
        let sop_class_uid = get_string_value(dcm, SOP_CLASS_UID)
            .filter(|uid| !uid.is_empty())
            .unwrap_or_else(|| trim_uid(original.media_storage_sop_class_uid()).to_string());
        let sop_instance_uid = get_string_value(dcm, SOP_INSTANCE_UID)
            .filter(|uid| !uid.is_empty())
            .unwrap_or_else(|| {
                self.uids
                    .replace(trim_uid(original.media_storage_sop_instance_uid()))
            });

        FileMetaTableBuilder::new()
            .media_storage_sop_class_uid(sop_class_uid)
            .media_storage_sop_instance_uid(sop_instance_uid)
            .transfer_syntax(trim_uid(original.transfer_syntax()))
            .build()
            .map_err(|e| {
                DeidError::WriteError(format!("failed to build file meta group: {}", e))
            })
    }
}

/// Placeholder value for `vr`, or `None` for a zero-length value
fn dummy_value(vr: VR) -> Option<&'static str> {
    match vr {
        VR::DA => Some("00010101"),
        VR::TM => Some("000000.00"),
        VR::DT => Some("00010101010101.000000+0000"),
        VR::IS | VR::DS => Some("0"),
        VR::AS => Some("000Y"),
        VR::AE | VR::CS | VR::LO | VR::LT | VR::PN | VR::SH | VR::ST | VR::UC | VR::UT => {
            Some("ANONYMOUS")
        }
        _ => None,
    }
}

fn trim_uid(uid: &str) -> &str {
    uid.trim_end_matches(&['\0', ' '][..])
}
