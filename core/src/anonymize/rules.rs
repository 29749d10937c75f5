use crate::extraction::tags::{PATIENT_BIRTH_DATE, PATIENT_NAME};
use crate::types::SequenceNumber;
use dicom_core::{DataElement, PrimitiveValue, Tag};
use dicom_object::InMemDicomObject;
use std::fmt;

/// Birth date written in place of the original (YYYYMMDD)
pub const TRUNCATED_BIRTH_DATE: &str = "19000101";

type RuleFn = Box<dyn Fn(&mut InMemDicomObject, Tag)>;

/// Caller-supplied handling for one attribute
///
/// Replaces the default policy action for `tag`.
pub struct OverrideRule {
    tag: Tag,
    apply: RuleFn,
}

impl OverrideRule {
    pub fn new(tag: Tag, apply: impl Fn(&mut InMemDicomObject, Tag) + 'static) -> Self {
        Self {
            tag,
            apply: Box::new(apply),
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Runs the rule against `dcm`
    pub fn apply(&self, dcm: &mut InMemDicomObject) {
        (self.apply)(dcm, self.tag)
    }
}

impl fmt::Debug for OverrideRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideRule")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

/// Sets Patient's Name to the folder pseudonym, e.g. `P0007`
pub fn pseudonym_rule(sequence: SequenceNumber, prefix: &str) -> OverrideRule {
    let pseudonym = sequence.pseudonym(prefix);
    OverrideRule::new(PATIENT_NAME, move |dcm, tag| {
        replace_present_value(dcm, tag, &pseudonym)
    })
}

/// Truncates Patient's Birth Date to [`TRUNCATED_BIRTH_DATE`]
pub fn birth_date_rule() -> OverrideRule {
    OverrideRule::new(PATIENT_BIRTH_DATE, |dcm, tag| {
        replace_present_value(dcm, tag, TRUNCATED_BIRTH_DATE)
    })
}

/// Overwrites the value of `tag` keeping its VR, if the attribute exists
pub fn replace_present_value(dcm: &mut InMemDicomObject, tag: Tag, value: &str) {
    if let Some(vr) = dcm.element(tag).ok().map(|elem| elem.vr()) {
        dcm.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
    }
}
