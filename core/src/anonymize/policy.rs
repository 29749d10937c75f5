use dicom_core::Tag;
use std::collections::HashMap;

/// How the default policy treats one attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Leave the attribute untouched
    Keep,
    /// Delete the attribute
    Remove,
    /// Keep the attribute with a zero-length value
    Empty,
    /// Replace the value with a VR-appropriate dummy
    Dummy,
    /// Replace each UID with a consistent substitute
    ReplaceUid,
}

use Action::{Dummy, Empty, Remove, ReplaceUid};

/// Attributes handled by the default de-identification policy
///
/// Attributes not listed here are kept, except private attributes, curve
/// data and overlay comments which [`default_action`] always removes.
const DEFAULT_RULES: &[(Tag, Action)] = &[
    // UIDs
    (Tag(0x0004, 0x1511), ReplaceUid), // Referenced SOP Instance UID in File
    (Tag(0x0008, 0x0014), ReplaceUid), // Instance Creator UID
    (Tag(0x0008, 0x0018), ReplaceUid), // SOP Instance UID
    (Tag(0x0008, 0x0058), ReplaceUid), // Failed SOP Instance UID List
    (Tag(0x0008, 0x1155), ReplaceUid), // Referenced SOP Instance UID
    (Tag(0x0008, 0x3010), ReplaceUid), // Irradiation Event UID
    (Tag(0x0018, 0x1002), ReplaceUid), // Device UID
    (Tag(0x0020, 0x000D), ReplaceUid), // Study Instance UID
    (Tag(0x0020, 0x000E), ReplaceUid), // Series Instance UID
    (Tag(0x0020, 0x0052), ReplaceUid), // Frame of Reference UID
    (Tag(0x0020, 0x0200), ReplaceUid), // Synchronization Frame of Reference UID
    (Tag(0x0020, 0x9161), ReplaceUid), // Concatenation UID
    (Tag(0x0020, 0x9164), ReplaceUid), // Dimension Organization UID
    (Tag(0x0028, 0x1199), ReplaceUid), // Palette Color Lookup Table UID
    (Tag(0x0028, 0x1214), ReplaceUid), // Large Palette Color Lookup Table UID
    (Tag(0x0040, 0xA124), ReplaceUid), // UID
    (Tag(0x0062, 0x0021), ReplaceUid), // Tracking UID
    (Tag(0x0070, 0x031A), ReplaceUid), // Fiducial UID
    (Tag(0x0088, 0x0140), ReplaceUid), // Storage Media File-set UID
    (Tag(0x3006, 0x0024), ReplaceUid), // Referenced Frame of Reference UID
    (Tag(0x3006, 0x00C2), ReplaceUid), // Related Frame of Reference UID
    (Tag(0x300A, 0x0013), ReplaceUid), // Dose Reference UID
    // Study and series identification
    (Tag(0x0008, 0x0020), Empty),  // Study Date
    (Tag(0x0008, 0x0021), Remove), // Series Date
    (Tag(0x0008, 0x0022), Remove), // Acquisition Date
    (Tag(0x0008, 0x0023), Dummy),  // Content Date
    (Tag(0x0008, 0x002A), Remove), // Acquisition DateTime
    (Tag(0x0008, 0x0030), Empty),  // Study Time
    (Tag(0x0008, 0x0031), Remove), // Series Time
    (Tag(0x0008, 0x0032), Remove), // Acquisition Time
    (Tag(0x0008, 0x0033), Dummy),  // Content Time
    (Tag(0x0008, 0x0050), Empty),  // Accession Number
    (Tag(0x0008, 0x0201), Remove), // Timezone Offset From UTC
    (Tag(0x0008, 0x1030), Remove), // Study Description
    (Tag(0x0008, 0x103E), Remove), // Series Description
    (Tag(0x0008, 0x1080), Remove), // Admitting Diagnoses Description
    (Tag(0x0008, 0x1110), Remove), // Referenced Study Sequence
    (Tag(0x0008, 0x1111), Remove), // Referenced Performed Procedure Step Sequence
    (Tag(0x0008, 0x1120), Remove), // Referenced Patient Sequence
    (Tag(0x0008, 0x2111), Remove), // Derivation Description
    (Tag(0x0020, 0x0010), Empty),  // Study ID
    (Tag(0x0020, 0x4000), Remove), // Image Comments
    (Tag(0x0020, 0x9158), Remove), // Frame Comments
    // Institution, staff and equipment
    (Tag(0x0008, 0x0080), Remove), // Institution Name
    (Tag(0x0008, 0x0081), Remove), // Institution Address
    (Tag(0x0008, 0x0090), Empty),  // Referring Physician's Name
    (Tag(0x0008, 0x0092), Remove), // Referring Physician's Address
    (Tag(0x0008, 0x0094), Remove), // Referring Physician's Telephone Numbers
    (Tag(0x0008, 0x1010), Remove), // Station Name
    (Tag(0x0008, 0x1040), Remove), // Institutional Department Name
    (Tag(0x0008, 0x1048), Remove), // Physician(s) of Record
    (Tag(0x0008, 0x1050), Remove), // Performing Physician's Name
    (Tag(0x0008, 0x1060), Remove), // Name of Physician(s) Reading Study
    (Tag(0x0008, 0x1070), Remove), // Operators' Name
    (Tag(0x0018, 0x1000), Remove), // Device Serial Number
    (Tag(0x0018, 0x1004), Remove), // Plate ID
    (Tag(0x0018, 0x1005), Remove), // Generator ID
    (Tag(0x0018, 0x1007), Remove), // Cassette ID
    (Tag(0x0018, 0x1008), Remove), // Gantry ID
    (Tag(0x0018, 0x1030), Remove), // Protocol Name
    (Tag(0x0018, 0x700A), Dummy),  // Detector ID
    // Patient
    (Tag(0x0010, 0x0010), Dummy),  // Patient's Name
    (Tag(0x0010, 0x0020), Empty),  // Patient ID
    (Tag(0x0010, 0x0021), Remove), // Issuer of Patient ID
    (Tag(0x0010, 0x0030), Empty),  // Patient's Birth Date
    (Tag(0x0010, 0x0032), Remove), // Patient's Birth Time
    (Tag(0x0010, 0x0040), Empty),  // Patient's Sex
    (Tag(0x0010, 0x0050), Remove), // Patient's Insurance Plan Code Sequence
    (Tag(0x0010, 0x1000), Remove), // Other Patient IDs
    (Tag(0x0010, 0x1001), Remove), // Other Patient Names
    (Tag(0x0010, 0x1005), Remove), // Patient's Birth Name
    (Tag(0x0010, 0x1010), Remove), // Patient's Age
    (Tag(0x0010, 0x1020), Remove), // Patient's Size
    (Tag(0x0010, 0x1030), Remove), // Patient's Weight
    (Tag(0x0010, 0x1040), Remove), // Patient's Address
    (Tag(0x0010, 0x1060), Remove), // Patient's Mother's Birth Name
    (Tag(0x0010, 0x1080), Remove), // Military Rank
    (Tag(0x0010, 0x1090), Remove), // Medical Record Locator
    (Tag(0x0010, 0x2000), Remove), // Medical Alerts
    (Tag(0x0010, 0x2110), Remove), // Allergies
    (Tag(0x0010, 0x2150), Remove), // Country of Residence
    (Tag(0x0010, 0x2152), Remove), // Region of Residence
    (Tag(0x0010, 0x2154), Remove), // Patient's Telephone Numbers
    (Tag(0x0010, 0x2160), Remove), // Ethnic Group
    (Tag(0x0010, 0x2180), Remove), // Occupation
    (Tag(0x0010, 0x21A0), Remove), // Smoking Status
    (Tag(0x0010, 0x21B0), Remove), // Additional Patient History
    (Tag(0x0010, 0x21C0), Remove), // Pregnancy Status
    (Tag(0x0010, 0x21F0), Remove), // Patient's Religious Preference
    (Tag(0x0010, 0x2297), Remove), // Responsible Person
    (Tag(0x0010, 0x2299), Remove), // Responsible Organization
    (Tag(0x0010, 0x4000), Remove), // Patient Comments
    (Tag(0x0038, 0x0010), Remove), // Admission ID
    (Tag(0x0038, 0x0500), Remove), // Patient State
    // Request and procedure
    (Tag(0x0032, 0x1032), Remove), // Requesting Physician
    (Tag(0x0032, 0x1033), Remove), // Requesting Service
    (Tag(0x0032, 0x1060), Remove), // Requested Procedure Description
    (Tag(0x0032, 0x4000), Remove), // Study Comments
    (Tag(0x0040, 0x0006), Remove), // Scheduled Performing Physician's Name
    (Tag(0x0040, 0x0244), Remove), // Performed Procedure Step Start Date
    (Tag(0x0040, 0x0245), Remove), // Performed Procedure Step Start Time
    (Tag(0x0040, 0x0253), Remove), // Performed Procedure Step ID
    (Tag(0x0040, 0x0254), Remove), // Performed Procedure Step Description
    (Tag(0x0040, 0x0275), Remove), // Request Attributes Sequence
    (Tag(0x0040, 0x2016), Empty),  // Placer Order Number / Imaging Service Request
    (Tag(0x0040, 0x2017), Empty),  // Filler Order Number / Imaging Service Request
    // Structured content
    (Tag(0x0040, 0xA123), Dummy),  // Person Name
    (Tag(0x0040, 0xA160), Remove), // Text Value
    (Tag(0x0040, 0xA730), Remove), // Content Sequence
];

/// Builds the lookup table of the default policy
pub fn default_policy() -> HashMap<Tag, Action> {
    DEFAULT_RULES.iter().copied().collect()
}

/// Resolves the default action for `tag`
///
/// Private attributes (odd group), curve data (groups 50xx) and overlay
/// comments (60xx,4000) are removed regardless of the table.
pub fn default_action(policy: &HashMap<Tag, Action>, tag: Tag) -> Action {
    let Tag(group, element) = tag;

    if group % 2 == 1 {
        return Action::Remove;
    }
    if group & 0xFF00 == 0x5000 {
        return Action::Remove;
    }
    if group & 0xFF00 == 0x6000 && element == 0x4000 {
        return Action::Remove;
    }

    policy.get(&tag).copied().unwrap_or(Action::Keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Tag(0x0010, 0x0010), Action::Dummy)]
    #[case(Tag(0x0010, 0x0020), Action::Empty)]
    #[case(Tag(0x0008, 0x0080), Action::Remove)]
    #[case(Tag(0x0020, 0x000D), Action::ReplaceUid)]
    #[case(Tag(0x0009, 0x0010), Action::Remove)] // private creator
    #[case(Tag(0x0029, 0x1008), Action::Remove)] // private element
    #[case(Tag(0x5000, 0x3000), Action::Remove)] // curve data
    #[case(Tag(0x6002, 0x4000), Action::Remove)] // overlay comments
    #[case(Tag(0x6000, 0x3000), Action::Keep)] // overlay data
    #[case(Tag(0x0008, 0x0060), Action::Keep)] // modality
    #[case(Tag(0x0028, 0x0030), Action::Keep)] // pixel spacing
    fn test_default_action(#[case] tag: Tag, #[case] expected: Action) {
        let policy = default_policy();
        assert_eq!(default_action(&policy, tag), expected);
    }

    #[test]
    fn test_policy_has_no_duplicate_tags() {
        assert_eq!(default_policy().len(), DEFAULT_RULES.len());
    }
}
