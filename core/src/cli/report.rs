use crate::pipeline::Summary;
use std::fmt;
use std::path::PathBuf;

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Formats a byte count in the largest unit below it
///
/// Bytes are shown as an integer, larger units with two decimals.
pub fn format_size(bytes: u64) -> String {
    if bytes < KB {
        format!("{} bytes", bytes)
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    }
}

/// Text report of a finished run
pub struct SummaryReport<'a> {
    summary: &'a Summary,
}

impl<'a> SummaryReport<'a> {
    pub fn new(summary: &'a Summary) -> Self {
        Self { summary }
    }
}

impl<'a> fmt::Display for SummaryReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Statistics:")?;
        writeln!(
            f,
            "Total DICOM folders processed: {}",
            self.summary.folders_processed
        )?;
        writeln!(
            f,
            "Total images copied and anonymized: {}",
            self.summary.files_copied
        )?;
        writeln!(
            f,
            "Total size of all datasets: {}",
            format_size(self.summary.bytes_copied)
        )?;
        write!(f, "Manifest: {}", self.summary.manifest.display())
    }
}

/// Qualifying folders, one per line
pub struct FolderListReport<'a> {
    folders: &'a [PathBuf],
}

impl<'a> FolderListReport<'a> {
    pub fn new(folders: &'a [PathBuf]) -> Self {
        Self { folders }
    }
}

impl<'a> fmt::Display for FolderListReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, folder) in self.folders.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", folder.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0 bytes")]
    #[case(500, "500 bytes")]
    #[case(1023, "1023 bytes")]
    #[case(1024, "1.00 KB")]
    #[case(2048, "2.00 KB")]
    #[case(1536, "1.50 KB")]
    #[case(5 * 1024 * 1024, "5.00 MB")]
    #[case(3 * 1024 * 1024 * 1024, "3.00 GB")]
    fn test_format_size(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(format_size(bytes), expected);
    }

    #[test]
    fn test_summary_report_format() {
        let summary = Summary {
            folders_processed: 2,
            files_copied: 7,
            bytes_copied: 2048,
            manifest: PathBuf::from("/out/folders.xlsx"),
            records: Vec::new(),
        };

        let output = SummaryReport::new(&summary).to_string();

        assert!(output.starts_with("Statistics:"));
        assert!(output.contains("Total DICOM folders processed: 2"));
        assert!(output.contains("Total images copied and anonymized: 7"));
        assert!(output.contains("Total size of all datasets: 2.00 KB"));
        assert!(output.contains("Manifest: /out/folders.xlsx"));
    }

    #[test]
    fn test_folder_list_report() {
        let folders = vec![PathBuf::from("/data/a"), PathBuf::from("/data/b")];
        assert_eq!(
            FolderListReport::new(&folders).to_string(),
            "/data/a\n/data/b"
        );
    }
}
