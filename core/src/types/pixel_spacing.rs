use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Pixel spacing in millimeters (row, column)
///
/// `row` is the spacing between adjacent rows (vertical), `col` the
/// spacing between adjacent columns (horizontal), in the order
/// PixelSpacing (0028,0030) stores them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct PixelSpacing {
    pub row: f64,
    pub col: f64,
}

impl PixelSpacing {
    /// Creates a new PixelSpacing
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// Creates an isotropic spacing from a single scalar
    pub fn uniform(spacing: f64) -> Self {
        Self {
            row: spacing,
            col: spacing,
        }
    }

    /// Computes the physical extent of a `rows` x `columns` grid
    pub fn field_of_view(&self, rows: u16, columns: u16) -> FieldOfView {
        FieldOfView {
            width: round_one_decimal(columns as f64 * self.row),
            height: round_one_decimal(rows as f64 * self.col),
        }
    }
}

impl fmt::Display for PixelSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} mm", self.row, self.col)
    }
}

/// Physical extent of an image grid in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct FieldOfView {
    pub width: f64,
    pub height: f64,
}

impl fmt::Display for FieldOfView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} x {:.1}", self.width, self.height)
    }
}

/// Extracts every decimal number from a DICOM multi-value string
pub(crate) fn parse_numbers(s: &str) -> Result<Vec<f64>, String> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"[-+]?\d*\.?\d+(?:[eE][-+]?\d+)?").expect("Failed to compile regex")
    });

    re.find_iter(s)
        .map(|m| {
            m.as_str()
                .parse::<f64>()
                .map_err(|e| format!("Failed to parse '{}': {}", m.as_str(), e))
        })
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers_backslash_separator() {
        assert_eq!(parse_numbers("0.5\\0.5").unwrap(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_parse_numbers_space_separator() {
        assert_eq!(
            parse_numbers("0.703125 0.703125").unwrap(),
            vec![0.703125, 0.703125]
        );
    }

    #[test]
    fn test_parse_numbers_array_format() {
        assert_eq!(parse_numbers("[0.1, 0.2]").unwrap(), vec![0.1, 0.2]);
    }

    #[test]
    fn test_parse_numbers_exponential_notation() {
        assert_eq!(parse_numbers("1.5e-1\\1.5e+1").unwrap(), vec![0.15, 15.0]);
    }

    #[test]
    fn test_parse_numbers_without_digits() {
        assert!(parse_numbers("invalid").unwrap().is_empty());
        assert!(parse_numbers("").unwrap().is_empty());
        assert_eq!(parse_numbers("0.1").unwrap(), vec![0.1]);
    }

    #[test]
    fn test_field_of_view_square_grid() {
        let fov = PixelSpacing::new(0.5, 0.5).field_of_view(512, 512);
        assert_eq!(fov.to_string(), "256.0 x 256.0");
    }

    #[test]
    fn test_field_of_view_uses_row_spacing_for_width() {
        // columns x row spacing by rows x column spacing
        let fov = PixelSpacing::new(0.5, 0.25).field_of_view(400, 200);
        assert_eq!(fov.width, 100.0);
        assert_eq!(fov.height, 100.0);
    }

    #[test]
    fn test_field_of_view_rounds_to_one_decimal() {
        let fov = PixelSpacing::uniform(0.703125).field_of_view(512, 512);
        assert_eq!(fov.to_string(), "360.0 x 360.0");

        let fov = PixelSpacing::uniform(0.3333).field_of_view(100, 100);
        assert_eq!(fov.to_string(), "33.3 x 33.3");
    }
}
