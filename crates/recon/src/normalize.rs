//! Key normalization applied to cell values before any comparison.
//!
//! Every function takes an optional cell: a missing value becomes the
//! explicit [`NULL_SENTINEL`] before cleaning, so two missing values
//! compare equal.

/// Normalized form of a missing value.
pub const NULL_SENTINEL: &str = "NAN";

/// Default delimiter separating the anchor from the rest of a composite name.
pub const DEFAULT_NAME_DELIMITER: &str = ";";

fn stringify(value: Option<&str>) -> &str {
    value.unwrap_or(NULL_SENTINEL)
}

/// Trim surrounding whitespace and uppercase.
pub fn clean(value: Option<&str>) -> String {
    stringify(value).trim().to_uppercase()
}

/// First `;`-separated segment, cleaned.
pub fn anchor(value: Option<&str>) -> String {
    anchor_with(value, DEFAULT_NAME_DELIMITER)
}

/// First `delimiter`-separated segment, cleaned.
pub fn anchor_with(value: Option<&str>, delimiter: &str) -> String {
    let s = stringify(value);
    let head = if delimiter.is_empty() {
        s
    } else {
        s.split(delimiter).next().unwrap_or(s)
    };
    clean(Some(head))
}

/// Drop the `.0` left behind by numeric-to-text coercion, then clean.
///
/// Repeated `.0` suffixes are all removed so the function is idempotent.
pub fn strip_trailing_zero(value: Option<&str>) -> String {
    let mut s = stringify(value).trim();
    while let Some(rest) = s.strip_suffix(".0") {
        s = rest.trim_end();
    }
    clean(Some(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_trims_and_uppercases() {
        assert_eq!(clean(Some(" abc ")), "ABC");
        assert_eq!(clean(Some("\tSite_01\n")), "SITE_01");
    }

    #[test]
    fn anchor_takes_first_segment() {
        assert_eq!(anchor(Some("SITE1;extra;data")), "SITE1");
        assert_eq!(anchor(Some(" site1 ;x")), "SITE1");
        assert_eq!(anchor(Some("no-delimiter")), "NO-DELIMITER");
    }

    #[test]
    fn anchor_with_custom_delimiter() {
        assert_eq!(anchor_with(Some("A|B"), "|"), "A");
        assert_eq!(anchor_with(Some("A;B"), "|"), "A;B");
    }

    #[test]
    fn strip_trailing_zero_handles_float_artifacts() {
        assert_eq!(strip_trailing_zero(Some("12345.0")), "12345");
        assert_eq!(strip_trailing_zero(Some("12345")), "12345");
        assert_eq!(strip_trailing_zero(Some(" 12345.0 ")), "12345");
        assert_eq!(strip_trailing_zero(Some("100")), "100");
        assert_eq!(strip_trailing_zero(Some("1.05")), "1.05");
    }

    #[test]
    fn missing_values_become_sentinel() {
        assert_eq!(clean(None), NULL_SENTINEL);
        assert_eq!(anchor(None), NULL_SENTINEL);
        assert_eq!(strip_trailing_zero(None), NULL_SENTINEL);
        // literal "nan" text collapses onto the same key
        assert_eq!(clean(Some("nan")), NULL_SENTINEL);
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["  a;b ", "x.0.0", "1.0 .0", "Cell-7", "", " ;lead"] {
            let once = clean(Some(raw));
            assert_eq!(clean(Some(once.as_str())), once);

            let once = anchor(Some(raw));
            assert_eq!(anchor(Some(once.as_str())), once);

            let once = strip_trailing_zero(Some(raw));
            assert_eq!(strip_trailing_zero(Some(once.as_str())), once);
        }
    }
}
