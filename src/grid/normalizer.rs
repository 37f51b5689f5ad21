//! Measurement cell normalization.
//!
//! A cell holds a decimal in `[0, 10]` with at most one fractional digit and a
//! comma as decimal separator, or nothing at all. Two functions cover the
//! lifecycle of a value:
//!
//! - [`accept`] runs on every keystroke and yields the next display value, or
//!   the previous one when the candidate cannot be made valid.
//! - [`canonicalize`] turns a display value into its stored form, so nothing
//!   persisted ends with a bare trailing comma.
//!
//! Neither function fails: rejected input simply leaves the previous value.

/// Values strictly below this are flagged when rendering and exporting
pub const THRESHOLD: f64 = 2.0;

const MAX_VALUE: u32 = 10;

/// Compute the next display value for a cell from its previous accepted value
/// and the raw contents of the input buffer.
pub fn accept(previous: &str, raw: &str) -> String {
    let mut cleaned: String = raw
        .chars()
        .map(|c| if c == '.' { ',' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();

    if cleaned.is_empty() {
        // A cleared buffer unsets the cell; a buffer of junk is ignored.
        return if raw.trim().is_empty() {
            String::new()
        } else {
            previous.to_string()
        };
    }

    if cleaned.starts_with(',') {
        cleaned.insert(0, '0');
    }

    if let Some(idx) = cleaned.find(',') {
        let (head, tail) = cleaned.split_at(idx + 1);
        cleaned = format!("{head}{}", tail.replace(',', ""));
    }

    cap_length(&mut cleaned);

    let has_comma = cleaned.contains(',');
    let (int_part, frac_part) = cleaned.split_once(',').unwrap_or((cleaned.as_str(), ""));

    let int_value: u32 = match int_part.parse() {
        Ok(v) => v,
        Err(_) => return previous.to_string(),
    };
    if int_value > MAX_VALUE {
        return previous.to_string();
    }

    // Reparsing drops leading zeros ("07" -> "7")
    let int_part = int_value.to_string();

    let mut frac: String = frac_part.chars().take(1).collect();
    if int_value == MAX_VALUE && !frac.is_empty() && frac != "0" {
        frac = "0".to_string();
    }

    let mut next = if has_comma {
        format!("{int_part},{frac}")
    } else {
        int_part
    };
    cap_length(&mut next);
    next
}

/// Truncate to 4 characters when the value starts with "1" (room for "10,0"),
/// otherwise to 3. Input is ASCII by construction.
fn cap_length(value: &mut String) {
    let max = if value.starts_with('1') { 4 } else { 3 };
    value.truncate(max);
}

/// Convert a display value into its stored form: empty, a bare integer, or
/// `integer,digit`. Tolerates arbitrary strings.
pub fn canonicalize(value: &str) -> String {
    let trimmed = value.trim();
    let Some((int_part, frac_part)) = trimmed.split_once(',') else {
        return trimmed.to_string();
    };

    let digit = frac_part
        .chars()
        .next()
        .filter(char::is_ascii_digit)
        .unwrap_or('0');
    format!("{int_part},{digit}")
}

/// A cell counts as filled when its trimmed stored value is non-empty
pub fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Numeric value of a stored or display value, if it has one
pub fn parse_value(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Form used in exported tables: bare integers gain a `,0` suffix
pub fn export_display(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.contains(',') {
        trimmed.to_string()
    } else {
        format!("{trimmed},0")
    }
}

/// Visual classification of a filled value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    Below,
    AtOrAbove,
}

impl Threshold {
    /// Classify a value. Unfilled or non-numeric values have no classification.
    pub fn classify(value: &str) -> Option<Self> {
        parse_value(value).map(|v| {
            if v < THRESHOLD {
                Threshold::Below
            } else {
                Threshold::AtOrAbove
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use proptest::test_runner::Config;

    use super::*;

    /// Every accepted value must match the cell grammar
    fn assert_valid_display(v: &str) {
        if v.is_empty() {
            return;
        }
        let max = if v.starts_with('1') { 4 } else { 3 };
        assert!(v.len() <= max, "{v:?} exceeds length cap");
        assert!(v.chars().all(|c| c.is_ascii_digit() || c == ','));
        assert!(v.matches(',').count() <= 1, "{v:?} has several commas");
        let (int_part, frac) = v.split_once(',').unwrap_or((v, ""));
        let n: u32 = int_part.parse().expect("integer part");
        assert!(n <= 10, "{v:?} out of range");
        assert!(frac.len() <= 1);
        if n == 10 {
            assert!(frac.is_empty() || frac == "0", "{v:?} above ten");
        }
    }

    #[test]
    fn test_accept_plain_values() {
        assert_eq!(accept("", "7"), "7");
        assert_eq!(accept("7", "7,"), "7,");
        assert_eq!(accept("7,", "7,5"), "7,5");
        assert_eq!(accept("", "10"), "10");
        assert_eq!(accept("10", "10,0"), "10,0");
    }

    #[test]
    fn test_accept_period_becomes_comma() {
        assert_eq!(accept("", "3.5"), "3,5");
        assert_eq!(accept("", "."), "0,");
    }

    #[test]
    fn test_accept_leading_comma_gets_zero() {
        assert_eq!(accept("", ","), "0,");
        assert_eq!(accept("", ",5"), "0,5");
    }

    #[test]
    fn test_accept_nine_to_ten() {
        assert_eq!(accept("9", "10"), "10");
    }

    #[test]
    fn test_accept_ten_forces_zero_fraction() {
        assert_eq!(accept("10,0", "10,9"), "10,0");
        assert_eq!(accept("10,", "10,5"), "10,0");
    }

    #[test]
    fn test_accept_rejects_out_of_range() {
        assert_eq!(accept("5", "11"), "5");
        assert_eq!(accept("9", "99"), "9");
        assert_eq!(accept("1,5", "1000"), "1,5");
    }

    #[test]
    fn test_accept_rejects_junk_keeps_previous() {
        assert_eq!(accept("5", "abc"), "5");
        assert_eq!(accept("", "-"), "");
        assert_eq!(accept("3,5", "x"), "3,5");
    }

    #[test]
    fn test_accept_cleared_buffer_unsets() {
        assert_eq!(accept("5", ""), "");
        assert_eq!(accept("5", "  "), "");
    }

    #[test]
    fn test_accept_strips_foreign_characters() {
        assert_eq!(accept("", "4a"), "4");
        assert_eq!(accept("", " 2,5 "), "2,5");
        assert_eq!(accept("", "-3"), "3");
    }

    #[test]
    fn test_accept_collapses_commas() {
        assert_eq!(accept("", "1,,5"), "1,5");
        assert_eq!(accept("", "2,3,4"), "2,3");
    }

    #[test]
    fn test_accept_drops_leading_zeros() {
        assert_eq!(accept("", "07"), "7");
        assert_eq!(accept("", "00"), "0");
        assert_eq!(accept("", "010"), "10");
    }

    #[test]
    fn test_accept_truncates_fraction() {
        assert_eq!(accept("", "5,55"), "5,5");
        assert_eq!(accept("", "1,55"), "1,5");
        assert_eq!(accept("", "10,05"), "10,0");
    }

    #[test]
    fn test_accept_is_idempotent_on_valid_values() {
        for v in ["", "0", "0,", "3,", "3,5", "7", "9,9", "10", "10,", "10,0", "1,0"] {
            assert_eq!(accept(v, v), v, "accept({v:?}, {v:?})");
        }
    }

    #[test]
    fn test_accept_output_grammar() {
        let inputs = [
            "", "0", ",", ".", "..", "1", "10", "100", "10,5", "10.9", "9,99", "099",
            "abc", "5a,b7", "1,1,1", "-1", "1e3", "0000", "007,7", " ,", "12", "10,",
            "01,5", "9.", "٣", "½",
        ];
        for prev in ["", "5", "10,0"] {
            for raw in inputs {
                let next = accept(prev, raw);
                if next != prev {
                    assert_valid_display(&next);
                }
            }
        }
    }

    proptest! {
        #![proptest_config(Config::with_cases(512))]
        #[test]
        fn accept_yields_previous_or_valid_display(
            prev in "[0-9,. a-z]{0,5}|\\PC{0,5}",
            raw in "[0-9,. a-z-]{0,8}|\\PC{0,8}"
        ) {
            let next = accept(&prev, &raw);
            if next != prev {
                assert_valid_display(&next);
            }
        }

        #[test]
        fn accept_keeps_valid_values(v in "([0-9](,[0-9]?)?|10(,0?)?)?") {
            prop_assert_eq!(accept(&v, &v), v);
        }

        #[test]
        fn canonicalize_is_idempotent_on_any_string(v in "[0-9, a-z]{0,8}|\\PC{0,8}") {
            let once = canonicalize(&v);
            prop_assert_eq!(canonicalize(&once), once);
        }
    }

    #[test]
    fn test_canonicalize_examples() {
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize("   "), "");
        assert_eq!(canonicalize("7"), "7");
        assert_eq!(canonicalize("7,"), "7,0");
        assert_eq!(canonicalize("3,5"), "3,5");
        assert_eq!(canonicalize(" 3,5 "), "3,5");
    }

    #[test]
    fn test_canonicalize_tolerates_raw_strings() {
        assert_eq!(canonicalize("3,57"), "3,5");
        assert_eq!(canonicalize("3,,5"), "3,0");
        assert_eq!(canonicalize("3,x"), "3,0");
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        for v in ["", "7", "7,", "3,5", "3,57", "3,,5", " 9 ", "0,", "abc", "1,2,3"] {
            let once = canonicalize(v);
            assert_eq!(canonicalize(&once), once, "canonicalize({v:?})");
        }
    }

    #[test]
    fn test_is_filled() {
        assert!(!is_filled(None));
        assert!(!is_filled(Some("")));
        assert!(!is_filled(Some("  ")));
        assert!(is_filled(Some("0")));
        assert!(is_filled(Some("3,5")));
    }

    #[test]
    fn test_threshold_classification() {
        assert_eq!(Threshold::classify(""), None);
        assert_eq!(Threshold::classify("1,9"), Some(Threshold::Below));
        assert_eq!(Threshold::classify("0"), Some(Threshold::Below));
        assert_eq!(Threshold::classify("2"), Some(Threshold::AtOrAbove));
        assert_eq!(Threshold::classify("2,0"), Some(Threshold::AtOrAbove));
        assert_eq!(Threshold::classify("10,0"), Some(Threshold::AtOrAbove));
        assert_eq!(Threshold::classify("1,"), Some(Threshold::Below));
    }

    #[test]
    fn test_export_display() {
        assert_eq!(export_display(""), "");
        assert_eq!(export_display("7"), "7,0");
        assert_eq!(export_display("7,5"), "7,5");
    }
}
