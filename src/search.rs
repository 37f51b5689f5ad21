//! Accent- and case-insensitive filtering of the inspection list.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::data::InspectionSummary;

/// Decompose to NFD and drop the combining marks, leaving base letters
pub(crate) fn fold_accents(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().filter(|c| !is_combining_mark(*c))
}

/// Fold accents, lower-case, and collapse every run of non-alphanumerics to a
/// single space
pub fn normalize_search(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut gap = false;
    for c in fold_accents(s) {
        if c.is_ascii_alphanumeric() {
            if gap && !out.is_empty() {
                out.push(' ');
            }
            gap = false;
            out.push(c.to_ascii_lowercase());
        } else {
            gap = true;
        }
    }
    out
}

/// Indices of the summaries whose "number name" matches the query.
/// An empty query matches everything.
pub fn filter_inspections(summaries: &[InspectionSummary], query: &str) -> Vec<usize> {
    let needle = normalize_search(query);
    summaries
        .iter()
        .enumerate()
        .filter(|(_, s)| {
            needle.is_empty()
                || normalize_search(&format!("{} {}", s.inspection.number, s.inspection.name))
                    .contains(&needle)
        })
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Inspection, MachineRoom};

    fn summary(number: i64, name: &str) -> InspectionSummary {
        InspectionSummary {
            inspection: Inspection {
                id: number,
                number,
                name: name.to_string(),
                has_fourth_layer: true,
                machine_room: MachineRoom::Unset,
                export_count: 0,
                last_image_path: None,
                last_exported_at: None,
            },
            filled: 0,
        }
    }

    #[test]
    fn test_normalize_search() {
        assert_eq!(normalize_search("  Edificio  Ñuñoa -- Torre B "), "edificio nunoa torre b");
        assert_eq!(normalize_search("Medición"), "medicion");
        assert_eq!(normalize_search("!!"), "");
    }

    #[test]
    fn test_normalize_search_decomposed_input() {
        assert_eq!(normalize_search("Medicio\u{301}n Ysla\u{301}"), "medicion ysla");
        assert_eq!(normalize_search("N\u{303}un\u{303}oa"), "nunoa");
    }

    #[test]
    fn test_normalize_search_beyond_latin1() {
        assert_eq!(normalize_search("Ýbor Šantić"), "ybor santic");
        assert_eq!(normalize_search("Łódź"), "odz");
    }

    #[test]
    fn test_filter_matches_number_and_name() {
        let list = vec![summary(12, "Torre Álamo"), summary(3, "Casa Central")];
        assert_eq!(filter_inspections(&list, ""), vec![0, 1]);
        assert_eq!(filter_inspections(&list, "alamo"), vec![0]);
        assert_eq!(filter_inspections(&list, "12 torre"), vec![0]);
        assert_eq!(filter_inspections(&list, "CENTRAL"), vec![1]);
        assert!(filter_inspections(&list, "nothing").is_empty());
        assert_eq!(filter_inspections(&list, "A\u{301}LAMO"), vec![0]);
    }
}
