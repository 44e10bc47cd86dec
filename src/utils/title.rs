// src/utils/title.rs

//! Course title normalization and fuzzy matching.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));

static PART_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bpart\s*[-:.]?\s*(\d+)").expect("static part pattern")
});

/// HTML entities the source CMS leaks into titles.
const ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&#038;", "&"),
    ("&#38;", "&"),
    ("&quot;", "\""),
    ("&#034;", "\""),
    ("&#34;", "\""),
    ("&#8220;", "\""),
    ("&#8221;", "\""),
    ("&#039;", "'"),
    ("&#39;", "'"),
    ("&#8216;", "'"),
    ("&#8217;", "'"),
];

/// Canonicalize a display title for comparison.
///
/// Steps run in a fixed order: lowercase, dash unification, parenthesis
/// stripping, whitespace collapsing, `part N` spacing, entity decoding, trim.
/// The result is a fixed point: normalizing it again changes nothing.
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let dashed = lowered.replace(['\u{2013}', '\u{2014}'], "-");
    let unparenthesized = dashed.replace(['(', ')'], "");
    let collapsed = WHITESPACE.replace_all(&unparenthesized, " ");
    let parts = PART_NUMBER.replace_all(&collapsed, "part $1");
    decode_entities(&parts).trim().to_string()
}

/// Decode the known entity set until nothing changes, so `&amp;amp;` and
/// friends settle in one call.
fn decode_entities(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = ENTITIES
            .iter()
            .fold(current.clone(), |acc, (entity, plain)| acc.replace(entity, plain));
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Whether two titles name the same course.
///
/// Equal normalized forms match, and so does one containing the other, which
/// tolerates truncated subtitles at the cost of some false positives.
pub fn titles_match(a: &str, b: &str) -> bool {
    let a = normalize_title(a);
    let b = normalize_title(b);
    if a == b {
        return true;
    }
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_normalization() {
        assert_eq!(
            normalize_title("  Intro  To   (Advanced) Widgets "),
            "intro to advanced widgets"
        );
    }

    #[test]
    fn test_dashes_unified() {
        assert_eq!(normalize_title("Widgets \u{2013} Basics"), "widgets - basics");
        assert_eq!(normalize_title("Widgets\u{2014}Basics"), "widgets-basics");
    }

    #[test]
    fn test_part_variants() {
        for title in ["Sales Part1", "Sales part 1", "Sales PART-1", "Sales Part: 1", "Sales (Part 1)"] {
            assert_eq!(normalize_title(title), "sales part 1", "{title}");
        }
        assert_eq!(normalize_title("Counterpart 2"), "counterpart 2");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(normalize_title("Tips &#038; Tricks"), "tips & tricks");
        assert_eq!(normalize_title("Founder&#8217;s Guide"), "founder's guide");
        assert_eq!(normalize_title("The &#8220;Big&#8221; Idea"), "the \"big\" idea");
        assert_eq!(normalize_title("A &amp;amp; B"), "a & b");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let samples = [
            "Widgets 101 \u{2014} (Part2)",
            "  Tips &amp;#038; Tricks  ",
            "PART   -  7 of the Series",
            "&#8216;Quoted&#8217;   title",
            "",
            "   ",
            "Ünïcödé Títle (Part 3)",
        ];
        for s in samples {
            let once = normalize_title(s);
            assert_eq!(normalize_title(&once), once, "{s:?}");
        }
    }

    #[test]
    fn test_titles_match_equal_and_contained() {
        assert!(titles_match("Widgets 101", "widgets 101"));
        assert!(titles_match("Widgets 101", "Widgets 101: The Complete Guide"));
        assert!(titles_match("Widgets 101: The Complete Guide", "Widgets 101"));
        assert!(!titles_match("Widgets 101", "Gadgets 201"));
    }

    #[test]
    fn test_empty_title_never_contains_match() {
        assert!(!titles_match("", "Widgets 101"));
        assert!(!titles_match("( )", "Widgets 101"));
        assert!(titles_match("", "  "));
    }
}
