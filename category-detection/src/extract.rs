//! Tolerant extraction of structured answers from free-form model output.
//!
//! The model is asked for a bare number or keyword list but routinely wraps
//! the answer in prose ("카테고리는 1번입니다", "Score: 85/100"). These
//! functions mine the text for a usable signal and fall back to a fixed value
//! when none is found. None of them can fail.

use tracing::debug;

use crate::model::{Category, CategoryId, ConfidenceScore, KeywordSet};

/// Explicit "no category fits" answer. Takes priority over any digits.
pub const NONE_TOKEN: &str = "NONE";

/// ASCII comma and the full-width comma used by CJK input methods.
const KEYWORD_SEPARATORS: [char; 2] = [',', '\u{FF0C}'];

/// Concatenates every ASCII digit of `text`.
///
/// Several numbers collapse into one ("1 or 2" → "12"); the extractors accept
/// this approximation instead of searching multiple candidates.
fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Finds the category id the model answered with.
///
/// Checked in order, first match wins:
/// 1. blank answer or one containing `NONE` (any case) → `None`
/// 2. all digits concatenated, if they form a known id → that id
/// 3. first category (in the given order) whose name appears in the answer, case-insensitively
///
/// A digit run too long for [`CategoryId`] skips step 2. Blank category names never match.
pub fn extract_category_id(response: &str, categories: &[Category]) -> Option<CategoryId> {
    let normalized = response.trim().to_uppercase();
    if normalized.is_empty() || normalized.contains(NONE_TOKEN) {
        return None;
    }

    let digits = digits_only(&normalized);
    if !digits.is_empty() {
        match digits.parse::<CategoryId>() {
            Ok(id) if categories.iter().any(|c| c.id == id) => return Some(id),
            Ok(id) => debug!(id, "numeric answer is not a known category id"),
            Err(e) => debug!(error = %e, digits = %digits, "numeric answer does not fit an id"),
        }
    }

    categories
        .iter()
        .find(|c| !c.name.trim().is_empty() && normalized.contains(&c.name.to_uppercase()))
        .map(|c| c.id)
}

/// Reads a 0-100 score and scales it to `[0.0, 1.0]`.
///
/// Blank input, input without digits, and digit runs that overflow a 32-bit
/// integer all yield [`ConfidenceScore::NEUTRAL`]. Parsed values are clamped
/// to 0-100 before scaling.
pub fn parse_confidence_score(response: &str) -> ConfidenceScore {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return ConfidenceScore::NEUTRAL;
    }

    match digits_only(trimmed).parse::<i32>() {
        Ok(raw) => ConfidenceScore::from_percent(i64::from(raw)),
        Err(_) => {
            debug!(response = %trimmed, "no usable confidence number");
            ConfidenceScore::NEUTRAL
        }
    }
}

/// Splits a comma-separated keyword answer.
///
/// Pieces are trimmed; single characters are dropped as noise. Order and
/// duplicates are kept as the model returned them.
pub fn parse_keywords(response: &str) -> KeywordSet {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    trimmed
        .split(KEYWORD_SEPARATORS)
        .map(str::trim)
        .filter(|k| k.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category::new(1, "Deploy", "Build and deployment pipelines"),
            Category::new(2, "Network", "Firewalls, VPN and DNS"),
            Category::new(12, "Database", "Schemas and query tuning"),
        ]
    }

    #[test]
    fn none_wins_over_digits() {
        let cats = categories();
        assert_eq!(extract_category_id("NONE", &cats), None);
        assert_eq!(extract_category_id("none of 1, 2 fit", &cats), None);
        assert_eq!(extract_category_id("  1 ... actually None  ", &cats), None);
    }

    #[test]
    fn bare_id_is_returned() {
        let cats = categories();
        for c in &cats {
            assert_eq!(extract_category_id(&c.id.to_string(), &cats), Some(c.id));
        }
    }

    #[test]
    fn id_inside_korean_sentence() {
        assert_eq!(extract_category_id("카테고리는 1번입니다", &categories()), Some(1));
    }

    #[test]
    fn multiple_numbers_collapse_into_one() {
        // "1 or 2" becomes 12, which happens to be a real id.
        assert_eq!(extract_category_id("1 or 2", &categories()), Some(12));
    }

    #[test]
    fn unknown_number_without_name_is_absent() {
        assert_eq!(extract_category_id("ID: 7", &categories()), None);
    }

    #[test]
    fn falls_back_to_name_match() {
        let cats = categories();
        assert_eq!(extract_category_id("It is about the network.", &cats), Some(2));
        // Unknown digits do not prevent the name lookup.
        assert_eq!(extract_category_id("99 - database", &cats), Some(12));
    }

    #[test]
    fn name_match_respects_category_order() {
        let cats = categories();
        assert_eq!(extract_category_id("deploy over the network", &cats), Some(1));
    }

    #[test]
    fn overflowing_digits_fall_through_to_names() {
        let text = format!("{} deploy", "9".repeat(40));
        assert_eq!(extract_category_id(&text, &categories()), Some(1));
    }

    #[test]
    fn blank_answer_and_blank_names_never_match() {
        let cats = vec![Category::new(5, "  ", "")];
        assert_eq!(extract_category_id("", &cats), None);
        assert_eq!(extract_category_id("anything at all", &cats), None);
    }

    #[test]
    fn confidence_is_scaled() {
        assert_eq!(parse_confidence_score("85").value(), 0.85);
        assert_eq!(parse_confidence_score("Score: 70 points").value(), 0.7);
        assert_eq!(parse_confidence_score("0").value(), 0.0);
    }

    #[test]
    fn confidence_clamps_out_of_range() {
        assert_eq!(parse_confidence_score("150").value(), 1.0);
        // The minus sign is not a digit, so "-20" reads as 20.
        assert_eq!(parse_confidence_score("-20").value(), 0.2);
    }

    #[test]
    fn confidence_defaults_to_neutral() {
        for input in ["", "   ", "very confident", "99999999999999"] {
            assert_eq!(parse_confidence_score(input), ConfidenceScore::NEUTRAL, "{input:?}");
        }
    }

    #[test]
    fn confidence_is_always_in_unit_range() {
        for input in ["1", "100", "101", "2147483647", "x1y2z3", "８５"] {
            let v = parse_confidence_score(input).value();
            assert!((0.0..=1.0).contains(&v), "{input:?} -> {v}");
        }
    }

    #[test]
    fn keywords_are_split_and_trimmed() {
        assert_eq!(
            parse_keywords("Jenkins, Docker, CI"),
            vec!["Jenkins", "Docker", "CI"]
        );
    }

    #[test]
    fn single_characters_are_dropped() {
        assert_eq!(parse_keywords("a, bb"), vec!["bb"]);
        assert!(parse_keywords("").is_empty());
        assert!(parse_keywords(" , ,").is_empty());
    }

    #[test]
    fn full_width_comma_and_duplicates() {
        assert_eq!(
            parse_keywords("배포，오류, 배포 ,젠"),
            vec!["배포", "오류", "배포"]
        );
    }
}
