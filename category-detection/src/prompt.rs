//! System prompts for classification, confidence scoring and keyword extraction.
//!
//! Each prompt asks for a bare answer; the parsers in [`crate::extract`] still
//! tolerate prose around it.

use std::fmt::Write;

use crate::{extract::NONE_TOKEN, model::Category};

/// Score bands shown to the model when rating a category match.
pub const CONFIDENCE_RUBRIC: [(&str, &str); 5] = [
    ("90-100", "excellent fit: the question is squarely about this category"),
    ("70-89", "good fit: the question clearly relates to this category"),
    ("50-69", "partial fit: some overlap, but ambiguous"),
    ("30-49", "poor fit: the question and category barely match"),
    ("0-29", "no fit: unrelated"),
];

/// Lists every category and asks for a single id or `NONE`.
pub fn build_classification_prompt(categories: &[Category], user_message: &str) -> String {
    let mut out = String::new();
    out.push_str(
        "You are an expert at routing user questions to the most suitable category.\n\n",
    );

    out.push_str("Available categories:\n");
    for c in categories {
        let _ = writeln!(
            out,
            "- ID: {}, Name: {}, Description: {}",
            c.id,
            c.name.trim(),
            c.description.trim()
        );
    }

    let _ = write!(out, "\nUser question: \"{}\"\n\n", user_message.trim());
    out.push_str("Answer with the numeric ID of the best matching category only.\n");
    out.push_str("Example: 1 or 2 or 3\n");
    let _ = writeln!(out, "If no category fits, answer '{NONE_TOKEN}'.");
    let _ = write!(
        out,
        "Do not explain. Reply with the ID number or {NONE_TOKEN} and nothing else."
    );
    out
}

/// Asks for a 0-100 fit score of `category` for the question.
pub fn build_confidence_prompt(user_message: &str, category: &Category) -> String {
    let mut out = String::new();
    out.push_str(
        "Rate how well the selected category fits the user question on a 0-100 scale.\n\n",
    );
    let _ = writeln!(out, "User question: \"{}\"", user_message.trim());
    let _ = writeln!(out, "Selected category: {}", category.name.trim());
    let _ = write!(out, "Category description: {}\n\n", category.description.trim());

    out.push_str("Scoring bands:\n");
    for (band, meaning) in CONFIDENCE_RUBRIC {
        let _ = writeln!(out, "- {band}: {meaning}");
    }
    out.push_str("\nReply with the score as a number only. Example: 85");
    out
}

/// Asks for 3-7 comma-separated keywords.
pub fn build_keyword_prompt(user_message: &str) -> String {
    let mut out = String::new();
    out.push_str("Extract the key terms from the following question.\n\n");
    let _ = write!(out, "Question: \"{}\"\n\n", user_message.trim());
    out.push_str("Rules:\n");
    out.push_str("- Prefer proper nouns: project, technology and tool names\n");
    out.push_str("- Include verbs or nouns that describe the action or the problem\n");
    out.push_str("- Extract only 3-7 keywords\n");
    out.push_str("- Separate them with commas\n\n");
    out.push_str("Example: project, deployment, error, Jenkins, Docker\n");
    out.push_str("Reply with the keywords only:");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_lists_every_category() {
        let cats = vec![
            Category::new(1, "Deploy", "CI/CD"),
            Category::new(2, "Network", "VPN"),
        ];
        let p = build_classification_prompt(&cats, " why is the VPN down? ");
        assert!(p.contains("- ID: 1, Name: Deploy, Description: CI/CD"));
        assert!(p.contains("- ID: 2, Name: Network, Description: VPN"));
        assert!(p.contains("\"why is the VPN down?\""));
        assert!(p.contains(NONE_TOKEN));
    }

    #[test]
    fn confidence_prompt_has_rubric() {
        let p = build_confidence_prompt("q", &Category::new(3, "Database", "SQL"));
        assert!(p.contains("Selected category: Database"));
        for (band, _) in CONFIDENCE_RUBRIC {
            assert!(p.contains(band));
        }
    }

    #[test]
    fn keyword_prompt_quotes_question() {
        assert!(build_keyword_prompt("Jenkins build fails").contains("\"Jenkins build fails\""));
    }
}
