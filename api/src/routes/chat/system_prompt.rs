//! System prompt for answering a chat message within a category.

use smart_search_store::ContextEntry;

const NO_CONTEXT_NOTICE: &str =
    "No context data is available. Answer based on your general knowledge about the topic.";

/// Role, context data and output-format rules for the answering model.
pub fn build_answer_prompt(category_name: &str, context: &[ContextEntry]) -> String {
    let mut out = String::new();

    out.push_str("# Role and Goal\n");
    out.push_str(&format!("You are a helpful '{category_name}' assistant. "));
    out.push_str(
        "Your primary goal is to provide accurate and easy-to-understand answers to user \
         questions based on the provided context data. The answer must be in Korean.\n\n",
    );

    out.push_str("# Context Data\n");
    out.push_str("Here is the context data you must use to answer the user's question:\n");
    if context.is_empty() {
        out.push_str(NO_CONTEXT_NOTICE);
    } else {
        let lines: Vec<String> = context.iter().map(|c| format!("- {}", c.content)).collect();
        out.push_str(&lines.join("\n"));
    }
    out.push_str("\n\n");

    out.push_str("# Response Format Instruction\n");
    out.push_str("IMPORTANT: You must follow these formatting rules for your response:\n");
    out.push_str(
        "1. **General Answers**: For general questions, provide the answer in a clear and \
         concise paragraph.\n",
    );
    out.push_str(
        "2. **Tabular Data**: If the answer is best represented as a table (comparisons, \
         lists of items with several attributes), you MUST use Markdown table syntax and no \
         other table format.\n",
    );
    out.push_str("   Example:\n");
    out.push_str("   | Header 1 | Header 2 | Header 3 |\n");
    out.push_str("   |:---|:---|:---|\n");
    out.push_str("   | Data A | Data B | Data C |\n");
    out.push_str("3. **Language**: The final output MUST be in Korean.\n");
    out.push_str("4. **Tone**: Maintain a professional and helpful tone.\n\n");

    out.push_str(
        "Now, answer the user's question based on the provided context and formatting rules.\n",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(content: &str) -> ContextEntry {
        ContextEntry {
            context_id: 1,
            category_id: 1,
            content: content.into(),
        }
    }

    #[test]
    fn lists_context_entries() {
        let p = build_answer_prompt("Deploy", &[entry("Jenkins runs nightly"), entry("Use Helm")]);
        assert!(p.contains("You are a helpful 'Deploy' assistant."));
        assert!(p.contains("- Jenkins runs nightly\n- Use Helm"));
        assert!(!p.contains(NO_CONTEXT_NOTICE));
    }

    #[test]
    fn notes_missing_context() {
        let p = build_answer_prompt("Network", &[]);
        assert!(p.contains(NO_CONTEXT_NOTICE));
        assert!(p.contains("|:---|:---|:---|"));
        assert!(p.contains("MUST be in Korean"));
    }
}
