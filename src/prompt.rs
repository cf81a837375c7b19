//! Prompt construction.
//!
//! Two fixed scaffolds: a plain question/answer template, and a
//! retrieval-conditioned template that instructs the model to combine the
//! supplied passages with its own knowledge instead of copying them. The
//! built prompt never carries an unfilled placeholder, and with retrieval
//! disabled no context text is attached at all.

use crate::core::errors::RagError;

const RAG_TEMPLATE: &str = "You are a helpful assistant. Use the reference passages below together \
with your own knowledge to answer the question. Do not repeat the passages verbatim.\n\n\
Reference passages:\n{passages}\n\nQuestion: {question}\nAnswer:";

const PLAIN_TEMPLATE: &str =
    "You are a helpful assistant. Answer the question below.\n\nQuestion: {question}\nAnswer:";

/// Build the prompt for one request. `context` is the newline-joined text of
/// the retrieved passages in ranked order; it is ignored entirely when
/// `rag_enabled` is false.
pub fn build(query: &str, context: Option<&str>, rag_enabled: bool) -> Result<String, RagError> {
    if query.trim().is_empty() {
        return Err(RagError::Template(
            "query is empty; refusing to build a prompt".to_string(),
        ));
    }

    if !rag_enabled {
        return Ok(PLAIN_TEMPLATE.replace("{question}", query));
    }

    let context = context.unwrap_or("");
    Ok(RAG_TEMPLATE
        .replace("{passages}", context)
        .replace("{question}", query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_is_a_template_error() {
        assert_eq!(build("", None, false).unwrap_err().kind(), "template");
        assert_eq!(build("   ", None, true).unwrap_err().kind(), "template");
    }

    #[test]
    fn plain_prompt_ignores_context_and_has_no_context_artifact() {
        let prompt = build("Q?", Some("secret context"), false).expect("build");
        assert!(prompt.contains("Q?"));
        assert!(!prompt.contains("secret"));
        assert!(!prompt.to_lowercase().contains("context"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn rag_prompt_embeds_context_and_query_verbatim() {
        let prompt = build("Q?", Some("A\nB"), true).expect("build");
        assert!(prompt.contains("A\nB"));
        assert!(prompt.contains("Q?"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn rag_prompt_instructs_combination_not_copying() {
        let prompt = build("Q?", Some("A"), true).expect("build");
        assert!(prompt.contains("own knowledge"));
        assert!(prompt.contains("Do not repeat"));
    }
}
