//! QA prompt assembly.

/// One retrieved chunk, labelled with where it came from.
#[derive(Debug, Clone)]
pub struct ContextSnippet {
    pub source: String,
    pub text: String,
}

/// Build the retrieval-augmented QA prompt. The model is told to answer
/// from the supplied context rather than prior knowledge; with an empty
/// context the query still goes through unchanged.
pub fn build_qa_prompt(query: &str, contexts: &[ContextSnippet]) -> String {
    let mut prompt = String::from("Context information is below.\n");
    prompt.push_str("---------------------\n");
    for snippet in contexts {
        prompt.push_str(&format!("[{}]\n{}\n\n", snippet.source, snippet.text));
    }
    prompt.push_str("---------------------\n");
    prompt.push_str(
        "Given the context information and not prior knowledge, answer the query.\n",
    );
    prompt.push_str(&format!("Query: {query}\n"));
    prompt.push_str("Answer:");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_query_and_context() {
        let contexts = vec![ContextSnippet {
            source: "notes.txt".to_string(),
            text: "hello world".to_string(),
        }];
        let prompt = build_qa_prompt("what does the file say?", &contexts);
        assert!(prompt.contains("[notes.txt]"));
        assert!(prompt.contains("hello world"));
        assert!(prompt.contains("Query: what does the file say?"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn empty_context_still_produces_a_prompt() {
        let prompt = build_qa_prompt("anything?", &[]);
        assert!(prompt.contains("Query: anything?"));
        assert!(prompt.contains("Context information is below."));
    }
}
