//! Prompt builders for the three generative flows.

use crate::types::BuiltPrompt;
use handlebars::Handlebars;
use std::collections::HashMap;
use tutor_core::{AppError, AppResult};

/// System instruction for example-problem generation.
const EXAMPLE_SYSTEM: &str = "Provide a structured math problem with clear formatting. \
     Include both the problem and the solution, but hide the answer under 'Solution: (Hidden)'";

const EXAMPLE_USER: &str =
    "Generate a clear math problem for {{topic}}. Format it well with step-by-step structure.";

/// System instruction for concept explanation.
const EXPLAIN_SYSTEM: &str =
    "Explain this math concept in a simple way suitable for a beginner, with examples.";

const EXPLAIN_USER: &str = "Explain {{query}} in detail with examples.";

/// System instruction for context-grounded answering.
const ANSWER_SYSTEM: &str = "You are a math tutor with access to the course materials. \
     Answer based only on the context provided. Answer as if you had read the materials \
     directly, without referring to document numbers. If the context does not contain \
     the answer, say so plainly.";

const ANSWER_USER: &str =
    "User question:\n{{query}}\n\nRelevant context from course materials:\n{{context}}";

/// Build the prompt for generating an example problem on a topic.
pub fn build_example_prompt(topic: &str) -> AppResult<BuiltPrompt> {
    let mut variables = HashMap::new();
    variables.insert("topic".to_string(), topic.to_string());

    Ok(BuiltPrompt {
        system: EXAMPLE_SYSTEM.to_string(),
        user: render_template(EXAMPLE_USER, &variables)?,
    })
}

/// Build the prompt for explaining a math concept.
pub fn build_explanation_prompt(query: &str) -> AppResult<BuiltPrompt> {
    let mut variables = HashMap::new();
    variables.insert("query".to_string(), query.to_string());

    Ok(BuiltPrompt {
        system: EXPLAIN_SYSTEM.to_string(),
        user: render_template(EXPLAIN_USER, &variables)?,
    })
}

/// Build the context-grounded answering prompt.
///
/// Retrieved texts are numbered and folded into the user message; an empty
/// context list still produces a valid prompt, the model simply gets no
/// grounding.
pub fn build_answer_prompt(query: &str, context_texts: &[String]) -> AppResult<BuiltPrompt> {
    let context = if context_texts.is_empty() {
        "(no relevant material found)".to_string()
    } else {
        context_texts
            .iter()
            .enumerate()
            .map(|(i, text)| format!("[Document {}]\n{}", i + 1, text))
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    };

    let mut variables = HashMap::new();
    variables.insert("query".to_string(), query.to_string());
    variables.insert("context".to_string(), context);

    Ok(BuiltPrompt {
        system: ANSWER_SYSTEM.to_string(),
        user: render_template(ANSWER_USER, &variables)?,
    })
}

/// Render a Handlebars template with variables.
///
/// Strict mode: an unresolved variable is a prompt error, not silently
/// empty output.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);

    // Prompts are plain text, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_prompt_mentions_topic() {
        let built = build_example_prompt("linear equations").unwrap();
        assert!(built.user.contains("linear equations"));
        assert!(built.system.contains("Solution: (Hidden)"));
    }

    #[test]
    fn test_explanation_prompt_mentions_query() {
        let built = build_explanation_prompt("slopes and intercepts").unwrap();
        assert!(built.user.contains("slopes and intercepts"));
        assert!(built.system.contains("beginner"));
    }

    #[test]
    fn test_answer_prompt_numbers_context() {
        let context = vec!["first chunk".to_string(), "second chunk".to_string()];
        let built = build_answer_prompt("what is a fraction?", &context).unwrap();

        assert!(built.user.contains("what is a fraction?"));
        assert!(built.user.contains("[Document 1]\nfirst chunk"));
        assert!(built.user.contains("[Document 2]\nsecond chunk"));
    }

    #[test]
    fn test_answer_prompt_without_context() {
        let built = build_answer_prompt("what is a fraction?", &[]).unwrap();
        assert!(built.user.contains("no relevant material"));
    }

    #[test]
    fn test_no_html_escaping() {
        let built = build_explanation_prompt("x < 5 & y > 2").unwrap();
        assert!(built.user.contains("x < 5 & y > 2"));
    }

    #[test]
    fn test_missing_variable_is_error() {
        let variables = HashMap::new();
        let result = render_template("{{missing}}", &variables);
        assert!(result.is_err());
    }
}
