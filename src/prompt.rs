//! Prompt template for the summarization request.

use crate::document::Document;
use thiserror::Error;

/// The placeholder replaced by document text
pub const PLACEHOLDER: &str = "{text}";

/// Separator placed between documents
const DOCUMENT_SEPARATOR: &str = "\n\n";

const SUMMARY_TEMPLATE: &str = r#"
You are a highly skilled summarization assistant.

Your task:
- Write a clear, accurate, and well-structured summary of the content below.
- The summary must be around 500 words.
- Focus on the main ideas, key arguments, important details, and essential insights.
- Do NOT add any information that is not present in the content.

Content to summarize:
{text}

Now provide the final ~500-word summary.
"#;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PromptError {
    #[error("template must contain exactly one {{text}} placeholder, found {0}")]
    Placeholders(usize),
}

/// A template with exactly one `{text}` placeholder
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, PromptError> {
        let template = template.into();
        match template.matches(PLACEHOLDER).count() {
            1 => Ok(Self { template }),
            n => Err(PromptError::Placeholders(n)),
        }
    }

    /// The ~500 word summary instruction
    pub fn summary() -> Self {
        Self {
            template: SUMMARY_TEMPLATE.to_string(),
        }
    }

    /// Substitute the documents' text, joined in order, into the template
    pub fn render(&self, documents: &[Document]) -> String {
        let text = documents
            .iter()
            .map(|doc| doc.text.as_str())
            .collect::<Vec<_>>()
            .join(DOCUMENT_SEPARATOR);
        self.render_text(&text)
    }

    fn render_text(&self, text: &str) -> String {
        // split once so braces inside the content are left alone
        match self.template.split_once(PLACEHOLDER) {
            Some((before, after)) => {
                let mut prompt = String::with_capacity(before.len() + text.len() + after.len());
                prompt.push_str(before);
                prompt.push_str(text);
                prompt.push_str(after);
                prompt
            }
            None => self.template.clone(),
        }
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::summary()
    }
}
