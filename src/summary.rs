//! Summary struct - the output of one pipeline run.

use crate::loader::LoadStrategy;

/// Model output plus the request it was produced for.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// The URL the user asked for
    pub url: String,
    /// Page title, when the loader found one
    pub title: Option<String>,
    /// How the content was loaded
    pub strategy: LoadStrategy,
    /// Model that wrote the summary
    pub model: String,
    /// Number of documents stuffed into the prompt
    pub document_count: usize,
    /// Characters of source text sent to the model
    pub source_chars: usize,
    /// The generated summary
    pub text: String,
}

impl Summary {
    /// Heading for display: the title if known, otherwise the URL
    pub fn heading(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.url)
    }

    /// Approximate word count of the summary
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Check if the summary has any content
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
