//! Loaded content handed from the loaders to the prompt builder.

/// Text extracted from a page or a video transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Extracted plain text
    pub text: String,
    /// Where the text came from (page URL or video id)
    pub source: Option<String>,
    /// Page title, when the page had one
    pub title: Option<String>,
    /// Caption language code for transcripts
    pub language: Option<String>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
            title: None,
            language: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// True when there is no non-whitespace text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
