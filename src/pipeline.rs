//! The summarization pipeline: validate, load, prompt, summarise.
//!
//! A [`Summarizer`] keeps no state between runs. Every call to
//! [`Summarizer::run`] validates its [`SummaryRequest`] before any I/O,
//! loads the documents, stuffs them into a single prompt and asks the model
//! for the summary.

use crate::config::{Config, Credential};
use crate::document::Document;
use crate::llm::{ChatModel, GroqClient, LlmError};
use crate::loader::{ContentLoader, LoadError, LoadErrorKind, LoadStrategy, Loader};
use crate::prompt::PromptTemplate;
use crate::summary::Summary;
use crate::validate::is_valid_url;
use std::fmt;
use thiserror::Error;

/// One user action: the credential and the URL to summarise
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub credential: Credential,
    pub url: String,
}

impl SummaryRequest {
    pub fn new(credential: Credential, url: impl Into<String>) -> Self {
        Self {
            credential,
            url: url.into(),
        }
    }
}

/// Progress through a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Loading,
    Summarizing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Validating => write!(f, "Validating input..."),
            Stage::Loading => write!(f, "Loading content..."),
            Stage::Summarizing => write!(f, "Summarizing..."),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please provide a URL")]
    MissingUrl,
    #[error("please enter a valid URL (website or YouTube): {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no Groq API key configured; set GROQ_API_KEY in secrets.toml or the environment")]
    Configuration,
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("invalid API key: {0}")]
    Authentication(#[source] LlmError),
    #[error("{0}")]
    Load(#[from] LoadError),
    #[error("summarization failed: {0}")]
    Summarization(#[source] LlmError),
}

impl PipelineError {
    /// The stage the error was raised in
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Configuration | PipelineError::Validation(_) => Stage::Validating,
            PipelineError::Load(_) => Stage::Loading,
            PipelineError::Authentication(_) | PipelineError::Summarization(_) => {
                Stage::Summarizing
            }
        }
    }

    /// True for errors raised before any network activity
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PipelineError::Configuration | PipelineError::Validation(_)
        )
    }
}

impl From<LlmError> for PipelineError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Unauthorized(_) => PipelineError::Authentication(err),
            other => PipelineError::Summarization(other),
        }
    }
}

/// Check the URL alone, returning it trimmed
pub fn validate_url(url: &str) -> Result<&str, ValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ValidationError::MissingUrl);
    }
    if !is_valid_url(url) {
        return Err(ValidationError::InvalidUrl(url.to_string()));
    }
    Ok(url)
}

/// Check credential then URL; no I/O happens here
pub fn validate_request(request: &SummaryRequest) -> Result<&str, PipelineError> {
    if request.credential.is_blank() {
        return Err(PipelineError::Configuration);
    }
    Ok(validate_url(&request.url)?)
}

/// Loader, model and template wired together
pub struct Summarizer<L, M> {
    loader: L,
    model: M,
    template: PromptTemplate,
}

impl Summarizer<Loader, GroqClient> {
    /// Production pipeline from configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            Loader::new(&config.loader)?,
            GroqClient::new(&config.agent)?,
            PromptTemplate::summary(),
        ))
    }
}

impl<L: ContentLoader, M: ChatModel> Summarizer<L, M> {
    pub fn new(loader: L, model: M, template: PromptTemplate) -> Self {
        Self {
            loader,
            model,
            template,
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run one request end to end, reporting each stage to `on_stage`
    pub async fn run(
        &self,
        request: &SummaryRequest,
        mut on_stage: impl FnMut(Stage),
    ) -> Result<Summary, PipelineError> {
        on_stage(Stage::Validating);
        let url = validate_request(request)?;

        on_stage(Stage::Loading);
        let (strategy, documents) = self.load_documents(url).await?;

        on_stage(Stage::Summarizing);
        let prompt = self.template.render(&documents);
        let text = self.model.complete(&request.credential, &prompt).await?;
        tracing::info!(%url, words = text.split_whitespace().count(), "summary ready");

        Ok(Summary {
            url: url.to_string(),
            title: documents.iter().find_map(|doc| doc.title.clone()),
            strategy,
            model: self.model.model_id().to_string(),
            document_count: documents.len(),
            source_chars: documents.iter().map(|doc| doc.text.len()).sum(),
            text,
        })
    }

    /// Validate and load a URL without summarising it
    pub async fn extract(&self, url: &str) -> Result<Vec<Document>, PipelineError> {
        let url = validate_url(url)?;
        let (_, documents) = self.load_documents(url).await?;
        Ok(documents)
    }

    async fn load_documents(&self, url: &str) -> Result<(LoadStrategy, Vec<Document>), LoadError> {
        let strategy = self.loader.strategy(url);
        tracing::debug!(%url, %strategy, "selected load strategy");

        let documents = self.loader.load(url, strategy).await?;
        if documents.iter().all(Document::is_blank) {
            return Err(LoadError::new(url, LoadErrorKind::NoContent));
        }
        Ok((strategy, documents))
    }
}
