//! # Summa URL
//!
//! Summarise a web page or a YouTube video with an LLM.
//!
//! ## Features
//!
//! - **Two loaders**: YouTube links go through the caption track, everything else
//!   through a browser-like page fetch with visible-text extraction
//! - **Stuff summarization**: all text in one Groq chat completion at temperature 0
//! - **One outcome per action**: validation errors, load errors and model errors are
//!   values rendered by the TUI or the CLI, never panics

pub mod config;
pub mod document;
pub mod llm;
pub mod loader;
pub mod logging;
pub mod outcome;
pub mod pipeline;
pub mod prompt;
pub mod summary;
pub mod ui;
pub mod validate;

pub use config::{Config, Credential, Secrets};
pub use document::Document;
pub use outcome::Outcome;
pub use pipeline::{PipelineError, Stage, Summarizer, SummaryRequest};
pub use summary::Summary;
