use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use summa_url::config::Credential;
use summa_url::llm::{ChatModel, LlmError};
use summa_url::loader::{ContentLoader, LoadError, LoadErrorKind, LoadStrategy, WebLoader};
use summa_url::prompt::PromptTemplate;
use summa_url::{Document, Outcome, PipelineError, Stage, Summarizer, SummaryRequest};

/// Loader that records calls and either returns fixed text or fails
#[derive(Default)]
struct FakeLoader {
    calls: Cell<usize>,
    transcript_fails: bool,
}

#[async_trait(?Send)]
impl ContentLoader for FakeLoader {
    async fn load(&self, url: &str, strategy: LoadStrategy) -> Result<Vec<Document>, LoadError> {
        self.calls.set(self.calls.get() + 1);
        match strategy {
            LoadStrategy::Transcript if self.transcript_fails => Err(LoadError::new(
                url,
                LoadErrorKind::Transcript("Subtitles are disabled for this video".to_string()),
            )),
            LoadStrategy::Transcript => {
                Ok(vec![Document::new("never gonna give you up").with_source("dQw4w9WgXcQ")])
            }
            LoadStrategy::GenericPage => Ok(vec![Document::new(
                "This domain is for use in illustrative examples in documents.",
            )
            .with_source(url)
            .with_title(Some("Example Domain".to_string()))]),
        }
    }
}

/// Model that echoes a fixed summary and remembers the prompts it saw
#[derive(Default)]
struct FakeModel {
    prompts: RefCell<Vec<String>>,
    reject_key: bool,
}

#[async_trait(?Send)]
impl ChatModel for FakeModel {
    fn model_id(&self) -> &str {
        "fake-model"
    }

    async fn complete(&self, _credential: &Credential, prompt: &str) -> Result<String, LlmError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        if self.reject_key {
            return Err(LlmError::Unauthorized("Invalid API Key".to_string()));
        }
        Ok("Example Domain is a placeholder page reserved for documentation.".to_string())
    }
}

fn summarizer(loader: FakeLoader, model: FakeModel) -> Summarizer<FakeLoader, FakeModel> {
    Summarizer::new(loader, model, PromptTemplate::summary())
}

fn request(credential: &str, url: &str) -> SummaryRequest {
    SummaryRequest::new(Credential::new(credential), url)
}

#[tokio::test]
async fn empty_credential_fails_before_any_io() {
    let s = summarizer(FakeLoader::default(), FakeModel::default());
    let mut stages = Vec::new();

    let result = s
        .run(&request("", "https://example.com"), |stage| stages.push(stage))
        .await;

    assert!(matches!(result, Err(PipelineError::Configuration)));
    assert_eq!(stages, vec![Stage::Validating]);
    assert_eq!(s.loader().calls.get(), 0);
    assert!(s.model().prompts.borrow().is_empty());
    assert!(matches!(Outcome::from(result), Outcome::Rejected(_)));
}

#[tokio::test]
async fn malformed_url_fails_before_any_io() {
    let s = summarizer(FakeLoader::default(), FakeModel::default());

    let result = s.run(&request("valid-token", "not-a-url"), |_| {}).await;

    assert!(matches!(result, Err(PipelineError::Validation(_))));
    assert_eq!(s.loader().calls.get(), 0);
    assert!(s.model().prompts.borrow().is_empty());
}

#[tokio::test]
async fn web_page_is_summarised() {
    let s = summarizer(FakeLoader::default(), FakeModel::default());
    let mut stages = Vec::new();

    let summary = s
        .run(&request("valid-token", "https://example.com"), |stage| {
            stages.push(stage)
        })
        .await
        .unwrap();

    assert_eq!(
        stages,
        vec![Stage::Validating, Stage::Loading, Stage::Summarizing]
    );
    assert!(!summary.is_empty());
    assert_eq!(summary.strategy, LoadStrategy::GenericPage);
    assert_eq!(summary.heading(), "Example Domain");
    assert_eq!(summary.model, "fake-model");
    assert_eq!(summary.document_count, 1);

    let prompts = s.model().prompts.borrow();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("illustrative examples in documents"));
}

#[tokio::test]
async fn video_with_disabled_captions_is_a_load_error() {
    let loader = FakeLoader {
        transcript_fails: true,
        ..FakeLoader::default()
    };
    let s = summarizer(loader, FakeModel::default());

    let result = s
        .run(
            &request("valid-token", "https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            |_| {},
        )
        .await;

    match result {
        Err(PipelineError::Load(err)) => {
            assert_eq!(err.url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
            assert!(matches!(err.kind, LoadErrorKind::Transcript(_)));
        }
        other => panic!("expected a load error, got {other:?}"),
    }
    assert!(s.model().prompts.borrow().is_empty());
}

#[tokio::test]
async fn rejected_key_is_an_authentication_error() {
    let model = FakeModel {
        reject_key: true,
        ..FakeModel::default()
    };
    let s = summarizer(FakeLoader::default(), model);

    let result = s
        .run(&request("revoked", "https://youtu.be/dQw4w9WgXcQ"), |_| {})
        .await;

    assert!(matches!(result, Err(PipelineError::Authentication(_))));
    let outcome = Outcome::from(result);
    assert!(matches!(outcome, Outcome::Failed { stage: Stage::Summarizing, .. }));
}

#[tokio::test]
async fn repeated_runs_are_independent() {
    let s = summarizer(FakeLoader::default(), FakeModel::default());
    let req = request("valid-token", "https://example.com");

    let first = s.run(&req, |_| {}).await.unwrap();
    let second = s.run(&req, |_| {}).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(s.loader().calls.get(), 2);
    let prompts = s.model().prompts.borrow();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], prompts[1]);
}

#[tokio::test]
async fn extract_validates_without_a_credential() {
    let s = summarizer(FakeLoader::default(), FakeModel::default());

    assert!(matches!(
        s.extract("example.com").await,
        Err(PipelineError::Validation(_))
    ));
    let documents = s.extract("https://example.com").await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(s.loader().calls.get(), 1);
}

#[tokio::test]
async fn real_web_loader_feeds_the_model() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(
            "<html><head><title>Example Domain</title></head>\
             <body><h1>Example Domain</h1><p>This domain is for use in examples.</p></body></html>",
        )
        .create_async()
        .await;

    let web = WebLoader::new(&Default::default()).unwrap();
    let s = Summarizer::new(WebPage(web), FakeModel::default(), PromptTemplate::summary());

    let summary = s
        .run(&request("valid-token", &format!("{}/", server.url())), |_| {})
        .await
        .unwrap();

    assert_eq!(summary.title.as_deref(), Some("Example Domain"));
    let prompts = s.model().prompts.borrow();
    assert!(prompts[0].contains("Example Domain\n\nThis domain is for use in examples."));
}

/// Loader whose pages come back with nothing but whitespace
struct BlankLoader;

#[async_trait(?Send)]
impl ContentLoader for BlankLoader {
    async fn load(&self, url: &str, _strategy: LoadStrategy) -> Result<Vec<Document>, LoadError> {
        Ok(vec![Document::new("  \n\t").with_source(url), Document::new("")])
    }
}

#[tokio::test]
async fn blank_documents_are_a_load_error_before_the_model() {
    let s = Summarizer::new(BlankLoader, FakeModel::default(), PromptTemplate::summary());

    let result = s.run(&request("valid-token", "https://example.com"), |_| {}).await;

    match result {
        Err(PipelineError::Load(err)) => {
            assert_eq!(err.url, "https://example.com");
            assert!(matches!(err.kind, LoadErrorKind::NoContent));
        }
        other => panic!("expected a load error, got {other:?}"),
    }
    assert!(s.model().prompts.borrow().is_empty());
    assert!(matches!(
        s.extract("https://example.com").await,
        Err(PipelineError::Load(_))
    ));
}

/// Adapter so the mock server URL always goes through the page loader
struct WebPage(WebLoader);

#[async_trait(?Send)]
impl ContentLoader for WebPage {
    async fn load(&self, url: &str, _strategy: LoadStrategy) -> Result<Vec<Document>, LoadError> {
        self.0.load(url).await
    }
}
