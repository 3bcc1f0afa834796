//! Deterministic store and gateway stubs shared by the tutor tests.

use std::sync::{Arc, Mutex};

use tutor_types::content::ContentItem;
use tutor_types::error::StoreError;
use tutor_types::llm::{GatewayError, ImageInput};

use crate::content::store::ContentStore;
use crate::llm::gateway::LlmGateway;

/// How a [`StubStore`] search ends.
#[derive(Clone, Copy, PartialEq, Eq)]
enum StoreMode {
    Answer,
    Fail,
    /// Never completes; used to exercise cancellation.
    Hang,
}

/// Returns `graded` for grade-scoped searches and `global` for ungraded ones.
pub struct StubStore {
    graded: Vec<ContentItem>,
    global: Vec<ContentItem>,
    mode: StoreMode,
    calls: Arc<Mutex<Vec<Option<i32>>>>,
}

impl StubStore {
    fn build(graded: Vec<&str>, global: Vec<&str>, mode: StoreMode) -> Self {
        Self {
            graded: graded.into_iter().map(ContentItem::new).collect(),
            global: global.into_iter().map(ContentItem::new).collect(),
            mode,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn new(graded: Vec<&str>, global: Vec<&str>) -> Self {
        Self::build(graded, global, StoreMode::Answer)
    }

    pub fn graded(items: Vec<&str>) -> Self {
        Self::build(items, Vec::new(), StoreMode::Answer)
    }

    pub fn global_only(items: Vec<&str>) -> Self {
        Self::build(Vec::new(), items, StoreMode::Answer)
    }

    pub fn empty() -> Self {
        Self::build(Vec::new(), Vec::new(), StoreMode::Answer)
    }

    pub fn failing() -> Self {
        Self::build(Vec::new(), Vec::new(), StoreMode::Fail)
    }

    pub fn hanging() -> Self {
        Self::build(Vec::new(), Vec::new(), StoreMode::Hang)
    }

    /// Grade argument of every search, in call order.
    pub fn calls(&self) -> Arc<Mutex<Vec<Option<i32>>>> {
        Arc::clone(&self.calls)
    }
}

impl ContentStore for StubStore {
    async fn search(
        &self,
        _query: &str,
        grade_level: Option<i32>,
        limit: usize,
    ) -> Result<Vec<ContentItem>, StoreError> {
        self.calls.lock().unwrap().push(grade_level);
        match self.mode {
            StoreMode::Answer => {}
            StoreMode::Fail => {
                return Err(StoreError::Unavailable("connection refused".into()));
            }
            StoreMode::Hang => {
                return std::future::pending::<Result<Vec<ContentItem>, StoreError>>().await;
            }
        }
        let items = match grade_level {
            Some(_) => &self.graded,
            None => &self.global,
        };
        Ok(items.iter().take(limit).cloned().collect())
    }
}

/// What a [`StubGateway`] does when called.
#[derive(Clone)]
pub enum Reply {
    Text(String),
    Error(GatewayError),
    /// Never completes; used to exercise cancellation.
    Hang,
}

/// Records every prompt and answers with a fixed [`Reply`].
pub struct StubGateway {
    reply: Reply,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StubGateway {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::new(Reply::Text(text.to_string()))
    }

    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }

    async fn answer(&self, prompt: &str) -> Result<String, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Error(err) => Err(err.clone()),
            Reply::Hang => std::future::pending::<Result<String, GatewayError>>().await,
        }
    }
}

impl LlmGateway for StubGateway {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        self.answer(prompt).await
    }

    async fn analyze_image(
        &self,
        _image: &ImageInput,
        instructions: &str,
    ) -> Result<String, GatewayError> {
        self.answer(instructions).await
    }
}
