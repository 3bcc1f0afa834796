//! Tutor orchestrator: drives one tutoring request end to end.
//!
//! Received -> Retrieving -> Formatting -> Prompting -> Generating -> Completed.
//! Retrieval failures degrade to a placeholder context; generation failures
//! are surfaced. Both outbound calls race the caller's cancellation token.

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span, debug, field, info, info_span, warn};

use tutor_types::analysis::MathProblemAnalysis;
use tutor_types::chat::ChatMessage;
use tutor_types::config::TutorSettings;
use tutor_types::error::TutorError;
use tutor_types::llm::{GatewayError, ImageInput};
use tutor_types::outcome::Outcome;

use crate::content::box_store::BoxContentStore;
use crate::llm::box_gateway::BoxLlmGateway;

use super::budget::PromptBudget;
use super::history::ConversationFormatter;
use super::prompts::{HINT_PROMPT, OCR_ANALYSIS_PROMPT, SOCRATIC_TEACHER_PROMPT};
use super::retrieval::RetrievalAdapter;
use super::template::PromptTemplate;

/// Pipeline stage of a tutor request, recorded on the request span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStage {
    Received,
    Retrieving,
    Formatting,
    Prompting,
    Generating,
    Completed,
}

impl fmt::Display for ChatStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChatStage::Received => "received",
            ChatStage::Retrieving => "retrieving",
            ChatStage::Formatting => "formatting",
            ChatStage::Prompting => "prompting",
            ChatStage::Generating => "generating",
            ChatStage::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// The parsed templates an orchestrator renders prompts from.
#[derive(Debug, Clone)]
pub struct TutorTemplates {
    pub chat: PromptTemplate,
    pub hint: PromptTemplate,
    pub ocr_instructions: String,
}

impl TutorTemplates {
    /// Parse custom template sources. Fails on a missing or repeated marker.
    pub fn from_sources(
        chat: &str,
        hint: &str,
        ocr_instructions: &str,
    ) -> Result<Self, TutorError> {
        Ok(Self {
            chat: PromptTemplate::parse(chat)?,
            hint: PromptTemplate::parse(hint)?,
            ocr_instructions: ocr_instructions.to_string(),
        })
    }

    pub fn builtin() -> Result<Self, TutorError> {
        Self::from_sources(SOCRATIC_TEACHER_PROMPT, HINT_PROMPT, OCR_ANALYSIS_PROMPT)
    }
}

/// Coordinates retrieval, history formatting, templating and generation.
///
/// Holds no per-request state; share it behind an `Arc`.
pub struct TutorOrchestrator {
    retrieval: RetrievalAdapter,
    formatter: ConversationFormatter,
    gateway: BoxLlmGateway,
    templates: TutorTemplates,
    budget: PromptBudget,
}

impl TutorOrchestrator {
    pub fn new(
        retrieval: RetrievalAdapter,
        formatter: ConversationFormatter,
        gateway: BoxLlmGateway,
        templates: TutorTemplates,
        budget: PromptBudget,
    ) -> Self {
        Self {
            retrieval,
            formatter,
            gateway,
            templates,
            budget,
        }
    }

    /// Wire an orchestrator from `[tutor]` settings.
    ///
    /// The prompt budget bounds both the retrieved context and the rendered
    /// history.
    pub fn from_settings(
        settings: &TutorSettings,
        store: BoxContentStore,
        gateway: BoxLlmGateway,
        templates: TutorTemplates,
    ) -> Self {
        let budget = PromptBudget::new(settings.max_prompt_tokens);
        let retrieval = RetrievalAdapter::new(
            store,
            settings.max_snippets,
            budget.context_chars(),
            settings.context_placeholder.clone(),
        );
        let formatter = ConversationFormatter::new(
            settings.student_label.clone(),
            settings.tutor_label.clone(),
            settings.max_history_turns,
        )
        .with_char_budget(budget.history_chars());

        Self::new(retrieval, formatter, gateway, templates, budget)
    }

    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    /// Answer a student message in the context of the prior conversation.
    pub async fn chat(
        &self,
        message: &str,
        grade_level: i32,
        history: &[ChatMessage],
        cancel: &CancellationToken,
    ) -> Outcome<String> {
        let span = info_span!(
            "tutor.chat",
            grade_level,
            history_len = history.len(),
            stage = field::Empty,
        );
        self.run(&self.templates.chat, message, grade_level, history, cancel)
            .instrument(span)
            .await
            .into()
    }

    /// Produce a single hint for `problem`, without conversation history.
    pub async fn hint(
        &self,
        problem: &str,
        grade_level: i32,
        cancel: &CancellationToken,
    ) -> Outcome<String> {
        let span = info_span!("tutor.hint", grade_level, stage = field::Empty);
        self.run(&self.templates.hint, problem, grade_level, &[], cancel)
            .instrument(span)
            .await
            .into()
    }

    /// Read a photographed math problem into a structured analysis.
    pub async fn analyze_math_image(
        &self,
        image: &ImageInput,
        cancel: &CancellationToken,
    ) -> Outcome<MathProblemAnalysis> {
        let span = info_span!(
            "tutor.analyze_image",
            media_type = %image.media_type,
            bytes = image.data.len(),
        );
        self.analyze(image, cancel).instrument(span).await.into()
    }

    async fn run(
        &self,
        template: &PromptTemplate,
        message: &str,
        grade_level: i32,
        history: &[ChatMessage],
        cancel: &CancellationToken,
    ) -> Result<String, TutorError> {
        let mut stage = ChatStage::Received;
        enter(stage);

        let message = message.trim();
        if message.is_empty() {
            return Err(failed(
                stage,
                TutorError::Validation("student message must not be empty".into()),
            ));
        }
        if cancel.is_cancelled() {
            return Err(failed(stage, TutorError::Cancelled));
        }

        stage = ChatStage::Retrieving;
        enter(stage);
        let snippets = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(failed(stage, TutorError::Cancelled)),
            snippets = self.retrieval.retrieve(message, grade_level) => snippets,
        };
        let context = RetrievalAdapter::render(&snippets);

        stage = ChatStage::Formatting;
        enter(stage);
        let history_text = self.formatter.format(history);

        stage = ChatStage::Prompting;
        enter(stage);
        let prompt = template.render(&context, &history_text, message);
        let prompt_tokens = PromptBudget::estimate_tokens(&prompt);
        if prompt_tokens > self.budget.max_prompt_tokens {
            warn!(
                prompt_tokens,
                max_prompt_tokens = self.budget.max_prompt_tokens,
                "Assembled prompt exceeds the configured budget"
            );
        }

        stage = ChatStage::Generating;
        enter(stage);
        let generate_span = info_span!(
            "gen_ai.generate",
            gen_ai.system = self.gateway.name(),
            gen_ai.usage.input_tokens_estimate = prompt_tokens,
        );
        let reply = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TutorError::Cancelled),
            reply = self.gateway.generate(&prompt).instrument(generate_span) => {
                reply.map_err(TutorError::from)
            }
        };
        let text = reply.map_err(|e| failed(stage, e))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(failed(
                stage,
                TutorError::Generation(GatewayError::MalformedResponse(
                    "model returned an empty completion".into(),
                )),
            ));
        }

        enter(ChatStage::Completed);
        info!(reply_chars = text.chars().count(), "Tutor reply generated");
        Ok(text.to_string())
    }

    async fn analyze(
        &self,
        image: &ImageInput,
        cancel: &CancellationToken,
    ) -> Result<MathProblemAnalysis, TutorError> {
        if image.data.is_empty() {
            return Err(failed(
                ChatStage::Received,
                TutorError::Validation("image data must not be empty".into()),
            ));
        }
        if !image.is_supported() {
            return Err(failed(
                ChatStage::Received,
                TutorError::Validation(format!(
                    "unsupported image type '{}', expected one of: {}",
                    image.media_type,
                    ImageInput::SUPPORTED_MEDIA_TYPES.join(", ")
                )),
            ));
        }
        if cancel.is_cancelled() {
            return Err(failed(ChatStage::Received, TutorError::Cancelled));
        }

        let vision_span = info_span!("gen_ai.vision", gen_ai.system = self.gateway.name());
        let reply = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TutorError::Cancelled),
            reply = self
                .gateway
                .analyze_image(image, &self.templates.ocr_instructions)
                .instrument(vision_span) => reply.map_err(TutorError::from),
        };
        let text = reply.map_err(|e| failed(ChatStage::Generating, e))?;

        let analysis = parse_analysis(&text).map_err(|e| failed(ChatStage::Generating, e))?;
        debug!(
            problem_type = %analysis.problem_type,
            equations = analysis.equations.len(),
            "Image analysis parsed"
        );
        Ok(analysis)
    }
}

fn enter(stage: ChatStage) {
    Span::current().record("stage", field::display(stage));
    debug!(%stage, "Tutor stage");
}

fn failed(stage: ChatStage, err: TutorError) -> TutorError {
    match &err {
        TutorError::Cancelled => info!(%stage, "Tutor request cancelled"),
        _ => warn!(%stage, error = %err, "Tutor request failed"),
    }
    err
}

/// Parse the model's JSON analysis, tolerating prose or a ```json fence
/// around the object.
fn parse_analysis(text: &str) -> Result<MathProblemAnalysis, TutorError> {
    let malformed = |detail: String| TutorError::Generation(GatewayError::MalformedResponse(detail));

    let start = text
        .find('{')
        .ok_or_else(|| malformed("image analysis reply contains no JSON object".into()))?;
    let end = text
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| malformed("image analysis reply contains no JSON object".into()))?;

    serde_json::from_str(&text[start..=end])
        .map_err(|e| malformed(format!("image analysis reply is not valid JSON: {e}")))
}
