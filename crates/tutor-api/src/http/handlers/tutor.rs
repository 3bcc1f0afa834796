//! AI tutor endpoints.
//!
//! POST /api/v1/ai-tutor/chat
//! POST /api/v1/ai-tutor/hint
//! POST /api/v1/ai-tutor/analyze-image
//!
//! Each request gets a cancellation token that fires after
//! `server.request_timeout_secs` or when the client goes away (the handler
//! future is dropped).

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{Instrument, info_span};

use tutor_observe::genai_attrs;
use tutor_types::analysis::MathProblemAnalysis;
use tutor_types::chat::ChatMessage;
use tutor_types::llm::ImageInput;

use super::RequestClock;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Lowest and highest supported grade.
pub const GRADE_RANGE: std::ops::RangeInclusive<i32> = 1..=12;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub grade_level: i32,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintRequest {
    pub problem: String,
    pub grade_level: i32,
}

#[derive(Debug, Serialize)]
pub struct HintResponse {
    pub hint: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeImageRequest {
    /// Raw base64 or a `data:{media_type};base64,...` URL.
    pub image_base64: String,
    /// Required unless `image_base64` is a data URL.
    #[serde(default)]
    pub media_type: Option<String>,
}

pub(crate) fn validate_grade(grade_level: i32) -> Result<(), AppError> {
    if GRADE_RANGE.contains(&grade_level) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "gradeLevel must be between {} and {}, got {grade_level}",
            GRADE_RANGE.start(),
            GRADE_RANGE.end()
        )))
    }
}

/// Cancellation scope for one HTTP request.
///
/// The token is cancelled when the timeout elapses or when this value is
/// dropped, whichever comes first.
struct RequestCancellation {
    token: CancellationToken,
    _on_drop: DropGuard,
    timer: JoinHandle<()>,
}

impl RequestCancellation {
    fn new(timeout: Duration) -> Self {
        let token = CancellationToken::new();
        let timer_token = token.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            tracing::warn!(timeout_secs = timeout.as_secs(), "Tutor request timed out, cancelling");
            timer_token.cancel();
        });

        Self {
            _on_drop: token.clone().drop_guard(),
            token,
            timer,
        }
    }
}

impl Drop for RequestCancellation {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

fn request_timeout(state: &AppState) -> Duration {
    Duration::from_secs(state.config.server.request_timeout_secs)
}

/// POST /api/v1/ai-tutor/chat - answer a student message.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatResponse>>, AppError> {
    let clock = RequestClock::start();
    validate_grade(body.grade_level)?;

    let scope = RequestCancellation::new(request_timeout(&state));
    let span = info_span!(
        "http.ai_tutor",
        request_id = %clock.request_id,
        gen_ai.operation.name = genai_attrs::OP_CHAT,
    );
    let response = state
        .tutor
        .chat(&body.message, body.grade_level, &body.chat_history, &scope.token)
        .instrument(span)
        .await
        .into_result()?;

    Ok(Json(
        ApiResponse::success(ChatResponse { response }, clock.request_id.clone(), clock.elapsed_ms())
            .with_link("self", "/api/v1/ai-tutor/chat"),
    ))
}

/// POST /api/v1/ai-tutor/hint - a single hint for a problem.
pub async fn hint(
    State(state): State<AppState>,
    Json(body): Json<HintRequest>,
) -> Result<Json<ApiResponse<HintResponse>>, AppError> {
    let clock = RequestClock::start();
    validate_grade(body.grade_level)?;

    let scope = RequestCancellation::new(request_timeout(&state));
    let span = info_span!(
        "http.ai_tutor",
        request_id = %clock.request_id,
        gen_ai.operation.name = genai_attrs::OP_HINT,
    );
    let hint = state
        .tutor
        .hint(&body.problem, body.grade_level, &scope.token)
        .instrument(span)
        .await
        .into_result()?;

    Ok(Json(
        ApiResponse::success(HintResponse { hint }, clock.request_id.clone(), clock.elapsed_ms())
            .with_link("self", "/api/v1/ai-tutor/hint"),
    ))
}

/// POST /api/v1/ai-tutor/analyze-image - read a photographed problem.
pub async fn analyze_image(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeImageRequest>,
) -> Result<Json<ApiResponse<MathProblemAnalysis>>, AppError> {
    let clock = RequestClock::start();
    let image = decode_image(&body)?;

    let scope = RequestCancellation::new(request_timeout(&state));
    let span = info_span!(
        "http.ai_tutor",
        request_id = %clock.request_id,
        gen_ai.operation.name = genai_attrs::OP_VISION,
    );
    let analysis = state
        .tutor
        .analyze_math_image(&image, &scope.token)
        .instrument(span)
        .await
        .into_result()?;

    Ok(Json(
        ApiResponse::success(analysis, clock.request_id.clone(), clock.elapsed_ms())
            .with_link("self", "/api/v1/ai-tutor/analyze-image"),
    ))
}

fn decode_image(body: &AnalyzeImageRequest) -> Result<ImageInput, AppError> {
    let raw = body.image_base64.trim();

    let (url_media_type, payload) = match raw.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| AppError::Validation("malformed data URL".into()))?;
            let media_type = header.strip_suffix(";base64").unwrap_or(header);
            (Some(media_type), payload)
        }
        None => (None, raw),
    };

    let media_type = body
        .media_type
        .as_deref()
        .or(url_media_type)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::Validation("media_type is required".into()))?;

    let data = STANDARD
        .decode(payload)
        .map_err(|e| AppError::Validation(format!("image_base64 is not valid base64: {e}")))?;

    Ok(ImageInput::new(media_type, data))
}
