//! OpenTelemetry GenAI Semantic Convention names.
//!
//! Field-name constants document the dotted keys written literally in
//! `info_span!` calls (tracing macros need them inline). Value constants are
//! passed as span field values.

// --- Attribute keys ---

/// The operation being performed (e.g., "chat", "vision").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The gateway backend (e.g., "openai_compatible", "offline").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

/// The model ID requested.
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";

pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";

pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

pub const GEN_AI_RESPONSE_FINISH_REASONS: &str = "gen_ai.response.finish_reasons";

pub const GEN_AI_RESPONSE_ID: &str = "gen_ai.response.id";

// --- Operation name values ---

/// Socratic chat turn.
pub const OP_CHAT: &str = "chat";

/// Single-hint request.
pub const OP_HINT: &str = "hint";

/// Math problem image analysis.
pub const OP_VISION: &str = "vision";
