//! Observability for the Smart Teacher AI tutor.
//!
//! - [`tracing_setup`]: subscriber installation with optional OpenTelemetry
//!   stdout export.
//! - [`genai_attrs`]: GenAI semantic-convention names and values used on
//!   tutor and gateway spans.

pub mod genai_attrs;
pub mod tracing_setup;
