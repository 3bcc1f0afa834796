//! Structured result of reading a math problem from an image.

use serde::{Deserialize, Serialize};

/// What the vision model extracted from a photographed math problem.
///
/// Field names match the JSON the OCR instructions ask the model to emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathProblemAnalysis {
    pub problem_text: String,
    #[serde(default)]
    pub equations: Vec<String>,
    #[serde(default = "default_problem_type")]
    pub problem_type: String,
    #[serde(default)]
    pub given: Vec<String>,
    #[serde(default)]
    pub required: String,
}

fn default_problem_type() -> String {
    "unknown".to_string()
}
