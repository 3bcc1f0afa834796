//! The AI tutor pipeline: retrieve, format, template, generate.

pub mod budget;
pub mod history;
pub mod orchestrator;
pub mod prompts;
pub mod retrieval;
pub mod template;

#[cfg(test)]
pub(crate) mod testing;
