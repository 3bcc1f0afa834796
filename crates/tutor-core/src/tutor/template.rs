//! Prompt template with three named slots.
//!
//! A template is validated once by [`PromptTemplate::parse`]: each marker
//! must occur exactly once. Rendering then walks the pre-split segments, so
//! inserted values are never rescanned for markers.

use tutor_types::error::TutorError;

pub const CONTEXT_MARKER: &str = "{curriculum_context}";
pub const HISTORY_MARKER: &str = "{chat_history}";
pub const MESSAGE_MARKER: &str = "{student_message}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Context,
    History,
    Message,
}

impl Slot {
    const ALL: [Slot; 3] = [Slot::Context, Slot::History, Slot::Message];

    fn marker(self) -> &'static str {
        match self {
            Slot::Context => CONTEXT_MARKER,
            Slot::History => HISTORY_MARKER,
            Slot::Message => MESSAGE_MARKER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Slot),
}

/// A parsed, validated prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse `template`, failing with `Configuration` when a marker is
    /// missing or appears more than once.
    pub fn parse(template: &str) -> Result<Self, TutorError> {
        for slot in Slot::ALL {
            match template.matches(slot.marker()).count() {
                1 => {}
                0 => {
                    return Err(TutorError::Configuration(format!(
                        "prompt template is missing the {} marker",
                        slot.marker()
                    )));
                }
                n => {
                    return Err(TutorError::Configuration(format!(
                        "prompt template contains the {} marker {n} times",
                        slot.marker()
                    )));
                }
            }
        }

        let mut segments = Vec::new();
        let mut rest = template;
        loop {
            let next = Slot::ALL
                .iter()
                .filter_map(|slot| rest.find(slot.marker()).map(|pos| (pos, *slot)))
                .min_by_key(|(pos, _)| *pos);

            match next {
                Some((pos, slot)) => {
                    if pos > 0 {
                        segments.push(Segment::Literal(rest[..pos].to_string()));
                    }
                    segments.push(Segment::Slot(slot));
                    rest = &rest[pos + slot.marker().len()..];
                }
                None => {
                    if !rest.is_empty() {
                        segments.push(Segment::Literal(rest.to_string()));
                    }
                    break;
                }
            }
        }

        Ok(Self { segments })
    }

    /// Substitute the three regions into the template.
    pub fn render(&self, context: &str, history: &str, message: &str) -> String {
        let capacity = self
            .segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.len(),
                Segment::Slot(_) => 0,
            })
            .sum::<usize>()
            + context.len()
            + history.len()
            + message.len();

        let mut out = String::with_capacity(capacity);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(Slot::Context) => out.push_str(context),
                Segment::Slot(Slot::History) => out.push_str(history),
                Segment::Slot(Slot::Message) => out.push_str(message),
            }
        }
        out
    }
}

/// Parse and render in one step.
pub fn build(
    template: &str,
    context: &str,
    history: &str,
    message: &str,
) -> Result<String, TutorError> {
    Ok(PromptTemplate::parse(template)?.render(context, history, message))
}
