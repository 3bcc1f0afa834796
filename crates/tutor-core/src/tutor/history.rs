//! Conversation history rendering.

use tutor_types::chat::{ChatMessage, Speaker};

/// Renders prior turns as labeled lines for the history region of a prompt.
///
/// Only the most recent `max_history_turns` messages are kept. When a char
/// budget is set, the oldest remaining lines are dropped until the rendered
/// block fits. Selection never reorders messages.
#[derive(Debug, Clone)]
pub struct ConversationFormatter {
    student_label: String,
    tutor_label: String,
    max_history_turns: usize,
    max_history_chars: Option<usize>,
}

impl ConversationFormatter {
    pub fn new(
        student_label: impl Into<String>,
        tutor_label: impl Into<String>,
        max_history_turns: usize,
    ) -> Self {
        Self {
            student_label: student_label.into(),
            tutor_label: tutor_label.into(),
            max_history_turns,
            max_history_chars: None,
        }
    }

    /// Cap the rendered block at `max_chars` characters.
    pub fn with_char_budget(mut self, max_chars: usize) -> Self {
        self.max_history_chars = Some(max_chars);
        self
    }

    fn label(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::Student => &self.student_label,
            Speaker::Tutor => &self.tutor_label,
        }
    }

    /// Format `history` as `"{label}: {content}"` lines joined by `\n`,
    /// one line per message. Empty history renders as `""`.
    ///
    /// A blank message still produces its labeled line so turn order stays
    /// visible to the model.
    pub fn format(&self, history: &[ChatMessage]) -> String {
        let start = history.len().saturating_sub(self.max_history_turns);

        let mut lines: Vec<String> = history[start..]
            .iter()
            .map(|msg| {
                format!("{}: {}", self.label(msg.role), msg.content.trim_end())
                    .trim_end()
                    .to_string()
            })
            .collect();

        if let Some(budget) = self.max_history_chars {
            let mut total: usize = rendered_len(&lines);
            let mut drop = 0;
            while total > budget && drop < lines.len() {
                total -= lines[drop].chars().count();
                // The separator before the next line goes with the dropped one.
                if drop + 1 < lines.len() {
                    total -= 1;
                }
                drop += 1;
            }
            lines.drain(..drop);
        }

        lines.join("\n")
    }
}

fn rendered_len(lines: &[String]) -> usize {
    let chars: usize = lines.iter().map(|l| l.chars().count()).sum();
    chars + lines.len().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter() -> ConversationFormatter {
        ConversationFormatter::new("الطالب", "المعلم", 10)
    }

    #[test]
    fn test_empty_history_is_empty_string() {
        assert_eq!(formatter().format(&[]), "");
    }

    #[test]
    fn test_single_student_message() {
        let history = vec![ChatMessage::student("ما هو ٢+٢")];
        assert_eq!(formatter().format(&history), "الطالب: ما هو ٢+٢");
    }

    #[test]
    fn test_preserves_order_and_labels() {
        let history = vec![
            ChatMessage::student("ما هو ٢+٢"),
            ChatMessage::tutor("فكر في عدّ أصابعك\n"),
            ChatMessage::student("٤"),
        ];
        assert_eq!(
            formatter().format(&history),
            "الطالب: ما هو ٢+٢\nالمعلم: فكر في عدّ أصابعك\nالطالب: ٤"
        );
    }

    #[test]
    fn test_keeps_most_recent_turns() {
        let history: Vec<_> = (1..=5)
            .map(|i| ChatMessage::student(i.to_string()))
            .collect();
        let formatter = ConversationFormatter::new("S", "T", 2);
        assert_eq!(formatter.format(&history), "S: 4\nS: 5");
    }

    #[test]
    fn test_char_budget_drops_oldest_first() {
        let history = vec![
            ChatMessage::student("aaaa"),
            ChatMessage::tutor("bbbb"),
            ChatMessage::student("cccc"),
        ];
        // Each line is 7 chars; two lines plus separator are 15.
        let formatter = ConversationFormatter::new("S", "T", 10).with_char_budget(15);
        assert_eq!(formatter.format(&history), "T: bbbb\nS: cccc");
    }

    #[test]
    fn test_blank_message_keeps_its_line() {
        let history = vec![ChatMessage::student("  "), ChatMessage::tutor("مرحبا")];
        assert_eq!(formatter().format(&history), "الطالب:\nالمعلم: مرحبا");
    }
}
