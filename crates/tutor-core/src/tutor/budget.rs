//! Prompt size budgeting.
//!
//! Splits the prompt's token ceiling between the retrieved curriculum
//! context and the conversation history so neither can crowd out the
//! other (or the template and student message).

/// Rough characters-per-token ratio used for estimates.
const CHARS_PER_TOKEN: usize = 4;

/// Allocation of a prompt's token ceiling.
///
/// - Curriculum context: 45%
/// - Conversation history: 35%
/// - Template + student message: the remaining 20%
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptBudget {
    pub max_prompt_tokens: u32,
    pub context_tokens: u32,
    pub history_tokens: u32,
}

impl PromptBudget {
    pub fn new(max_prompt_tokens: u32) -> Self {
        Self {
            max_prompt_tokens,
            context_tokens: percent_of(max_prompt_tokens, 45),
            history_tokens: percent_of(max_prompt_tokens, 35),
        }
    }

    /// Character allowance for the curriculum context region.
    pub fn context_chars(&self) -> usize {
        self.context_tokens as usize * CHARS_PER_TOKEN
    }

    /// Character allowance for the conversation history region.
    pub fn history_chars(&self) -> usize {
        self.history_tokens as usize * CHARS_PER_TOKEN
    }

    /// Estimate tokens for a piece of text (1 token ~ 4 chars, rounded up).
    pub fn estimate_tokens(text: &str) -> u32 {
        text.chars().count().div_ceil(CHARS_PER_TOKEN) as u32
    }
}

/// `percent`% of `tokens`, computed in u64 so large ceilings cannot overflow.
fn percent_of(tokens: u32, percent: u64) -> u32 {
    // percent <= 100, so the result never exceeds `tokens`.
    (u64::from(tokens) * percent / 100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_allocation() {
        let budget = PromptBudget::new(10_000);
        assert_eq!(budget.context_tokens, 4_500);
        assert_eq!(budget.history_tokens, 3_500);
        assert_eq!(budget.context_chars(), 18_000);
        assert_eq!(budget.history_chars(), 14_000);
    }

    #[test]
    fn test_large_ceiling_does_not_overflow() {
        let budget = PromptBudget::new(100_000_000);
        assert_eq!(budget.context_tokens, 45_000_000);
        assert_eq!(budget.history_tokens, 35_000_000);

        let budget = PromptBudget::new(u32::MAX);
        assert_eq!(budget.context_tokens, (u64::from(u32::MAX) * 45 / 100) as u32);
    }

    #[test]
    fn test_estimate_counts_chars_not_bytes() {
        // Eight Arabic letters are sixteen UTF-8 bytes but two tokens.
        assert_eq!(PromptBudget::estimate_tokens("مرحبامرح"), 2);
        assert_eq!(PromptBudget::estimate_tokens("abcde"), 2);
        assert_eq!(PromptBudget::estimate_tokens(""), 0);
    }
}
