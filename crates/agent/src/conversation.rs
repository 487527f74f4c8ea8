//! Bounded-by-session conversation memory. Turns are appended, never
//! mutated; there is no eviction, history lives exactly as long as the
//! process (an explicit non-goal of this core).

use chrono::{DateTime, Utc};
use permia_core::PermitCode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationTurn {
    pub query: String,
    pub response_text: String,
    pub context_id: PermitCode,
    pub asked_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct ConversationContext {
    turns: Vec<ConversationTurn>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, query: &str, response_text: &str, context_id: PermitCode) {
        self.turns.push(ConversationTurn {
            query: query.to_owned(),
            response_text: response_text.to_owned(),
            context_id,
            asked_at: Utc::now(),
        });
    }

    /// Oldest-first, the order prompts embed them in.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Document the last answered turn was grounded in, for follow-ups.
    pub fn latest_context(&self) -> Option<PermitCode> {
        self.turns.last().map(|turn| turn.context_id)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
