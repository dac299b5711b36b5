//! Conversation transcript kept across a session.

use serde::{Deserialize, Serialize};

const HUMAN_PREFIX: &str = "Human";

/// Append-only record of the questions asked this session.
///
/// Answers are not stored; the transcript holds user turns only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationBuffer {
    turns: Vec<String>,
}

impl ConversationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user_message(&mut self, text: impl Into<String>) {
        self.turns.push(text.into());
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render the transcript as `Human: text` lines.
    pub fn buffer(&self) -> String {
        self.turns
            .iter()
            .map(|text| format!("{}: {}", HUMAN_PREFIX, text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
