//! Conversation types and rolling history

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of turns kept as model context
pub const HISTORY_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("User"),
            Role::Assistant => f.write_str("Assistant"),
        }
    }
}

/// Bounded window of the most recent turns, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    turns: VecDeque<Turn>,
    limit: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(limit + 1),
            limit,
        }
    }

    /// Append a turn, dropping the oldest ones beyond the limit
    pub fn push(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.limit {
            self.turns.pop_front();
        }
    }

    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render the history followed by an open assistant line carrying
    /// `instruction`, the shape the narrator model is prompted with.
    pub fn prompt_for(&self, instruction: &str) -> String {
        let mut prompt = String::new();
        for turn in self.turns() {
            prompt.push_str(&format!("{}: {}\n\n", turn.role, turn.content));
        }
        prompt.push_str(&format!("{}: {}", Role::Assistant, instruction));
        prompt
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_prompt() {
        let history = History::new();
        assert_eq!(history.prompt_for("Hello."), "Assistant: Hello.");
    }

    #[test]
    fn test_prompt_formatting() {
        let mut history = History::new();
        history.push(Turn::assistant("You wake in a cave."));
        history.push(Turn::user("go north"));

        assert_eq!(
            history.prompt_for("The player chose: go north."),
            "Assistant: You wake in a cave.\n\nUser: go north\n\nAssistant: The player chose: go north."
        );
    }

    #[test]
    fn test_retention_keeps_most_recent() {
        let mut history = History::new();
        for i in 0..10 {
            history.push(Turn::user(format!("turn {}", i)));
            assert!(history.len() <= HISTORY_LIMIT);
        }

        let kept: Vec<_> = history.turns().map(|t| t.content.as_str()).collect();
        assert_eq!(
            kept,
            vec!["turn 4", "turn 5", "turn 6", "turn 7", "turn 8", "turn 9"]
        );
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&Turn::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
