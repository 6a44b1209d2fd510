//! Narrator prompts
//!
//! Every text the narrator is driven with lives here. A story file may
//! replace any of them:
//!
//! ```toml
//! [prompts]
//! opening = """
//! You are the narrator of a ghost story...
//! """
//! continuation = "The player chose: {choice}. Continue the story..."
//! ```

use serde::{Deserialize, Serialize};

/// Marker replaced with the player's input in the continuation prompt
pub const CHOICE_PLACEHOLDER: &str = "{choice}";

/// The set of texts that drive one adventure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryPrompts {
    /// Instruction for the very first narration
    pub opening: String,

    /// Warm-up text sent to confirm the model is loaded; the reply is discarded
    pub probe: String,

    /// Instruction sent after each player choice, must contain `{choice}`
    pub continuation: String,

    /// Shown when the player quits
    pub farewell: String,
}

impl StoryPrompts {
    /// Build the continuation instruction for a player's choice
    pub fn continuation_for(&self, choice: &str) -> String {
        self.continuation.replace(CHOICE_PLACEHOLDER, choice)
    }
}

impl Default for StoryPrompts {
    fn default() -> Self {
        Self {
            opening: builtin::OPENING.to_string(),
            probe: builtin::PROBE.to_string(),
            continuation: builtin::CONTINUATION.to_string(),
            farewell: builtin::FAREWELL.to_string(),
        }
    }
}

/// Built-in prompts that don't require files
pub mod builtin {
    /// Opening narration instruction
    pub const OPENING: &str = "You are the narrator of an interactive fiction game. \
        Invent a unique world, main character, and opening scene. \
        Describe the setting and present two choices for the player.";

    /// Warm-up probe
    pub const PROBE: &str = "Hello.";

    /// Continuation template
    pub const CONTINUATION: &str = "The player chose: {choice}. \
        Continue the story in 3-4 sentences, describe the consequences briefly, \
        and present exactly two short choices.";

    pub const FAREWELL: &str = "Thanks for playing!";

    pub const LOADING: &str = "Loading model, please wait...";

    pub const LOADED: &str = "Model loaded! The adventure begins.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuation_for() {
        let prompts = StoryPrompts::default();
        assert_eq!(
            prompts.continuation_for("go north"),
            "The player chose: go north. Continue the story in 3-4 sentences, \
             describe the consequences briefly, and present exactly two short choices."
        );
    }

    #[test]
    fn test_partial_override() {
        let prompts: StoryPrompts = toml::from_str(r#"farewell = "Farewell, traveller.""#).unwrap();
        assert_eq!(prompts.farewell, "Farewell, traveller.");
        assert_eq!(prompts.opening, builtin::OPENING);
    }
}
