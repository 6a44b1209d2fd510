//! Story engine: the turn-taking loop between player and narrator
//!
//! The engine lives on the foreground flow. It never waits on the model
//! itself:
//! 1. An operation builds a prompt from the rolling history
//! 2. The request runs on its own task, bounded by a timeout
//! 3. The task reports a [`Completion`] through a channel
//! 4. The foreground hands it back to [`StoryEngine::handle_completion`],
//!    which updates history and the display in one step

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::{prompts_builtin, StoryPrompts};
use crate::conversation::{History, Turn};
use crate::providers::{Generator, ProviderError};

use super::transcript::{DisplaySink, Tag, Transcript};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Ended,
}

/// Why a narration could not be produced
#[derive(Debug, thiserror::Error)]
pub enum GenerationFailure {
    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("The narrator did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Generation task aborted")]
    TaskAborted,
}

/// Message from a background request back to the foreground flow
#[derive(Debug)]
pub enum Completion {
    WarmUp(Result<(), GenerationFailure>),
    Narration(Result<String, GenerationFailure>),
}

/// What happened to a player submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Blank input, or the session is not running
    Ignored,
    /// A narration is still being generated
    Busy,
    Accepted,
    Quit,
}

/// Knobs the engine needs from configuration
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub model: String,
    pub timeout: Duration,
    pub prompts: StoryPrompts,
}

pub struct StoryEngine {
    id: Uuid,
    generator: Arc<dyn Generator>,
    settings: EngineSettings,
    history: History,
    state: SessionState,
    in_flight: bool,
    /// History as it was before the pending player turn
    rollback: Option<History>,
    transcript: Transcript,
    completions: mpsc::UnboundedSender<Completion>,
}

impl StoryEngine {
    /// Create an engine and the receiver its completions arrive on
    pub fn new(
        generator: Arc<dyn Generator>,
        settings: EngineSettings,
        sink: Box<dyn DisplaySink>,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Self {
            id: Uuid::new_v4(),
            generator,
            settings,
            history: History::new(),
            state: SessionState::Idle,
            in_flight: false,
            rollback: None,
            transcript: Transcript::new(sink),
            completions: tx,
        };
        (engine, rx)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Warm the model up, then ask for the opening scene.
    /// Does nothing unless the session is idle with no request pending.
    pub fn begin_session(&mut self) {
        if self.state != SessionState::Idle || self.in_flight {
            tracing::debug!(session = %self.id, state = ?self.state, "begin ignored");
            return;
        }

        tracing::info!(session = %self.id, model = %self.settings.model, "starting session");
        self.transcript.emit(Tag::System, prompts_builtin::LOADING);

        let prompt = History::new().prompt_for(&self.settings.prompts.probe);
        self.dispatch(prompt, |result| Completion::WarmUp(result.map(|_| ())));
    }

    /// Handle a line typed by the player
    pub fn submit_player_input(&mut self, text: &str) -> Submission {
        if self.state != SessionState::Running {
            return Submission::Ignored;
        }

        let text = text.trim();
        if text.is_empty() {
            return Submission::Ignored;
        }

        if text.eq_ignore_ascii_case("quit") {
            self.transcript
                .emit(Tag::System, self.settings.prompts.farewell.clone());
            self.state = SessionState::Ended;
            tracing::info!(session = %self.id, "session ended by player");
            return Submission::Quit;
        }

        if self.in_flight {
            tracing::debug!(session = %self.id, "submission rejected, narration pending");
            return Submission::Busy;
        }

        self.rollback = Some(self.history.clone());
        self.history.push(Turn::user(text));
        self.transcript.emit(Tag::Player, text);

        let instruction = self.settings.prompts.continuation_for(text);
        self.advance(&instruction);
        Submission::Accepted
    }

    /// Ask the narrator to continue from the current history
    pub fn advance(&mut self, instruction: &str) {
        if instruction.trim().is_empty() || self.in_flight {
            return;
        }

        let prompt = self.history.prompt_for(instruction);
        self.dispatch(prompt, Completion::Narration);
    }

    /// Apply a finished request on the foreground flow
    pub fn handle_completion(&mut self, completion: Completion) {
        self.in_flight = false;

        match completion {
            Completion::WarmUp(Ok(())) => {
                if self.state != SessionState::Idle {
                    return;
                }
                self.state = SessionState::Running;
                tracing::info!(session = %self.id, "model ready");
                self.transcript.emit(Tag::System, prompts_builtin::LOADED);

                let opening = self.settings.prompts.opening.clone();
                self.advance(&opening);
            }
            Completion::WarmUp(Err(e)) => {
                tracing::warn!(session = %self.id, error = %e, "warm-up failed");
                self.transcript
                    .emit(Tag::System, format!("Could not load the model: {}", e));
            }
            Completion::Narration(result) => {
                let rollback = self.rollback.take();
                if self.state == SessionState::Ended {
                    tracing::debug!(session = %self.id, "discarding narration after quit");
                    return;
                }

                match result {
                    Ok(text) => {
                        self.history.push(Turn::assistant(text.clone()));
                        self.transcript.emit(Tag::Narrator, text);
                    }
                    Err(e) => {
                        tracing::warn!(session = %self.id, error = %e, "narration failed");
                        match rollback {
                            Some(previous) => self.history = previous,
                            // Opening scene never arrived; /start may try again
                            None if self.history.is_empty() => {
                                self.state = SessionState::Idle;
                                tracing::info!(session = %self.id, "opening failed, back to idle");
                            }
                            None => {}
                        }
                        self.transcript
                            .emit(Tag::System, format!("The narrator is silent: {}", e));
                    }
                }
            }
        }
    }

    fn dispatch<F>(&mut self, prompt: String, wrap: F)
    where
        F: FnOnce(Result<String, GenerationFailure>) -> Completion + Send + 'static,
    {
        self.in_flight = true;

        let generator = Arc::clone(&self.generator);
        let model = self.settings.model.clone();
        let timeout = self.settings.timeout;
        let tx = self.completions.clone();

        tracing::debug!(session = %self.id, prompt_len = prompt.len(), "dispatching request");

        let task = tokio::spawn(async move {
            match tokio::time::timeout(timeout, generator.generate(&model, &prompt)).await {
                Ok(result) => result.map_err(GenerationFailure::from),
                Err(_) => Err(GenerationFailure::Timeout(timeout)),
            }
        });

        tokio::spawn(async move {
            let result = task.await.unwrap_or(Err(GenerationFailure::TaskAborted));
            // The receiver is gone only when the front-end has shut down
            let _ = tx.send(wrap(result));
        });
    }
}
