//! Line-oriented terminal front-end

use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::core::{
    default_export_path, Completion, DisplayEntry, DisplaySink, ExportOutcome, SessionState,
    StoryEngine, Submission,
};

const HELP: &str = "Commands:
  /start           begin the adventure
  /export [path]   save the transcript
  /status          show the session state
  /help            show this message
  /exit            leave the game
Anything else is your next move. Type 'quit' to end the story.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Export(Option<PathBuf>),
    Status,
    Help,
    Exit,
    Input(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Input(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name.to_lowercase().as_str() {
            "start" => Command::Start,
            "export" if arg.is_empty() => Command::Export(None),
            "export" => Command::Export(Some(PathBuf::from(arg))),
            "status" => Command::Status,
            "help" => Command::Help,
            "exit" => Command::Exit,
            _ => Command::Input(line.to_string()),
        }
    }
}

/// One-line summary for `/status`
pub fn status_line(state: SessionState, in_flight: bool, turns: usize) -> String {
    let state = match state {
        SessionState::Idle => "not started",
        SessionState::Running => "running",
        SessionState::Ended => "ended",
    };
    let narrator = if in_flight { "writing" } else { "waiting for you" };
    format!("Session {}, narrator {}, {} turn(s) in memory", state, narrator, turns)
}

/// Prints each entry to stdout followed by a blank line
pub struct ConsoleSink;

impl DisplaySink for ConsoleSink {
    fn emit(&mut self, entry: &DisplayEntry) {
        println!("{}\n", entry.render());
    }
}

/// Run the foreground loop until `/exit` or end of input
pub async fn run(
    mut engine: StoryEngine,
    mut completions: mpsc::UnboundedReceiver<Completion>,
    transcript_dir: &Path,
) -> anyhow::Result<()> {
    println!("Infinite Adventure\n\n{}\n", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed");
                    break;
                };

                match Command::parse(&line) {
                    Command::Start => engine.begin_session(),
                    Command::Export(path) => {
                        let path = path.unwrap_or_else(|| default_export_path(transcript_dir));
                        match engine.transcript().export(&path).await {
                            Ok(ExportOutcome::Written(path)) => {
                                println!("Transcript saved to {}\n", path.display())
                            }
                            Ok(ExportOutcome::Empty) => println!("Nothing to export yet.\n"),
                            Err(e) => {
                                tracing::warn!(error = %e, "export failed");
                                println!("Export failed: {}\n", e);
                            }
                        }
                    }
                    Command::Status => println!(
                        "{}\n",
                        status_line(engine.state(), engine.is_in_flight(), engine.history().len())
                    ),
                    Command::Help => println!("{}\n", HELP),
                    Command::Exit => break,
                    Command::Input(text) => match engine.submit_player_input(&text) {
                        Submission::Busy => println!("(the narrator is still writing...)\n"),
                        Submission::Ignored
                            if engine.state() == SessionState::Idle && !engine.is_in_flight() =>
                        {
                            println!("(type /start to begin)\n")
                        }
                        _ => {}
                    },
                }
            }
            Some(completion) = completions.recv() => engine.handle_completion(completion),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start"), Command::Start);
        assert_eq!(Command::parse("  /START  "), Command::Start);
        assert_eq!(Command::parse("/export"), Command::Export(None));
        assert_eq!(
            Command::parse("/export  saves/run one.txt "),
            Command::Export(Some(PathBuf::from("saves/run one.txt")))
        );
        assert_eq!(Command::parse("/status"), Command::Status);
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("/exit"), Command::Exit);
    }

    #[test]
    fn test_parse_player_input() {
        assert_eq!(
            Command::parse("go north"),
            Command::Input("go north".to_string())
        );
        assert_eq!(Command::parse("quit"), Command::Input("quit".to_string()));
        assert_eq!(
            Command::parse("/dance wildly"),
            Command::Input("/dance wildly".to_string())
        );
    }

    #[test]
    fn test_status_line() {
        assert_eq!(
            status_line(SessionState::Idle, true, 0),
            "Session not started, narrator writing, 0 turn(s) in memory"
        );
        assert_eq!(
            status_line(SessionState::Running, false, 6),
            "Session running, narrator waiting for you, 6 turn(s) in memory"
        );
    }
}
