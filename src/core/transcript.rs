//! Display buffer and transcript export
//!
//! Everything the player sees passes through the [`Transcript`]: each entry
//! is forwarded to the active [`DisplaySink`] and kept, in order, so the
//! whole adventure can be written out later.

use std::path::{Path, PathBuf};

use chrono::Local;

/// Who a piece of displayed text belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Narrator,
    Player,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    pub tag: Tag,
    pub text: String,
}

impl DisplayEntry {
    pub fn render(&self) -> String {
        match self.tag {
            Tag::Narrator => format!("Narrator:\n{}", self.text),
            Tag::Player => format!("Player: {}", self.text),
            Tag::System => self.text.clone(),
        }
    }
}

/// Where displayed text ends up, e.g. a terminal
pub trait DisplaySink: Send {
    fn emit(&mut self, entry: &DisplayEntry);
}

/// Sink that renders nothing; the transcript still records every entry
#[cfg(test)]
pub(crate) struct NullSink;

#[cfg(test)]
impl DisplaySink for NullSink {
    fn emit(&mut self, _entry: &DisplayEntry) {}
}

/// Result of an export request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Nothing has been displayed yet, no file was written
    Empty,
    Written(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only record of displayed entries
pub struct Transcript {
    entries: Vec<DisplayEntry>,
    sink: Box<dyn DisplaySink>,
}

impl Transcript {
    pub fn new(sink: Box<dyn DisplaySink>) -> Self {
        Self {
            entries: Vec::new(),
            sink,
        }
    }

    pub fn emit(&mut self, tag: Tag, text: impl Into<String>) {
        let entry = DisplayEntry {
            tag,
            text: text.into(),
        };
        self.sink.emit(&entry);
        self.entries.push(entry);
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[DisplayEntry] {
        &self.entries
    }

    /// Full plain-text transcript, entries separated by a blank line
    pub fn text(&self) -> String {
        self.entries
            .iter()
            .map(DisplayEntry::render)
            .collect::<Vec<_>>()
            .join("\n\n")
            .trim()
            .to_string()
    }

    /// Write the transcript to `path` as UTF-8 text
    pub async fn export(&self, path: &Path) -> Result<ExportOutcome, ExportError> {
        let content = self.text();
        if content.is_empty() {
            return Ok(ExportOutcome::Empty);
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, content).await?;

        tracing::info!(path = %path.display(), entries = self.entries.len(), "transcript exported");
        Ok(ExportOutcome::Written(path.to_path_buf()))
    }
}

/// Timestamped file name inside `dir` for exports without an explicit path
pub fn default_export_path(dir: &Path) -> PathBuf {
    dir.join(format!(
        "adventure-{}.txt",
        Local::now().format("%Y%m%d-%H%M%S")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<DisplayEntry>>>);

    impl DisplaySink for Recorder {
        fn emit(&mut self, entry: &DisplayEntry) {
            self.0.lock().unwrap().push(entry.clone());
        }
    }

    #[test]
    fn test_emit_forwards_to_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut transcript = Transcript::new(Box::new(Recorder(seen.clone())));

        transcript.emit(Tag::System, "Loading model, please wait...");
        transcript.emit(Tag::Player, "go north");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].tag, Tag::Player);
        assert_eq!(transcript.entries(), seen.as_slice());
    }

    #[test]
    fn test_text_rendering() {
        let mut transcript = Transcript::new(Box::new(NullSink));
        transcript.emit(Tag::System, "Model loaded! The adventure begins.");
        transcript.emit(Tag::Narrator, "You stand at a crossroads.");
        transcript.emit(Tag::Player, "go left");

        assert_eq!(
            transcript.text(),
            "Model loaded! The adventure begins.\n\nNarrator:\nYou stand at a crossroads.\n\nPlayer: go left"
        );
    }

    #[test]
    fn test_export_empty_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.txt");
        let transcript = Transcript::new(Box::new(NullSink));

        let outcome = tokio_test::block_on(transcript.export(&path)).unwrap();
        assert_eq!(outcome, ExportOutcome::Empty);
        assert!(!path.exists());
    }

    #[test]
    fn test_export_writes_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("story.txt");
        let mut transcript = Transcript::new(Box::new(NullSink));
        transcript.emit(Tag::Narrator, "Le café est fermé.");

        let outcome = tokio_test::block_on(transcript.export(&path)).unwrap();
        assert_eq!(outcome, ExportOutcome::Written(path.clone()));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Narrator:\nLe café est fermé."
        );
    }

    #[test]
    fn test_export_into_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let mut transcript = Transcript::new(Box::new(NullSink));
        transcript.emit(Tag::System, "hello");

        let result = tokio_test::block_on(transcript.export(&blocker.join("story.txt")));
        assert!(matches!(result, Err(ExportError::Io(_))));
    }

    #[test]
    fn test_default_export_path() {
        let path = default_export_path(Path::new("/tmp/adventures"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(path.starts_with("/tmp/adventures"));
        assert!(name.starts_with("adventure-"));
        assert!(name.ends_with(".txt"));
    }
}
