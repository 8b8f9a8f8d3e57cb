use crate::core::message::{now_timestamp, Transcript};
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only Markdown log of finished sessions.
pub struct TranscriptLog {
    file_path: PathBuf,
}

impl TranscriptLog {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Append one session block. Returns `false` without touching the file
    /// when the transcript is empty.
    pub fn append_session(&self, transcript: &Transcript) -> io::Result<bool> {
        if transcript.is_empty() {
            return Ok(false);
        }

        let rendered = format_session(transcript, &now_timestamp());

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(rendered.as_bytes())?;
        writer.flush()?;
        Ok(true)
    }
}

/// Render a session header followed by one block per message.
pub fn format_session(transcript: &Transcript, session_started: &str) -> String {
    let mut out = String::new();
    let _ = write!(out, "# Chat Session at {session_started}\n\n");

    for message in transcript.messages() {
        let _ = writeln!(out, "**{}** [{}]:", message.role.label(), message.timestamp);
        for line in message.content.lines() {
            let _ = writeln!(out, "{line}");
        }
        out.push_str("\n---\n\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_transcript() -> Transcript {
        let mut transcript = Transcript::with_system("You are Codex.\nBe precise.");
        transcript.push_user("How do I read a file?");
        transcript.push_assistant("Use `std::fs::read_to_string`.");
        transcript
    }

    #[test]
    fn format_session_writes_one_block_per_message() {
        let transcript = sample_transcript();
        let rendered = format_session(&transcript, "2024-05-01 09:30:00");
        let ts = |i: usize| transcript.messages()[i].timestamp.clone();

        let expected = format!(
            "# Chat Session at 2024-05-01 09:30:00\n\n\
**System** [{}]:\nYou are Codex.\nBe precise.\n\n---\n\n\
**User** [{}]:\nHow do I read a file?\n\n---\n\n\
**Assistant** [{}]:\nUse `std::fs::read_to_string`.\n\n---\n\n",
            ts(0),
            ts(1),
            ts(2)
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn append_session_preserves_previous_content() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("chat_log.md");
        std::fs::write(&path, "earlier session\n").expect("seed log");
        let log = TranscriptLog::new(&path);

        assert!(log.append_session(&sample_transcript()).expect("append"));
        assert!(log.append_session(&sample_transcript()).expect("append"));

        let contents = std::fs::read_to_string(&path).expect("read log");
        assert!(contents.starts_with("earlier session\n# Chat Session at "));
        assert_eq!(contents.matches("# Chat Session at ").count(), 2);
        assert_eq!(contents.matches("**User** [").count(), 2);
    }

    #[test]
    fn empty_transcript_is_not_written() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("chat_log.md");
        let log = TranscriptLog::new(&path);

        assert!(!log.append_session(&Transcript::new()).expect("append"));
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_path_reports_error() {
        let dir = TempDir::new().expect("temp dir");
        let log = TranscriptLog::new(dir.path().join("missing").join("chat_log.md"));
        assert!(log.append_session(&sample_transcript()).is_err());
    }
}
