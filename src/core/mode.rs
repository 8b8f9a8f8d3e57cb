//! Persona modes and their system prompt templates.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::data::path_display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Prompt optimizer
    Lyra,
    /// Message rewriter
    Echo,
    /// Story assistant
    Ghostwriter,
    /// Code helper
    Codex,
    /// No system prompt
    Plain,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Lyra,
        Mode::Echo,
        Mode::Ghostwriter,
        Mode::Codex,
        Mode::Plain,
    ];

    /// Menu number shown to the operator.
    pub fn number(self) -> u8 {
        match self {
            Mode::Lyra => 1,
            Mode::Echo => 2,
            Mode::Ghostwriter => 3,
            Mode::Codex => 4,
            Mode::Plain => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Lyra => "Lyra",
            Mode::Echo => "Echo",
            Mode::Ghostwriter => "Ghostwriter",
            Mode::Codex => "Codex",
            Mode::Plain => "Plain",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            Mode::Lyra => "prompt optimizer",
            Mode::Echo => "message rewriter",
            Mode::Ghostwriter => "story assistant",
            Mode::Codex => "code helper",
            Mode::Plain => "no system prompt",
        }
    }

    /// Key of the system prompt template, or `None` when the mode runs
    /// without one.
    pub fn template_key(self) -> Option<String> {
        match self {
            Mode::Plain => None,
            other => Some(other.number().to_string()),
        }
    }

    /// Parse a menu choice. Accepts the number or the mode name.
    pub fn from_choice(choice: &str) -> Result<Self, InvalidModeError> {
        let choice = choice.trim();
        Self::ALL
            .into_iter()
            .find(|mode| {
                choice == mode.number().to_string() || choice.eq_ignore_ascii_case(mode.name())
            })
            .ok_or_else(|| InvalidModeError {
                choice: choice.to_string(),
            })
    }

    /// Load this mode's system prompt, if it has one.
    pub fn system_prompt(
        self,
        loader: &dyn TemplateLoader,
    ) -> Result<Option<String>, TemplateError> {
        match self.template_key() {
            Some(key) => loader.load(&key).map(Some),
            None => Ok(None),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} – {}", self.number(), self.name(), self.tagline())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidModeError {
    pub choice: String,
}

impl fmt::Display for InvalidModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid choice '{}'. Exiting.", self.choice)
    }
}

impl StdError for InvalidModeError {}

/// Source of system prompt templates.
pub trait TemplateLoader {
    fn load(&self, key: &str) -> Result<String, TemplateError>;
}

/// Reads `<dir>/<key>.txt`.
#[derive(Debug, Clone)]
pub struct FileTemplateLoader {
    dir: PathBuf,
}

impl FileTemplateLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.txt"))
    }
}

impl TemplateLoader for FileTemplateLoader {
    fn load(&self, key: &str) -> Result<String, TemplateError> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Err(TemplateError::NotFound { path });
        }
        fs::read_to_string(&path).map_err(|source| TemplateError::Read { path, source })
    }
}

#[derive(Debug)]
pub enum TemplateError {
    NotFound { path: PathBuf },
    Read { path: PathBuf, source: std::io::Error },
}

impl TemplateError {
    pub fn path(&self) -> &Path {
        match self {
            TemplateError::NotFound { path } | TemplateError::Read { path, .. } => path,
        }
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::NotFound { path } => {
                write!(f, "Prompt file not found: {}", path_display(path))
            }
            TemplateError::Read { path, source } => {
                write!(
                    f,
                    "Failed to read prompt file {}: {}",
                    path_display(path),
                    source
                )
            }
        }
    }
}

impl StdError for TemplateError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            TemplateError::NotFound { .. } => None,
            TemplateError::Read { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn numbered_choices_map_to_modes() {
        let parsed: Vec<Mode> = ["1", "2", "3", "4", "5"]
            .iter()
            .map(|choice| Mode::from_choice(choice).expect("valid choice"))
            .collect();
        assert_eq!(parsed, Mode::ALL.to_vec());
    }

    #[test]
    fn names_are_accepted_case_insensitively() {
        assert_eq!(Mode::from_choice(" codex "), Ok(Mode::Codex));
        assert_eq!(Mode::from_choice("GHOSTWRITER"), Ok(Mode::Ghostwriter));
    }

    #[test]
    fn out_of_range_choices_are_rejected() {
        for choice in ["", "0", "6", "1.0", "lyra2"] {
            assert!(Mode::from_choice(choice).is_err(), "accepted {choice:?}");
        }
    }

    #[test]
    fn plain_has_no_template() {
        assert_eq!(Mode::Plain.template_key(), None);
        assert_eq!(Mode::Lyra.template_key().as_deref(), Some("1"));
        assert_eq!(Mode::Codex.template_key().as_deref(), Some("4"));
    }

    #[test]
    fn file_loader_reads_template_by_mode_number() {
        let dir = TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join("3.txt"), "You write stories.\n").expect("write");
        let loader = FileTemplateLoader::new(dir.path());

        let prompt = Mode::Ghostwriter
            .system_prompt(&loader)
            .expect("template should load");
        assert_eq!(prompt.as_deref(), Some("You write stories.\n"));
        assert_eq!(Mode::Plain.system_prompt(&loader).expect("plain"), None);
    }

    #[test]
    fn missing_template_is_reported_with_path() {
        let dir = TempDir::new().expect("temp dir");
        let loader = FileTemplateLoader::new(dir.path());

        let err = Mode::Echo
            .system_prompt(&loader)
            .expect_err("missing template");
        assert!(matches!(err, TemplateError::NotFound { .. }));
        assert_eq!(err.path(), dir.path().join("2.txt"));
        assert!(err.to_string().starts_with("Prompt file not found: "));
    }
}
