use serde::Deserialize;
use std::path::{Path, PathBuf};

/// On-disk configuration. Every field is optional; unset fields fall back to
/// the built-in defaults in [`super::defaults`].
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// API base URL (e.g., "https://openrouter.ai/api/v1")
    pub base_url: Option<String>,
    /// Model used when the model prompt is left empty
    pub default_model: Option<String>,
    /// Directory holding the per-mode system prompt templates
    pub prompts_dir: Option<PathBuf>,
    /// Markdown file the transcript is appended to on exit
    pub log_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub max_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
