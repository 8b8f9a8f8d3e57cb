//! Diagnostic tracing on stderr.
//!
//! Filtered by `MODECHAT_LOG` (same syntax as `RUST_LOG`), e.g.
//! `MODECHAT_LOG=modechat=debug`. Defaults to warnings, which covers failed
//! request attempts and a chat loop stopped by an I/O error.

use std::io;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "MODECHAT_LOG";
pub const DEFAULT_FILTER: &str = "warn";

/// Filter for the given directives, falling back to [`DEFAULT_FILTER`] when
/// they are missing or do not parse.
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let directives = std::env::var(LOG_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(filter_from(directives.as_deref()))
        .with_target(true)
        .with_writer(io::stderr)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_filter_defaults_to_warn() {
        assert_eq!(filter_from(None).to_string(), "warn");
    }

    #[test]
    fn directives_from_env_are_used() {
        assert_eq!(
            filter_from(Some("modechat=debug")).to_string(),
            "modechat=debug"
        );
    }

    #[test]
    fn unparsable_directives_fall_back() {
        assert_eq!(filter_from(Some("modechat=[")).to_string(), "warn");
    }
}
