//! Command-line interface parsing and session startup

use std::error::Error;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

use crate::core::config::Config;
use crate::core::credentials::ApiKey;
use crate::core::error::StartupError;
use crate::core::executor::{ClientConfig, HttpTransport, RequestExecutor};
use crate::core::mode::FileTemplateLoader;
use crate::core::session::{select_mode, select_model, start_transcript, SessionController};
use crate::ui::console::Console;
use crate::utils::diagnostics::init_tracing;
use crate::utils::logging::TranscriptLog;

#[derive(Parser, Debug)]
#[command(name = "modechat")]
#[command(about = "A line-oriented terminal chat client with persona modes")]
#[command(
    long_about = "modechat asks for a mode and a model, then relays each line you type to an \
OpenAI-compatible chat completions API (OpenRouter by default) and prints the reply.\n\n\
Environment Variables:\n\
  API_KEY           Your OpenRouter API key (required, starts with sk-or-)\n\
  MODECHAT_LOG      Diagnostic log filter, e.g. modechat=debug (optional)\n\n\
A .env file in the working directory is loaded before reading the environment.\n\n\
Chat commands:\n\
  /model [NAME]     Switch model for the following requests\n\
  exit, quit, bye   End the session and append it to the log"
)]
pub struct Args {
    /// Markdown file the session transcript is appended to
    #[arg(short = 'l', long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Directory holding the per-mode prompt templates (1.txt .. 4.txt)
    #[arg(long, value_name = "DIR")]
    pub prompts_dir: Option<PathBuf>,

    /// API base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Alternate config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Err(err) = init_tracing() {
        eprintln!("Warning: failed to initialize diagnostics: {err}");
    }
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("Warning: ignoring unreadable .env file: {err}");
        }
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    if let Err(err) = runtime.block_on(run(args)) {
        eprintln!("{err}");
        let fixes = err.quick_fixes();
        if !fixes.is_empty() {
            eprintln!();
            eprintln!("💡 Quick fixes:");
            for fix in fixes {
                eprintln!("  • {fix}");
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

pub async fn run(args: Args) -> Result<(), StartupError> {
    let config = Config::load(args.config.as_deref())?;
    let api_key = ApiKey::from_env()?;
    let client = ClientConfig::from_config(&config, api_key, args.base_url.as_deref());
    debug!(url = %client.chat_url(), timeout = ?client.timeout, "client configured");
    let transport = HttpTransport::new(&client)?;

    let mut console = Console::stdout();
    let mut input = io::stdin().lock();

    let mode = select_mode(&mut input, &mut console)?;
    let prompts_dir = args
        .prompts_dir
        .unwrap_or_else(|| config.prompts_dir().to_path_buf());
    let transcript = start_transcript(mode, &FileTemplateLoader::new(prompts_dir))?;
    let model = select_model(&mut input, &mut console, None, config.default_model())?;

    let mut session = SessionController::new(
        input,
        console,
        RequestExecutor::new(transport, client.retry),
        transcript,
        model,
    );
    let log_path = args.log.unwrap_or_else(|| config.log_file());
    session.run_and_persist(&TranscriptLog::new(log_path)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_flags_is_accepted() {
        let args = Args::try_parse_from(["modechat"]).expect("parse");
        assert!(args.log.is_none());
        assert!(args.prompts_dir.is_none());
        assert!(args.base_url.is_none());
        assert!(args.config.is_none());
    }

    #[test]
    fn flags_override_paths() {
        let args = Args::try_parse_from([
            "modechat",
            "--log",
            "sessions.md",
            "--prompts-dir",
            "/tmp/prompts",
            "--base-url",
            "http://localhost:1234/v1",
        ])
        .expect("parse");
        assert_eq!(args.log, Some(PathBuf::from("sessions.md")));
        assert_eq!(args.prompts_dir, Some(PathBuf::from("/tmp/prompts")));
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:1234/v1"));
    }

    #[test]
    fn subcommands_are_rejected() {
        assert!(Args::try_parse_from(["modechat", "chat"]).is_err());
    }
}
