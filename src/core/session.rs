//! Session controller: mode and model selection, then the chat loop.

use std::io::{self, BufRead, Write};

use tracing::{debug, info, warn};

use crate::core::error::StartupError;
use crate::core::executor::{ChatTransport, RequestExecutor};
use crate::core::message::Transcript;
use crate::core::mode::{Mode, TemplateError, TemplateLoader};
use crate::ui::console::Console;
use crate::utils::input::read_clean_line;
use crate::utils::logging::TranscriptLog;

pub const EXIT_KEYWORDS: [&str; 3] = ["exit", "quit", "bye"];
pub const MODEL_COMMAND: &str = "/model";

/// What a chat line asks the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Exit,
    Empty,
    /// Model change, optionally with the new model given inline.
    ChangeModel(Option<String>),
    Message(String),
}

impl ChatInput {
    /// Classify an already trimmed line.
    pub fn classify(line: &str) -> Self {
        if line.is_empty() {
            return ChatInput::Empty;
        }
        if EXIT_KEYWORDS
            .iter()
            .any(|keyword| line.eq_ignore_ascii_case(keyword))
        {
            return ChatInput::Exit;
        }

        let is_model_command = line
            .get(..MODEL_COMMAND.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(MODEL_COMMAND));
        if is_model_command {
            let rest = &line[MODEL_COMMAND.len()..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                let inline = rest.trim();
                return ChatInput::ChangeModel((!inline.is_empty()).then(|| inline.to_string()));
            }
        }

        ChatInput::Message(line.to_string())
    }
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    console: &mut Console<W>,
    label: &str,
) -> io::Result<Option<String>> {
    console.prompt(label)?;
    read_clean_line(input)
}

/// Show the mode menu and read a choice. Anything outside the menu,
/// including closed input, is an error.
pub fn select_mode<R: BufRead, W: Write>(
    input: &mut R,
    console: &mut Console<W>,
) -> Result<Mode, StartupError> {
    console.blank()?;
    console.heading("Welcome to AI. Choose a mode:")?;
    console.blank()?;
    for mode in Mode::ALL {
        console.line(&mode.to_string())?;
    }
    console.blank()?;

    let choice = ask(input, console, "Pick 1, 2, 3, 4 or 5")?.unwrap_or_default();
    let mode = Mode::from_choice(&choice)?;
    info!(mode = mode.name(), "mode selected");
    Ok(mode)
}

/// Fresh transcript for `mode`, seeded with its system prompt if it has one.
pub fn start_transcript(
    mode: Mode,
    loader: &dyn TemplateLoader,
) -> Result<Transcript, TemplateError> {
    Ok(match mode.system_prompt(loader)? {
        Some(prompt) => Transcript::with_system(prompt),
        None => Transcript::new(),
    })
}

/// Ask for a model. With no current model an empty answer picks `default`;
/// otherwise an empty answer keeps the current one.
pub fn select_model<R: BufRead, W: Write>(
    input: &mut R,
    console: &mut Console<W>,
    current: Option<&str>,
    default: &str,
) -> io::Result<String> {
    let (answer, fallback) = match current {
        Some(current) => {
            console.blank()?;
            console.accent(&format!("Currently using model: {current}"))?;
            let answer = ask(
                input,
                console,
                "Change model? Paste new model or press Enter to keep current",
            )?;
            (answer, current)
        }
        None => {
            let label = format!("Paste model name to use (e.g., {default})");
            (ask(input, console, &label)?, default)
        }
    };

    Ok(answer
        .filter(|model| !model.is_empty())
        .unwrap_or_else(|| fallback.to_string()))
}

pub struct SessionController<R, W: Write, T> {
    input: R,
    console: Console<W>,
    executor: RequestExecutor<T>,
    transcript: Transcript,
    model: String,
}

impl<R, W, T> SessionController<R, W, T>
where
    R: BufRead,
    W: Write,
    T: ChatTransport,
{
    pub fn new(
        input: R,
        console: Console<W>,
        executor: RequestExecutor<T>,
        transcript: Transcript,
        model: String,
    ) -> Self {
        Self {
            input,
            console,
            executor,
            transcript,
            model,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn executor(&self) -> &RequestExecutor<T> {
        &self.executor
    }

    pub fn into_console(self) -> Console<W> {
        self.console
    }

    /// Read and answer lines until an exit keyword or closed input.
    pub async fn run(&mut self) -> io::Result<()> {
        self.console.blank()?;
        self.console.dim("Type 'exit' to quit.")?;
        self.console.blank()?;

        loop {
            let line = match ask(&mut self.input, &mut self.console, "You") {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.console.blank()?;
                    self.console.assistant("AI: Later.")?;
                    break;
                }
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    debug!(%err, "discarded unreadable input line");
                    self.console
                        .assistant("AI: Couldn't read that line (not valid UTF-8). Try again.")?;
                    continue;
                }
                Err(err) => return Err(err),
            };

            match ChatInput::classify(&line) {
                ChatInput::Exit => {
                    self.console.assistant("AI: Later.")?;
                    break;
                }
                ChatInput::Empty => {
                    self.console.assistant("AI: Say something.")?;
                }
                ChatInput::ChangeModel(inline) => self.change_model(inline)?,
                ChatInput::Message(text) => {
                    self.transcript.push_user(text);
                    let outcome = self
                        .executor
                        .run_turn(&mut self.transcript, &self.model, &mut self.console)
                        .await?;
                    debug!(attempts = outcome.attempts(), "turn finished");
                }
            }
        }

        Ok(())
    }

    fn change_model(&mut self, inline: Option<String>) -> io::Result<()> {
        let model = match inline {
            Some(model) => model,
            None => {
                let current = self.model.clone();
                select_model(
                    &mut self.input,
                    &mut self.console,
                    Some(current.as_str()),
                    &current,
                )?
            }
        };
        info!(from = %self.model, to = %model, "model changed");
        self.model = model;
        self.console
            .accent(&format!("Switched to model: {}", self.model))
    }

    /// Run the chat loop, then append the transcript to `log` even when the
    /// loop stopped on an I/O error. The loop's error wins over a report
    /// failure.
    pub async fn run_and_persist(&mut self, log: &TranscriptLog) -> io::Result<()> {
        let outcome = self.run().await;
        if let Err(err) = &outcome {
            warn!(%err, "chat loop stopped early");
        }
        let reported = self.persist(log);
        outcome?;
        reported
    }

    /// Append the transcript to `log`. Write failures are reported, not
    /// returned.
    pub fn persist(&mut self, log: &TranscriptLog) -> io::Result<()> {
        match log.append_session(&self.transcript) {
            Ok(true) => self
                .console
                .dim(&format!("(Chat saved to {})", log.path().display())),
            Ok(false) => Ok(()),
            Err(err) => self.console.alert(&format!("Failed to save chat: {err}")),
        }
    }
}
