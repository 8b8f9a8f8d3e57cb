//! Line-oriented console output with optional ANSI styling.

use std::io::{self, IsTerminal, Write};

use chrono::Local;
use ratatui::crossterm::style::{Attribute, Color, ContentStyle, StyledContent};
use ratatui::crossterm::terminal;

use crate::ui::panel::{frame_panel, render_markdown};

const FALLBACK_WIDTH: usize = 80;

fn style(foreground: Option<Color>, attributes: &[Attribute]) -> ContentStyle {
    let mut style = ContentStyle::new();
    style.foreground_color = foreground;
    for attribute in attributes {
        style.attributes.set(*attribute);
    }
    style
}

pub struct Console<W: Write> {
    out: W,
    styled: bool,
    width: usize,
}

impl Console<io::Stdout> {
    /// Console on stdout, styled only when attached to a terminal.
    pub fn stdout() -> Self {
        let stdout = io::stdout();
        let styled = stdout.is_terminal();
        let width = terminal::size()
            .map(|(w, _)| w as usize)
            .unwrap_or(FALLBACK_WIDTH);
        Self {
            out: stdout,
            styled,
            width,
        }
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, styled: bool, width: usize) -> Self {
        Self { out, styled, width }
    }

    /// Unstyled console with the fallback width.
    pub fn plain(out: W) -> Self {
        Self::new(out, false, FALLBACK_WIDTH)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_styled(&mut self, text: &str, style: ContentStyle, newline: bool) -> io::Result<()> {
        if self.styled {
            write!(self.out, "{}", StyledContent::new(style, text))?;
        } else {
            write!(self.out, "{text}")?;
        }
        if newline {
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        self.write_styled(text, ContentStyle::new(), true)
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.out.flush()
    }

    pub fn heading(&mut self, text: &str) -> io::Result<()> {
        self.write_styled(text, style(Some(Color::Magenta), &[Attribute::Bold]), true)
    }

    pub fn dim(&mut self, text: &str) -> io::Result<()> {
        self.write_styled(text, style(None, &[Attribute::Dim]), true)
    }

    pub fn accent(&mut self, text: &str) -> io::Result<()> {
        self.write_styled(text, style(Some(Color::Cyan), &[Attribute::Bold]), true)
    }

    pub fn assistant(&mut self, text: &str) -> io::Result<()> {
        self.write_styled(text, style(Some(Color::Green), &[Attribute::Bold]), true)
    }

    pub fn error(&mut self, text: &str) -> io::Result<()> {
        self.write_styled(text, style(Some(Color::Red), &[]), true)
    }

    pub fn alert(&mut self, text: &str) -> io::Result<()> {
        self.write_styled(text, style(Some(Color::Red), &[Attribute::Bold]), true)
    }

    /// Print a prompt label without a trailing newline.
    pub fn prompt(&mut self, label: &str) -> io::Result<()> {
        self.write_styled(label, style(Some(Color::Blue), &[Attribute::Bold]), false)?;
        write!(self.out, ": ")?;
        self.out.flush()
    }

    /// Render an assistant reply as Markdown inside a titled box.
    pub fn reply_panel(&mut self, reply: &str) -> io::Result<()> {
        let title = format!("AI [{}]", Local::now().format("%H:%M:%S"));
        let lines = render_markdown(reply);
        for line in frame_panel(&title, &lines, self.width) {
            self.write_styled(&line, style(Some(Color::Green), &[]), true)?;
        }
        Ok(())
    }
}
