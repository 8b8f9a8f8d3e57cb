//! Plain-text Markdown rendering and boxed panels for assistant replies.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::utils::input::expand_tabs;

struct MarkdownLines {
    lines: Vec<String>,
    current: String,
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    in_code_block: bool,
}

impl MarkdownLines {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            current: String::new(),
            lists: Vec::new(),
            quote_depth: 0,
            in_code_block: false,
        }
    }

    fn quote_prefix(&self) -> String {
        "│ ".repeat(self.quote_depth)
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            let line = format!("{}{}", self.quote_prefix(), self.current.trim_end());
            self.lines.push(line);
            self.current.clear();
        }
    }

    fn blank(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|line| !line.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn start_item(&mut self) {
        self.flush();
        let depth = self.lists.len().saturating_sub(1);
        let marker = match self.lists.last_mut() {
            Some(Some(number)) => {
                let marker = format!("{number}. ");
                *number += 1;
                marker
            }
            _ => "• ".to_string(),
        };
        self.current = format!("{}{}", "  ".repeat(depth), marker);
    }

    fn code_text(&mut self, text: &str) {
        let prefix = self.quote_prefix();
        for line in text.lines() {
            let line = expand_tabs(line);
            self.lines.push(format!("{prefix}    {line}").trim_end().to_string());
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        while self.lines.last().is_some_and(|line| line.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

/// Flatten Markdown into terminal lines: emphasis markers are dropped, lists
/// get bullets, code blocks are indented.
pub fn render_markdown(text: &str) -> Vec<String> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut out = MarkdownLines::new();

    for event in Parser::new_ext(text, options) {
        match event {
            Event::Start(tag) => match tag {
                Tag::List(start) => {
                    out.flush();
                    out.lists.push(start);
                }
                Tag::Item => out.start_item(),
                Tag::BlockQuote(_) => {
                    out.flush();
                    out.quote_depth += 1;
                }
                Tag::CodeBlock(_) => {
                    out.flush();
                    out.in_code_block = true;
                }
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Paragraph | TagEnd::Heading(_) => {
                    if out.lists.is_empty() {
                        out.blank();
                    } else {
                        out.flush();
                    }
                }
                TagEnd::List(_) => {
                    out.lists.pop();
                    if out.lists.is_empty() {
                        out.blank();
                    }
                }
                TagEnd::Item => out.flush(),
                TagEnd::BlockQuote(_) => {
                    out.flush();
                    out.quote_depth = out.quote_depth.saturating_sub(1);
                    out.blank();
                }
                TagEnd::CodeBlock => {
                    out.in_code_block = false;
                    out.blank();
                }
                _ => {}
            },
            Event::Text(text) => {
                if out.in_code_block {
                    out.code_text(&text);
                } else {
                    out.current.push_str(&text);
                }
            }
            Event::Code(code) => {
                out.current.push('`');
                out.current.push_str(&code);
                out.current.push('`');
            }
            Event::SoftBreak => out.current.push(' '),
            Event::HardBreak => out.flush(),
            Event::Rule => {
                out.flush();
                out.lines.push("───".to_string());
                out.blank();
            }
            Event::TaskListMarker(checked) => {
                out.current.push_str(if checked { "[x] " } else { "[ ] " });
            }
            Event::Html(html) | Event::InlineHtml(html) => out.current.push_str(html.trim_end()),
            _ => {}
        }
    }

    out.finish()
}

/// Greedy word wrap by display width. Words wider than `width` are split.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    if line.width() <= width {
        return vec![line.to_string()];
    }

    let mut rows = Vec::new();
    let mut row = String::new();
    let mut row_width = 0;

    for word in line.split(' ') {
        let word_width = word.width();
        let gap = usize::from(row_width > 0);

        if row_width + gap + word_width <= width {
            if gap == 1 {
                row.push(' ');
            }
            row.push_str(word);
            row_width += gap + word_width;
            continue;
        }

        if row_width > 0 {
            rows.push(std::mem::take(&mut row));
            row_width = 0;
        }

        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if row_width + ch_width > width && row_width > 0 {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            row.push(ch);
            row_width += ch_width;
        }
    }

    if !row.is_empty() || rows.is_empty() {
        rows.push(row);
    }
    rows
}

/// Draw `lines` in a rounded box titled `title`, no wider than `max_width`
/// columns and no wider than the content needs.
pub fn frame_panel(title: &str, lines: &[String], max_width: usize) -> Vec<String> {
    let title_width = title.width();
    let inner_cap = max_width.saturating_sub(4).max(title_width + 1);

    let rows: Vec<String> = lines
        .iter()
        .flat_map(|line| wrap_line(line, inner_cap))
        .collect();
    let content_width = rows.iter().map(|row| row.width()).max().unwrap_or(0);
    let inner = content_width.max(title_width + 1).min(inner_cap);

    let mut framed = Vec::with_capacity(rows.len() + 2);
    framed.push(format!(
        "╭─ {title} {}╮",
        "─".repeat(inner + 2 - title_width - 3)
    ));
    for row in rows {
        let padding = inner.saturating_sub(row.width());
        framed.push(format!("│ {row}{} │", " ".repeat(padding)));
    }
    framed.push(format!("╰{}╯", "─".repeat(inner + 2)));
    framed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_are_separated_by_blank_lines() {
        let lines = render_markdown("# Title\n\nFirst *para*\nwraps.\n\nSecond.");
        assert_eq!(lines, vec!["Title", "", "First para wraps.", "", "Second."]);
    }

    #[test]
    fn lists_get_bullets_and_numbers() {
        let lines = render_markdown("- one\n- two\n  - nested\n\n3. three\n4. four");
        assert_eq!(
            lines,
            vec!["• one", "• two", "  • nested", "", "3. three", "4. four"]
        );
    }

    #[test]
    fn code_blocks_are_indented_verbatim() {
        let lines = render_markdown("Run:\n\n```rust\nfn main() {}\n```\n\nDone with `cargo`.");
        assert_eq!(
            lines,
            vec!["Run:", "", "    fn main() {}", "", "Done with `cargo`."]
        );
    }

    #[test]
    fn tabs_in_code_blocks_keep_the_border_aligned() {
        let lines = render_markdown("```\nif x {\n\treturn;\n}\n```");
        assert_eq!(lines[1], "        return;");

        let framed = frame_panel("AI", &lines, 80);
        let widths: Vec<usize> = framed.iter().map(|line| line.width()).collect();
        assert!(widths.windows(2).all(|pair| pair[0] == pair[1]), "{framed:?}");
    }

    #[test]
    fn block_quotes_are_prefixed() {
        let lines = render_markdown("> quoted text");
        assert_eq!(lines, vec!["│ quoted text"]);
    }

    #[test]
    fn wrap_line_respects_width() {
        assert_eq!(wrap_line("aaa bbb ccc", 7), vec!["aaa bbb", "ccc"]);
        assert_eq!(wrap_line("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_line("", 3), vec![""]);
    }

    #[test]
    fn frame_panel_pads_rows_to_equal_width() {
        let framed = frame_panel("AI", &["hi".to_string(), "longer row".to_string()], 80);
        let widths: Vec<usize> = framed.iter().map(|line| line.width()).collect();
        assert!(widths.windows(2).all(|pair| pair[0] == pair[1]), "{framed:?}");
        assert_eq!(framed[0], "╭─ AI ───────╮");
        assert_eq!(framed[1], "│ hi         │");
        assert_eq!(framed[2], "│ longer row │");
    }

    #[test]
    fn frame_panel_wraps_to_max_width() {
        let framed = frame_panel("AI", &["word ".repeat(10).trim().to_string()], 20);
        assert!(framed.iter().all(|line| line.width() <= 20), "{framed:?}");
        assert!(framed.len() > 3);
    }
}
