//! Input utilities for line-based prompts

use std::io::{self, BufRead};

/// Columns a tab expands to in prompts and rendered text.
pub const TAB_WIDTH: usize = 4;

/// Replace every tab with [`TAB_WIDTH`] spaces.
pub fn expand_tabs(text: &str) -> String {
    text.replace('\t', &" ".repeat(TAB_WIDTH))
}

/// Normalize one line typed at a prompt
///
/// This function:
/// - Converts tabs to [`TAB_WIDTH`] spaces
/// - Drops carriage returns, newlines and other control characters
/// - Trims surrounding whitespace
pub fn clean_line(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());

    for c in expand_tabs(raw).chars() {
        if !c.is_control() {
            cleaned.push(c);
        }
    }

    cleaned.trim().to_string()
}

/// Read one cleaned line. `None` means the input is closed.
pub fn read_clean_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut raw = String::new();
    if input.read_line(&mut raw)? == 0 {
        return Ok(None);
    }
    Ok(Some(clean_line(&raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_clean_line_basic() {
        assert_eq!(clean_line("  hello world \n"), "hello world");
    }

    #[test]
    fn test_clean_line_tabs() {
        assert_eq!(clean_line("hello\tworld"), "hello    world");
    }

    #[test]
    fn test_clean_line_windows_line_ending() {
        assert_eq!(clean_line("quit\r\n"), "quit");
    }

    #[test]
    fn test_clean_line_filters_control_chars() {
        assert_eq!(clean_line("hel\x07lo\x1b"), "hello");
    }

    #[test]
    fn test_read_clean_line_reports_eof() {
        let mut input = Cursor::new("first\n\nlast");
        assert_eq!(read_clean_line(&mut input).unwrap().as_deref(), Some("first"));
        assert_eq!(read_clean_line(&mut input).unwrap().as_deref(), Some(""));
        assert_eq!(read_clean_line(&mut input).unwrap().as_deref(), Some("last"));
        assert_eq!(read_clean_line(&mut input).unwrap(), None);
    }
}
