//! Greedy word wrapping

use crate::config::TextStyle;
use crate::error::MeasureError;
use crate::metrics::{text_width, Font};

/// Wrap `text` into lines no wider than `max_width` millimetres.
///
/// Words are separated by whitespace and joined with single spaces. Explicit
/// newlines start a new line; an empty line between them is kept. A word
/// wider than `max_width` is placed alone on its line without hyphenation.
/// Blank input yields no lines.
///
/// # Errors
///
/// Returns `MeasureError` if `max_width` or the style's font size is not a
/// positive finite number.
pub fn wrap_text(text: &str, max_width: f32, style: TextStyle) -> Result<Vec<String>, MeasureError> {
    if !max_width.is_finite() || max_width <= 0.0 {
        return Err(MeasureError::Width(max_width));
    }
    let font = Font::for_weight(style.bold);
    let space = text_width(" ", font, style.size)?;

    let mut lines = Vec::new();
    if text.trim().is_empty() {
        return Ok(lines);
    }

    for paragraph in text.trim_end().lines() {
        let mut line = String::new();
        let mut line_width = 0.0;
        for word in paragraph.split_whitespace() {
            let word_width = text_width(word, font, style.size)?;
            if line.is_empty() {
                line.push_str(word);
                line_width = word_width;
            } else if line_width + space + word_width <= max_width {
                line.push(' ');
                line.push_str(word);
                line_width += space + word_width;
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
                line_width = word_width;
            }
        }
        lines.push(line);
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextRoles;

    fn body() -> TextStyle {
        TextRoles::default().body
    }

    fn width(line: &str) -> f32 {
        text_width(line, Font::Regular, body().size).unwrap()
    }

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap_text("GPS tag for bikes", 100.0, body()).unwrap(), ["GPS tag for bikes"]);
    }

    #[test]
    fn test_lines_fit_width() {
        let text = "The quick brown fox jumps over the lazy dog and keeps running across the field";
        let lines = wrap_text(text, 40.0, body()).unwrap();
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(width(line) <= 40.0, "{line:?} too wide");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_overlong_word_alone_on_line() {
        let url = "https://example.org/a/very/long/path/that/cannot/possibly/fit";
        let lines = wrap_text(&format!("Source: {url} end"), 30.0, body()).unwrap();
        assert_eq!(lines, ["Source:", url, "end"]);
    }

    #[test]
    fn test_newlines_and_blank_lines_kept() {
        let lines = wrap_text("First\n\nSecond  para", 100.0, body()).unwrap();
        assert_eq!(lines, ["First", "", "Second para"]);
    }

    #[test]
    fn test_blank_input() {
        assert!(wrap_text("", 50.0, body()).unwrap().is_empty());
        assert!(wrap_text("  \n ", 50.0, body()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_width() {
        assert_eq!(wrap_text("x", 0.0, body()), Err(MeasureError::Width(0.0)));
        assert!(wrap_text("x", f32::INFINITY, body()).is_err());
    }
}
