//! Visible text extraction and token discovery
//!
//! Reduces an Office markup part to the text a reader would see, joining
//! runs so that a token split across runs reads as one `{{key}}`. Used to
//! compare rendered output and to report the tokens a template expects.

use std::sync::LazyLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use crate::error::{Result, TemplateError};

/// `{{key}}` in visible text; keys are anything but braces and whitespace
static RE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}\s]+)\}\}").expect("Invalid token regex"));

/// Text of every `*:t` element in `xml`, with a newline after each paragraph.
///
/// `part` names the source in errors.
///
/// # Errors
///
/// Returns `TemplateError::Xml` if the markup is malformed or contains an
/// invalid entity reference.
pub fn visible_text(part: &str, xml: &str) -> Result<String> {
    let xml_error = |source: quick_xml::Error| TemplateError::Xml {
        part: part.to_string(),
        source,
    };

    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut text_depth = 0usize;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                if e.name().local_name().as_ref() == b"t" {
                    text_depth += 1;
                }
            }
            Event::End(e) => match e.name().local_name().as_ref() {
                b"t" => text_depth = text_depth.saturating_sub(1),
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().local_name().as_ref() {
                b"br" => out.push('\n'),
                b"tab" => out.push('\t'),
                _ => {}
            },
            Event::Text(e) if text_depth > 0 => {
                out.push_str(&e.unescape().map_err(xml_error)?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}

/// Keys of every `{{key}}` token in `text`, in order of appearance (with repeats)
#[must_use = "returns the token keys found"]
pub fn token_keys(text: &str) -> Vec<String> {
    RE_TOKEN
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}
