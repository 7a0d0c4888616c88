//! Shattered token patterns
//!
//! Authoring tools split a run of text whenever formatting changes, and they
//! do so mid-token: `{{project_name}}` typed with a spell-check squiggle or a
//! bold brace may be stored as
//!
//! ```text
//! <a:t>{{proj</a:t></a:r><a:r><a:rPr b="1"/><a:t>ect_name}}</a:t>
//! ```
//!
//! A [`ShatteredPattern`] matches the literal sequence `{{key}}` while
//! tolerating any number of complete markup tags between every pair of
//! characters. Matches are never allowed to contain a paragraph open or
//! close tag, so a token can only be stitched together within one paragraph.

use std::ops::Range;

use regex::Regex;

/// One complete markup tag, e.g. `</a:t>` or `<a:rPr lang="en-GB"/>`
const MARKUP_FRAGMENT: &str = "<[^<>]*>";

/// Local element name that delimits paragraphs in DrawingML, WordprocessingML
/// and ODF (`a:p`, `w:p`, `text:p`)
const PARAGRAPH_LOCAL_NAME: &str = "p";

/// Compiled matcher for one key's possibly-shattered token.
#[derive(Debug, Clone)]
pub struct ShatteredPattern {
    key: String,
    regex: Regex,
}

impl ShatteredPattern {
    /// Compile the pattern for `key`
    ///
    /// # Errors
    ///
    /// Returns the regex error if the compiled pattern exceeds the regex
    /// engine's size limits (only possible for pathologically long keys).
    pub fn new(key: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&Self::pattern_source(key))?;
        Ok(Self {
            key: key.to_string(),
            regex,
        })
    }

    /// Regex source for `key`: every literal character of `{{key}}`, escaped,
    /// separated by zero or more markup fragments.
    #[must_use = "returns the pattern source"]
    pub fn pattern_source(key: &str) -> String {
        let gap = format!("(?:{MARKUP_FRAGMENT})*");
        let mut buf = [0u8; 4];
        let mut source = String::with_capacity((key.len() + 4) * (gap.len() + 2));
        for (i, ch) in "{{".chars().chain(key.chars()).chain("}}".chars()).enumerate() {
            if i > 0 {
                source.push_str(&gap);
            }
            source.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
        }
        source
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Byte ranges of every non-overlapping match that stays within one paragraph.
    ///
    /// A candidate crossing a paragraph boundary is rejected and the search
    /// resumes one character after its start, so a valid token starting inside
    /// a rejected candidate is still found.
    #[must_use = "returns the matched ranges"]
    pub fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut pos = 0;
        while let Some(m) = self.regex.find_at(text, pos) {
            if crosses_paragraph(m.as_str()) {
                pos = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
                continue;
            }
            ranges.push(m.range());
            pos = m.end();
        }
        ranges
    }

    /// Replace every match with `replacement` (inserted verbatim), returning
    /// the rewritten text and the number of matches.
    ///
    /// Returns `None` when there is no match so callers can keep the original text.
    #[must_use = "returns the rewritten text, if anything matched"]
    pub fn replace_all(&self, text: &str, replacement: &str) -> Option<(String, usize)> {
        let ranges = self.find_all(text);
        if ranges.is_empty() {
            return None;
        }
        let count = ranges.len();
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for range in ranges {
            out.push_str(&text[last..range.start]);
            out.push_str(replacement);
            last = range.end;
        }
        out.push_str(&text[last..]);
        Some((out, count))
    }
}

/// True if `span` contains an opening, closing or empty paragraph tag.
fn crosses_paragraph(span: &str) -> bool {
    span.match_indices('<').any(|(i, _)| {
        let tag = &span[i + 1..];
        let tag = tag.strip_prefix('/').unwrap_or(tag);
        let name_end = tag
            .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
            .unwrap_or(tag.len());
        let name = &tag[..name_end];
        let local = name.rsplit(':').next().unwrap_or(name);
        local == PARAGRAPH_LOCAL_NAME
    })
}
