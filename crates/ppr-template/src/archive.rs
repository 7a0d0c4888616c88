//! Archive substitution driver
//!
//! Office documents are ZIP archives of XML parts plus binary media. The
//! driver runs the token matcher over every part whose name marks it as
//! XML, rewrites only the parts that changed, and copies every other entry
//! (media, unchanged XML, directories) through as raw compressed bytes, so
//! untouched parts are byte-identical to the template. Every input entry
//! appears exactly once in the output, in its original order.

use std::io::{Cursor, Read, Write};

use log::{debug, trace, warn};
use ppr_core::{FlatVariableMap, TEMPLATE_KEYS};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Result, TemplateError};
use crate::matcher::TokenMatcher;
use crate::text::{token_keys, visible_text};

/// True if the entry name marks a textual markup part subject to substitution
#[inline]
#[must_use = "checks whether a part is scanned for tokens"]
pub fn is_markup_part(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".xml")
}

/// What the driver did with one archive entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartAction {
    /// Markup part with at least one substitution, re-encoded
    Rewritten,
    /// Markup part without tokens, copied byte-for-byte
    Unchanged,
    /// Binary asset or directory, copied byte-for-byte
    PassedThrough,
}

/// Per-entry record of a render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartReport {
    pub name: String,
    pub action: PartAction,
    pub replacements: usize,
}

/// Rendered archive bytes together with what happened to each part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArchive {
    pub bytes: Vec<u8>,
    pub parts: Vec<PartReport>,
}

impl RenderedArchive {
    /// Total token occurrences replaced across all parts
    #[must_use]
    pub fn replacements(&self) -> usize {
        self.parts.iter().map(|p| p.replacements).sum()
    }

    /// Names of the parts that were rewritten
    pub fn rewritten_parts(&self) -> impl Iterator<Item = &str> {
        self.parts
            .iter()
            .filter(|p| p.action == PartAction::Rewritten)
            .map(|p| p.name.as_str())
    }
}

fn decode_error(part: Option<&str>) -> impl Fn(ZipError) -> TemplateError + '_ {
    move |source| TemplateError::Decode {
        part: part.map(str::to_string),
        source,
    }
}

fn read_markup_part<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
    name: &str,
) -> Result<String> {
    let mut entry = archive.by_index(index).map_err(decode_error(Some(name)))?;
    // The declared size is untrusted; grow the buffer from what is actually read
    let declared = entry.size();
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| decode_error(Some(name))(ZipError::from(e)))?;
    if u64::try_from(bytes.len()).map_or(true, |read| read != declared) {
        return Err(decode_error(Some(name))(ZipError::InvalidArchive(
            "entry size does not match its header".into(),
        )));
    }
    String::from_utf8(bytes).map_err(|source| TemplateError::PartEncoding {
        part: name.to_string(),
        source,
    })
}

/// Options for re-encoding a rewritten part, preserving what the entry carried
fn rewrite_options<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
    name: &str,
) -> Result<SimpleFileOptions> {
    let entry = archive.by_index_raw(index).map_err(decode_error(Some(name)))?;
    let method = match entry.compression() {
        CompressionMethod::Stored => CompressionMethod::Stored,
        _ => CompressionMethod::Deflated,
    };
    let mut options = SimpleFileOptions::default().compression_method(method);
    if let Some(modified) = entry.last_modified() {
        options = options.last_modified_time(modified);
    }
    if let Some(mode) = entry.unix_mode() {
        options = options.unix_permissions(mode);
    }
    Ok(options)
}

/// Render `template` with `vars`, returning the new archive bytes.
///
/// # Errors
///
/// - `TemplateError::Decode` if the archive is malformed or an entry cannot be read
/// - `TemplateError::PartEncoding` naming the part if an XML part is not UTF-8
/// - `TemplateError::Encode` if writing the output archive fails
pub fn render_archive(template: &[u8], vars: &FlatVariableMap) -> Result<Vec<u8>> {
    render_archive_with(template, &TokenMatcher::new(vars)).map(|rendered| rendered.bytes)
}

/// Render `template` with a prepared matcher, reporting per-part outcomes.
///
/// # Errors
///
/// See [`render_archive`].
pub fn render_archive_with(template: &[u8], matcher: &TokenMatcher) -> Result<RenderedArchive> {
    let mut archive = ZipArchive::new(Cursor::new(template)).map_err(decode_error(None))?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(template.len())));
    let mut parts = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let name = archive
            .name_for_index(index)
            .map(str::to_string)
            .ok_or_else(|| decode_error(None)(ZipError::FileNotFound))?;
        let is_dir = name.ends_with('/');

        let mut report = PartReport {
            name: name.clone(),
            action: PartAction::PassedThrough,
            replacements: 0,
        };

        if !is_dir && is_markup_part(&name) {
            let text = read_markup_part(&mut archive, index, &name)?;
            let outcome = matcher.substitute(&text);
            if outcome.changed {
                let options = rewrite_options(&mut archive, index, &name)?;
                let encode_error = |source: ZipError| TemplateError::Encode {
                    part: name.clone(),
                    source,
                };
                writer.start_file(name.as_str(), options).map_err(encode_error)?;
                writer
                    .write_all(outcome.text.as_bytes())
                    .map_err(|e| encode_error(ZipError::from(e)))?;
                debug!("rewrote {name} ({} replacements)", outcome.replacements);
                report.action = PartAction::Rewritten;
                report.replacements = outcome.replacements;
                parts.push(report);
                continue;
            }
            report.action = PartAction::Unchanged;
        }

        trace!("copying {name} unchanged");
        let raw = archive.by_index_raw(index).map_err(decode_error(Some(name.as_str())))?;
        writer
            .raw_copy_file(raw)
            .map_err(|source| TemplateError::Encode {
                part: name.clone(),
                source,
            })?;
        parts.push(report);
    }

    let bytes = writer
        .finish()
        .map_err(|source| TemplateError::Encode {
            part: "central directory".to_string(),
            source,
        })?
        .into_inner();

    Ok(RenderedArchive { bytes, parts })
}

/// One `{{key}}` occurrence found in a template part
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenSite {
    pub part: String,
    pub key: String,
    /// True if the key is produced by the flattener
    pub known: bool,
}

/// Every token a template expects, per part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateScan {
    pub parts_scanned: usize,
    pub tokens: Vec<TokenSite>,
}

impl TemplateScan {
    /// Tokens whose keys the flattener never produces; each is an authoring error
    pub fn unknown(&self) -> impl Iterator<Item = &TokenSite> {
        self.tokens.iter().filter(|t| !t.known)
    }

    /// Catalogue keys the template never references
    #[must_use]
    pub fn unused_keys(&self) -> Vec<&'static str> {
        TEMPLATE_KEYS
            .iter()
            .copied()
            .filter(|key| !self.tokens.iter().any(|t| t.key == *key))
            .collect()
    }
}

/// List every `{{key}}` token visible in the template's markup parts.
///
/// Tokens are read from the joined visible text of each part, so tokens
/// split across runs are reported like intact ones.
///
/// # Errors
///
/// Returns `Decode`, `PartEncoding` or `Xml` errors naming the unreadable part.
pub fn scan_template(template: &[u8]) -> Result<TemplateScan> {
    let mut archive = ZipArchive::new(Cursor::new(template)).map_err(decode_error(None))?;
    let mut scan = TemplateScan::default();

    for index in 0..archive.len() {
        let Some(name) = archive.name_for_index(index).map(str::to_string) else {
            continue;
        };
        if name.ends_with('/') || !is_markup_part(&name) {
            continue;
        }
        let text = read_markup_part(&mut archive, index, &name)?;
        let visible = visible_text(&name, &text)?;
        scan.parts_scanned += 1;
        for key in token_keys(&visible) {
            let known = TEMPLATE_KEYS.contains(&key.as_str());
            if !known {
                warn!("{name}: template token {{{{{key}}}}} has no variable");
            }
            scan.tokens.push(TokenSite {
                part: name.clone(),
                key,
                known,
            });
        }
    }

    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_markup_part() {
        assert!(is_markup_part("ppt/slides/slide1.xml"));
        assert!(is_markup_part("[Content_Types].XML"));
        assert!(!is_markup_part("ppt/media/image1.png"));
        assert!(!is_markup_part("ppt/slides/_rels/slide1.xml.rels"));
    }

    #[test]
    fn test_malformed_archive_is_decode_error() {
        let err = render_archive(b"definitely not a zip", &FlatVariableMap::new()).unwrap_err();
        assert!(matches!(err, TemplateError::Decode { part: None, .. }));
    }
}
