//! Token matcher
//!
//! Substitutes `{{key}}` tokens in markup with escaped values. Keys are
//! processed longest first so a key that is a prefix of another (`price`,
//! `price_extra`) never consumes part of the longer token. For each key the
//! intact literal is replaced first, then the shattered pattern picks up
//! tokens split by interleaved markup; a shattered match replaces the whole
//! span, interior markup included, with one plain value.

use std::borrow::Cow;

use ppr_core::FlatVariableMap;

use crate::pattern::ShatteredPattern;

/// Escape `& < > " '` for insertion into XML or HTML text.
#[inline]
#[must_use = "returns the escaped value"]
pub fn escape_markup(value: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(value)
}

/// Escape for HTML text; as [`escape_markup`] but `'` becomes `&#39;`.
#[must_use = "returns the escaped value"]
pub fn escape_html(value: &str) -> Cow<'_, str> {
    match escape_markup(value) {
        Cow::Owned(escaped) if escaped.contains("&apos;") => {
            Cow::Owned(escaped.replace("&apos;", "&#39;"))
        }
        escaped => escaped,
    }
}

/// Outcome of one substitution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    /// True if at least one token was replaced
    pub changed: bool,
    /// Number of token occurrences replaced
    pub replacements: usize,
}

#[derive(Debug, Clone)]
struct Entry {
    token: String,
    escaped: String,
    shattered: Option<ShatteredPattern>,
}

/// Substitution plan for one variable map, reusable across many texts.
#[derive(Debug, Clone)]
pub struct TokenMatcher {
    entries: Vec<Entry>,
}

impl TokenMatcher {
    /// Build a matcher that handles both intact and shattered tokens
    #[must_use = "creates a token matcher"]
    pub fn new(vars: &FlatVariableMap) -> Self {
        Self::build(vars, true, escape_markup)
    }

    /// Build a matcher that only replaces intact `{{key}}` literals
    #[must_use = "creates a token matcher"]
    pub fn intact_only(vars: &FlatVariableMap) -> Self {
        Self::build(vars, false, escape_markup)
    }

    /// Intact-only matcher whose values are escaped with [`escape_html`]
    #[must_use = "creates a token matcher"]
    pub fn html(vars: &FlatVariableMap) -> Self {
        Self::build(vars, false, escape_html)
    }

    fn build(vars: &FlatVariableMap, shattered: bool, escape: fn(&str) -> Cow<'_, str>) -> Self {
        let mut keys: Vec<&str> = vars.keys().collect();
        // Longest first; ties keep key order so output is deterministic.
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let entries = keys
            .into_iter()
            .map(|key| Entry {
                token: ppr_core::token_for(key),
                escaped: escape(vars.value(key)).into_owned(),
                shattered: shattered.then(|| compile(key)).flatten(),
            })
            .collect();
        Self { entries }
    }

    /// Number of keys this matcher substitutes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Substitute every known token in `text`
    #[must_use = "returns the substituted text"]
    pub fn substitute(&self, text: &str) -> Substitution {
        let mut current = text.to_string();
        let mut replacements = 0;

        // Every token, intact or shattered, starts with a literal '{'.
        if !current.contains('{') {
            return Substitution {
                text: current,
                changed: false,
                replacements,
            };
        }

        for entry in &self.entries {
            let intact = current.matches(entry.token.as_str()).count();
            if intact > 0 {
                current = current.replace(entry.token.as_str(), &entry.escaped);
                replacements += intact;
            }
            if let Some(pattern) = &entry.shattered {
                if let Some((rewritten, spans)) = pattern.replace_all(&current, &entry.escaped) {
                    log::trace!("stitched {spans} shattered '{}' token(s)", pattern.key());
                    current = rewritten;
                    replacements += spans;
                }
            }
        }

        Substitution {
            text: current,
            changed: replacements > 0,
            replacements,
        }
    }
}

fn compile(key: &str) -> Option<ShatteredPattern> {
    match ShatteredPattern::new(key) {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            log::warn!("key '{key}' only matches intact tokens: {e}");
            None
        }
    }
}

/// Substitute `vars` into `text`, returning the result and whether anything changed.
///
/// Convenience wrapper over [`TokenMatcher`]; build the matcher once when
/// substituting into many texts.
#[must_use = "returns the substituted text"]
pub fn substitute(text: &str, vars: &FlatVariableMap) -> (String, bool) {
    let outcome = TokenMatcher::new(vars).substitute(text);
    (outcome.text, outcome.changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> FlatVariableMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_escape_markup() {
        assert_eq!(
            escape_markup(r#"Fish & Chips <"best"> 'ever'"#),
            "Fish &amp; Chips &lt;&quot;best&quot;&gt; &apos;ever&apos;"
        );
        assert!(matches!(escape_markup("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_escape_html_uses_numeric_apostrophe() {
        assert_eq!(escape_html("Ada's <tag>"), "Ada&#39;s &lt;tag&gt;");
        assert!(matches!(escape_html("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_intact_substitution_escapes() {
        let (out, changed) = substitute("<a:t>{{name}}</a:t>", &vars(&[("name", "A&B")]));
        assert_eq!(out, "<a:t>A&amp;B</a:t>");
        assert!(changed);
    }

    #[test]
    fn test_unknown_key_is_noop() {
        let (out, changed) = substitute("<a:t>{{other}}</a:t>", &vars(&[("name", "x")]));
        assert_eq!(out, "<a:t>{{other}}</a:t>");
        assert!(!changed);
    }

    #[test]
    fn test_longer_key_wins_over_prefix() {
        let v = vars(&[("price", "10"), ("price_extra", "2")]);
        let (out, _) = substitute("{{price}}/{{price_extra}}", &v);
        assert_eq!(out, "10/2");

        let (out, _) = substitute("{{price<b/>_extra}}", &v);
        assert_eq!(out, "2");
    }

    #[test]
    fn test_shattered_substitution_discards_interior_markup() {
        let text = "<a:r><a:t>{{na</a:t></a:r><a:r><a:rPr i=\"1\"/><a:t>me}}</a:t></a:r>";
        let (out, changed) = substitute(text, &vars(&[("name", "Trakker")]));
        assert!(changed);
        assert_eq!(out, "<a:r><a:t>Trakker</a:t></a:r>");
    }

    #[test]
    fn test_case_is_not_folded() {
        let (out, changed) = substitute("{{Name}}", &vars(&[("name", "x")]));
        assert_eq!(out, "{{Name}}");
        assert!(!changed);
    }

    #[test]
    fn test_intact_only_ignores_shattered() {
        let matcher = TokenMatcher::intact_only(&vars(&[("name", "x")]));
        let outcome = matcher.substitute("{{na<b>me}} {{name}}");
        assert_eq!(outcome.text, "{{na<b>me}} x");
        assert_eq!(outcome.replacements, 1);
    }

    #[test]
    fn test_counts_replacements() {
        let matcher = TokenMatcher::new(&vars(&[("a", "1"), ("b", "2")]));
        let outcome = matcher.substitute("{{a}}{{a}}{<x>{b}}");
        assert_eq!(outcome.text, "112");
        assert_eq!(outcome.replacements, 3);
        assert!(outcome.changed);
    }

    #[test]
    fn test_text_without_braces_is_untouched() {
        let matcher = TokenMatcher::new(&vars(&[("a", "1")]));
        let outcome = matcher.substitute("<a:t>nothing here</a:t>");
        assert!(!outcome.changed);
        assert_eq!(outcome.text, "<a:t>nothing here</a:t>");
    }
}
