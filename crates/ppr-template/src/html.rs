//! HTML preview rendering
//!
//! Hand-written HTML templates never have their tokens split by an editor,
//! so only intact `{{key}}` literals are replaced. Values are escaped for
//! HTML text, with `'` written as `&#39;`.

use log::debug;
use ppr_core::{FlatVariableMap, RenderRequest};

use crate::matcher::TokenMatcher;

/// Fill `template` with `vars`; tokens without a variable are left as written
#[must_use = "returns the rendered HTML"]
pub fn render_html(template: &str, vars: &FlatVariableMap) -> String {
    let outcome = TokenMatcher::html(vars).substitute(template);
    debug!("html preview: {} replacements", outcome.replacements);
    outcome.text
}

/// Rendered preview with the file name the caller should offer it under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlPreview {
    pub html: String,
    pub file_name: String,
}

/// Render a validated request against an HTML template
#[must_use = "returns the rendered preview"]
pub fn render_request(template: &str, request: &RenderRequest) -> HtmlPreview {
    HtmlPreview {
        html: render_html(template, &request.data),
        file_name: request.file_name("html"),
    }
}
