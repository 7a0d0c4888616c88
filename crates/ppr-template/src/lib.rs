//! Template substitution for product potential reports
//!
//! Fills `{{key}}` tokens in Office archive templates (`.pptx`, `.docx`,
//! `.odp`, ...) and HTML previews from a [`ppr_core::FlatVariableMap`].
//!
//! Presentation editors routinely split a token across several formatted
//! runs; the [`TokenMatcher`] stitches such shattered tokens back together
//! within a paragraph and replaces the whole span with the escaped value.
//!
//! ## Usage
//!
//! ```no_run
//! use ppr_core::{flatten, BusinessPlanRecord};
//! use ppr_template::render_archive;
//!
//! let template = std::fs::read("template.pptx")?;
//! let vars = flatten(&BusinessPlanRecord::new("Trakker", "Ada Lovelace"));
//! let rendered = render_archive(&template, &vars)?;
//! std::fs::write("Trakker_PPR.pptx", rendered)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod error;
pub mod html;
pub mod matcher;
pub mod pattern;
pub mod text;

pub use archive::{
    is_markup_part, render_archive, render_archive_with, scan_template, PartAction, PartReport,
    RenderedArchive, TemplateScan, TokenSite,
};
pub use error::{Result, TemplateError};
pub use html::{render_html, render_request, HtmlPreview};
pub use matcher::{escape_html, escape_markup, substitute, Substitution, TokenMatcher};
pub use pattern::ShatteredPattern;
pub use text::{token_keys, visible_text};
