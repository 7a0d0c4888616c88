//! Product potential report assembly

use log::info;
use ppr_core::{BusinessPlanRecord, FlatVariableMap};

use crate::config::LayoutConfig;
use crate::document::PaginatedDocument;
use crate::emit::to_pdf;
use crate::error::{RenderError, Result};
use crate::sections;
use crate::writer::{Chrome, PageWriter};

/// Date format printed on the cover
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Today's date as printed on the cover
#[must_use]
pub fn today() -> String {
    chrono::Local::now().format(DEFAULT_DATE_FORMAT).to_string()
}

/// Lay out the five report sections.
///
/// Text comes from `vars`; competitor image payloads come from `record`.
///
/// # Errors
///
/// Returns `LayoutError` naming the section being drawn if layout fails.
pub fn layout_report(
    record: &BusinessPlanRecord,
    vars: &FlatVariableMap,
    config: &LayoutConfig,
    date: &str,
) -> Result<PaginatedDocument> {
    let mut writer = PageWriter::new(
        config,
        Chrome::Report {
            client_name: vars.value("client_name").to_string(),
        },
    );
    sections::cover(&mut writer, vars, date)?;
    sections::target_market(&mut writer, vars)?;
    sections::competitor_landscape(&mut writer, record, vars)?;
    sections::growth_strategy(&mut writer, vars)?;
    sections::lean_business_plan(&mut writer, vars)?;

    let document = writer.finish(vars.value("project_name"));
    info!(
        "laid out report for '{}': {} pages, {} image warnings",
        vars.value("project_name"),
        document.page_count(),
        document.warnings.len()
    );
    Ok(document)
}

/// Render the paginated report as PDF bytes, dated today.
///
/// # Errors
///
/// Returns `RenderError::Layout` naming the failing section, or an encoding error.
pub fn render_paginated(
    record: &BusinessPlanRecord,
    vars: &FlatVariableMap,
) -> std::result::Result<Vec<u8>, RenderError> {
    render_paginated_with(record, vars, &LayoutConfig::default(), &today())
}

/// Render the paginated report with explicit constants and cover date.
///
/// # Errors
///
/// See [`render_paginated`].
pub fn render_paginated_with(
    record: &BusinessPlanRecord,
    vars: &FlatVariableMap,
    config: &LayoutConfig,
    date: &str,
) -> std::result::Result<Vec<u8>, RenderError> {
    let document = layout_report(record, vars, config, date)?;
    to_pdf(&document)
}
