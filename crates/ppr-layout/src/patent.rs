//! Patent application draft and filing receipt documents
//!
//! Both are plain portrait pages without header or footer chrome.

use ppr_core::{ApplicantDetails, PatentDraftRecord, FIGURE_LABELS};

use crate::config::LayoutConfig;
use crate::document::PaginatedDocument;
use crate::emit::to_pdf;
use crate::error::{RenderError, Result};
use crate::report::today;
use crate::writer::{Chrome, PageWriter};

/// Default file name for a rendered application draft
pub const APPLICATION_FILE_NAME: &str = "Patent_Application_Draft.pdf";
/// Default file name for a rendered filing receipt
pub const RECEIPT_FILE_NAME: &str = "Filing_Receipt.pdf";

const DESCRIPTION_SECTION: &str = "Description";
const DRAWINGS_SECTION: &str = "Drawings";
const RECEIPT_SECTION: &str = "Filing Receipt";

/// First line sits this far below the top margin on the first page
const FIRST_PAGE_OFFSET: f32 = 10.0;

const FILING_STATUS: &str = "Submitted for Review";
const FILING_FEE: &str = "\u{00A3}450.00 (Paid)";
const RECEIPT_FOOTNOTE: &str =
    "Thank you for your submission. Our experts will review your filing shortly.";

/// Caption of the drawing in slot `index`
#[must_use]
pub fn figure_label(index: usize) -> String {
    FIGURE_LABELS
        .get(index)
        .map_or_else(|| format!("Fig {}.", index + 1), |label| (*label).to_string())
}

/// Lay out the application: title, wrapped description, then one page of
/// drawings (if any) with captions.
///
/// Empty drawing slots are skipped. A drawing that cannot be decoded is
/// replaced by its caption and reported as a warning.
///
/// # Errors
///
/// Returns `LayoutError` if the document cannot be laid out.
pub fn layout_patent_application(
    draft: &PatentDraftRecord,
    config: &LayoutConfig,
) -> Result<PaginatedDocument> {
    let (roles, palette) = (config.roles, config.palette);
    let x = config.margin;
    let heading = roles.label.regular();
    let title = &draft.filing_details.invention_title;

    let mut w = PageWriter::new(config, Chrome::None);
    w.begin_section(DESCRIPTION_SECTION)?;
    w.advance(FIRST_PAGE_OFFSET);
    w.text(x, &format!("Title: {title}"), roles.body, palette.text)?;
    w.advance(15.0 - roles.body.line_height);
    w.text(x, "Description", heading, palette.text)?;
    w.advance(10.0 - heading.line_height);
    w.paragraph(
        x,
        config.description_width,
        &draft.description,
        roles.small,
        palette.text,
    )?;

    if draft.has_drawings() {
        w.begin_section(DRAWINGS_SECTION)?;
        w.text(x, "Drawings", heading, palette.text)?;
        w.advance(20.0 - heading.line_height);

        let caption_style = roles.small;
        for (index, payload) in draft.drawings.iter().enumerate() {
            let Some(payload) = payload else {
                continue;
            };
            let caption = figure_label(index);
            w.ensure_space(caption_style.line_height + config.drawing_size)?;
            w.text(x, &caption, caption_style, palette.text)?;
            w.image(
                x,
                config.drawing_size,
                config.drawing_size,
                Some(payload.as_str()),
                &caption,
            )?;
            w.advance(config.drawing_spacing);
        }
    }

    let name = if title.is_empty() {
        "Patent Application Draft"
    } else {
        title.as_str()
    };
    Ok(w.finish(name))
}

/// Lay out the single-page filing receipt.
///
/// # Errors
///
/// Returns `LayoutError` if the receipt cannot be laid out.
pub fn layout_filing_receipt(
    details: &ApplicantDetails,
    config: &LayoutConfig,
    date: &str,
) -> Result<PaginatedDocument> {
    let (roles, palette) = (config.roles, config.palette);
    let x = config.margin;
    let width = config.content_width();
    let entry = roles.subheading.regular().with_line_height(10.0);
    let reference = if details.reference.is_empty() {
        "N/A"
    } else {
        details.reference.as_str()
    };

    let mut w = PageWriter::new(config, Chrome::None);
    w.begin_section(RECEIPT_SECTION)?;
    w.advance(FIRST_PAGE_OFFSET);
    w.text(x, "Filing Receipt", roles.lead, palette.text)?;
    w.advance(15.0 - roles.lead.line_height);
    for line in [
        format!("Date: {date}"),
        format!("Reference: {reference}"),
        format!("Applicant: {}", details.name),
        format!("Title: {}", details.invention_title),
        format!("Status: {FILING_STATUS}"),
        format!("Payment: {FILING_FEE}"),
    ] {
        w.paragraph(x, width, &line, entry, palette.text)?;
    }
    w.advance(10.0);
    w.paragraph(x, width, RECEIPT_FOOTNOTE, roles.small, palette.text)?;

    Ok(w.finish(RECEIPT_SECTION))
}

/// Render the application draft as PDF bytes.
///
/// # Errors
///
/// Returns `RenderError` if layout or encoding fails.
pub fn render_patent_application(
    draft: &PatentDraftRecord,
) -> std::result::Result<Vec<u8>, RenderError> {
    let document = layout_patent_application(draft, &LayoutConfig::portrait())?;
    to_pdf(&document)
}

/// Render the filing receipt, dated today, as PDF bytes.
///
/// # Errors
///
/// Returns `RenderError` if layout or encoding fails.
pub fn render_filing_receipt(
    details: &ApplicantDetails,
) -> std::result::Result<Vec<u8>, RenderError> {
    let document = layout_filing_receipt(details, &LayoutConfig::portrait(), &today())?;
    to_pdf(&document)
}
