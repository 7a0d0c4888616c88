//! Paginated rendering for product potential reports
//!
//! Lays report text out onto fixed-size pages in millimetres, breaking pages
//! so that no content crosses the bottom margin, then emits the result as
//! PDF. The same engine renders the patent application draft and filing
//! receipt on portrait pages.
//!
//! ## Usage
//!
//! ```
//! use ppr_core::{flatten, BusinessPlanRecord};
//! use ppr_layout::{layout_report, to_pdf, LayoutConfig};
//!
//! let record = BusinessPlanRecord::new("Trakker", "Ada Lovelace");
//! let vars = flatten(&record);
//! let document = layout_report(&record, &vars, &LayoutConfig::default(), "16/10/2026")?;
//! assert_eq!(document.page_count(), 5);
//! assert!(document.overflowing_pages().is_empty());
//!
//! let pdf = to_pdf(&document)?;
//! assert!(pdf.starts_with(b"%PDF"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`config`]: page geometry, text roles and palette
//! - [`metrics`] and [`wrap`]: standard font widths and greedy line wrapping
//! - [`writer`]: the cursor-based [`PageWriter`]
//! - [`sections`] and [`report`]: the five report sections
//! - [`patent`]: application draft and filing receipt
//! - [`emit`]: PDF serialisation

pub mod config;
pub mod document;
pub mod emit;
pub mod error;
pub mod metrics;
pub mod patent;
pub mod report;
pub mod sections;
pub mod wrap;
pub mod writer;

pub use config::{LayoutConfig, Palette, Rgb, TextRoles, TextStyle};
pub use document::{Element, ImageBox, Page, PaginatedDocument, Paint, RasterImage, RectShape, TextRun};
pub use emit::to_pdf;
pub use error::{
    ImagePlacementWarning, LayoutError, LayoutFailure, MeasureError, RenderError, Result,
};
pub use metrics::{text_width, Font, MM_PER_PT};
pub use patent::{
    figure_label, layout_filing_receipt, layout_patent_application, render_filing_receipt,
    render_patent_application, APPLICATION_FILE_NAME, RECEIPT_FILE_NAME,
};
pub use report::{layout_report, render_paginated, render_paginated_with, today, DEFAULT_DATE_FORMAT};
pub use sections::SECTIONS;
pub use wrap::wrap_text;
pub use writer::{Chrome, Column, ImageSlot, Line, PageWriter, BRANDING};
