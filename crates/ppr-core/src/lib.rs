//! Core data contract for product potential reports
//!
//! This crate holds the business-plan data model collected by the report
//! wizard and the single contract shared by every rendering path: the
//! [`FlatVariableMap`], a flat projection of the record keyed by stable,
//! lowercase, underscore-delimited variable names.
//!
//! ## Usage
//!
//! ```
//! use ppr_core::{flatten, BusinessPlanRecord, CompetitorRecord, TEMPLATE_KEYS};
//!
//! let record = BusinessPlanRecord::new("Trakker", "Ada Lovelace")
//!     .with_competitor(0, CompetitorRecord::new("Tile Mate", "Tile").with_price("24.99"));
//!
//! let vars = flatten(&record);
//! assert_eq!(vars.value("project_name"), "Trakker");
//! assert_eq!(vars.value("alt_price_1"), "24.99");
//! assert_eq!(vars.len(), TEMPLATE_KEYS.len());
//! ```
//!
//! ## Modules
//!
//! - [`model`]: business-plan records with immutable `with_*` updates
//! - [`flatten`]: the data flattener, key catalogue and word truncation
//! - [`patent`]: patent draft and applicant records
//! - [`request`]: validated render request bodies
//! - [`naming`]: output file naming

pub mod error;
pub mod flatten;
pub mod model;
pub mod naming;
pub mod patent;
pub mod request;

pub use error::{RequestError, Result};
pub use flatten::{
    flatten, token_for, truncate_words, FlatVariableMap, ELLIPSIS, LEAN_CANVAS_RRP_WORD_LIMIT,
    LEAN_CANVAS_WORD_LIMIT, TEMPLATE_KEYS,
};
pub use model::{
    slot, BusinessPlanRecord, CompetitorRecord, FinancialsRecord, ForecastRecord,
    LeanCanvasRecord,
};
pub use naming::{report_file_name, safe_file_stem};
pub use patent::{ApplicantDetails, PatentDraftRecord, FIGURE_LABELS};
pub use request::RenderRequest;
