//! Error types for paginated rendering

use std::fmt;

use thiserror::Error;

/// Text could not be measured
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MeasureError {
    #[error("font size {0} pt is not a positive finite number")]
    FontSize(f32),

    #[error("wrap width {0} mm is not a positive finite number")]
    Width(f32),
}

/// Why a section could not be laid out
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutFailure {
    #[error(transparent)]
    Measure(#[from] MeasureError),

    /// A single element is taller than the space between the margins
    #[error("{height} mm block cannot fit on a page with {available} mm of content height")]
    TooTall { height: f32, available: f32 },
}

/// Fatal failure while assembling a paginated document, naming the section
/// being drawn.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Layout failed in section '{section}': {reason}")]
pub struct LayoutError {
    pub section: String,
    #[source]
    pub reason: LayoutFailure,
}

impl LayoutError {
    #[must_use]
    pub fn new(section: impl Into<String>, reason: impl Into<LayoutFailure>) -> Self {
        Self {
            section: section.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from producing a finished document
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("PDF encoding error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An image that could not be drawn and was replaced by its caption.
///
/// Not an error: layout continues and the warning is collected on the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePlacementWarning {
    pub section: String,
    /// 1-based page number
    pub page: usize,
    /// Placeholder text drawn instead
    pub caption: String,
    pub reason: String,
}

impl fmt::Display for ImagePlacementWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (page {}): image replaced by '{}': {}",
            self.section, self.page, self.caption, self.reason
        )
    }
}

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
