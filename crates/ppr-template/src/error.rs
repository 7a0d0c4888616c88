//! Error types for template rendering

use thiserror::Error;

/// Errors that can occur while rendering or scanning a template archive
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The template archive cannot be opened or one of its entries cannot be read
    #[error("Template archive cannot be decoded{}: {source}", in_part(.part))]
    Decode {
        /// Entry being read when decoding failed; `None` for the archive itself
        part: Option<String>,
        #[source]
        source: zip::result::ZipError,
    },

    /// A markup part is not valid UTF-8
    #[error("Template part '{part}' is not valid UTF-8 text")]
    PartEncoding {
        /// Name of the unreadable part within the archive
        part: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Writing the rendered archive failed
    #[error("Failed to write part '{part}' to rendered archive: {source}")]
    Encode {
        /// Name of the part being written
        part: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// Markup could not be tokenised while extracting visible text
    #[error("XML parsing error in '{part}': {source}")]
    Xml {
        /// Part being scanned
        part: String,
        #[source]
        source: quick_xml::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TemplateError {
    /// Name of the archive part the error concerns, if any
    #[must_use]
    pub fn part(&self) -> Option<&str> {
        match self {
            Self::PartEncoding { part, .. } | Self::Encode { part, .. } | Self::Xml { part, .. } => {
                Some(part)
            }
            Self::Decode { part, .. } => part.as_deref(),
            Self::Io(_) => None,
        }
    }
}

fn in_part(part: &Option<String>) -> String {
    part.as_ref()
        .map_or_else(String::new, |name| format!(" (part '{name}')"))
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
