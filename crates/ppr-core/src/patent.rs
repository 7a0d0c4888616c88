//! Patent drafting inputs
//!
//! The drafting wizard produces a free-text description and up to three
//! drawings; the filing step adds applicant details used on the receipt.

use serde::{Deserialize, Serialize};

use crate::model::lenient;

/// Figure captions, in drawing-slot order.
pub const FIGURE_LABELS: [&str; 3] = [
    "Fig 1. Main Invention",
    "Fig 2. Alternative Embodiment",
    "Fig 3. System Block Diagram",
];

/// A patent application draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatentDraftRecord {
    /// Description text as drafted
    #[serde(alias = "draftDescription", deserialize_with = "lenient::string")]
    pub description: String,
    /// Drawing slots holding base64 PNG/JPEG payloads (optionally as data URLs)
    #[serde(alias = "images")]
    pub drawings: Vec<Option<String>>,
    pub filing_details: ApplicantDetails,
}

impl PatentDraftRecord {
    #[must_use = "creates a new patent draft"]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            filing_details: ApplicantDetails {
                invention_title: title.into(),
                ..ApplicantDetails::default()
            },
            ..Self::default()
        }
    }

    /// Parse a draft from JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or has incompatible member types.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_drawing(mut self, index: usize, payload: Option<String>) -> Self {
        if self.drawings.len() <= index {
            self.drawings.resize(index + 1, None);
        }
        self.drawings[index] = payload;
        self
    }

    #[must_use]
    pub fn with_filing_details(mut self, details: ApplicantDetails) -> Self {
        self.filing_details = details;
        self
    }

    /// True when at least one drawing slot is filled
    #[inline]
    #[must_use = "checks whether the draft has drawings"]
    pub fn has_drawings(&self) -> bool {
        self.drawings.iter().any(Option::is_some)
    }
}

/// Applicant details collected at filing time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicantDetails {
    #[serde(deserialize_with = "lenient::string")]
    pub reference: String,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub address: String,
    #[serde(deserialize_with = "lenient::string")]
    pub invention_title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub contact_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub contact_email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub contact_phone: String,
}
