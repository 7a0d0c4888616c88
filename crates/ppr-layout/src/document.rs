//! Paginated document model
//!
//! A [`PaginatedDocument`] is a list of fixed-size pages, each holding
//! positioned text runs, rectangles and images. Positions are millimetres
//! from the top-left corner. Page chrome (header band, footer) is kept apart
//! from content so the margin invariant can be checked on content alone.

use std::fmt;

use crate::config::{LayoutConfig, Rgb};
use crate::error::ImagePlacementWarning;
use crate::metrics::Font;

/// A single line of text. `y` is the top of its line box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    /// Measured width
    pub width: f32,
    /// Line height
    pub height: f32,
    pub text: String,
    pub font: Font,
    /// Font size in points
    pub size: f32,
    pub color: Rgb,
}

impl TextRun {
    /// Baseline position inside the line box
    #[must_use]
    pub fn baseline(&self) -> f32 {
        let glyph_height = self.size * crate::metrics::MM_PER_PT * 0.7;
        self.y + (self.height + glyph_height) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Fill(Rgb),
    Stroke(Rgb),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectShape {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub paint: Paint,
}

/// Decoded 8-bit RGB pixels ready to embed
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub rgb: Vec<u8>,
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("pixel_width", &self.pixel_width)
            .field("pixel_height", &self.pixel_height)
            .field("bytes", &self.rgb.len())
            .finish()
    }
}

/// An image stretched into a fixed box, ignoring its aspect ratio
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub image: RasterImage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextRun),
    Rect(RectShape),
    Image(ImageBox),
}

impl Element {
    /// Top edge
    #[must_use]
    pub fn top(&self) -> f32 {
        match self {
            Self::Text(t) => t.y,
            Self::Rect(r) => r.y,
            Self::Image(i) => i.y,
        }
    }

    /// Bottom edge
    #[must_use]
    pub fn bottom(&self) -> f32 {
        match self {
            Self::Text(t) => t.y + t.height,
            Self::Rect(r) => r.y + r.height,
            Self::Image(i) => i.y + i.height,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(&t.text),
            _ => None,
        }
    }
}

/// One page of output
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    /// Section the page belongs to
    pub section: String,
    pub content: Vec<Element>,
    /// Header and footer decorations
    pub chrome: Vec<Element>,
}

impl Page {
    /// Content text lines in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(Element::as_text)
    }

    /// Lowest content edge on the page, 0 if the page is empty
    #[must_use]
    pub fn content_bottom(&self) -> f32 {
        self.content.iter().map(Element::bottom).fold(0.0, f32::max)
    }
}

/// A laid-out document ready for emission
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedDocument {
    /// Document title for metadata
    pub title: String,
    pub config: LayoutConfig,
    pub pages: Vec<Page>,
    pub warnings: Vec<ImagePlacementWarning>,
}

impl PaginatedDocument {
    #[inline]
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All content text, page by page
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(Page::texts)
    }

    /// Pages whose content crosses the bottom margin; empty for any document
    /// produced by this crate
    #[must_use]
    pub fn overflowing_pages(&self) -> Vec<usize> {
        let limit = self.config.content_bottom() + 1e-3;
        self.pages
            .iter()
            .filter(|p| p.content_bottom() > limit)
            .map(|p| p.number)
            .collect()
    }
}
