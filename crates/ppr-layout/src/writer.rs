//! Cursor-based page writer
//!
//! [`PageWriter`] owns the pages of a document under construction and the
//! cursor, the vertical position where the next element goes. Every drawing
//! primitive reserves its height through [`PageWriter::ensure_space`], the
//! only place a page break is decided, so no content element ever crosses
//! the bottom margin.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, warn};

use crate::config::{LayoutConfig, Rgb, TextStyle};
use crate::document::{
    Element, ImageBox, Page, Paint, PaginatedDocument, RasterImage, RectShape, TextRun,
};
use crate::error::{ImagePlacementWarning, LayoutError, LayoutFailure, MeasureError, Result};
use crate::metrics::{text_width, Font};
use crate::wrap::wrap_text;

/// Branding line in the report header band
pub const BRANDING: &str = "Innovate Design | Product Potential Report";

/// Tolerance for floating-point comparisons against the margins
const EPSILON: f32 = 1e-3;

/// Decorations repeated on every page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chrome {
    /// Plain pages
    None,
    /// Header band with the section title and branding, footer with the
    /// page number and client name
    Report { client_name: String },
}

/// One line of text to place, before positioning
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub style: TextStyle,
    pub color: Rgb,
    /// Offset from the column's left edge
    pub indent: f32,
}

impl Line {
    #[must_use]
    pub fn new(text: impl Into<String>, style: TextStyle, color: Rgb) -> Self {
        Self {
            text: text.into(),
            style,
            color,
            indent: 0.0,
        }
    }

    /// Empty line that only advances the cursor
    #[must_use]
    pub fn spacer(height: f32) -> Self {
        Self::new("", TextStyle::new(1.0, height, false), Rgb(0, 0, 0))
    }

    #[must_use]
    pub fn indented(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }

    #[inline]
    fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Lines drawn side by side with other columns
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub x: f32,
    pub lines: Vec<Line>,
}

/// One image box in a row of images
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSlot<'p> {
    pub x: f32,
    pub width: f32,
    /// Base64 payload, optionally a `data:` URL
    pub payload: Option<&'p str>,
    /// Drawn instead of the image when it is absent or undecodable
    pub caption: String,
}

pub struct PageWriter<'a> {
    config: &'a LayoutConfig,
    chrome: Chrome,
    section: String,
    pages: Vec<Page>,
    cursor: f32,
    warnings: Vec<ImagePlacementWarning>,
}

impl<'a> PageWriter<'a> {
    #[must_use]
    pub fn new(config: &'a LayoutConfig, chrome: Chrome) -> Self {
        Self {
            config,
            chrome,
            section: String::new(),
            pages: Vec::new(),
            cursor: config.top_margin,
            warnings: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &'a LayoutConfig {
        self.config
    }

    /// Current vertical position
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    /// Number of pages started so far
    #[inline]
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[inline]
    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Move the cursor down without drawing
    #[inline]
    pub fn advance(&mut self, dy: f32) {
        self.cursor += dy;
    }

    /// Move the cursor down to `y` unless it is already below it
    #[inline]
    pub fn advance_to(&mut self, y: f32) {
        self.cursor = self.cursor.max(y);
    }

    /// Start `title` on a fresh page.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError` if the page chrome cannot be measured.
    pub fn begin_section(&mut self, title: &str) -> Result<()> {
        title.clone_into(&mut self.section);
        self.new_page()
    }

    /// Append a page and reset the cursor to the top margin.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError` if the page chrome cannot be measured.
    pub fn new_page(&mut self) -> Result<()> {
        let number = self.pages.len() + 1;
        let chrome = self.chrome_for(number)?;
        debug!("page {number}: {}", self.section);
        self.pages.push(Page {
            number,
            section: self.section.clone(),
            content: Vec::new(),
            chrome,
        });
        self.cursor = self.config.top_margin;
        Ok(())
    }

    /// Make room for a block of `height` at the cursor, starting a new page
    /// if it would cross the bottom margin. Returns true if a page was added.
    ///
    /// # Errors
    ///
    /// Returns `LayoutFailure::TooTall` if the block cannot fit on any page.
    pub fn ensure_space(&mut self, height: f32) -> Result<bool> {
        let available = self.config.body_height();
        if height > available + EPSILON {
            return Err(self.fail(LayoutFailure::TooTall { height, available }));
        }
        if self.pages.is_empty() || self.cursor + height > self.config.content_bottom() + EPSILON {
            self.new_page()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Wrap `text` into lines of one style.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError` if the text cannot be measured.
    pub fn wrapped(&self, text: &str, width: f32, style: TextStyle, color: Rgb) -> Result<Vec<Line>> {
        let lines = wrap_text(text, width, style).map_err(|e| self.fail(e))?;
        Ok(lines
            .into_iter()
            .map(|line| Line::new(line, style, color))
            .collect())
    }

    /// Draw one line at the cursor and advance past it.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError` if the line cannot be measured or placed.
    pub fn line(&mut self, x: f32, line: &Line) -> Result<()> {
        if line.is_blank() {
            self.cursor += line.style.line_height;
            return Ok(());
        }
        let mut run = self.run(x, line)?;
        self.ensure_space(line.style.line_height)?;
        run.y = self.cursor;
        self.push(Element::Text(run));
        self.cursor += line.style.line_height;
        Ok(())
    }

    /// Draw a single-style line of text.
    ///
    /// # Errors
    ///
    /// See [`PageWriter::line`].
    pub fn text(&mut self, x: f32, text: &str, style: TextStyle, color: Rgb) -> Result<()> {
        self.line(x, &Line::new(text, style, color))
    }

    /// Wrap `text` to `width` and draw it line by line, breaking pages as
    /// needed. Returns the number of lines drawn.
    ///
    /// # Errors
    ///
    /// See [`PageWriter::line`].
    pub fn paragraph(
        &mut self,
        x: f32,
        width: f32,
        text: &str,
        style: TextStyle,
        color: Rgb,
    ) -> Result<usize> {
        let lines = self.wrapped(text, width, style, color)?;
        for line in &lines {
            self.line(x, line)?;
        }
        Ok(lines.len())
    }

    /// Draw columns side by side.
    ///
    /// Lines are placed row by row: each row takes the tallest line height
    /// among the columns and page breaks are decided per row, so all columns
    /// continue on the same new page.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError` if a line cannot be measured or placed.
    pub fn columns(&mut self, columns: &[Column]) -> Result<()> {
        let rows = columns.iter().map(|c| c.lines.len()).max().unwrap_or(0);
        for row in 0..rows {
            let cells: Vec<(f32, &Line)> = columns
                .iter()
                .filter_map(|c| c.lines.get(row).map(|line| (c.x, line)))
                .collect();
            let height = cells
                .iter()
                .map(|(_, line)| line.style.line_height)
                .fold(0.0, f32::max);

            if cells.iter().all(|(_, line)| line.is_blank()) {
                self.cursor += height;
                continue;
            }

            let runs = cells
                .iter()
                .filter(|(_, line)| !line.is_blank())
                .map(|(x, line)| self.run(*x, line))
                .collect::<Result<Vec<_>>>()?;
            self.ensure_space(height)?;
            for mut run in runs {
                run.y = self.cursor;
                self.push(Element::Text(run));
            }
            self.cursor += height;
        }
        Ok(())
    }

    /// Draw a rectangle of `height` at the cursor without advancing it.
    /// Returns the rectangle's top edge.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError` if the rectangle is taller than a page.
    pub fn rect(&mut self, x: f32, width: f32, height: f32, paint: Paint) -> Result<f32> {
        self.ensure_space(height)?;
        let y = self.cursor;
        self.push(Element::Rect(RectShape {
            x,
            y,
            width,
            height,
            paint,
        }));
        Ok(y)
    }

    /// Draw a filled panel holding `lines`, at least `min_height` tall.
    ///
    /// The panel is sized to its lines but never taller than a page; lines
    /// that do not fit continue on the next page without a background.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError` if a line cannot be measured or placed.
    pub fn panel(
        &mut self,
        x: f32,
        width: f32,
        fill: Rgb,
        min_height: f32,
        lines: &[Line],
    ) -> Result<()> {
        let padding = self.config.box_padding;
        let needed = 2.0 * padding + lines.iter().map(|l| l.style.line_height).sum::<f32>();
        let height = needed.max(min_height).min(self.config.body_height());

        let top = self.rect(x, width, height, Paint::Fill(fill))?;
        let page = self.pages.len();
        self.cursor += padding;
        for line in lines {
            self.line(x + padding, line)?;
        }
        self.cursor += padding;
        if self.pages.len() == page {
            self.advance_to(top + height);
        }
        Ok(())
    }

    /// Draw an image into a fixed box at the cursor and advance past it.
    ///
    /// An absent payload draws `caption` in the box. A payload that fails to
    /// decode draws `caption` too and records an [`ImagePlacementWarning`].
    ///
    /// # Errors
    ///
    /// Returns `LayoutError` only if the box itself cannot be placed.
    pub fn image(
        &mut self,
        x: f32,
        width: f32,
        height: f32,
        payload: Option<&str>,
        caption: &str,
    ) -> Result<()> {
        self.ensure_space(height)?;
        let y = self.cursor;
        self.place_image(x, y, width, height, payload, caption)?;
        self.cursor += height;
        Ok(())
    }

    /// Draw a row of equally tall image boxes at the cursor.
    ///
    /// # Errors
    ///
    /// See [`PageWriter::image`].
    pub fn image_row(&mut self, height: f32, slots: &[ImageSlot<'_>]) -> Result<()> {
        self.ensure_space(height)?;
        let y = self.cursor;
        for slot in slots {
            self.place_image(slot.x, y, slot.width, height, slot.payload, &slot.caption)?;
        }
        self.cursor += height;
        Ok(())
    }

    /// Finish the document
    #[must_use]
    pub fn finish(self, title: impl Into<String>) -> PaginatedDocument {
        PaginatedDocument {
            title: title.into(),
            config: *self.config,
            pages: self.pages,
            warnings: self.warnings,
        }
    }

    fn fail(&self, reason: impl Into<LayoutFailure>) -> LayoutError {
        LayoutError::new(self.section.clone(), reason)
    }

    fn push(&mut self, element: Element) {
        if let Some(page) = self.pages.last_mut() {
            page.content.push(element);
        }
    }

    /// Measure `line` into a run at `x`; `y` is set by the caller
    fn run(&self, x: f32, line: &Line) -> Result<TextRun> {
        let font = Font::for_weight(line.style.bold);
        let width = text_width(&line.text, font, line.style.size).map_err(|e| self.fail(e))?;
        Ok(TextRun {
            x: x + line.indent,
            y: self.cursor,
            width,
            height: line.style.line_height,
            text: line.text.clone(),
            font,
            size: line.style.size,
            color: line.color,
        })
    }

    fn place_image(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        payload: Option<&str>,
        caption: &str,
    ) -> Result<()> {
        let failure = match payload.map(decode_image) {
            Some(Ok(image)) => {
                self.push(Element::Image(ImageBox {
                    x,
                    y,
                    width,
                    height,
                    image,
                }));
                return Ok(());
            }
            Some(Err(reason)) => Some(reason),
            None => None,
        };

        let palette = self.config.palette;
        self.push(Element::Rect(RectShape {
            x,
            y,
            width,
            height,
            paint: Paint::Stroke(palette.border),
        }));

        let style = self.config.roles.caption;
        let inset = 2.0;
        let max_lines = ((height - inset) / style.line_height).floor().max(0.0) as usize;
        let lines = self.wrapped(caption, (width - 2.0 * inset).max(1.0), style, palette.muted)?;
        let mut line_y = y + inset;
        for line in lines.iter().take(max_lines) {
            let mut run = self.run(x + inset, line)?;
            run.y = line_y;
            self.push(Element::Text(run));
            line_y += style.line_height;
        }

        if let Some(reason) = failure {
            let warning = ImagePlacementWarning {
                section: self.section.clone(),
                page: self.pages.len(),
                caption: caption.to_string(),
                reason,
            };
            warn!("{warning}");
            self.warnings.push(warning);
        }
        Ok(())
    }

    fn chrome_for(&self, number: usize) -> Result<Vec<Element>> {
        let Chrome::Report { client_name } = &self.chrome else {
            return Ok(Vec::new());
        };
        let config = self.config;
        let palette = config.palette;
        let band_line = 10.0;
        let band_y = (config.header_height - band_line) / 2.0;
        let footer_line = config.roles.caption.line_height;
        let footer_y = config.page_height - config.footer_offset - footer_line;

        let measure = |text: &str, font: Font, size: f32| -> Result<f32> {
            text_width(text, font, size).map_err(|e: MeasureError| self.fail(e))
        };
        let run = |x: f32, y: f32, text: String, font: Font, size: f32, height: f32, color: Rgb| {
            measure(&text, font, size).map(|width| {
                Element::Text(TextRun {
                    x,
                    y,
                    width,
                    height,
                    text,
                    font,
                    size,
                    color,
                })
            })
        };

        let branding_width = measure(BRANDING, Font::Regular, 10.0)?;
        let page_label = format!("Page {number}");
        let page_label_width = measure(&page_label, Font::Regular, 8.0)?;

        Ok(vec![
            Element::Rect(RectShape {
                x: 0.0,
                y: 0.0,
                width: config.page_width,
                height: config.header_height,
                paint: Paint::Fill(palette.accent),
            }),
            run(
                config.margin,
                band_y,
                self.section.clone(),
                Font::Bold,
                22.0,
                band_line,
                palette.on_dark,
            )?,
            run(
                config.page_width - config.margin - branding_width,
                band_y,
                BRANDING.to_string(),
                Font::Regular,
                10.0,
                band_line,
                palette.on_dark,
            )?,
            run(
                (config.page_width - page_label_width) / 2.0,
                footer_y,
                page_label,
                Font::Regular,
                8.0,
                footer_line,
                palette.muted,
            )?,
            run(
                config.margin,
                footer_y,
                format!("Generated for {client_name}"),
                Font::Regular,
                8.0,
                footer_line,
                palette.muted,
            )?,
        ])
    }
}

/// Decode a base64 (or base64 `data:` URL) payload into RGB pixels
fn decode_image(payload: &str) -> std::result::Result<RasterImage, String> {
    let data = match payload.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => payload,
    };
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| format!("invalid base64: {e}"))?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| format!("undecodable image: {e}"))?;
    let rgb = decoded.to_rgb8();
    Ok(RasterImage {
        pixel_width: rgb.width(),
        pixel_height: rgb.height(),
        rgb: rgb.into_raw(),
    })
}
