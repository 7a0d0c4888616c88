//! Layout constants
//!
//! Every measurement the section renderers use lives here. Lengths are in
//! millimetres with the origin at the top-left corner of the page; font
//! sizes are in points.

/// An sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Components scaled to `0.0..=1.0` for PDF colour operators
    #[inline]
    #[must_use]
    pub fn unit(self) -> [f32; 3] {
        [
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        ]
    }
}

/// Font size, line height and weight for one text role
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in points
    pub size: f32,
    /// Vertical advance per line in millimetres
    pub line_height: f32,
    pub bold: bool,
}

impl TextStyle {
    #[must_use]
    pub const fn new(size: f32, line_height: f32, bold: bool) -> Self {
        Self {
            size,
            line_height,
            bold,
        }
    }

    #[must_use]
    pub const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    #[must_use]
    pub const fn regular(self) -> Self {
        Self {
            bold: false,
            ..self
        }
    }

    #[must_use]
    pub const fn with_line_height(self, line_height: f32) -> Self {
        Self {
            line_height,
            ..self
        }
    }
}

/// Text roles shared by all documents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRoles {
    /// Cover title
    pub title: TextStyle,
    /// Section heading inside a page
    pub heading: TextStyle,
    /// Prepared-for and date lines
    pub subtitle: TextStyle,
    /// Competitor names and dark-panel captions
    pub label: TextStyle,
    /// Panel and grid cell captions
    pub subheading: TextStyle,
    /// Highlighted statement text
    pub lead: TextStyle,
    pub body: TextStyle,
    pub small: TextStyle,
    pub caption: TextStyle,
}

impl Default for TextRoles {
    fn default() -> Self {
        Self {
            title: TextStyle::new(40.0, 16.0, false),
            heading: TextStyle::new(16.0, 8.0, true),
            subtitle: TextStyle::new(16.0, 10.0, false),
            label: TextStyle::new(14.0, 7.0, true),
            subheading: TextStyle::new(12.0, 7.0, true),
            lead: TextStyle::new(18.0, 9.0, false),
            body: TextStyle::new(11.0, 6.0, false),
            small: TextStyle::new(10.0, 5.0, false),
            caption: TextStyle::new(8.0, 4.0, false),
        }
    }
}

/// Colour palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Header band and source links
    pub accent: Rgb,
    /// Body text
    pub text: Rgb,
    /// Executive summary panel
    pub panel: Rgb,
    /// Market data callout
    pub callout: Rgb,
    /// Value proposition block
    pub dark: Rgb,
    /// Text drawn on `accent` or `dark`
    pub on_dark: Rgb,
    /// Footer text and placeholder captions
    pub muted: Rgb,
    /// Competitor box outlines
    pub border: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            accent: Rgb(37, 99, 235),
            text: Rgb(51, 65, 85),
            panel: Rgb(248, 250, 252),
            callout: Rgb(239, 246, 255),
            dark: Rgb(30, 41, 59),
            on_dark: Rgb(255, 255, 255),
            muted: Rgb(150, 150, 150),
            border: Rgb(203, 213, 225),
        }
    }
}

/// The single table of layout constants.
///
/// [`LayoutConfig::default`] is the landscape A4 business-plan report;
/// [`LayoutConfig::portrait`] is the plain A4 page used for patent documents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    /// Left and right margin
    pub margin: f32,
    /// Cursor position at the top of every new page
    pub top_margin: f32,
    /// Content never extends below `page_height - bottom_margin`
    pub bottom_margin: f32,
    /// Height of the coloured header band (0 for pages without chrome)
    pub header_height: f32,
    /// Distance of the footer baseline from the bottom edge
    pub footer_offset: f32,
    /// Horizontal gap between grid columns and competitor boxes
    pub column_gap: f32,
    /// Inner padding of panels and boxes
    pub box_padding: f32,
    /// Vertical gap between blocks
    pub block_gap: f32,
    pub summary_min_height: f32,
    pub callout_min_height: f32,
    pub competitor_box_height: f32,
    pub competitor_image_height: f32,
    /// Side of the square patent drawing box
    pub drawing_size: f32,
    /// Vertical space after each patent drawing
    pub drawing_spacing: f32,
    /// Wrap width of the patent description
    pub description_width: f32,
    pub roles: TextRoles,
    pub palette: Palette,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 297.0,
            page_height: 210.0,
            margin: 20.0,
            top_margin: 40.0,
            bottom_margin: 20.0,
            header_height: 25.0,
            footer_offset: 10.0,
            column_gap: 5.0,
            box_padding: 5.0,
            block_gap: 8.0,
            summary_min_height: 60.0,
            callout_min_height: 40.0,
            competitor_box_height: 140.0,
            competitor_image_height: 30.0,
            drawing_size: 80.0,
            drawing_spacing: 20.0,
            description_width: 170.0,
            roles: TextRoles::default(),
            palette: Palette::default(),
        }
    }
}

impl LayoutConfig {
    /// Portrait A4 without page chrome
    #[must_use]
    pub fn portrait() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            top_margin: 20.0,
            bottom_margin: 30.0,
            header_height: 0.0,
            ..Self::default()
        }
    }

    /// Width between the left and right margins
    #[inline]
    #[must_use]
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Lowest y any content may reach
    #[inline]
    #[must_use]
    pub fn content_bottom(&self) -> f32 {
        self.page_height - self.bottom_margin
    }

    /// Height available to content on one page
    #[inline]
    #[must_use]
    pub fn body_height(&self) -> f32 {
        self.content_bottom() - self.top_margin
    }
}
