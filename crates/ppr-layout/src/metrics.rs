//! Font metrics for the standard Helvetica faces
//!
//! Documents use the PDF base-14 Helvetica and Helvetica-Bold fonts with
//! WinAnsi encoding, so no font program is embedded. Widths are the Adobe
//! AFM advance widths in 1/1000 em.

use crate::error::MeasureError;

/// Millimetres per PDF point
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Advance width used for characters outside the tables
const DEFAULT_WIDTH: u16 = 556;

/// Base-14 font face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    #[inline]
    #[must_use]
    pub const fn for_weight(bold: bool) -> Self {
        if bold {
            Self::Bold
        } else {
            Self::Regular
        }
    }

    /// PostScript name used in the font dictionary
    #[must_use]
    pub const fn base_font(self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
        }
    }

    /// Resource name used in content streams
    #[must_use]
    pub const fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Advance width of `c` in 1/1000 em
#[must_use]
pub fn char_width(c: char, font: Font) -> u16 {
    let table = match font {
        Font::Regular => &HELVETICA,
        Font::Bold => &HELVETICA_BOLD,
    };
    match c {
        ' '..='~' => table[c as usize - 0x20],
        '\u{2022}' => 350,
        '\u{2026}' | '\u{2014}' | '\u{2030}' => 1000,
        '\u{2018}' | '\u{2019}' | '\u{201A}' => match font {
            Font::Regular => 222,
            Font::Bold => 278,
        },
        '\u{201C}' | '\u{201D}' | '\u{201E}' => match font {
            Font::Regular => 333,
            Font::Bold => 500,
        },
        '\u{00A0}' => 278,
        _ => DEFAULT_WIDTH,
    }
}

/// Width of `text` in millimetres at `size` points.
///
/// # Errors
///
/// Returns `MeasureError::FontSize` if `size` is not a positive finite number.
pub fn text_width(text: &str, font: Font, size: f32) -> Result<f32, MeasureError> {
    if !size.is_finite() || size <= 0.0 {
        return Err(MeasureError::FontSize(size));
    }
    let units: u32 = text.chars().map(|c| u32::from(char_width(c, font))).sum();
    Ok(units as f32 / 1000.0 * size * MM_PER_PT)
}

/// Encode `text` for a WinAnsi-encoded base-14 font.
///
/// Characters without a WinAnsi code point become `?`.
#[must_use]
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2030}' => 0x89,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_widths() {
        assert_eq!(char_width(' ', Font::Regular), 278);
        assert_eq!(char_width('W', Font::Regular), 944);
        assert_eq!(char_width('i', Font::Regular), 222);
        assert_eq!(char_width('i', Font::Bold), 278);
        assert_eq!(char_width('~', Font::Bold), 584);
        assert_eq!(char_width('\u{2022}', Font::Regular), 350);
        assert_eq!(char_width('\u{4E2D}', Font::Regular), DEFAULT_WIDTH);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let w10 = text_width("Trakker", Font::Regular, 10.0).unwrap();
        let w20 = text_width("Trakker", Font::Regular, 20.0).unwrap();
        assert!((w20 - 2.0 * w10).abs() < 1e-4);
        // 10 digits at 556 units, 10 pt: 55.6 pt
        let digits = text_width("0123456789", Font::Regular, 10.0).unwrap();
        assert!((digits - 55.6 * MM_PER_PT).abs() < 1e-3);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = text_width("Lean Business Plan", Font::Regular, 12.0).unwrap();
        let bold = text_width("Lean Business Plan", Font::Bold, 12.0).unwrap();
        assert!(bold > regular);
    }

    #[test]
    fn test_invalid_size() {
        assert_eq!(
            text_width("x", Font::Regular, 0.0),
            Err(MeasureError::FontSize(0.0))
        );
        assert!(text_width("x", Font::Regular, f32::NAN).is_err());
    }

    #[test]
    fn test_win_ansi() {
        assert_eq!(to_win_ansi("A\u{2022} \u{00A3}5 \u{20AC}"), b"A\x95 \xA35 \x80");
        assert_eq!(to_win_ansi("\u{4E2D}"), b"?");
        assert_eq!(to_win_ansi("\u{201C}hi\u{201D}"), b"\x93hi\x94");
    }
}
