//! PDF output emitter
//!
//! Serialises a [`PaginatedDocument`] with `lopdf`. Layout coordinates are
//! millimetres from the top-left corner; PDF user space is points from the
//! bottom-left, so every position is scaled and flipped here.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::document::{Element, ImageBox, Page, Paint, PaginatedDocument, RectShape, TextRun};
use crate::error::RenderError;
use crate::metrics::{to_win_ansi, Font, MM_PER_PT};

const PRODUCER: &str = "ppr-layout";

#[inline]
fn pt(mm: f32) -> f32 {
    mm / MM_PER_PT
}

/// Page geometry in points, with the y axis flipped
struct Space {
    height: f32,
}

impl Space {
    #[inline]
    fn y(&self, mm_from_top: f32) -> f32 {
        self.height - pt(mm_from_top)
    }
}

fn color_operands(rgb: crate::config::Rgb) -> Vec<Object> {
    rgb.unit().into_iter().map(Object::from).collect()
}

fn text_ops(ops: &mut Vec<Operation>, run: &TextRun, space: &Space) {
    ops.push(Operation::new("rg", color_operands(run.color)));
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![run.font.resource_name().into(), run.size.into()],
    ));
    ops.push(Operation::new(
        "Td",
        vec![pt(run.x).into(), space.y(run.baseline()).into()],
    ));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(to_win_ansi(&run.text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn rect_ops(ops: &mut Vec<Operation>, rect: &RectShape, space: &Space) {
    let (color_op, paint_op, rgb) = match rect.paint {
        Paint::Fill(rgb) => ("rg", "f", rgb),
        Paint::Stroke(rgb) => ("RG", "S", rgb),
    };
    ops.push(Operation::new(color_op, color_operands(rgb)));
    ops.push(Operation::new(
        "re",
        vec![
            pt(rect.x).into(),
            space.y(rect.y + rect.height).into(),
            pt(rect.width).into(),
            pt(rect.height).into(),
        ],
    ));
    ops.push(Operation::new(paint_op, vec![]));
}

fn image_ops(ops: &mut Vec<Operation>, image: &ImageBox, name: &str, space: &Space) {
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new(
        "cm",
        vec![
            pt(image.width).into(),
            0.into(),
            0.into(),
            pt(image.height).into(),
            pt(image.x).into(),
            space.y(image.y + image.height).into(),
        ],
    ));
    ops.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
    ops.push(Operation::new("Q", vec![]));
}

fn image_object(image: &ImageBox) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(image.image.pixel_width),
            "Height" => i64::from(image.image.pixel_height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        image.image.rgb.clone(),
    )
}

/// Content stream and image resources for one page
fn page_content(
    doc: &mut Document,
    page: &Page,
    space: &Space,
) -> Result<(Vec<u8>, Dictionary), RenderError> {
    let mut ops = Vec::new();
    let mut xobjects = Dictionary::new();

    for element in page.chrome.iter().chain(&page.content) {
        match element {
            Element::Text(run) => text_ops(&mut ops, run, space),
            Element::Rect(rect) => rect_ops(&mut ops, rect, space),
            Element::Image(image) => {
                let name = format!("Im{}", xobjects.len() + 1);
                let id = doc.add_object(image_object(image));
                image_ops(&mut ops, image, &name, space);
                xobjects.set(name, id);
            }
        }
    }

    let content = Content { operations: ops }.encode()?;
    Ok((content, xobjects))
}

/// Serialise `document` to PDF bytes.
///
/// # Errors
///
/// Returns `RenderError` if a content stream cannot be encoded or the
/// document cannot be written.
pub fn to_pdf(document: &PaginatedDocument) -> Result<Vec<u8>, RenderError> {
    let config = &document.config;
    let space = Space {
        height: pt(config.page_height),
    };

    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in [Font::Regular, Font::Bold] {
        let id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), id);
    }
    let fonts_id = doc.add_object(fonts);

    let mut kids = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let (content, xobjects) = page_content(&mut doc, page, &space)?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let mut resources = dictionary! { "Font" => fonts_id };
        if !xobjects.is_empty() {
            resources.set("XObject", xobjects);
        }
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources,
        });
        kids.push(Object::from(page_id));
    }

    let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                pt(config.page_width).into(),
                space.height.into(),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(to_win_ansi(&document.title)),
        "Producer" => Object::string_literal(PRODUCER),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    log::debug!(
        "encoded '{}': {} pages, {} bytes",
        document.title,
        document.pages.len(),
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LayoutConfig, Rgb};

    fn one_line_document() -> PaginatedDocument {
        PaginatedDocument {
            title: "Test".to_string(),
            config: LayoutConfig::default(),
            pages: vec![Page {
                number: 1,
                section: "Cover".to_string(),
                content: vec![Element::Text(TextRun {
                    x: 20.0,
                    y: 40.0,
                    width: 10.0,
                    height: 6.0,
                    text: "Fish & Chips (GBP \u{00A3}5)".to_string(),
                    font: Font::Regular,
                    size: 11.0,
                    color: Rgb(51, 65, 85),
                })],
                chrome: Vec::new(),
            }],
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_pdf_round_trips_through_lopdf() {
        let bytes = to_pdf(&one_line_document()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_page_is_sized_in_points() {
        let bytes = to_pdf(&one_line_document()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let (_, &page_id) = doc.get_pages().iter().next().unwrap();
        let content = doc.get_and_decode_page_content(page_id).unwrap();
        let ops: Vec<_> = content.operations.iter().map(|op| op.operator.as_str()).collect();
        assert_eq!(ops, ["rg", "BT", "Tf", "Td", "Tj", "ET"]);
        assert!((pt(297.0) - 841.89).abs() < 0.01);
    }

    #[test]
    fn test_y_axis_is_flipped() {
        let space = Space { height: pt(210.0) };
        assert!((space.y(0.0) - pt(210.0)).abs() < 1e-3);
        assert!(space.y(210.0).abs() < 1e-3);
    }
}
