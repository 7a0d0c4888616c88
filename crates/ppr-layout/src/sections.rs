//! Section renderers for the product potential report
//!
//! Each renderer starts its section on a new page and draws a fixed layout
//! from the flat variable map through the [`PageWriter`], which decides
//! every page break.

use ppr_core::{BusinessPlanRecord, FlatVariableMap};

use crate::config::TextStyle;
use crate::document::Paint;
use crate::error::Result;
use crate::writer::{Column, ImageSlot, Line, PageWriter};

pub const COVER: &str = "Product Potential Report";
pub const TARGET_MARKET: &str = "Target Market Analysis";
pub const COMPETITOR_LANDSCAPE: &str = "Competitor Landscape";
pub const GROWTH_STRATEGY: &str = "Growth Strategy";
pub const LEAN_BUSINESS_PLAN: &str = "Lean Business Plan";

/// Section titles in drawing order
pub const SECTIONS: [&str; 5] = [
    COVER,
    TARGET_MARKET,
    COMPETITOR_LANDSCAPE,
    GROWTH_STRATEGY,
    LEAN_BUSINESS_PLAN,
];

/// Label and variable of each lean canvas cell, in grid order
pub const LEAN_CANVAS_CELLS: [(&str, &str); 11] = [
    ("Problem", "lbp_problems"),
    ("Solution", "lbp_sol"),
    ("Unique Value Proposition", "lbp_uvp"),
    ("High-Level Concept", "lbp_hlc"),
    ("Key Metrics", "lbp_keymet"),
    ("Channels", "lbp_chan"),
    ("Customer Segments", "lbp_cust"),
    ("Early Adopters", "lbp_ea"),
    ("Cost Structure", "lbp_cost_struc"),
    ("Revenue Streams", "lbp_rev_stream"),
    ("Preferred Route", "lbp_pref_route"),
];

const BULLET: char = '\u{2022}';
const BULLET_INDENT: f32 = 5.0;

/// Left edge and width of two equal columns
fn two_columns(w: &PageWriter<'_>) -> (f32, f32, f32) {
    let config = w.config();
    let width = (config.content_width() - config.column_gap) / 2.0;
    let left = config.margin;
    (left, left + width + config.column_gap, width)
}

/// Heading followed by bulleted, wrapped items; empty items are skipped
fn bullet_list(w: &PageWriter<'_>, heading: &str, items: &[&str], width: f32) -> Result<Vec<Line>> {
    let config = w.config();
    let (roles, color) = (config.roles, config.palette.text);
    let mut lines = vec![Line::new(heading, roles.heading, color), Line::spacer(2.0)];
    for item in items.iter().filter(|item| !item.is_empty()) {
        let wrapped = w.wrapped(
            &format!("{BULLET} {item}"),
            width - BULLET_INDENT,
            roles.body,
            color,
        )?;
        lines.extend(wrapped.into_iter().map(|l| l.indented(BULLET_INDENT)));
    }
    Ok(lines)
}

/// Caption followed by dash-prefixed, wrapped items; empty items are skipped
fn dash_list(
    w: &PageWriter<'_>,
    caption: &str,
    items: &[&str],
    width: f32,
    style: TextStyle,
) -> Result<Vec<Line>> {
    let color = w.config().palette.text;
    let mut lines = vec![Line::new(caption, style.bold(), color)];
    for item in items.iter().filter(|item| !item.is_empty()) {
        lines.extend(w.wrapped(&format!("- {item}"), width, style, color)?);
    }
    Ok(lines)
}

/// Title, prepared-for and date lines, and the executive summary panel
///
/// # Errors
///
/// Returns `LayoutError` if the section cannot be laid out.
pub fn cover(w: &mut PageWriter<'_>, vars: &FlatVariableMap, date: &str) -> Result<()> {
    let config = w.config();
    let (roles, palette) = (config.roles, config.palette);
    let x = config.margin;

    w.begin_section(COVER)?;
    w.advance(5.0);
    w.paragraph(x, config.content_width(), vars.value("project_name"), roles.title, palette.text)?;
    w.advance(4.0);
    w.text(
        x,
        &format!("Prepared for: {}", vars.value("client_name")),
        roles.subtitle,
        palette.text,
    )?;
    w.text(x, &format!("Date: {date}"), roles.subtitle, palette.text)?;
    w.advance(config.block_gap);

    let inner = config.content_width() - 2.0 * config.box_padding;
    let mut lines = vec![
        Line::new("Executive Summary", roles.subheading, palette.text),
        Line::spacer(2.0),
    ];
    lines.extend(w.wrapped(vars.value("product_summary"), inner, roles.body, palette.text)?);
    w.panel(x, config.content_width(), palette.panel, config.summary_min_height, &lines)
}

/// Customer segments and early adopters side by side, then the market data callout
///
/// # Errors
///
/// Returns `LayoutError` if the section cannot be laid out.
pub fn target_market(w: &mut PageWriter<'_>, vars: &FlatVariableMap) -> Result<()> {
    let config = w.config();
    let (roles, palette) = (config.roles, config.palette);

    w.begin_section(TARGET_MARKET)?;
    let (left, right, width) = two_columns(w);
    let segments = [
        vars.value("customer_1"),
        vars.value("customer_2"),
        vars.value("customer_3"),
    ];
    let adopters = [
        vars.value("early_adopter_1"),
        vars.value("early_adopter_2"),
        vars.value("early_adopter_3"),
    ];
    let columns = [
        Column {
            x: left,
            lines: bullet_list(w, "Customer Segments", &segments, width)?,
        },
        Column {
            x: right,
            lines: bullet_list(w, "Early Adopters", &adopters, width)?,
        },
    ];
    w.columns(&columns)?;
    w.advance(config.block_gap);

    let inner = config.content_width() - 2.0 * config.box_padding;
    let mut lines = vec![
        Line::new("Market Data Point", roles.subheading, palette.text),
        Line::spacer(2.0),
    ];
    lines.extend(w.wrapped(vars.value("mkt_data"), inner, roles.body, palette.text)?);
    let source = vars.value("mkt_source_url");
    if !source.is_empty() {
        lines.push(Line::spacer(2.0));
        lines.extend(w.wrapped(&format!("Source: {source}"), inner, roles.body, palette.accent)?);
    }
    w.panel(
        config.margin,
        config.content_width(),
        palette.callout,
        config.callout_min_height,
        &lines,
    )
}

/// Three boxed competitor columns.
///
/// Boxes have a fixed height; a column with more text than fits runs past
/// its box rather than resizing it.
///
/// # Errors
///
/// Returns `LayoutError` if the section cannot be laid out.
pub fn competitor_landscape(
    w: &mut PageWriter<'_>,
    record: &BusinessPlanRecord,
    vars: &FlatVariableMap,
) -> Result<()> {
    let config = w.config();
    let (roles, palette) = (config.roles, config.palette);
    let gap = config.column_gap;
    let padding = config.box_padding;
    let box_width = (config.content_width() - 2.0 * gap) / 3.0;
    let inner = box_width - 2.0 * padding;
    let box_height = config.competitor_box_height.min(config.body_height());
    let box_x = |i: usize| config.margin + i as f32 * (box_width + gap);

    w.begin_section(COMPETITOR_LANDSCAPE)?;
    let top = w.rect(box_x(0), box_width, box_height, Paint::Stroke(palette.border))?;
    for i in 1..3 {
        w.rect(box_x(i), box_width, box_height, Paint::Stroke(palette.border))?;
    }
    let boxes_page = w.page_count();
    w.advance(padding);

    let mut headers = Vec::with_capacity(3);
    let mut details = Vec::with_capacity(3);
    let mut slots = Vec::with_capacity(3);
    for i in 0..3 {
        let n = i + 1;
        let x = box_x(i) + padding;
        let value = |key: &str| vars.value(&format!("{key}_{n}"));

        let brand = value("alt_brand");
        let mut lines = vec![Line::new(
            if brand.is_empty() { "Competitor" } else { brand },
            roles.label,
            palette.text,
        )];
        lines.extend(w.wrapped(value("alt_product_name"), inner, roles.small, palette.text)?);
        let price = value("alt_price");
        if !price.is_empty() {
            lines.push(Line::new(format!("RRP: GBP {price}"), roles.small, palette.text));
        }
        headers.push(Column { x, lines });

        let competitor = record.competitors.get(i);
        let described = competitor.is_some_and(|c| !c.image_description.is_empty());
        slots.push(ImageSlot {
            x,
            width: inner,
            payload: competitor.and_then(|c| c.image_data.as_deref()),
            caption: if described {
                value("alt_img").to_string()
            } else {
                "No image provided".to_string()
            },
        });

        let features = [1, 2, 3].map(|k| vars.value(&format!("alt_doesjob{n}_{k}")));
        let gaps = [1, 2, 3].map(|k| vars.value(&format!("alt_prob{n}_{k}")));
        let mut lines = dash_list(w, "Key Features:", &features, inner, roles.small)?;
        lines.push(Line::spacer(3.0));
        lines.extend(dash_list(w, "Gaps / Shortcomings:", &gaps, inner, roles.small)?);
        details.push(Column { x, lines });
    }

    w.columns(&headers)?;
    w.advance(2.0);
    w.image_row(config.competitor_image_height, &slots)?;
    w.advance(3.0);
    w.columns(&details)?;
    if w.page_count() == boxes_page {
        w.advance_to(top + box_height);
    }
    Ok(())
}

/// Financial projections and customer growth side by side, then the value
/// proposition block
///
/// # Errors
///
/// Returns `LayoutError` if the section cannot be laid out.
pub fn growth_strategy(w: &mut PageWriter<'_>, vars: &FlatVariableMap) -> Result<()> {
    let config = w.config();
    let (roles, palette) = (config.roles, config.palette);

    w.begin_section(GROWTH_STRATEGY)?;
    let (left, right, width) = two_columns(w);

    let mut financials = vec![
        Line::new("Financial Projections", roles.heading, palette.text),
        Line::spacer(2.0),
    ];
    for text in [
        format!("Primary Product RRP: GBP {}", vars.value("ex_rrp")),
        format!(
            "Add-on Strategy: {} (+GBP {})",
            vars.value("ex_av_item"),
            vars.value("ex_add_value")
        ),
        format!("Target Revenue per Customer: GBP {}", vars.value("ex_tgt_rev")),
        format!("Est. Year 3 Unit Sales: {}", vars.value("ex_yr3_units")),
    ] {
        financials.extend(w.wrapped(&text, width, roles.body, palette.text)?);
    }

    let mut growth = vec![
        Line::new("Customer Growth", roles.heading, palette.text),
        Line::spacer(2.0),
    ];
    for year in 1..=3 {
        let customers = vars.value(&format!("cust_yr{year}"));
        growth.extend(w.wrapped(
            &format!("Year {year}: {customers} customers"),
            width,
            roles.body,
            palette.text,
        )?);
    }
    growth.push(Line::spacer(1.0));
    growth.extend(w.wrapped(
        &format!("Total (3YR): {}", vars.value("tot_cust")),
        width,
        roles.body.bold(),
        palette.text,
    )?);

    w.columns(&[
        Column {
            x: left,
            lines: financials,
        },
        Column {
            x: right,
            lines: growth,
        },
    ])?;
    w.advance(2.0 * config.block_gap);

    let inner = config.content_width() - 2.0 * config.box_padding;
    let mut lines = vec![
        Line::new("Unique Value Proposition", roles.label, palette.on_dark),
        Line::spacer(2.0),
    ];
    lines.extend(w.wrapped(vars.value("uvp"), inner, roles.lead, palette.on_dark)?);
    w.panel(
        config.margin,
        config.content_width(),
        palette.dark,
        config.callout_min_height,
        &lines,
    )
}

/// Two-column grid of the lean canvas cells
///
/// # Errors
///
/// Returns `LayoutError` if the section cannot be laid out.
pub fn lean_business_plan(w: &mut PageWriter<'_>, vars: &FlatVariableMap) -> Result<()> {
    let config = w.config();
    let (roles, palette) = (config.roles, config.palette);

    w.begin_section(LEAN_BUSINESS_PLAN)?;
    let (left, right, width) = two_columns(w);
    let wrap_width = width - config.box_padding;

    for row in LEAN_CANVAS_CELLS.chunks(2) {
        let mut columns = Vec::with_capacity(2);
        for (&(label, key), x) in row.iter().zip([left, right]) {
            let mut lines = vec![
                Line::new(label, roles.subheading, palette.text),
                Line::spacer(1.0),
            ];
            lines.extend(w.wrapped(vars.value(key), wrap_width, roles.small, palette.text)?);
            columns.push(Column { x, lines });
        }
        w.columns(&columns)?;
        w.advance(config.block_gap);
    }
    Ok(())
}
