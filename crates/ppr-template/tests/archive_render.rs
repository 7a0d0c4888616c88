//! Integration tests for archive substitution
//!
//! Templates are built in memory so each test states exactly which parts
//! carry tokens, which are binary, and how they are compressed.

use std::io::{Cursor, Read, Write};

use ppr_core::{flatten, BusinessPlanRecord, CompetitorRecord, FlatVariableMap};
use ppr_template::{
    render_archive, render_archive_with, scan_template, visible_text, PartAction, TemplateError,
    TokenMatcher,
};
use proptest::prelude::*;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const SLIDE_INTACT: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree><p:sp><p:txBody>"#,
    r#"<a:p><a:r><a:t>{{project_name}}</a:t></a:r></a:p>"#,
    r#"<a:p><a:r><a:t>Prepared for {{client_name}}</a:t></a:r></a:p>"#,
    r#"</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#
);

const SLIDE_SHATTERED: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree><p:sp><p:txBody>"#,
    r#"<a:p><a:r><a:t>{{proj</a:t></a:r><a:r><a:rPr lang="en-GB" b="1"/><a:t>ect_name}}</a:t></a:r></a:p>"#,
    r#"<a:p><a:r><a:t>Prepared for {</a:t></a:r><a:r><a:rPr i="1"/><a:t>{client_</a:t></a:r><a:r><a:t>name}}</a:t></a:r></a:p>"#,
    r#"</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#
);

const SLIDE_PLAIN: &str = r#"<p:sld xmlns:a="a" xmlns:p="p"><a:p><a:r><a:t>Agenda</a:t></a:r></a:p></p:sld>"#;

/// PNG signature followed by bytes that look like a token and are not UTF-8
const IMAGE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n{{project_name}}\xff\xfe\x00\x01";

fn build_archive(entries: &[(&str, &[u8], CompressionMethod)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes, method) in entries {
        let options = SimpleFileOptions::default().compression_method(*method);
        writer.start_file(*name, options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn template(slide: &str) -> Vec<u8> {
    build_archive(&[
        ("[Content_Types].xml", &b"<Types/>"[..], CompressionMethod::Deflated),
        ("ppt/slides/slide1.xml", slide.as_bytes(), CompressionMethod::Deflated),
        ("ppt/slides/slide2.xml", SLIDE_PLAIN.as_bytes(), CompressionMethod::Stored),
        ("ppt/media/image1.png", IMAGE_BYTES, CompressionMethod::Stored),
    ])
}

fn read_part(archive: &[u8], name: &str) -> Vec<u8> {
    let mut zip = ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut entry = zip.by_name(name).unwrap();
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).unwrap();
    bytes
}

fn raw_part(archive: &[u8], name: &str) -> (Vec<u8>, CompressionMethod, u32) {
    let mut zip = ZipArchive::new(Cursor::new(archive)).unwrap();
    let index = zip.index_for_name(name).unwrap();
    let mut entry = zip.by_index_raw(index).unwrap();
    let method = entry.compression();
    let crc = entry.crc32();
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).unwrap();
    (bytes, method, crc)
}

fn part_names(archive: &[u8]) -> Vec<String> {
    let zip = ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
    names.sort();
    names
}

fn trakker_vars() -> FlatVariableMap {
    flatten(
        &BusinessPlanRecord::new("Trakker", "Ada & Co")
            .with_competitor(0, CompetitorRecord::new("Tile Mate", "Tile")),
    )
}

fn slide_text(archive: &[u8]) -> String {
    let xml = String::from_utf8(read_part(archive, "ppt/slides/slide1.xml")).unwrap();
    visible_text("ppt/slides/slide1.xml", &xml).unwrap()
}

// ============================================================================
// Pass-through
// ============================================================================

#[test]
fn test_empty_map_preserves_every_part() {
    let _ = env_logger::builder().is_test(true).try_init();
    let input = template(SLIDE_INTACT);
    let output = render_archive(&input, &FlatVariableMap::new()).expect("render");

    assert_eq!(part_names(&input), part_names(&output));
    for name in part_names(&input) {
        assert_eq!(raw_part(&input, &name), raw_part(&output, &name), "{name} changed");
    }
}

#[test]
fn test_untouched_parts_are_byte_identical() {
    let input = template(SLIDE_INTACT);
    let output = render_archive(&input, &trakker_vars()).expect("render");

    for name in [
        "[Content_Types].xml",
        "ppt/slides/slide2.xml",
        "ppt/media/image1.png",
    ] {
        assert_eq!(raw_part(&input, name), raw_part(&output, name), "{name} changed");
    }
    assert_eq!(read_part(&output, "ppt/media/image1.png"), IMAGE_BYTES);
}

#[test]
fn test_part_order_and_actions_reported() {
    let input = template(SLIDE_INTACT);
    let rendered = render_archive_with(&input, &TokenMatcher::new(&trakker_vars())).unwrap();

    let names: Vec<_> = rendered.parts.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "[Content_Types].xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/media/image1.png",
        ]
    );
    let actions: Vec<_> = rendered.parts.iter().map(|p| p.action).collect();
    assert_eq!(
        actions,
        [
            PartAction::Unchanged,
            PartAction::Rewritten,
            PartAction::Unchanged,
            PartAction::PassedThrough,
        ]
    );
    assert_eq!(rendered.replacements(), 2);
    assert_eq!(rendered.rewritten_parts().collect::<Vec<_>>(), ["ppt/slides/slide1.xml"]);
}

// ============================================================================
// Substitution
// ============================================================================

#[test]
fn test_intact_tokens_substituted_and_escaped() {
    let input = template(SLIDE_INTACT);
    let output = render_archive(&input, &trakker_vars()).expect("render");

    let xml = String::from_utf8(read_part(&output, "ppt/slides/slide1.xml")).unwrap();
    assert!(xml.contains("<a:t>Trakker</a:t>"));
    assert!(xml.contains("Prepared for Ada &amp; Co"));
    assert!(!xml.contains("{{"));
    assert_eq!(slide_text(&output), "Trakker\nPrepared for Ada & Co\n");
}

#[test]
fn test_rewritten_part_keeps_compression_method() {
    let input = template(SLIDE_INTACT);
    let output = render_archive(&input, &trakker_vars()).unwrap();
    let (_, method, _) = raw_part(&output, "ppt/slides/slide1.xml");
    assert_eq!(method, CompressionMethod::Deflated);
}

#[test]
fn test_shattered_tokens_render_like_intact_ones() {
    let vars = trakker_vars();
    let intact = render_archive(&template(SLIDE_INTACT), &vars).unwrap();
    let shattered = render_archive(&template(SLIDE_SHATTERED), &vars).unwrap();

    assert_eq!(slide_text(&intact), slide_text(&shattered));
    let xml = String::from_utf8(read_part(&shattered, "ppt/slides/slide1.xml")).unwrap();
    assert!(xml.contains("<a:t>Trakker</a:t>"));
}

#[test]
fn test_mixed_intact_and_shattered_tokens_in_one_part() {
    let slide = concat!(
        r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree><p:sp><p:txBody>"#,
        r#"<a:p><a:r><a:t>{{project_name}}</a:t></a:r></a:p>"#,
        r#"<a:p><a:r><a:t>{{proj</a:t></a:r><a:r><a:rPr b="1"/><a:t>ect_</a:t></a:r><a:r><a:t>name}}</a:t></a:r></a:p>"#,
        r#"</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#
    );
    let input = template(slide);
    let output = render_archive(&input, &trakker_vars()).unwrap();

    assert_eq!(slide_text(&output), "Trakker\nTrakker\n");
    assert_eq!(
        raw_part(&output, "ppt/media/image1.png"),
        raw_part(&input, "ppt/media/image1.png")
    );
    assert_eq!(read_part(&output, "ppt/media/image1.png"), IMAGE_BYTES);
}

#[test]
fn test_unknown_tokens_survive_render() {
    let slide = r#"<a:p><a:r><a:t>{{not_a_key}}</a:t></a:r></a:p>"#;
    let input = build_archive(&[("ppt/slides/slide1.xml", slide.as_bytes(), CompressionMethod::Deflated)]);
    let output = render_archive(&input, &trakker_vars()).unwrap();
    assert_eq!(read_part(&output, "ppt/slides/slide1.xml"), slide.as_bytes());
}

#[test]
fn test_rels_parts_are_not_scanned() {
    let rels = r#"<Relationships><Relationship Target="{{project_name}}"/></Relationships>"#;
    let input = build_archive(&[(
        "ppt/slides/_rels/slide1.xml.rels",
        rels.as_bytes(),
        CompressionMethod::Deflated,
    )]);
    let output = render_archive(&input, &trakker_vars()).unwrap();
    assert_eq!(
        read_part(&output, "ppt/slides/_rels/slide1.xml.rels"),
        rels.as_bytes()
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_not_a_zip() {
    let err = render_archive(b"PK not really", &trakker_vars()).unwrap_err();
    assert!(matches!(err, TemplateError::Decode { .. }));
    assert!(err.to_string().contains("cannot be decoded"));
}

#[test]
fn test_invalid_utf8_part_is_named() {
    let input = build_archive(&[
        ("ppt/slides/slide1.xml", SLIDE_INTACT.as_bytes(), CompressionMethod::Deflated),
        ("ppt/slides/slide9.xml", &b"<a:t>\xff\xfe</a:t>"[..], CompressionMethod::Deflated),
    ]);
    let err = render_archive(&input, &trakker_vars()).unwrap_err();
    assert!(matches!(err, TemplateError::PartEncoding { .. }));
    assert_eq!(err.part(), Some("ppt/slides/slide9.xml"));
}

fn le_u16(bytes: &[u8], at: usize) -> usize {
    usize::from(u16::from_le_bytes([bytes[at], bytes[at + 1]]))
}

/// Rewrite the zip64 uncompressed size of the first central directory entry
fn patch_zip64_size(archive: &mut [u8], size: u64) {
    let header = archive
        .windows(4)
        .position(|w| w == b"PK\x01\x02")
        .expect("central directory header");
    let name_len = le_u16(archive, header + 28);
    let extra_len = le_u16(archive, header + 30);
    let mut at = header + 46 + name_len;
    let end = at + extra_len;
    while at + 4 <= end {
        let (id, len) = (le_u16(archive, at), le_u16(archive, at + 2));
        if id == 0x0001 {
            archive[at + 4..at + 12].copy_from_slice(&size.to_le_bytes());
            return;
        }
        at += 4 + len;
    }
    panic!("no zip64 extra field");
}

#[test]
fn test_oversized_declared_length_is_a_decode_error() {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .large_file(true);
    writer.start_file("ppt/slides/slide1.xml", options).unwrap();
    writer.write_all(SLIDE_INTACT.as_bytes()).unwrap();
    let mut input = writer.finish().unwrap().into_inner();
    patch_zip64_size(&mut input, 1 << 62);

    let err = render_archive(&input, &FlatVariableMap::new()).unwrap_err();
    assert!(matches!(err, TemplateError::Decode { .. }));
    let err = scan_template(&input).unwrap_err();
    assert!(matches!(err, TemplateError::Decode { .. }));
}

// ============================================================================
// Template scan
// ============================================================================

#[test]
fn test_scan_reports_known_and_unknown_tokens() {
    let slide = concat!(
        r#"<a:p><a:r><a:t>{{proj</a:t></a:r><a:r><a:t>ect_name}}</a:t></a:r></a:p>"#,
        r#"<a:p><a:r><a:t>{{typo_key}}</a:t></a:r></a:p>"#
    );
    let input = build_archive(&[
        ("ppt/slides/slide1.xml", slide.as_bytes(), CompressionMethod::Deflated),
        ("ppt/media/image1.png", IMAGE_BYTES, CompressionMethod::Stored),
    ]);

    let scan = scan_template(&input).unwrap();
    assert_eq!(scan.parts_scanned, 1);
    assert_eq!(scan.tokens.len(), 2);
    assert!(scan.tokens[0].known);
    assert_eq!(scan.tokens[0].key, "project_name");
    let unknown: Vec<_> = scan.unknown().map(|t| t.key.as_str()).collect();
    assert_eq!(unknown, ["typo_key"]);
    assert!(!scan.unused_keys().contains(&"project_name"));
    assert!(scan.unused_keys().contains(&"client_name"));
}

// ============================================================================
// Idempotence
// ============================================================================

proptest! {
    #[test]
    fn proptest_render_is_idempotent(name in "[A-Za-z0-9 &<>'\"]{0,30}", client in "[A-Za-z ]{0,20}") {
        let vars = flatten(&BusinessPlanRecord::new(name, client));
        let once = render_archive(&template(SLIDE_SHATTERED), &vars).unwrap();
        let twice = render_archive(&once, &vars).unwrap();
        for part in part_names(&once) {
            prop_assert_eq!(read_part(&once, &part), read_part(&twice, &part));
        }
    }
}
