//! Property-based tests for the data flattener
//!
//! - Every catalogue key is produced for arbitrary (including sparse) records
//! - Truncation never exceeds its word limit
//! - JSON round trips through the wizard field names produce the same map

use ppr_core::{
    flatten, truncate_words, BusinessPlanRecord, CompetitorRecord, FinancialsRecord,
    ForecastRecord, LeanCanvasRecord, ELLIPSIS, TEMPLATE_KEYS,
};
use proptest::prelude::*;

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-zA-Z0-9 ,.&<>'\"]{0,60}"]
}

fn arb_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_text(), 0..5)
}

fn arb_competitor() -> impl Strategy<Value = CompetitorRecord> {
    (arb_text(), arb_text(), arb_text(), arb_list(), arb_list()).prop_map(
        |(name, brand, description, features, problems)| CompetitorRecord {
            name,
            brand,
            image_description: description,
            features,
            problems,
            ..CompetitorRecord::default()
        },
    )
}

fn arb_record() -> impl Strategy<Value = BusinessPlanRecord> {
    (
        arb_text(),
        arb_list(),
        arb_list(),
        prop::collection::vec(arb_competitor(), 0..4),
        arb_text(),
        arb_text(),
    )
        .prop_map(|(name, segments, adopters, competitors, uvp, problems)| {
            BusinessPlanRecord {
                project_name: name,
                customer_segments: segments,
                early_adopters: adopters,
                competitors,
                uvp,
                lean_canvas: LeanCanvasRecord::default().with_problems(problems),
                ..BusinessPlanRecord::default()
            }
        })
}

// ============================================================================
// Total coverage
// ============================================================================

#[test]
fn proptest_flatten_is_total() {
    proptest!(|(record in arb_record())| {
        let vars = flatten(&record);
        for key in TEMPLATE_KEYS {
            prop_assert!(vars.contains_key(key), "missing key {}", key);
        }
        prop_assert_eq!(vars.len(), TEMPLATE_KEYS.len());
    });
}

#[test]
fn proptest_truncate_respects_limit() {
    proptest!(|(text in "[a-z ]{0,200}", limit in 0usize..20)| {
        let out = truncate_words(&text, limit);
        let words = out.trim_end_matches(ELLIPSIS).split_whitespace().count();
        prop_assert!(words <= limit);
        if text.split_whitespace().count() <= limit {
            prop_assert_eq!(out, text);
        } else {
            prop_assert!(out.ends_with(ELLIPSIS));
        }
    });
}

// ============================================================================
// Wire format
// ============================================================================

#[test]
fn test_json_record_matches_constructed_record() {
    let json = r#"{
        "projectName": "Trakker",
        "clientName": "Ada",
        "productSummary": "GPS tag for bikes",
        "customerSegments": ["Commuters", "Couriers", "Families"],
        "earlyAdopters": ["Club riders"],
        "competitors": [
            {"name": "Tile Mate", "brand": "Tile", "price": "24.99", "url": "https://tile.com",
             "imageUrl": "square tag", "features": ["Bluetooth", "App", "Loud"],
             "problems": ["Range", "Battery", "No GPS"]}
        ],
        "problemSummary": ["Theft", "Range", "Cost"],
        "uvp": "Finds your bike anywhere",
        "marketData": "2m bikes stolen",
        "marketSourceUrl": "https://example.org/stats",
        "financials": {"rrp": "49", "year3Sales": "10000", "addOnValue": "5",
                       "addOnItem": "Mount", "targetRevenue": "54.00"},
        "forecast": {"year1": "1000", "year2": "3000", "year3": "6000", "total": "10000"},
        "leanCanvas": {"problems": "Bikes get stolen", "preferredRoute": "Licensing"}
    }"#;

    let constructed = BusinessPlanRecord::new("Trakker", "Ada")
        .with_product_summary("GPS tag for bikes")
        .with_customer_segment(0, "Commuters")
        .with_customer_segment(1, "Couriers")
        .with_customer_segment(2, "Families")
        .with_early_adopter(0, "Club riders")
        .with_competitor(
            0,
            CompetitorRecord::new("Tile Mate", "Tile")
                .with_price("24.99")
                .with_url("https://tile.com")
                .with_image_description("square tag")
                .with_feature(0, "Bluetooth")
                .with_feature(1, "App")
                .with_feature(2, "Loud")
                .with_problem(0, "Range")
                .with_problem(1, "Battery")
                .with_problem(2, "No GPS"),
        )
        .with_problem_summary(0, "Theft")
        .with_problem_summary(1, "Range")
        .with_problem_summary(2, "Cost")
        .with_uvp("Finds your bike anywhere")
        .with_market_data("2m bikes stolen", "https://example.org/stats")
        .with_financials(
            FinancialsRecord::default()
                .with_rrp("49")
                .with_year3_sales("10000")
                .with_add_on("Mount", "5")
                .with_recomputed_target_revenue(),
        )
        .with_forecast(ForecastRecord::new("1000", "3000", "6000", "10000"))
        .with_lean_canvas(
            LeanCanvasRecord::default()
                .with_problems("Bikes get stolen")
                .with_preferred_route("Licensing"),
        );

    let parsed = BusinessPlanRecord::from_json(json).expect("valid record JSON");
    assert_eq!(flatten(&parsed), flatten(&constructed));

    let vars = flatten(&parsed);
    assert_eq!(vars.value("ex_tgt_rev"), "54.00");
    assert_eq!(vars.value("alt_img_1"), "[Image: square tag]");
    assert_eq!(vars.value("early_adopter_2"), "");
    assert_eq!(vars.value("lbp_pref_route"), "Licensing");
}
