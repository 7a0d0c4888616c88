//! Business-plan data model
//!
//! These records mirror what the report wizard collects. All of them
//! deserialize from the wizard's camelCase JSON, default every missing field,
//! and accept numbers wherever a display string is expected.
//!
//! The "exactly three" arrays (segments, adopters, competitors, features,
//! problems, problem summaries) are a caller-side invariant. Nothing here
//! validates arity; readers index positionally through [`slot`] and
//! [`BusinessPlanRecord::competitor`], which yield empty values past the end.
//!
//! Records are updated through consuming `with_*` methods that return a new
//! value, so nested records are never shared mutably between revisions.

use serde::{Deserialize, Serialize};

/// Positional read of a fixed-arity string array; out of range reads as `""`.
#[inline]
#[must_use = "returns the string at the given position"]
pub fn slot(values: &[String], index: usize) -> &str {
    values.get(index).map_or("", String::as_str)
}

fn set_slot(values: &mut Vec<String>, index: usize, value: String) {
    if values.len() <= index {
        values.resize(index + 1, String::new());
    }
    values[index] = value;
}

/// Aggregate input for one report generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessPlanRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub project_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub client_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub product_summary: String,
    #[serde(deserialize_with = "lenient::strings")]
    pub customer_segments: Vec<String>,
    #[serde(deserialize_with = "lenient::strings")]
    pub early_adopters: Vec<String>,
    pub competitors: Vec<CompetitorRecord>,
    #[serde(deserialize_with = "lenient::strings")]
    pub problem_summary: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub uvp: String,
    #[serde(deserialize_with = "lenient::string")]
    pub market_data: String,
    #[serde(deserialize_with = "lenient::string")]
    pub market_source_url: String,
    pub financials: FinancialsRecord,
    pub forecast: ForecastRecord,
    pub lean_canvas: LeanCanvasRecord,
}

impl BusinessPlanRecord {
    /// Create a record with only the project identity filled in
    #[must_use = "creates a new record"]
    pub fn new(project_name: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            client_name: client_name.into(),
            ..Self::default()
        }
    }

    /// Parse a record from the wizard's JSON document
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or a member has an
    /// incompatible type (e.g. an object where a string is expected).
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Competitor at `index`, or an all-empty competitor past the end
    #[must_use = "returns the competitor at the given position"]
    pub fn competitor(&self, index: usize) -> CompetitorRecord {
        self.competitors.get(index).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn with_product_summary(mut self, summary: impl Into<String>) -> Self {
        self.product_summary = summary.into();
        self
    }

    #[must_use]
    pub fn with_customer_segment(mut self, index: usize, value: impl Into<String>) -> Self {
        set_slot(&mut self.customer_segments, index, value.into());
        self
    }

    #[must_use]
    pub fn with_early_adopter(mut self, index: usize, value: impl Into<String>) -> Self {
        set_slot(&mut self.early_adopters, index, value.into());
        self
    }

    #[must_use]
    pub fn with_problem_summary(mut self, index: usize, value: impl Into<String>) -> Self {
        set_slot(&mut self.problem_summary, index, value.into());
        self
    }

    /// Replace the competitor at `index`, padding with empty competitors if needed
    #[must_use]
    pub fn with_competitor(mut self, index: usize, competitor: CompetitorRecord) -> Self {
        if self.competitors.len() <= index {
            self.competitors.resize_with(index + 1, CompetitorRecord::default);
        }
        self.competitors[index] = competitor;
        self
    }

    #[must_use]
    pub fn with_uvp(mut self, uvp: impl Into<String>) -> Self {
        self.uvp = uvp.into();
        self
    }

    #[must_use]
    pub fn with_market_data(
        mut self,
        statement: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        self.market_data = statement.into();
        self.market_source_url = source_url.into();
        self
    }

    #[must_use]
    pub fn with_financials(mut self, financials: FinancialsRecord) -> Self {
        self.financials = financials;
        self
    }

    #[must_use]
    pub fn with_forecast(mut self, forecast: ForecastRecord) -> Self {
        self.forecast = forecast;
        self
    }

    #[must_use]
    pub fn with_lean_canvas(mut self, lean_canvas: LeanCanvasRecord) -> Self {
        self.lean_canvas = lean_canvas;
        self
    }
}

/// One researched competitor product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompetitorRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub brand: String,
    #[serde(deserialize_with = "lenient::string")]
    pub price: String,
    #[serde(deserialize_with = "lenient::string")]
    pub url: String,
    /// Free-text description of the product picture.
    ///
    /// The wizard stores this under `imageUrl` even though it holds prose.
    #[serde(
        rename = "imageUrl",
        alias = "imageDescription",
        deserialize_with = "lenient::string"
    )]
    pub image_description: String,
    /// Optional base64 PNG/JPEG payload drawn in the printable report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    #[serde(deserialize_with = "lenient::strings")]
    pub features: Vec<String>,
    #[serde(deserialize_with = "lenient::strings")]
    pub problems: Vec<String>,
}

impl CompetitorRecord {
    #[must_use = "creates a new competitor"]
    pub fn new(name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = price.into();
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub fn with_image_description(mut self, description: impl Into<String>) -> Self {
        self.image_description = description.into();
        self
    }

    #[must_use]
    pub fn with_image_data(mut self, base64_payload: impl Into<String>) -> Self {
        self.image_data = Some(base64_payload.into());
        self
    }

    #[must_use]
    pub fn with_feature(mut self, index: usize, feature: impl Into<String>) -> Self {
        set_slot(&mut self.features, index, feature.into());
        self
    }

    #[must_use]
    pub fn with_problem(mut self, index: usize, problem: impl Into<String>) -> Self {
        set_slot(&mut self.problems, index, problem.into());
        self
    }
}

/// Pricing inputs for the growth strategy page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialsRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub rrp: String,
    #[serde(rename = "year3Sales", deserialize_with = "lenient::string")]
    pub year3_sales: String,
    #[serde(deserialize_with = "lenient::string")]
    pub add_on_value: String,
    #[serde(deserialize_with = "lenient::string")]
    pub add_on_item: String,
    /// RRP plus add-on value; derived by the caller, never by the renderers
    #[serde(deserialize_with = "lenient::string")]
    pub target_revenue: String,
}

impl FinancialsRecord {
    #[must_use]
    pub fn with_rrp(mut self, rrp: impl Into<String>) -> Self {
        self.rrp = rrp.into();
        self
    }

    #[must_use]
    pub fn with_year3_sales(mut self, units: impl Into<String>) -> Self {
        self.year3_sales = units.into();
        self
    }

    #[must_use]
    pub fn with_add_on(mut self, item: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_on_item = item.into();
        self.add_on_value = value.into();
        self
    }

    /// Recompute `target_revenue` as RRP + add-on value with two decimals.
    ///
    /// Unparseable amounts count as zero. When neither amount is positive the
    /// existing target revenue is left as it was.
    #[must_use]
    pub fn with_recomputed_target_revenue(mut self) -> Self {
        let rrp = parse_amount(&self.rrp);
        let add_on = parse_amount(&self.add_on_value);
        if rrp > 0.0 || add_on > 0.0 {
            self.target_revenue = format!("{:.2}", rrp + add_on);
        }
        self
    }
}

/// Leading-number parse in the spirit of a form field: "12.50 GBP" is 12.5.
fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed[..end].parse().unwrap_or(0.0)
}

/// Three-year customer forecast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub year1: String,
    #[serde(deserialize_with = "lenient::string")]
    pub year2: String,
    #[serde(deserialize_with = "lenient::string")]
    pub year3: String,
    #[serde(deserialize_with = "lenient::string")]
    pub total: String,
}

impl ForecastRecord {
    #[must_use = "creates a new forecast"]
    pub fn new(
        year1: impl Into<String>,
        year2: impl Into<String>,
        year3: impl Into<String>,
        total: impl Into<String>,
    ) -> Self {
        Self {
            year1: year1.into(),
            year2: year2.into(),
            year3: year3.into(),
            total: total.into(),
        }
    }
}

/// The eleven free-text lean canvas sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeanCanvasRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub problems: String,
    #[serde(deserialize_with = "lenient::string")]
    pub solutions: String,
    #[serde(deserialize_with = "lenient::string")]
    pub uvp: String,
    #[serde(deserialize_with = "lenient::string")]
    pub concept: String,
    #[serde(deserialize_with = "lenient::string")]
    pub customers: String,
    #[serde(deserialize_with = "lenient::string")]
    pub early_adopters: String,
    #[serde(deserialize_with = "lenient::string")]
    pub metrics: String,
    #[serde(deserialize_with = "lenient::string")]
    pub channels: String,
    #[serde(deserialize_with = "lenient::string")]
    pub cost_structure: String,
    #[serde(deserialize_with = "lenient::string")]
    pub revenue_streams: String,
    #[serde(deserialize_with = "lenient::string")]
    pub preferred_route: String,
}

impl LeanCanvasRecord {
    #[must_use]
    pub fn with_problems(mut self, value: impl Into<String>) -> Self {
        self.problems = value.into();
        self
    }

    #[must_use]
    pub fn with_solutions(mut self, value: impl Into<String>) -> Self {
        self.solutions = value.into();
        self
    }

    #[must_use]
    pub fn with_uvp(mut self, value: impl Into<String>) -> Self {
        self.uvp = value.into();
        self
    }

    #[must_use]
    pub fn with_concept(mut self, value: impl Into<String>) -> Self {
        self.concept = value.into();
        self
    }

    #[must_use]
    pub fn with_customers(mut self, value: impl Into<String>) -> Self {
        self.customers = value.into();
        self
    }

    #[must_use]
    pub fn with_early_adopters(mut self, value: impl Into<String>) -> Self {
        self.early_adopters = value.into();
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, value: impl Into<String>) -> Self {
        self.metrics = value.into();
        self
    }

    #[must_use]
    pub fn with_channels(mut self, value: impl Into<String>) -> Self {
        self.channels = value.into();
        self
    }

    #[must_use]
    pub fn with_cost_structure(mut self, value: impl Into<String>) -> Self {
        self.cost_structure = value.into();
        self
    }

    #[must_use]
    pub fn with_revenue_streams(mut self, value: impl Into<String>) -> Self {
        self.revenue_streams = value.into();
        self
    }

    #[must_use]
    pub fn with_preferred_route(mut self, value: impl Into<String>) -> Self {
        self.preferred_route = value.into();
        self
    }
}

/// Deserializers that accept strings, numbers, booleans and null as display text.
pub(crate) mod lenient {
    use serde::de::{self, Deserializer, SeqAccess, Visitor};
    use serde::Deserialize;
    use std::fmt;

    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number, boolean or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<String, D::Error> {
            d.deserialize_any(Self)
        }
    }

    struct Text(String);

    impl<'de> Deserialize<'de> for Text {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            d.deserialize_any(TextVisitor).map(Text)
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        d.deserialize_any(TextVisitor)
    }

    pub fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        struct SeqVisitor;

        impl<'de> Visitor<'de> for SeqVisitor {
            type Value = Vec<String>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of strings")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<String>, A::Error> {
                let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(3));
                while let Some(Text(value)) = seq.next_element()? {
                    out.push(value);
                }
                Ok(out)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Vec<String>, E> {
                Ok(Vec::new())
            }
        }

        d.deserialize_any(SeqVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_past_end_is_empty() {
        let values = vec!["a".to_string()];
        assert_eq!(slot(&values, 0), "a");
        assert_eq!(slot(&values, 2), "");
    }

    #[test]
    fn test_deserialize_camel_case_with_numbers() {
        let json = r#"{
            "projectName": "Trakker",
            "customerSegments": ["Cyclists", 42, null],
            "competitors": [{"name": "Tile", "price": 24.99, "imageUrl": "a square tag"}],
            "financials": {"rrp": 30, "year3Sales": "1000", "addOnValue": "5"},
            "forecast": {"year1": 100, "total": "600"},
            "leanCanvas": {"costStructure": "Tooling"}
        }"#;
        let record = BusinessPlanRecord::from_json(json).unwrap();
        assert_eq!(record.project_name, "Trakker");
        assert_eq!(record.customer_segments, vec!["Cyclists", "42", ""]);
        assert_eq!(record.competitors[0].price, "24.99");
        assert_eq!(record.competitors[0].image_description, "a square tag");
        assert_eq!(record.financials.rrp, "30");
        assert_eq!(record.financials.year3_sales, "1000");
        assert_eq!(record.forecast.year1, "100");
        assert_eq!(record.lean_canvas.cost_structure, "Tooling");
        assert!(record.early_adopters.is_empty());
    }

    #[test]
    fn test_object_where_string_expected_is_rejected() {
        let json = r#"{"projectName": {"nested": true}}"#;
        assert!(BusinessPlanRecord::from_json(json).is_err());
    }

    #[test]
    fn test_competitor_past_end_is_empty() {
        let record = BusinessPlanRecord::new("P", "C");
        assert_eq!(record.competitor(2), CompetitorRecord::default());
    }

    #[test]
    fn test_with_updates_do_not_touch_original() {
        let original = BusinessPlanRecord::new("Trakker", "Ada");
        let updated = original
            .clone()
            .with_customer_segment(2, "Hikers")
            .with_competitor(1, CompetitorRecord::new("Tile", "Tile Inc").with_feature(0, "Loud"));

        assert!(original.customer_segments.is_empty());
        assert_eq!(updated.customer_segments, vec!["", "", "Hikers"]);
        assert_eq!(updated.competitors.len(), 2);
        assert_eq!(updated.competitors[1].features, vec!["Loud"]);
    }

    #[test]
    fn test_recomputed_target_revenue() {
        let f = FinancialsRecord::default()
            .with_rrp("19.99")
            .with_add_on("Strap", "5")
            .with_recomputed_target_revenue();
        assert_eq!(f.target_revenue, "24.99");
    }

    #[test]
    fn test_recomputed_target_revenue_keeps_value_without_amounts() {
        let f = FinancialsRecord {
            target_revenue: "manual".to_string(),
            ..FinancialsRecord::default()
        }
        .with_recomputed_target_revenue();
        assert_eq!(f.target_revenue, "manual");
    }

    #[test]
    fn test_parse_amount_leading_number() {
        assert!((parse_amount("12.50 GBP") - 12.5).abs() < f64::EPSILON);
        assert!(parse_amount("abc").abs() < f64::EPSILON);
    }
}
