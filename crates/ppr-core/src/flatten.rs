//! Data flattener
//!
//! Projects a [`BusinessPlanRecord`] onto the canonical flat variable map
//! shared by every rendering path. The key set is fixed: [`TEMPLATE_KEYS`]
//! lists it, and [`flatten`] always produces every one of those keys, so a
//! token a template cannot resolve is a template authoring error rather than
//! a flattening gap.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{slot, BusinessPlanRecord};

/// Word limit for lean canvas cells
pub const LEAN_CANVAS_WORD_LIMIT: usize = 15;

/// Word limit for the lean canvas RRP cell
pub const LEAN_CANVAS_RRP_WORD_LIMIT: usize = 10;

/// Marker appended to text cut by [`truncate_words`]
pub const ELLIPSIS: &str = "...";

/// Every variable key produced by [`flatten`], in template reading order.
pub const TEMPLATE_KEYS: &[&str] = &[
    "project_name",
    "client_name",
    "product_summary",
    "customer_1",
    "customer_2",
    "customer_3",
    "early_adopter_1",
    "early_adopter_2",
    "early_adopter_3",
    "alt_product_name_1",
    "alt_brand_1",
    "alt_price_1",
    "alt_url_1",
    "alt_img_1",
    "alt_doesjob1_1",
    "alt_doesjob1_2",
    "alt_doesjob1_3",
    "alt_prob1_1",
    "alt_prob1_2",
    "alt_prob1_3",
    "alt_product_name_2",
    "alt_brand_2",
    "alt_price_2",
    "alt_url_2",
    "alt_img_2",
    "alt_doesjob2_1",
    "alt_doesjob2_2",
    "alt_doesjob2_3",
    "alt_prob2_1",
    "alt_prob2_2",
    "alt_prob2_3",
    "alt_product_name_3",
    "alt_brand_3",
    "alt_price_3",
    "alt_url_3",
    "alt_img_3",
    "alt_doesjob3_1",
    "alt_doesjob3_2",
    "alt_doesjob3_3",
    "alt_prob3_1",
    "alt_prob3_2",
    "alt_prob3_3",
    "prob_summary_1",
    "prob_summary_2",
    "prob_summary_3",
    "uvp",
    "mkt_data",
    "mkt_source_url",
    "ex_rrp",
    "ex_yr3_units",
    "ex_add_value",
    "ex_tgt_rev",
    "ex_av_item",
    "cust_yr1",
    "cust_yr2",
    "cust_yr3",
    "tot_cust",
    "lbp_problems",
    "lbp_exst_sol",
    "lbp_sol",
    "lbp_keymet",
    "lbp_uvp",
    "lbp_hlc",
    "lbp_cost_struc",
    "lbp_rrp",
    "lbp_rev_stream",
    "lbp_pref_route",
    "lbp_chan",
    "lbp_cust",
    "lbp_ea",
];

/// Token text for `key` as it must be typed into a template: `{{key}}`
#[inline]
#[must_use = "returns the template token for the key"]
pub fn token_for(key: &str) -> String {
    format!("{{{{{key}}}}}")
}

/// Flat mapping of variable key to display string.
///
/// Ordered by key so serialisation and iteration are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatVariableMap(BTreeMap<String, String>);

impl FlatVariableMap {
    #[inline]
    #[must_use = "creates an empty variable map"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value for `key`, or `""` when the key is absent
    #[inline]
    #[must_use]
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlatVariableMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for FlatVariableMap {
    #[inline]
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// Keep the first `limit` whitespace-separated words, appending [`ELLIPSIS`]
/// when anything was cut.
///
/// Text within the limit is returned unchanged, including its original spacing.
///
/// ```
/// use ppr_core::truncate_words;
///
/// assert_eq!(truncate_words("one two three four", 2), "one two...");
/// assert_eq!(truncate_words("one two", 5), "one two");
/// ```
#[must_use = "returns the truncated text"]
pub fn truncate_words(text: &str, limit: usize) -> String {
    if text.split_whitespace().count() <= limit {
        return text.to_string();
    }
    let mut out = text
        .split_whitespace()
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ");
    out.push_str(ELLIPSIS);
    out
}

/// Flatten a record into the canonical variable map.
///
/// Pure and total: every key in [`TEMPLATE_KEYS`] is present in the result,
/// absent data reads as `""`, and numeric-looking fields are copied verbatim.
#[must_use = "returns the flattened variable map"]
pub fn flatten(record: &BusinessPlanRecord) -> FlatVariableMap {
    let mut vars = FlatVariableMap::new();

    vars.insert("project_name", record.project_name.as_str());
    vars.insert("client_name", record.client_name.as_str());
    vars.insert("product_summary", record.product_summary.as_str());
    for i in 0..3 {
        let n = i + 1;
        vars.insert(format!("customer_{n}"), slot(&record.customer_segments, i));
        vars.insert(format!("early_adopter_{n}"), slot(&record.early_adopters, i));
        vars.insert(format!("prob_summary_{n}"), slot(&record.problem_summary, i));
    }

    for i in 0..3 {
        let n = i + 1;
        let c = record.competitor(i);
        vars.insert(format!("alt_product_name_{n}"), c.name.as_str());
        vars.insert(format!("alt_brand_{n}"), c.brand.as_str());
        vars.insert(format!("alt_price_{n}"), c.price.as_str());
        vars.insert(format!("alt_url_{n}"), c.url.as_str());
        vars.insert(format!("alt_img_{n}"), format!("[Image: {}]", c.image_description));
        for k in 0..3 {
            let m = k + 1;
            vars.insert(format!("alt_doesjob{n}_{m}"), slot(&c.features, k));
            vars.insert(format!("alt_prob{n}_{m}"), slot(&c.problems, k));
        }
    }

    vars.insert("uvp", record.uvp.as_str());
    vars.insert("mkt_data", record.market_data.as_str());
    vars.insert("mkt_source_url", record.market_source_url.as_str());

    let f = &record.financials;
    vars.insert("ex_rrp", f.rrp.as_str());
    vars.insert("ex_yr3_units", f.year3_sales.as_str());
    vars.insert("ex_add_value", f.add_on_value.as_str());
    vars.insert("ex_tgt_rev", f.target_revenue.as_str());
    vars.insert("ex_av_item", f.add_on_item.as_str());

    let forecast = &record.forecast;
    vars.insert("cust_yr1", forecast.year1.as_str());
    vars.insert("cust_yr2", forecast.year2.as_str());
    vars.insert("cust_yr3", forecast.year3.as_str());
    vars.insert("tot_cust", forecast.total.as_str());

    let lc = &record.lean_canvas;
    let existing_solutions = (0..3)
        .map(|i| record.competitor(i).name)
        .collect::<Vec<_>>()
        .join(", ");
    let limit = LEAN_CANVAS_WORD_LIMIT;
    vars.insert("lbp_problems", truncate_words(&lc.problems, limit));
    vars.insert("lbp_exst_sol", truncate_words(&existing_solutions, limit));
    vars.insert("lbp_sol", truncate_words(&lc.solutions, limit));
    vars.insert("lbp_keymet", truncate_words(&lc.metrics, limit));
    vars.insert("lbp_uvp", truncate_words(&lc.uvp, limit));
    vars.insert("lbp_hlc", truncate_words(&lc.concept, limit));
    vars.insert("lbp_cost_struc", truncate_words(&lc.cost_structure, limit));
    vars.insert("lbp_rrp", truncate_words(&f.rrp, LEAN_CANVAS_RRP_WORD_LIMIT));
    vars.insert("lbp_rev_stream", truncate_words(&lc.revenue_streams, limit));
    vars.insert("lbp_pref_route", truncate_words(&lc.preferred_route, limit));
    vars.insert("lbp_chan", truncate_words(&lc.channels, limit));
    vars.insert("lbp_cust", truncate_words(&lc.customers, limit));
    vars.insert("lbp_ea", truncate_words(&lc.early_adopters, limit));

    log::debug!(
        "flattened '{}' into {} variables",
        record.project_name,
        vars.len()
    );
    vars
}
