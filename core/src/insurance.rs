//! Insurance relevance scoring.
//!
//! Insurance is the odd one out: products are scored from client
//! attributes, not from bureau rules. Each product belongs to exactly one
//! category, so exactly one row of the rule table can fire per product.

use crate::client::ClientRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceCategoryRecord {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceProductRecord {
    pub id: String,
    pub category_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Catalog position; the stable tie-break on equal scores.
    #[serde(default)]
    pub position: i64,
}

fn default_active() -> bool {
    true
}

/// Relevance of one category to one client. Unresolved category ids reach
/// here as "" and score 0.
pub fn relevance_score(category_name: &str, client: &ClientRecord) -> i64 {
    match category_name {
        "Car Insurance" if client.owns_car => 3,
        "Home Insurance" if client.owns_home => 3,
        "Life Insurance" => 2,
        "Health Insurance" => 1,
        _ => 0,
    }
}

/// Score the active insurance catalog for a client. Descending by score,
/// catalog order preserved on ties. Callers pass only active products.
pub fn score_insurance(
    products: Vec<InsuranceProductRecord>,
    category_names: &HashMap<String, String>,
    client: &ClientRecord,
) -> Vec<(i64, InsuranceProductRecord)> {
    let mut scored: Vec<(i64, InsuranceProductRecord)> = products
        .into_iter()
        .map(|product| {
            let name = category_names
                .get(&product.category_id)
                .map(String::as_str)
                .unwrap_or("");
            (relevance_score(name, client), product)
        })
        .collect();
    scored.sort_by_key(|(score, _)| Reverse(*score));
    scored
}
