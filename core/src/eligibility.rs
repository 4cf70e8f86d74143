//! Product eligibility rules.
//!
//! Policy is permissive by default: a product with no rules object is
//! always eligible, and every rule field defaults to its non-excluding
//! value. Rules only ever remove products, never add them.

use crate::{bureau::BureauProfileRecord, types::OptionId};
use serde::{Deserialize, Serialize};

/// Structured predicate carried by a catalog product. All fields are
/// optional in the stored JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityRules {
    #[serde(default)]
    pub min_credit_score: i64,
    #[serde(default)]
    pub credit_check: bool,
    #[serde(default)]
    pub employment_required: bool,
}

/// A catalog product for the accounts, connect, or loan option lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_code: String,
    pub product_name: String,
    pub option_id: OptionId,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub eligibility_rules: Option<EligibilityRules>,
    /// Catalog position; the stable tie-break for ranking.
    #[serde(default)]
    pub position: i64,
}

impl ProductRecord {
    pub fn min_credit_score(&self) -> i64 {
        self.eligibility_rules
            .as_ref()
            .map_or(0, |r| r.min_credit_score)
    }

    /// Loan-coded products rank as a leading partition in the loan option.
    pub fn is_loan_coded(&self) -> bool {
        self.product_code.contains("LOAN")
    }
}

/// True when the profile satisfies the product's rules.
pub fn is_eligible(product: &ProductRecord, profile: &BureauProfileRecord) -> bool {
    let rules = product.eligibility_rules.clone().unwrap_or_default();

    if rules.credit_check && profile.presage_score < rules.min_credit_score {
        return false;
    }
    if rules.employment_required && !profile.is_employed() {
        return false;
    }
    true
}

/// Keep only the products the profile qualifies for, in catalog order.
pub fn filter_eligible(
    products: Vec<ProductRecord>,
    profile: &BureauProfileRecord,
) -> Vec<ProductRecord> {
    products
        .into_iter()
        .filter(|p| is_eligible(p, profile))
        .collect()
}
