//! Ranking and best / next-best selection over eligible products.

use crate::{eligibility::ProductRecord, interest::ProductOption};
use std::cmp::Reverse;

/// Benefit count joined into a reason on the full-profile path.
pub const FULL_PROFILE_BENEFIT_LIMIT: usize = 2;

/// Benefit count joined into a reason on the primary-interest path.
pub const INTEREST_BENEFIT_LIMIT: usize = 3;

/// Reason used on the primary-interest path when a product lists
/// no benefits.
pub const INTEREST_REASON_FALLBACK: &str = "Strong value offering";

/// Order eligible products for an option.
///
/// Stable descending sort on the rules' min_credit_score; catalog order
/// breaks ties. For the loan option, loan-coded products form a leading
/// partition ahead of any score, with the score sort applied within each
/// partition.
pub fn rank(mut eligible: Vec<ProductRecord>, option: ProductOption) -> Vec<ProductRecord> {
    if option == ProductOption::Loan {
        eligible.sort_by_key(|p| (!p.is_loan_coded(), Reverse(p.min_credit_score())));
    } else {
        eligible.sort_by_key(|p| Reverse(p.min_credit_score()));
    }
    eligible
}

/// Best and next-best from a ranked list.
pub fn select(ranked: &[ProductRecord]) -> (Option<&ProductRecord>, Option<&ProductRecord>) {
    (ranked.first(), ranked.get(1))
}

/// Join the first `limit` benefit strings with ", ". Empty input yields
/// an empty reason; fallback policy belongs to the entry point.
pub fn benefit_reason(benefits: &[String], limit: usize) -> String {
    benefits
        .iter()
        .take(limit)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}
