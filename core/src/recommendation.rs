//! The recommendation row — one per client, merged across product options.
//!
//! Persistence has two modes. The full-profile pass loads any existing row,
//! overwrites only the slots it recomputed, and upserts on the customer id.
//! The primary-interest pass touches a single slot: partial update when a
//! row exists, otherwise an insert with a deterministic id so a retried
//! insert converges on the same row.

use crate::{interest::ProductOption, types::ClientId};
use serde::{Deserialize, Serialize};

/// Best / next-best fields for one product option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySlot {
    pub best_name: Option<String>,
    pub best_reason: Option<String>,
    pub next_name: Option<String>,
    pub next_reason: Option<String>,
}

impl CategorySlot {
    pub fn is_empty(&self) -> bool {
        self.best_name.is_none()
            && self.best_reason.is_none()
            && self.next_name.is_none()
            && self.next_reason.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub id: String,
    pub customer_id: ClientId,
    pub accounts: CategorySlot,
    pub connect: CategorySlot,
    pub insurance: CategorySlot,
    pub loan: CategorySlot,
    pub enrichment_complete: bool,
    pub generated_at: String,
}

impl RecommendationRecord {
    /// Fresh row for the full-profile pass.
    pub fn new_for_client(customer_id: &str) -> Self {
        Self {
            id: format!("rec-{}", uuid::Uuid::new_v4()),
            customer_id: customer_id.to_string(),
            accounts: CategorySlot::default(),
            connect: CategorySlot::default(),
            insurance: CategorySlot::default(),
            loan: CategorySlot::default(),
            enrichment_complete: true,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Fresh row for the primary-interest pass, other slots left empty.
    pub fn new_for_option(customer_id: &str, option: ProductOption, slot: CategorySlot) -> Self {
        let mut record = Self {
            id: format!("rec-{}-{}", customer_id, option.field_prefix()),
            customer_id: customer_id.to_string(),
            accounts: CategorySlot::default(),
            connect: CategorySlot::default(),
            insurance: CategorySlot::default(),
            loan: CategorySlot::default(),
            enrichment_complete: true,
            generated_at: chrono::Utc::now().to_rfc3339(),
        };
        *record.slot_mut(option) = slot;
        record
    }

    pub fn slot(&self, option: ProductOption) -> &CategorySlot {
        match option {
            ProductOption::Accounts => &self.accounts,
            ProductOption::Connect => &self.connect,
            ProductOption::Insurance => &self.insurance,
            ProductOption::Loan => &self.loan,
        }
    }

    pub fn slot_mut(&mut self, option: ProductOption) -> &mut CategorySlot {
        match option {
            ProductOption::Accounts => &mut self.accounts,
            ProductOption::Connect => &mut self.connect,
            ProductOption::Insurance => &mut self.insurance,
            ProductOption::Loan => &mut self.loan,
        }
    }
}
