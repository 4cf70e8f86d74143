//! Client records.
//!
//! Clients are created and owned by the external client-management system;
//! the engine only ever reads them. The runner seeds demo rows from
//! data/clients/seed_clients.json so the pipeline has something to chew on.

use crate::types::ClientId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: ClientId,
    pub first_name: String,
    pub surname: String,
    pub id_number: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Raw declared interest: an option number as a string, a branded
    /// label, or a campaign label. Parsed by ProductOption::parse.
    #[serde(default)]
    pub primary_interest: Option<String>,
    #[serde(default)]
    pub owns_car: bool,
    #[serde(default)]
    pub owns_home: bool,
}

impl ClientRecord {
    /// Fields the request-driven path requires before it will process
    /// a client. Returns the names of any that are empty or absent.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.first_name.is_empty() {
            missing.push("first_name");
        }
        if self.surname.is_empty() {
            missing.push("surname");
        }
        if self.id_number.is_empty() {
            missing.push("id_number");
        }
        if self.primary_interest.as_deref().map_or(true, str::is_empty) {
            missing.push("primary_interest");
        }
        missing
    }
}
