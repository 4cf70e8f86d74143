//! Primary-interest parsing.
//!
//! Clients arrive with a loosely-typed `primary_interest` value. The match
//! below is the single mapping table for the whole engine: the option
//! number as a string plus every label spelling seen in the field. Anything
//! outside the vocabulary fails closed.

use crate::types::OptionId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductOption {
    Accounts,
    Connect,
    Insurance,
    Loan,
}

impl ProductOption {
    pub const ALL: [ProductOption; 4] = [
        Self::Accounts,
        Self::Connect,
        Self::Insurance,
        Self::Loan,
    ];

    /// Options served by the rule-based product catalog. Insurance is
    /// scored from client attributes instead and is handled separately.
    pub const CATALOG: [ProductOption; 3] = [Self::Accounts, Self::Connect, Self::Loan];

    pub fn option_id(self) -> OptionId {
        match self {
            Self::Accounts => 1,
            Self::Connect => 2,
            Self::Insurance => 3,
            Self::Loan => 4,
        }
    }

    pub fn from_option_id(id: OptionId) -> Option<Self> {
        match id {
            1 => Some(Self::Accounts),
            2 => Some(Self::Connect),
            3 => Some(Self::Insurance),
            4 => Some(Self::Loan),
            _ => None,
        }
    }

    /// Column prefix for this option's slot in the recommendations table.
    pub fn field_prefix(self) -> &'static str {
        match self {
            Self::Accounts => "account",
            Self::Connect => "connect",
            Self::Insurance => "insurance",
            Self::Loan => "loan",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Accounts => "Accounts",
            Self::Connect => "Connect",
            Self::Insurance => "Insurance",
            Self::Loan => "Loan",
        }
    }

    /// Parse a raw primary-interest value. Surrounding whitespace is
    /// ignored; unknown spellings return None.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" | "Accounts" | "FNB Accounts" | "Account Opening" => Some(Self::Accounts),
            "2" | "Connect" | "FNB Connect" => Some(Self::Connect),
            "3" | "Insurance" | "FNB Insurance" => Some(Self::Insurance),
            "4" | "Loan" | "FNB Loan" => Some(Self::Loan),
            _ => None,
        }
    }
}
