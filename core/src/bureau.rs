//! Bureau enrichment — profile synthesis and the cache-forever resolver.
//!
//! RULE: a bureau profile is written at most once per client. Once a row
//! exists it is returned unchanged for the life of the client; the resolver
//! never re-fetches or refreshes. Two racing resolvers for a brand-new
//! client can both pass the existence check; the user_id primary key turns
//! the second insert into an error rather than a duplicate row, and every
//! read thereafter agrees. That race is accepted.

use crate::{
    client::ClientRecord, error::EngineResult, rng::EnrichmentRng, store::EngineStore,
    types::ClientId,
};
use serde::{Deserialize, Serialize};

pub const PRESAGE_SCORE_MIN: i64 = 500;
pub const PRESAGE_SCORE_MAX: i64 = 750;

const MARITAL_STATUSES: &[&str] = &["Single", "Married"];
const GENDERS: &[&str] = &["Male", "Female"];
const EMPLOYED_PROBABILITY: f64 = 0.8;

/// Risk banding on the presage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn from_score(score: i64) -> Self {
        if score >= 700 {
            Self::Low
        } else if score >= 600 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// The enrichment record, one per client, keyed on the client id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BureauProfileRecord {
    pub user_id: ClientId,
    pub bureau: String,
    pub enquiry_reason: String,
    pub enquiry_date: String,
    pub enquiry_type: String,
    pub marital_status: String,
    pub gender: String,
    pub employment_status: Option<String>,
    /// None means the bureau returned no verdict — absence is NOT failure.
    pub fraud_id_verified: Option<bool>,
    pub fraud_deceased_status: String,
    pub fraud_found_on_database: bool,
    /// 0 if the bureau returned no score.
    pub presage_score: i64,
    pub nlr_score: i64,
    pub risk_band: String,
    /// The bureau response as received, JSON-encoded.
    pub raw_payload: String,
}

impl BureauProfileRecord {
    /// Employment check used by eligibility: empty or absent means
    /// not employed.
    pub fn is_employed(&self) -> bool {
        self.employment_status.as_deref().map_or(false, |s| !s.is_empty())
    }
}

/// Where synthesized profiles come from. The mock source stands in for the
/// real XDS bureau call; a failure maps to BureauUnavailable upstream.
pub trait BureauSource: Send {
    fn synthesize(&mut self, client: &ClientRecord) -> EngineResult<BureauProfileRecord>;
}

/// Deterministic stand-in for the XDS consumer-credit enquiry.
pub struct MockXdsBureau {
    master_seed: u64,
}

impl MockXdsBureau {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }
}

impl BureauSource for MockXdsBureau {
    fn synthesize(&mut self, client: &ClientRecord) -> EngineResult<BureauProfileRecord> {
        let mut rng = EnrichmentRng::for_client(self.master_seed, &client.id);

        let presage_score = rng.next_i64_in(PRESAGE_SCORE_MIN, PRESAGE_SCORE_MAX);
        let nlr_score = rng.next_i64_in(PRESAGE_SCORE_MIN, PRESAGE_SCORE_MAX);
        let marital_status = (*rng.pick(MARITAL_STATUSES)).to_string();
        let gender = (*rng.pick(GENDERS)).to_string();
        let employment_status = rng
            .chance(EMPLOYED_PROBABILITY)
            .then(|| "Employed".to_string());

        let raw_payload = serde_json::to_string(&serde_json::json!({
            "source": "XDS",
            "id_number": client.id_number,
            "mock": true,
        }))?;

        Ok(BureauProfileRecord {
            user_id: client.id.clone(),
            bureau: "XDS".into(),
            enquiry_reason: "Credit assessment".into(),
            enquiry_date: chrono::Utc::now().to_rfc3339(),
            enquiry_type: "Consumer Credit Enquiry".into(),
            marital_status,
            gender,
            employment_status,
            fraud_id_verified: Some(true),
            fraud_deceased_status: "Not Deceased".into(),
            fraud_found_on_database: false,
            presage_score,
            nlr_score,
            risk_band: RiskBand::from_score(presage_score).as_str().to_string(),
            raw_payload,
        })
    }
}

/// Resolves a client's bureau profile: existing row wins, otherwise
/// synthesize once, persist, and return the persisted record.
pub struct BureauResolver {
    source: Box<dyn BureauSource>,
}

impl BureauResolver {
    pub fn new(source: Box<dyn BureauSource>) -> Self {
        Self { source }
    }

    /// At most one insert per client; zero writes when a profile exists.
    pub fn resolve(
        &mut self,
        store: &EngineStore,
        client: &ClientRecord,
    ) -> EngineResult<BureauProfileRecord> {
        if let Some(existing) = store.get_bureau_profile(&client.id)? {
            return Ok(existing);
        }

        let profile = self.source.synthesize(client)?;
        store.insert_bureau_profile(&profile)?;
        log::info!(
            "client={} bureau: profile created (presage={}, band={})",
            client.id,
            profile.presage_score,
            profile.risk_band
        );
        Ok(profile)
    }
}
