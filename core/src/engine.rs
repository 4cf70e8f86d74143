//! The recommendation engine — composition root for the decision pipeline.
//!
//! Data flow:
//!   bureau resolver → eligibility filter / insurance scorer
//!                   → ranking & selection → merged persistence
//!
//! Two drivers call in: the request path (process_client, one client at a
//! time) and the background processor (enrich_and_generate per client).
//!
//! RULES:
//!   - generate_all never triggers enrichment; a client without a bureau
//!     profile is skipped. The two driver entry points resolve first.
//!   - Eligibility is re-derived from the current catalog and bureau state
//!     on every run; nothing about eligibility is cached.
//!   - A category with zero eligible products leaves its stored slot
//!     untouched (merge, never clobber).

use crate::{
    bureau::{BureauProfileRecord, BureauResolver, BureauSource, MockXdsBureau},
    client::ClientRecord,
    config::EngineConfig,
    eligibility::{self, ProductRecord},
    error::{EngineError, EngineResult},
    insurance::{self, InsuranceProductRecord},
    interest::ProductOption,
    ranking,
    recommendation::{CategorySlot, RecommendationRecord},
    store::EngineStore,
};
use serde::Serialize;

pub struct RecommendationEngine {
    store: EngineStore,
    resolver: BureauResolver,
}

/// What the primary-interest path hands back for one product: the name and
/// the raw benefit list, not the stored reason text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub product_name: String,
    pub benefits: Vec<String>,
}

/// Outcome of the primary-interest path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InterestOutcome {
    /// The bureau explicitly failed identity verification. Nothing was
    /// persisted; there is no next-best for a blocked application.
    Blocked,
    Recommended {
        best: Option<ProductSummary>,
        next_best: Option<ProductSummary>,
    },
}

/// The four stored fields for one option, returned verbatim — no
/// recomputation on the lookup path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecommendation {
    pub best_product: Option<String>,
    pub best_reason: Option<String>,
    pub next_best_product: Option<String>,
    pub next_best_reason: Option<String>,
}

/// Response shape of the request-driven path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessSummary {
    pub client_id: String,
    pub first_name: String,
    pub surname: String,
    pub primary_interest: String,
    pub recommendation: Option<StoredRecommendation>,
}

impl RecommendationEngine {
    pub fn new(store: EngineStore, source: Box<dyn BureauSource>) -> Self {
        Self {
            store,
            resolver: BureauResolver::new(source),
        }
    }

    /// Fully wired engine with the mock XDS bureau source.
    pub fn build(store: EngineStore, master_seed: u64) -> Self {
        Self::new(store, Box::new(MockXdsBureau::new(master_seed)))
    }

    /// In-memory engine with the default test catalog seeded.
    pub fn build_test(master_seed: u64) -> EngineResult<Self> {
        let store = EngineStore::in_memory()?;
        store.migrate()?;
        EngineConfig::default_test().seed_catalog(&store)?;
        Ok(Self::build(store, master_seed))
    }

    pub fn store(&self) -> &EngineStore {
        &self.store
    }

    /// Background-path entry: enrich if needed, then refresh everything.
    pub fn enrich_and_generate(&mut self, client: &ClientRecord) -> EngineResult<()> {
        self.resolver.resolve(&self.store, client)?;
        self.generate_all(client)
    }

    /// Recompute every category for a client that already has a bureau
    /// profile. No profile → no-op; this path never triggers enrichment.
    pub fn generate_all(&mut self, client: &ClientRecord) -> EngineResult<()> {
        let Some(profile) = self.store.get_bureau_profile(&client.id)? else {
            log::debug!("client={} recommend: no bureau profile, skipping", client.id);
            return Ok(());
        };

        let mut record = match self.store.get_recommendation(&client.id)? {
            Some(existing) => existing,
            None => RecommendationRecord::new_for_client(&client.id),
        };
        record.enrichment_complete = true;

        for option in ProductOption::CATALOG {
            let products = self.store.products_for_option(option)?;
            let eligible = eligibility::filter_eligible(products, &profile);
            if eligible.is_empty() {
                continue;
            }
            let ranked = ranking::rank(eligible, option);
            let (best, next) = ranking::select(&ranked);
            *record.slot_mut(option) = full_profile_slot(best, next);
        }

        let products = self.store.active_insurance_products()?;
        let categories = self.store.insurance_category_names()?;
        let scored = insurance::score_insurance(products, &categories, client);
        if let Some((_, best)) = scored.first() {
            let next = scored.get(1).map(|(_, p)| p);
            *record.slot_mut(ProductOption::Insurance) = insurance_slot(best, next);
        }

        self.store.upsert_recommendation(&record)?;
        log::info!("client={} recommend: all categories refreshed", client.id);
        Ok(())
    }

    /// Primary-interest path: enrich if needed, check the fraud verdict,
    /// recommend for the one declared category, persist that slot only.
    pub fn recommend_for_interest(
        &mut self,
        client: &ClientRecord,
    ) -> EngineResult<InterestOutcome> {
        let raw = client.primary_interest.clone().unwrap_or_default();
        let option = ProductOption::parse(&raw)
            .ok_or(EngineError::UnmappedInterest { raw })?;

        let profile = self.resolver.resolve(&self.store, client)?;

        if profile.fraud_id_verified == Some(false) {
            log::warn!(
                "client={} recommend: identity verification failed, application blocked",
                client.id
            );
            return Ok(InterestOutcome::Blocked);
        }

        let (slot, best, next_best) = match option {
            ProductOption::Insurance => self.interest_insurance(client)?,
            _ => self.interest_catalog(option, &profile)?,
        };

        if best.is_some() {
            self.save_option_slot(&client.id, option, slot)?;
            log::info!(
                "client={} recommend: {} slot refreshed",
                client.id,
                option.label()
            );
        }

        Ok(InterestOutcome::Recommended { best, next_best })
    }

    /// Read the stored fields for the client's declared interest, verbatim.
    /// None when the interest is unmapped or nothing is stored.
    pub fn lookup_stored(
        &self,
        client: &ClientRecord,
    ) -> EngineResult<Option<StoredRecommendation>> {
        let raw = client.primary_interest.as_deref().unwrap_or_default();
        let Some(option) = ProductOption::parse(raw) else {
            return Ok(None);
        };
        let Some(record) = self.store.get_recommendation(&client.id)? else {
            return Ok(None);
        };

        let slot = record.slot(option);
        Ok(Some(StoredRecommendation {
            best_product: slot.best_name.clone(),
            best_reason: slot.best_reason.clone(),
            next_best_product: slot.next_name.clone(),
            next_best_reason: slot.next_reason.clone(),
        }))
    }

    /// Request-driven path: fetch → validate → enrich → refresh → lookup.
    pub fn process_client(&mut self, client_id: &str) -> EngineResult<ProcessSummary> {
        let client = self
            .store
            .get_client(client_id)?
            .ok_or_else(|| EngineError::ClientNotFound {
                id: client_id.to_string(),
            })?;

        let missing = client.missing_required_fields();
        if !missing.is_empty() {
            return Err(EngineError::MissingFields {
                id: client.id.clone(),
                fields: missing,
            });
        }

        self.resolver.resolve(&self.store, &client)?;
        self.generate_all(&client)?;
        let recommendation = self.lookup_stored(&client)?;

        Ok(ProcessSummary {
            client_id: client.id.clone(),
            first_name: client.first_name.clone(),
            surname: client.surname.clone(),
            primary_interest: client.primary_interest.clone().unwrap_or_default(),
            recommendation,
        })
    }

    fn interest_catalog(
        &self,
        option: ProductOption,
        profile: &BureauProfileRecord,
    ) -> EngineResult<(CategorySlot, Option<ProductSummary>, Option<ProductSummary>)> {
        let products = self.store.products_for_option(option)?;
        let eligible = eligibility::filter_eligible(products, profile);
        let ranked = ranking::rank(eligible, option);
        let (best, next) = ranking::select(&ranked);

        let slot = CategorySlot {
            best_name: best.map(|p| p.product_name.clone()),
            best_reason: best.map(|p| interest_reason(&p.benefits)),
            next_name: next.map(|p| p.product_name.clone()),
            next_reason: next.map(|p| interest_reason(&p.benefits)),
        };
        Ok((slot, best.map(summarize), next.map(summarize)))
    }

    fn interest_insurance(
        &self,
        client: &ClientRecord,
    ) -> EngineResult<(CategorySlot, Option<ProductSummary>, Option<ProductSummary>)> {
        let products = self.store.active_insurance_products()?;
        let categories = self.store.insurance_category_names()?;
        let scored = insurance::score_insurance(products, &categories, client);
        let best = scored.first().map(|(_, p)| p);
        let next = scored.get(1).map(|(_, p)| p);

        let slot = CategorySlot {
            best_name: best.map(|p| p.name.clone()),
            best_reason: best.and_then(|p| p.description.clone()),
            next_name: next.map(|p| p.name.clone()),
            next_reason: next.and_then(|p| p.description.clone()),
        };
        Ok((
            slot,
            best.map(summarize_insurance),
            next.map(summarize_insurance),
        ))
    }

    /// Single-category persistence: partial update when a row exists,
    /// deterministic-id insert otherwise.
    fn save_option_slot(
        &self,
        client_id: &str,
        option: ProductOption,
        slot: CategorySlot,
    ) -> EngineResult<()> {
        if self.store.get_recommendation(client_id)?.is_some() {
            let now = chrono::Utc::now().to_rfc3339();
            self.store
                .update_category_slot(client_id, option, &slot, &now)?;
        } else {
            let record = RecommendationRecord::new_for_option(client_id, option, slot);
            self.store.insert_recommendation(&record)?;
        }
        Ok(())
    }
}

/// Slot fields on the full-profile pass: first two benefits, no fallback.
fn full_profile_slot(
    best: Option<&ProductRecord>,
    next: Option<&ProductRecord>,
) -> CategorySlot {
    let reason =
        |p: &ProductRecord| ranking::benefit_reason(&p.benefits, ranking::FULL_PROFILE_BENEFIT_LIMIT);
    CategorySlot {
        best_name: best.map(|p| p.product_name.clone()),
        best_reason: best.map(reason),
        next_name: next.map(|p| p.product_name.clone()),
        next_reason: next.map(reason),
    }
}

fn insurance_slot(
    best: &InsuranceProductRecord,
    next: Option<&InsuranceProductRecord>,
) -> CategorySlot {
    CategorySlot {
        best_name: Some(best.name.clone()),
        best_reason: best.description.clone(),
        next_name: next.map(|p| p.name.clone()),
        next_reason: next.and_then(|p| p.description.clone()),
    }
}

/// Reason on the primary-interest pass: first three benefits, with a
/// fallback line for products that list none.
fn interest_reason(benefits: &[String]) -> String {
    let reason = ranking::benefit_reason(benefits, ranking::INTEREST_BENEFIT_LIMIT);
    if reason.is_empty() {
        ranking::INTEREST_REASON_FALLBACK.to_string()
    } else {
        reason
    }
}

fn summarize(product: &ProductRecord) -> ProductSummary {
    ProductSummary {
        product_name: product.product_name.clone(),
        benefits: product.benefits.clone(),
    }
}

fn summarize_insurance(product: &InsuranceProductRecord) -> ProductSummary {
    ProductSummary {
        product_name: product.name.clone(),
        benefits: product.description.clone().into_iter().collect(),
    }
}
