//! Bureau resolver tests: cache-forever reads, single insert, and the
//! unavailable-source failure path.

use nerve_core::bureau::{
    BureauProfileRecord, BureauResolver, BureauSource, MockXdsBureau, PRESAGE_SCORE_MAX,
    PRESAGE_SCORE_MIN,
};
use nerve_core::client::ClientRecord;
use nerve_core::error::{EngineError, EngineResult};
use nerve_core::store::EngineStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ── Test helpers ────────────────────────────────────────────────────────────

fn store() -> EngineStore {
    let store = EngineStore::in_memory().unwrap();
    store.migrate().unwrap();
    store
}

fn client(id: &str) -> ClientRecord {
    ClientRecord {
        id: id.to_string(),
        first_name: "Naledi".into(),
        surname: "Mokoena".into(),
        id_number: "9001015800081".into(),
        date_of_birth: Some("1990-01-01".into()),
        phone: Some("+27115550101".into()),
        email: None,
        primary_interest: Some("1".into()),
        owns_car: false,
        owns_home: false,
    }
}

/// Counts synthesize calls so tests can assert "zero writes on re-resolve".
struct CountingSource {
    inner: MockXdsBureau,
    calls: Arc<AtomicUsize>,
}

impl BureauSource for CountingSource {
    fn synthesize(&mut self, client: &ClientRecord) -> EngineResult<BureauProfileRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.synthesize(client)
    }
}

/// A bureau that is always down.
struct FailingSource;

impl BureauSource for FailingSource {
    fn synthesize(&mut self, _client: &ClientRecord) -> EngineResult<BureauProfileRecord> {
        Err(EngineError::BureauUnavailable {
            reason: "XDS enquiry timed out".into(),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// First resolve synthesizes, persists, and returns a well-formed profile.
#[test]
fn first_resolve_synthesizes_and_persists() {
    let store = store();
    let c = client("client-0001");
    store.insert_client(&c).unwrap();

    let mut resolver = BureauResolver::new(Box::new(MockXdsBureau::new(42)));
    let profile = resolver.resolve(&store, &c).unwrap();

    assert_eq!(profile.user_id, "client-0001");
    assert_eq!(profile.bureau, "XDS");
    assert!(
        (PRESAGE_SCORE_MIN..=PRESAGE_SCORE_MAX).contains(&profile.presage_score),
        "score {} outside the mock range",
        profile.presage_score
    );
    assert_eq!(profile.fraud_id_verified, Some(true));
    assert_eq!(store.bureau_profile_count().unwrap(), 1);
}

/// A second resolve performs zero synthesis calls and zero writes, and
/// returns the stored record byte-for-byte.
#[test]
fn existing_profile_is_returned_unchanged() {
    let store = store();
    let c = client("client-0002");
    store.insert_client(&c).unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let mut resolver = BureauResolver::new(Box::new(CountingSource {
        inner: MockXdsBureau::new(42),
        calls: calls.clone(),
    }));

    let first = resolver.resolve(&store, &c).unwrap();
    let second = resolver.resolve(&store, &c).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1, "synthesize must run once");
    assert_eq!(first, second, "cached profile must be returned unchanged");
    assert_eq!(store.bureau_profile_count().unwrap(), 1);
}

/// The same master seed synthesizes the same profile for the same client,
/// independent of which store it lands in.
#[test]
fn synthesis_is_deterministic_for_seed() {
    let store_a = store();
    let store_b = store();
    let c = client("client-0003");
    store_a.insert_client(&c).unwrap();
    store_b.insert_client(&c).unwrap();

    let mut resolver_a = BureauResolver::new(Box::new(MockXdsBureau::new(99)));
    let mut resolver_b = BureauResolver::new(Box::new(MockXdsBureau::new(99)));

    let a = resolver_a.resolve(&store_a, &c).unwrap();
    let b = resolver_b.resolve(&store_b, &c).unwrap();

    assert_eq!(a.presage_score, b.presage_score);
    assert_eq!(a.nlr_score, b.nlr_score);
    assert_eq!(a.marital_status, b.marital_status);
    assert_eq!(a.gender, b.gender);
    assert_eq!(a.employment_status, b.employment_status);
    assert_eq!(a.risk_band, b.risk_band);
}

/// A down bureau surfaces BureauUnavailable and leaves nothing behind.
#[test]
fn failing_source_maps_to_bureau_unavailable() {
    let store = store();
    let c = client("client-0004");
    store.insert_client(&c).unwrap();

    let mut resolver = BureauResolver::new(Box::new(FailingSource));
    let err = resolver.resolve(&store, &c).unwrap_err();

    assert!(
        matches!(err, EngineError::BureauUnavailable { .. }),
        "unexpected error: {err}"
    );
    assert!(!err.is_client_error(), "bureau outages are retryable");
    assert_eq!(store.bureau_profile_count().unwrap(), 0);
}
