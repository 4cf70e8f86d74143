//! Background processor tests: sequential passes, fault isolation, and
//! idempotent re-runs.

use nerve_core::bureau::{BureauProfileRecord, BureauSource, MockXdsBureau};
use nerve_core::client::ClientRecord;
use nerve_core::config::EngineConfig;
use nerve_core::engine::RecommendationEngine;
use nerve_core::error::{EngineError, EngineResult};
use nerve_core::processor::AutoProcessor;
use nerve_core::store::EngineStore;

// ── Test helpers ────────────────────────────────────────────────────────────

fn client(id: &str, interest: Option<&str>) -> ClientRecord {
    ClientRecord {
        id: id.to_string(),
        first_name: "Sipho".into(),
        surname: "Dlamini".into(),
        id_number: "7804125800083".into(),
        date_of_birth: None,
        phone: None,
        email: None,
        primary_interest: interest.map(str::to_string),
        owns_car: false,
        owns_home: false,
    }
}

fn processor_with_source(source: Box<dyn BureauSource>) -> AutoProcessor {
    let store = EngineStore::in_memory().unwrap();
    store.migrate().unwrap();
    EngineConfig::default_test().seed_catalog(&store).unwrap();
    AutoProcessor::new(RecommendationEngine::new(store, source))
}

/// A bureau that refuses exactly one client and serves everyone else.
struct PickyBureau {
    refuse_id: String,
    inner: MockXdsBureau,
}

impl BureauSource for PickyBureau {
    fn synthesize(&mut self, client: &ClientRecord) -> EngineResult<BureauProfileRecord> {
        if client.id == self.refuse_id {
            return Err(EngineError::BureauUnavailable {
                reason: "XDS enquiry timed out".into(),
            });
        }
        self.inner.synthesize(client)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// A pass enriches and recommends every client with a declared interest,
/// and skips clients without one.
#[test]
fn pass_processes_only_clients_with_interest() {
    let mut processor = processor_with_source(Box::new(MockXdsBureau::new(42)));
    {
        let store = processor.engine().store();
        store.insert_client(&client("client-1", Some("1"))).unwrap();
        store.insert_client(&client("client-2", Some("FNB Loan"))).unwrap();
        store.insert_client(&client("client-3", None)).unwrap();
    }

    let outcome = processor.run_pass();

    assert_eq!(outcome.processed, 2);
    assert_eq!(outcome.failed, 0);
    let store = processor.engine().store();
    assert_eq!(store.bureau_profile_count().unwrap(), 2);
    assert_eq!(store.recommendation_count().unwrap(), 2);
    assert!(store.get_recommendation("client-3").unwrap().is_none());
}

/// One client's bureau outage must not abort the pass: everyone else is
/// still processed.
#[test]
fn failing_client_does_not_abort_pass() {
    let mut processor = processor_with_source(Box::new(PickyBureau {
        refuse_id: "client-2".into(),
        inner: MockXdsBureau::new(42),
    }));
    {
        let store = processor.engine().store();
        store.insert_client(&client("client-1", Some("1"))).unwrap();
        store.insert_client(&client("client-2", Some("2"))).unwrap();
        store.insert_client(&client("client-3", Some("4"))).unwrap();
    }

    let outcome = processor.run_pass();

    assert_eq!(outcome.processed, 2);
    assert_eq!(outcome.failed, 1);
    let store = processor.engine().store();
    assert!(store.get_recommendation("client-1").unwrap().is_some());
    assert!(store.get_recommendation("client-2").unwrap().is_none());
    assert!(store.get_recommendation("client-3").unwrap().is_some());
}

/// Passes are idempotent: a second run re-derives the same rows and
/// synthesizes no new profiles (cache-forever).
#[test]
fn repeat_passes_converge() {
    let mut processor = processor_with_source(Box::new(MockXdsBureau::new(7)));
    {
        let store = processor.engine().store();
        store.insert_client(&client("client-1", Some("1"))).unwrap();
        store.insert_client(&client("client-2", Some("3"))).unwrap();
    }

    let first = processor.run_pass();
    let rec_before = processor
        .engine()
        .store()
        .get_recommendation("client-1")
        .unwrap()
        .unwrap();

    let second = processor.run_pass();
    let rec_after = processor
        .engine()
        .store()
        .get_recommendation("client-1")
        .unwrap()
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(rec_before, rec_after);
    assert_eq!(processor.engine().store().bureau_profile_count().unwrap(), 2);
}
