//! Deterministic random number generation for synthetic bureau data.
//!
//! RULE: Nothing in the engine may call a platform RNG.
//! All randomness flows through EnrichmentRng streams derived from the
//! single master seed and the client id, so a given client synthesizes
//! to the same profile no matter when (or how often) enrichment runs.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A deterministic RNG stream for a single client's enrichment.
pub struct EnrichmentRng {
    inner: Pcg64Mcg,
}

impl EnrichmentRng {
    /// Create the stream for one client from the master seed and a stable
    /// hash of the client id.
    pub fn for_client(master_seed: u64, client_id: &str) -> Self {
        let derived = master_seed ^ fnv1a(client_id).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an integer in [lo, hi], both ends inclusive.
    pub fn next_i64_in(&mut self, lo: i64, hi: i64) -> i64 {
        debug_assert!(lo <= hi);
        lo + self.next_u64_below((hi - lo + 1) as u64) as i64
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick one element from a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.next_u64_below(items.len() as u64) as usize]
    }
}

/// FNV-1a over the client id. Stability matters here: changing this hash
/// changes every synthesized profile.
fn fnv1a(s: &str) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for b in s.as_bytes() {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}
