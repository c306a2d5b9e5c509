//! Disclosure Rate Limiting
//!
//! Two independent limiters share one keyed-quota contract:
//!
//! - hint disclosure: at most 5 allowed requests per (requester, day)
//!   within a 24-hour window, so the answer space cannot be narrowed by
//!   brute-force hint pulls;
//! - submission attempts: 1 per 60 seconds per key (binary
//!   fresh/cooldown, no gradual count).
//!
//! Windows are sliding-reset: anchored at the first request after expiry,
//! not at a calendar boundary. The store sits behind a trait so a
//! distributed cache can replace the in-process map without changing the
//! contract (lazy create, sliding reset, exclusive increment).

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::core::epoch::DayIndex;
use crate::protocol::commitment::PlayerAddress;
use crate::MS_PER_DAY;

/// Maximum allowed hint requests per key per window.
pub const MAX_HINTS: u32 = 5;

/// Hint window length in milliseconds (24 hours).
pub const HINT_WINDOW_MS: u64 = MS_PER_DAY;

/// Submission cooldown in milliseconds (1 per minute per key).
pub const SUBMIT_WINDOW_MS: u64 = 60_000;

/// Outcome of one limiter check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateDecision {
    /// Whether this request may proceed.
    pub allowed: bool,
    /// Allowed requests left in the current window.
    pub remaining: u32,
    /// Unix-epoch ms at which the window resets; retry horizon on denial.
    pub reset_at_ms: u64,
}

/// Keyed quota store: lazy-create, sliding reset, exclusive increment.
///
/// `check_and_consume` must be atomic per key: two concurrent requests for
/// the same key must never both observe `count < max` and both succeed
/// when only one slot remains.
pub trait QuotaStore: Send + Sync {
    /// Consume one slot for `key` if available.
    ///
    /// - no entry, or `now > reset_at`: reset to count=1, window anchored
    ///   at `now`, allowed with `max - 1` remaining;
    /// - `count >= max`: denied, remaining 0, state unchanged (a denied
    ///   call does not consume a slot);
    /// - else: increment, allowed with `max - count` remaining.
    fn check_and_consume(&self, key: &str, now_ms: u64, max: u32, window_ms: u64) -> RateDecision;
}

#[derive(Clone, Copy, Debug)]
struct QuotaEntry {
    count: u32,
    reset_at_ms: u64,
}

/// In-process quota store.
///
/// One mutex over the whole map keeps read-modify-write atomic per key;
/// limiter calls are short and uncontended enough that finer locking has
/// not been needed.
#[derive(Default)]
pub struct MemoryQuotaStore {
    entries: Mutex<HashMap<String, QuotaEntry>>,
}

impl MemoryQuotaStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuotaStore for MemoryQuotaStore {
    fn check_and_consume(&self, key: &str, now_ms: u64, max: u32, window_ms: u64) -> RateDecision {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get_mut(key) {
            None => {
                let reset_at_ms = now_ms + window_ms;
                entries.insert(key.to_string(), QuotaEntry { count: 1, reset_at_ms });
                RateDecision {
                    allowed: true,
                    remaining: max.saturating_sub(1),
                    reset_at_ms,
                }
            }
            Some(entry) if now_ms > entry.reset_at_ms => {
                entry.count = 1;
                entry.reset_at_ms = now_ms + window_ms;
                RateDecision {
                    allowed: true,
                    remaining: max.saturating_sub(1),
                    reset_at_ms: entry.reset_at_ms,
                }
            }
            Some(entry) if entry.count >= max => RateDecision {
                allowed: false,
                remaining: 0,
                reset_at_ms: entry.reset_at_ms,
            },
            Some(entry) => {
                entry.count += 1;
                RateDecision {
                    allowed: true,
                    remaining: max - entry.count,
                    reset_at_ms: entry.reset_at_ms,
                }
            }
        }
    }
}

/// Hint disclosure limiter: 5 per (requester, day) per 24h.
pub struct HintLimiter<S: QuotaStore = MemoryQuotaStore> {
    store: S,
}

impl HintLimiter<MemoryQuotaStore> {
    /// Limiter backed by an in-process store.
    pub fn new() -> Self {
        Self {
            store: MemoryQuotaStore::new(),
        }
    }
}

impl Default for HintLimiter<MemoryQuotaStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: QuotaStore> HintLimiter<S> {
    /// Limiter backed by a caller-supplied store.
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Consume one hint slot for `key` if available.
    pub fn check_and_consume(&self, key: &str, now_ms: u64) -> RateDecision {
        self.store
            .check_and_consume(key, now_ms, MAX_HINTS, HINT_WINDOW_MS)
    }
}

/// Submission attempt limiter: 1 per key per 60 seconds.
pub struct SubmitLimiter<S: QuotaStore = MemoryQuotaStore> {
    store: S,
}

impl SubmitLimiter<MemoryQuotaStore> {
    /// Limiter backed by an in-process store.
    pub fn new() -> Self {
        Self {
            store: MemoryQuotaStore::new(),
        }
    }
}

impl Default for SubmitLimiter<MemoryQuotaStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: QuotaStore> SubmitLimiter<S> {
    /// Limiter backed by a caller-supplied store.
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Whether a submission by `key` may proceed right now.
    pub fn check_and_consume(&self, key: &str, now_ms: u64) -> RateDecision {
        self.store
            .check_and_consume(key, now_ms, 1, SUBMIT_WINDOW_MS)
    }
}

/// Derive the limiter key for a request.
///
/// Wallet-keyed when the wallet is known, otherwise keyed by the request's
/// origin network address so anonymous clients cannot brute-force hints by
/// omitting the wallet. SHA-256-compressed so origin strings of any shape
/// produce uniform keys; this derivation is local bookkeeping and never
/// touches the ledger.
pub fn requester_key(wallet: Option<&PlayerAddress>, origin: &str, day: DayIndex) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"cipher-trail-hint:");
    match wallet {
        Some(address) => hasher.update(address.as_bytes()),
        None => hasher.update(origin.as_bytes()),
    }
    hasher.update(day.value().to_be_bytes());
    hex::encode(&hasher.finalize()[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_limiter_six_call_sequence() {
        let limiter = HintLimiter::new();
        let now = 1_000_000;

        let expected_allowed = [true, true, true, true, true, false];
        let expected_remaining = [4, 3, 2, 1, 0, 0];
        for i in 0..6 {
            let decision = limiter.check_and_consume("k", now + i);
            assert_eq!(decision.allowed, expected_allowed[i as usize], "call {i}");
            assert_eq!(decision.remaining, expected_remaining[i as usize], "call {i}");
        }
    }

    #[test]
    fn test_denied_call_does_not_consume() {
        let limiter = HintLimiter::new();
        let now = 0;
        for _ in 0..5 {
            limiter.check_and_consume("k", now);
        }
        // Ten denied calls later the state is unchanged
        for _ in 0..10 {
            let decision = limiter.check_and_consume("k", now + 1);
            assert!(!decision.allowed);
            assert_eq!(decision.remaining, 0);
        }
    }

    #[test]
    fn test_window_expiry_resets_quota() {
        let limiter = HintLimiter::new();
        let start = 1_000;
        for _ in 0..6 {
            limiter.check_and_consume("k", start);
        }
        let after = start + HINT_WINDOW_MS + 1;
        let decision = limiter.check_and_consume("k", after);
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 4);
        // New window is anchored at the reset request, not the calendar
        assert_eq!(decision.reset_at_ms, after + HINT_WINDOW_MS);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = HintLimiter::new();
        for _ in 0..5 {
            limiter.check_and_consume("a", 0);
        }
        assert!(!limiter.check_and_consume("a", 1).allowed);
        assert!(limiter.check_and_consume("b", 1).allowed);
    }

    #[test]
    fn test_submit_limiter_is_binary_cooldown() {
        let limiter = SubmitLimiter::new();
        let first = limiter.check_and_consume("k", 0);
        assert!(first.allowed);
        assert_eq!(first.remaining, 0);

        assert!(!limiter.check_and_consume("k", 30_000).allowed);
        assert!(!limiter.check_and_consume("k", SUBMIT_WINDOW_MS).allowed);
        assert!(limiter.check_and_consume("k", SUBMIT_WINDOW_MS + 1).allowed);
    }

    #[test]
    fn test_requester_key_prefers_wallet() {
        let wallet = PlayerAddress::new([9u8; 20]);
        let day = DayIndex(100);
        let by_wallet = requester_key(Some(&wallet), "10.0.0.1", day);
        let same_wallet_other_ip = requester_key(Some(&wallet), "10.0.0.2", day);
        assert_eq!(by_wallet, same_wallet_other_ip);

        let anon_a = requester_key(None, "10.0.0.1", day);
        let anon_b = requester_key(None, "10.0.0.2", day);
        assert_ne!(anon_a, anon_b);
        assert_ne!(by_wallet, anon_a);
    }

    #[test]
    fn test_requester_key_scoped_by_day() {
        let wallet = PlayerAddress::new([9u8; 20]);
        assert_ne!(
            requester_key(Some(&wallet), "", DayIndex(100)),
            requester_key(Some(&wallet), "", DayIndex(101))
        );
    }

    #[test]
    fn test_concurrent_consumes_never_oversubscribe() {
        use std::sync::Arc;
        let limiter = Arc::new(HintLimiter::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let limiter = Arc::clone(&limiter);
            handles.push(std::thread::spawn(move || {
                let mut allowed = 0u32;
                for _ in 0..4 {
                    if limiter.check_and_consume("shared", 0).allowed {
                        allowed += 1;
                    }
                }
                allowed
            }));
        }
        let total: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, MAX_HINTS);
    }
}
