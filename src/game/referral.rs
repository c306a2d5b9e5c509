//! Referral Ledger
//!
//! Off-ledger bookkeeping of inviter/invitee relationships. A player's
//! referral code is the first 8 hex characters of their address; a new
//! player registering with a code credits the referrer with a fixed bonus.
//!
//! All mutation happens inside one lock section, so partial application
//! (edge created but counters not updated) is never observable. Prefix
//! codes can collide across a large player base; an ambiguous code is
//! surfaced as [`ReferralOutcome::ReferrerAmbiguous`] rather than silently
//! resolved to the first match.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

use crate::protocol::commitment::PlayerAddress;

/// Bonus points credited to a referrer per successful referral.
pub const REFERRAL_BONUS_POINTS: u64 = 50;

/// Length of a referral code in hex characters.
pub const REFERRAL_CODE_LEN: usize = 8;

/// Outcome of a referral registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferralOutcome {
    /// New player created and referrer credited.
    Registered {
        /// The resolved referrer.
        referrer: PlayerAddress,
    },
    /// New player created; the code matched no known player.
    RegisteredWithoutReferrer,
    /// The player already had a record; nothing changed.
    AlreadyRegistered,
    /// The code prefix matched more than one stored player; nothing
    /// changed. Needs a product decision, not a silent pick.
    ReferrerAmbiguous {
        /// Number of players the prefix matched.
        matches: usize,
    },
}

/// A player's referral statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralStats {
    /// Code to share: first 8 hex characters of the address.
    pub code: String,
    /// Players referred.
    pub referral_count: u64,
    /// Accrued bonus points.
    pub bonus_points: u64,
}

#[derive(Clone, Debug, Default)]
struct PlayerRecord {
    referral_count: u64,
    bonus_points: u64,
    referred_by: Option<PlayerAddress>,
}

/// In-memory referral store.
pub struct ReferralLedger {
    // BTreeMap gives natural-order iteration for deterministic prefix scans
    players: Mutex<BTreeMap<PlayerAddress, PlayerRecord>>,
}

impl Default for ReferralLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferralLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            players: Mutex::new(BTreeMap::new()),
        }
    }

    /// Register `new_player`, crediting the referrer the code resolves to.
    ///
    /// Idempotent against re-registration: an existing record returns
    /// [`ReferralOutcome::AlreadyRegistered`] with no mutation. Player
    /// creation, edge creation, and counter increments happen atomically
    /// under the store lock.
    pub fn register(&self, new_player: PlayerAddress, referrer_code: &str) -> ReferralOutcome {
        let code = referrer_code.trim().to_lowercase();
        let code = code.strip_prefix("0x").unwrap_or(&code);

        let mut players = self.players.lock().unwrap_or_else(|e| e.into_inner());

        if players.contains_key(&new_player) {
            return ReferralOutcome::AlreadyRegistered;
        }

        // Resolve the code against stored players in natural key order.
        let matches: Vec<PlayerAddress> = players
            .keys()
            .filter(|address| hex::encode(address.0).starts_with(code))
            .copied()
            .collect();

        match matches.len() {
            0 => {
                players.insert(new_player, PlayerRecord::default());
                debug!(player = %new_player, "registered without referrer");
                ReferralOutcome::RegisteredWithoutReferrer
            }
            1 => {
                let referrer = matches[0];
                players.insert(
                    new_player,
                    PlayerRecord {
                        referred_by: Some(referrer),
                        ..Default::default()
                    },
                );
                if let Some(record) = players.get_mut(&referrer) {
                    record.referral_count += 1;
                    record.bonus_points += REFERRAL_BONUS_POINTS;
                }
                debug!(player = %new_player, referrer = %referrer, "registered with referrer");
                ReferralOutcome::Registered { referrer }
            }
            n => ReferralOutcome::ReferrerAmbiguous { matches: n },
        }
    }

    /// A player's referral stats, creating the record on first access so a
    /// brand-new wallet can share its code immediately.
    pub fn stats(&self, player: PlayerAddress) -> ReferralStats {
        let mut players = self.players.lock().unwrap_or_else(|e| e.into_inner());
        let record = players.entry(player).or_default();
        ReferralStats {
            code: player.referral_code(),
            referral_count: record.referral_count,
            bonus_points: record.bonus_points,
        }
    }

    /// Who referred `player`, if anyone.
    pub fn referred_by(&self, player: &PlayerAddress) -> Option<PlayerAddress> {
        let players = self.players.lock().unwrap_or_else(|e| e.into_inner());
        players.get(player).and_then(|r| r.referred_by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(bytes: [u8; 20]) -> PlayerAddress {
        PlayerAddress::new(bytes)
    }

    fn tagged(tag: u8) -> PlayerAddress {
        let mut bytes = [0u8; 20];
        bytes[0] = tag;
        bytes[19] = tag;
        address(bytes)
    }

    #[test]
    fn test_register_with_known_referrer() {
        let ledger = ReferralLedger::new();
        let referrer = tagged(0xaa);
        ledger.stats(referrer); // creates the referrer's record

        let outcome = ledger.register(tagged(0xbb), &referrer.referral_code());
        assert_eq!(outcome, ReferralOutcome::Registered { referrer });

        let stats = ledger.stats(referrer);
        assert_eq!(stats.referral_count, 1);
        assert_eq!(stats.bonus_points, REFERRAL_BONUS_POINTS);
        assert_eq!(ledger.referred_by(&tagged(0xbb)), Some(referrer));
    }

    #[test]
    fn test_double_registration_is_idempotent() {
        let ledger = ReferralLedger::new();
        let referrer = tagged(0xaa);
        ledger.stats(referrer);

        ledger.register(tagged(0xbb), &referrer.referral_code());
        let before = ledger.stats(referrer);

        let outcome = ledger.register(tagged(0xbb), &referrer.referral_code());
        assert_eq!(outcome, ReferralOutcome::AlreadyRegistered);
        assert_eq!(ledger.stats(referrer), before);
    }

    #[test]
    fn test_unknown_code_still_registers_player() {
        let ledger = ReferralLedger::new();
        let outcome = ledger.register(tagged(0xbb), "deadbeef");
        assert_eq!(outcome, ReferralOutcome::RegisteredWithoutReferrer);
        // Registered: a second attempt is rejected
        assert_eq!(
            ledger.register(tagged(0xbb), "deadbeef"),
            ReferralOutcome::AlreadyRegistered
        );
    }

    #[test]
    fn test_ambiguous_prefix_is_surfaced_not_guessed() {
        let ledger = ReferralLedger::new();
        // Two players sharing the first 4 bytes, so any 8-char code
        // matching one matches both
        let mut a = [0u8; 20];
        a[..4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let mut b = a;
        b[19] = 1;
        ledger.stats(address(a));
        ledger.stats(address(b));

        let outcome = ledger.register(tagged(0xcc), "deadbeef");
        assert_eq!(outcome, ReferralOutcome::ReferrerAmbiguous { matches: 2 });
        // No mutation: the would-be player can still register later
        assert_eq!(
            ledger.register(tagged(0xcc), "ffffffff"),
            ReferralOutcome::RegisteredWithoutReferrer
        );
    }

    #[test]
    fn test_code_is_case_and_prefix_tolerant() {
        let ledger = ReferralLedger::new();
        let referrer = tagged(0xaa);
        ledger.stats(referrer);
        let code = format!("0x{}", referrer.referral_code().to_uppercase());
        assert_eq!(
            ledger.register(tagged(0xbb), &code),
            ReferralOutcome::Registered { referrer }
        );
    }

    #[test]
    fn test_stats_code_is_address_prefix() {
        let ledger = ReferralLedger::new();
        let player = tagged(0xab);
        let stats = ledger.stats(player);
        assert_eq!(stats.code.len(), REFERRAL_CODE_LEN);
        assert!(hex::encode(player.0).starts_with(&stats.code));
    }
}
