//! Ledger Client Boundary
//!
//! Write-side surface of the external contract. This crate never rolls
//! back in-flight ledger writes; the contract's own transaction semantics
//! own that.

use async_trait::async_trait;

use crate::core::epoch::DayIndex;
use crate::ledger::reader::LedgerError;
use crate::protocol::commitment::{Commitment, PlayerAddress, Salt};

/// Contract functions this core calls, as declared by the ledger ABI.
///
/// Implementations own signing and transport. The commitment passed to
/// [`LedgerClient::commit`] must come from
/// [`crate::protocol::encode_commitment`]; the contract re-derives the same
/// digest at reveal time and rejects on any mismatch.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Store a commitment for (player, day). One per pair; immutable.
    async fn commit(
        &self,
        player: PlayerAddress,
        commitment: Commitment,
        day: DayIndex,
    ) -> Result<(), LedgerError>;

    /// Reveal the answer and salt; on success returns the points the
    /// contract awarded.
    async fn reveal(
        &self,
        player: PlayerAddress,
        answer: &str,
        salt: &Salt,
        day: DayIndex,
    ) -> Result<u64, LedgerError>;

    /// Whether (player, day) has a stored commitment.
    async fn has_committed(&self, player: PlayerAddress, day: DayIndex)
        -> Result<bool, LedgerError>;

    /// Whether (player, day) has a recorded solve.
    async fn has_solved(&self, player: PlayerAddress, day: DayIndex) -> Result<bool, LedgerError>;
}
