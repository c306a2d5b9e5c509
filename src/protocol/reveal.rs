//! Reveal Pre-Check
//!
//! Recomputes the commitment locally before a reveal is submitted. The
//! ledger performs the authoritative check; this exists so the most common
//! real-world failure (a lost or mistyped salt) is reported to the user as
//! exactly that, instead of a generic transaction revert.

use thiserror::Error;

use crate::core::epoch::DayIndex;
use crate::protocol::commitment::{encode_commitment, Commitment, PlayerAddress, Salt};

/// Reveal pre-check errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevealError {
    /// Locally recomputed commitment disagrees with the stored one.
    #[error("answer or salt does not match your commitment")]
    CommitmentMismatch {
        /// What the ledger has stored.
        stored: Commitment,
        /// What (answer, salt, player, day) hash to now.
        computed: Commitment,
    },
}

/// Verify that (answer, salt, player, day) still hash to the stored
/// commitment.
///
/// The ledger re-derives the same digest on-chain; passing here does not
/// guarantee the reveal succeeds (the answer may simply be wrong), but
/// failing here guarantees the reveal would be rejected.
pub fn check_reveal(
    answer: &str,
    salt: &Salt,
    player: &PlayerAddress,
    day: DayIndex,
    stored: &Commitment,
) -> Result<(), RevealError> {
    let computed = encode_commitment(answer, salt, player, day);
    if computed != *stored {
        return Err(RevealError::CommitmentMismatch {
            stored: *stored,
            computed,
        });
    }
    Ok(())
}
