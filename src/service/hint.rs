//! Hint Endpoint
//!
//! Rate-limited hint disclosure. The limiter runs before the store is
//! touched, so a denied requester learns nothing — not even whether a
//! puzzle exists for the day.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::epoch::DayIndex;
use crate::game::puzzle::PuzzleStore;
use crate::limit::{requester_key, HintLimiter, QuotaStore};
use crate::protocol::commitment::PlayerAddress;
use crate::service::ServiceError;

/// Hint request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HintRequest {
    /// Day the hint is for.
    pub day: u64,
    /// Requesting wallet, when connected.
    pub wallet: Option<PlayerAddress>,
    /// Request-origin network address; the limiter key for anonymous
    /// requests.
    pub origin: String,
    /// Which hint to disclose (0-based).
    pub hint_index: usize,
}

/// Hint response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintResponse {
    /// The disclosed hint, or None when the puzzle has no hints.
    pub hint: Option<String>,
    /// Index actually served (clamped into range), -1 when none.
    pub hint_index: i32,
    /// Hint-quota slots left for this requester and day.
    pub remaining: u32,
}

/// Serve one hint request: validate, rate-limit, disclose.
///
/// The requested index is clamped into the puzzle's hint range rather than
/// rejected, matching the endpoint contract.
pub async fn serve_hint<S: PuzzleStore, Q: QuotaStore>(
    request: &HintRequest,
    store: &S,
    limiter: &HintLimiter<Q>,
    now_ms: u64,
) -> Result<HintResponse, ServiceError> {
    let day = DayIndex(request.day);
    if day > DayIndex::from_unix_ms(now_ms) {
        return Err(ServiceError::Validation("day is in the future".to_string()));
    }

    let key = requester_key(request.wallet.as_ref(), &request.origin, day);
    let decision = limiter.check_and_consume(&key, now_ms);
    if !decision.allowed {
        debug!(day = request.day, "hint request rate limited");
        return Err(ServiceError::RateLimited {
            retry_at_ms: decision.reset_at_ms,
        });
    }

    let puzzle = store
        .get(day)
        .await?
        .ok_or(ServiceError::PuzzleNotFound { day: request.day })?;

    if puzzle.hints.is_empty() {
        return Ok(HintResponse {
            hint: None,
            hint_index: -1,
            remaining: decision.remaining,
        });
    }

    let index = request.hint_index.min(puzzle.hints.len() - 1);
    Ok(HintResponse {
        hint: Some(puzzle.hints[index].clone()),
        hint_index: index as i32,
        remaining: decision.remaining,
    })
}
