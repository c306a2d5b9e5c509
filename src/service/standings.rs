//! Leaderboard Endpoint
//!
//! Aggregates decoded ledger events into capped standings. Single
//! undecodable events were already dropped and logged by the reader;
//! transport failures propagate so callers can retry with backoff instead
//! of rendering an empty board as if nobody had solved anything.

use tracing::info;

use crate::game::leaderboard::{rank, Standing};
use crate::ledger::reader::{LedgerError, LedgerReader};

/// Fetch and rank standings over a ledger block range, capped at `top_n`.
pub async fn fetch_standings<R: LedgerReader>(
    reader: &R,
    from_block: u64,
    to_block: u64,
    top_n: usize,
) -> Result<Vec<Standing>, LedgerError> {
    let events = reader.fetch_solve_events(from_block, to_block).await?;
    info!(
        events = events.len(),
        from_block, to_block, "ranking solve history"
    );
    Ok(rank(&events, top_n))
}
