//! CipherTrail Demo
//!
//! Runs one simulated puzzle day end to end against the in-memory ledger:
//! seed, hint requests to exhaustion, commit, reveal, progress folding,
//! standings.

use anyhow::Result;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use cipher_trail::core::hash::answer_digest;
use cipher_trail::game::leaderboard::{tournament_standings, TournamentWindow};
use cipher_trail::game::puzzle::{DifficultyTier, MemoryPuzzleStore, PuzzleRecord, PuzzleStore};
use cipher_trail::game::scoring::points_for_puzzle;
use cipher_trail::ledger::reader::MemoryLedger;
use cipher_trail::game::referral::ReferralLedger;
use cipher_trail::limit::{requester_key, HintLimiter, SubmitLimiter};
use cipher_trail::service::hint::{serve_hint, HintRequest};
use cipher_trail::service::standings::fetch_standings;
use cipher_trail::service::{ServiceConfig, ServiceError};
use cipher_trail::{
    encode_commitment, generate_salt, DayIndex, LedgerClient, LedgerReader, PlayerAddress,
    ProgressTracker, VERSION,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("CipherTrail Core v{}", VERSION);

    let config = ServiceConfig::from_env();
    info!("Contract: {}", config.contract_address);

    let day = DayIndex::today();
    let now_ms = day.start_ms() + 30 * 60 * 1_000; // half an hour into the day
    info!("Day index: {}", day);

    // Seed today's puzzle
    let answer = "hello";
    let store = MemoryPuzzleStore::new();
    let puzzle = PuzzleRecord {
        day,
        title: "Welcome Puzzle".to_string(),
        body: "Decode the message: 8-5-12-12-15. Each number is the position in the alphabet."
            .to_string(),
        hints: vec![
            "A=1, B=2, C=3...".to_string(),
            "The word is a greeting.".to_string(),
        ],
        answer_digest: answer_digest(answer),
        difficulty: DifficultyTier::Easy,
        bonus_multiplier_bps: DifficultyTier::Easy.default_multiplier_bps(),
    };
    store.put(puzzle.clone()).await?;

    let ledger = MemoryLedger::new();
    let preview = points_for_puzzle(&puzzle, day.offset_within_day(now_ms));
    ledger.set_answer(day, answer, preview);
    info!("Seeded \"{}\" (preview points: {})", puzzle.title, preview);

    // A player pulls hints until the limiter steps in
    let player = PlayerAddress::from_hex("0x00000000000000000000000000000000000000a1")?;
    let limiter = HintLimiter::new();
    for attempt in 0..7usize {
        let request = HintRequest {
            day: day.value(),
            wallet: Some(player),
            origin: "203.0.113.7".to_string(),
            hint_index: attempt % 2,
        };
        match serve_hint(&request, &store, &limiter, now_ms).await {
            Ok(response) => info!(
                "Hint {}: {:?} ({} remaining)",
                response.hint_index, response.hint, response.remaining
            ),
            Err(ServiceError::RateLimited { retry_at_ms }) => {
                warn!("Hint request denied; window resets at {}", retry_at_ms);
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    // Commit and reveal, gated by the submission cooldown
    let submit_limiter = SubmitLimiter::new();
    let submit_key = requester_key(Some(&player), "203.0.113.7", day);
    if !submit_limiter.check_and_consume(&submit_key, now_ms).allowed {
        warn!("submission cooldown active");
        return Ok(());
    }

    let salt = generate_salt()?;
    let commitment = encode_commitment(answer, &salt, &player, day);
    info!("Commitment: {}", commitment.to_hex());
    ledger.commit(player, commitment, day).await?;

    let points = ledger.reveal(player, answer, &salt, day).await?;
    info!("Reveal accepted, {} points awarded", points);

    // Fold the resulting events into progress
    let tracker = ProgressTracker::new();
    let events = ledger.fetch_solve_events(0, u64::MAX).await?;
    for event in &events {
        let update = tracker.apply(event, now_ms);
        if update.applied {
            info!(
                "Player {} streak {} badges {:?}",
                event.player, update.progress.streak, update.new_badges
            );
        }
    }

    // A friend joins through the player's referral code
    let referrals = ReferralLedger::new();
    let code = referrals.stats(player).code;
    let friend = PlayerAddress::from_hex("0x00000000000000000000000000000000000000b2")?;
    let outcome = referrals.register(friend, &code);
    info!(
        "Referral outcome: {:?} (referrer now at {} bonus points)",
        outcome,
        referrals.stats(player).bonus_points
    );

    // Standings
    let standings = fetch_standings(&ledger, 0, u64::MAX, config.leaderboard_top_n).await?;
    info!("=== Standings ===");
    for (rank, standing) in standings.iter().enumerate() {
        info!(
            "#{}: {} - {} pts over {} solves",
            rank + 1,
            standing.player,
            standing.points,
            standing.solves
        );
    }

    // The week's tournament, derived from the same event history
    let window = TournamentWindow {
        id: 1,
        start_day: day,
        end_day: DayIndex(day.value() + 6),
    };
    let tournament = tournament_standings(&window, &events, config.leaderboard_top_n);
    info!(
        "Tournament #{} standings: {}",
        tournament.tournament_id,
        serde_json::to_string(&tournament.rows)?
    );

    Ok(())
}
