use anyhow::Context;
use chrono::{NaiveDate, Utc};
use mongodb::Database;
use redis::aio::ConnectionManager;
use std::time::Duration;
use uuid::Uuid;
use validator::Validate;

use crate::error::{GameError, RejectReason};
use crate::metrics::{
    DAILY_LIMIT_REJECTIONS_TOTAL, GUESSES_SUBMITTED_TOTAL, HINTS_REVEALED_TOTAL,
    PUZZLES_SOLVED_TOTAL, USER_LOCK_TIMEOUTS_TOTAL,
};
use crate::models::attempt::{DailyAttempt, PlayerRecord};
use crate::models::game::{
    RevealHintRequest, RevealHintResponse, SubmitGuessRequest, SubmitGuessResponse,
};
use crate::models::PuzzleDefinition;
use crate::services::puzzle_service::PuzzleService;
use crate::utils::date::{day_key, today_utc};
use crate::utils::normalize::normalize_title;
use crate::utils::retry::{retry_with_policy, RetryPolicy};

const LOCK_TTL_MS: u64 = 5_000;
const LOCK_WAIT_MS: u64 = 2_000;
const LOCK_POLL_MS: u64 = 50;

/// Orchestrates a guess or hint request: per-user lock, load, pure
/// decision, single-document persist. Every state transition for a user
/// goes through here; the status service only reads.
pub struct GameService {
    mongo: Database,
    redis: ConnectionManager,
}

impl GameService {
    pub fn new(mongo: Database, redis: ConnectionManager) -> Self {
        Self { mongo, redis }
    }

    pub async fn submit_guess(
        &self,
        user_id: &str,
        req: &SubmitGuessRequest,
    ) -> Result<SubmitGuessResponse, GameError> {
        req.validate()
            .map_err(|e| GameError::InvalidInput(e.to_string()))?;

        // Server clock is authoritative; a stale or forged client date is
        // rejected instead of trusted.
        let today = today_utc();
        if req.date != today {
            return Err(GameError::InvalidInput(format!(
                "date {} is not the current puzzle day {}",
                req.date, today
            )));
        }

        let puzzles = PuzzleService::new(self.mongo.clone(), self.redis.clone());
        let puzzle = puzzles.get_puzzle(req.language, today).await?;

        let token = self.acquire_user_lock(user_id).await?;
        let result = self
            .submit_under_lock(user_id, &puzzle, today, &req.guess)
            .await;
        self.release_user_lock(user_id, &token).await;
        result
    }

    async fn submit_under_lock(
        &self,
        user_id: &str,
        puzzle: &PuzzleDefinition,
        today: NaiveDate,
        raw_guess: &str,
    ) -> Result<SubmitGuessResponse, GameError> {
        let mut record = self.load_player(user_id).await?;

        let applied = apply_submission(&mut record, puzzle, today, raw_guess);
        if matches!(applied, Err(GameError::DailyLimitReached { .. })) {
            DAILY_LIMIT_REJECTIONS_TOTAL.inc();
        }
        let correct = applied?;

        self.save_player(&mut record).await?;

        GUESSES_SUBMITTED_TOTAL
            .with_label_values(&[if correct { "true" } else { "false" }])
            .inc();
        if correct {
            PUZZLES_SOLVED_TOTAL
                .with_label_values(&[puzzle.language.as_str()])
                .inc();
            tracing::info!(
                "Puzzle solved: user={}, language={}, streak={}",
                user_id,
                puzzle.language,
                record.global.streak
            );
        }

        let language_state = record
            .language(puzzle.language)
            .cloned()
            .unwrap_or_default();
        let primary_streak = record.global.streak;

        Ok(SubmitGuessResponse {
            correct,
            language: language_state,
            global: record.global,
            primary_streak,
        })
    }

    pub async fn reveal_hint(
        &self,
        user_id: &str,
        req: &RevealHintRequest,
    ) -> Result<RevealHintResponse, GameError> {
        let today = today_utc();

        let puzzles = PuzzleService::new(self.mongo.clone(), self.redis.clone());
        let puzzle = puzzles.get_puzzle(req.language, today).await?;

        let token = self.acquire_user_lock(user_id).await?;
        let result = self.reveal_under_lock(user_id, &puzzle, today).await;
        self.release_user_lock(user_id, &token).await;
        result
    }

    async fn reveal_under_lock(
        &self,
        user_id: &str,
        puzzle: &PuzzleDefinition,
        today: NaiveDate,
    ) -> Result<RevealHintResponse, GameError> {
        let mut record = self.load_player(user_id).await?;

        let applied = apply_hint_request(&mut record, puzzle, today);
        if matches!(applied, Err(GameError::DailyLimitReached { .. })) {
            DAILY_LIMIT_REJECTIONS_TOTAL.inc();
        }
        let (revealed, hint) = applied?;

        self.save_player(&mut record).await?;

        HINTS_REVEALED_TOTAL
            .with_label_values(&[&revealed.to_string()])
            .inc();
        tracing::debug!(
            "Hint revealed: user={}, language={}, level={}",
            user_id,
            puzzle.language,
            revealed
        );

        Ok(RevealHintResponse {
            hint,
            hints_revealed: revealed,
            hints_total: puzzle.max_hints(),
        })
    }

    async fn load_player(&self, user_id: &str) -> Result<PlayerRecord, GameError> {
        let collection: mongodb::Collection<PlayerRecord> =
            self.mongo.collection("player_states");

        let existing = retry_with_policy(RetryPolicy::default(), || async {
            collection
                .find_one(mongodb::bson::doc! { "_id": user_id })
                .await
        })
        .await
        .context("Failed to load player state")?;

        Ok(existing.unwrap_or_else(|| PlayerRecord::new(user_id)))
    }

    async fn save_player(&self, record: &mut PlayerRecord) -> Result<(), GameError> {
        record.updated_at = Utc::now();
        let record: &PlayerRecord = record;

        let collection: mongodb::Collection<PlayerRecord> =
            self.mongo.collection("player_states");

        retry_with_policy(RetryPolicy::aggressive(), || async {
            collection
                .replace_one(mongodb::bson::doc! { "_id": &record.id }, record)
                .with_options(
                    mongodb::options::ReplaceOptions::builder()
                        .upsert(true)
                        .build(),
                )
                .await
                .map(|_| ())
        })
        .await
        .context("Failed to persist player state")?;

        Ok(())
    }

    /// Per-user mutual exclusion. Two devices racing to submit the winning
    /// guess must serialize here so exactly one observes the open attempt.
    async fn acquire_user_lock(&self, user_id: &str) -> Result<String, GameError> {
        let mut conn = self.redis.clone();
        let key = format!("modle:user_lock:{}", user_id);
        let token = Uuid::new_v4().to_string();
        let deadline = tokio::time::Instant::now() + Duration::from_millis(LOCK_WAIT_MS);

        loop {
            let acquired: Option<String> = redis::cmd("SET")
                .arg(&key)
                .arg(&token)
                .arg("NX")
                .arg("PX")
                .arg(LOCK_TTL_MS)
                .query_async(&mut conn)
                .await
                .context("Failed to acquire user lock")?;

            if acquired.is_some() {
                return Ok(token);
            }

            if tokio::time::Instant::now() >= deadline {
                USER_LOCK_TIMEOUTS_TOTAL.inc();
                tracing::warn!("User lock acquisition timed out for {}", user_id);
                return Err(GameError::ConcurrencyConflict);
            }

            tokio::time::sleep(Duration::from_millis(LOCK_POLL_MS)).await;
        }
    }

    /// Compare-and-delete so a lock that expired and was re-acquired by
    /// another call is never released from here.
    async fn release_user_lock(&self, user_id: &str, token: &str) {
        let lua_script = r#"
            if redis.call('GET', KEYS[1]) == ARGV[1] then
                return redis.call('DEL', KEYS[1])
            end
            return 0
        "#;

        let mut conn = self.redis.clone();
        let key = format!("modle:user_lock:{}", user_id);
        let released: Result<i32, redis::RedisError> = redis::Script::new(lua_script)
            .key(&key)
            .arg(token)
            .invoke_async(&mut conn)
            .await;

        if let Err(e) = released {
            tracing::warn!("Failed to release user lock for {}: {}", user_id, e);
        }
    }
}

/// Pure decision core for a guess submission. Mutates `record` in memory
/// only; the caller persists on `Ok` and drops the record on `Err`, so a
/// rejected guess never reaches storage. Returns whether the guess matched
/// the answer.
pub fn apply_submission(
    record: &mut PlayerRecord,
    puzzle: &PuzzleDefinition,
    today: NaiveDate,
    raw_guess: &str,
) -> Result<bool, GameError> {
    let guess = normalize_title(raw_guess);
    if guess.is_empty() {
        return Err(GameError::InvalidInput(
            "guess is empty after normalization".to_string(),
        ));
    }

    if record.locked_out(puzzle.language, today) {
        return Err(GameError::DailyLimitReached {
            completed_language: record.daily_winner(today),
        });
    }

    let max_hints = puzzle.max_hints();
    let answer = normalize_title(&puzzle.answer);

    let state = record.language_mut(puzzle.language);
    let attempt = state.history.entry(day_key(today)).or_default();

    if attempt.is_terminal() {
        return Err(GameError::GuessNotAccepted {
            reason: RejectReason::AlreadyCompleted,
            attempt: attempt.clone(),
        });
    }
    if !attempt.guess_allowed(max_hints) {
        return Err(GameError::GuessNotAccepted {
            reason: RejectReason::GuessPaceExceeded,
            attempt: attempt.clone(),
        });
    }

    let matched = guess == answer;
    attempt.record_guess(guess, matched);
    if matched {
        record.complete_day(puzzle.language, today);
    }

    Ok(matched)
}

/// Pure decision core for a hint request. Returns the revealed-hint count
/// after the reveal and the hint text itself.
pub fn apply_hint_request(
    record: &mut PlayerRecord,
    puzzle: &PuzzleDefinition,
    today: NaiveDate,
) -> Result<(u32, String), GameError> {
    if record.locked_out(puzzle.language, today) {
        return Err(GameError::DailyLimitReached {
            completed_language: record.daily_winner(today),
        });
    }

    let max_hints = puzzle.max_hints();
    let state = record.language_mut(puzzle.language);
    let key = day_key(today);

    match state.history.get_mut(&key) {
        Some(attempt) => {
            if !attempt.hint_allowed(max_hints) {
                return Err(GameError::HintNotAvailable {
                    attempt: attempt.clone(),
                });
            }
            let revealed = attempt.reveal_next_hint(max_hints);
            Ok((revealed, puzzle.hints[(revealed - 1) as usize].clone()))
        }
        None => {
            // First contact with today's puzzle: the opening hint is free.
            let attempt = DailyAttempt::new();
            let revealed = attempt.hints_revealed;
            state.history.insert(key, attempt);
            Ok((revealed, puzzle.hints[0].clone()))
        }
    }
}
