use anyhow::Context;
use mongodb::Database;
use redis::aio::ConnectionManager;

use crate::error::GameError;
use crate::models::attempt::PlayerRecord;
use crate::models::game::{GlobalStatusResponse, LanguageStatusResponse};
use crate::models::Language;
use crate::services::puzzle_service::PuzzleService;
use crate::utils::date::{day_key, today_utc};
use crate::utils::retry::{retry_with_policy, RetryPolicy};

/// Read-only projection used by the client before committing a guess. It
/// reads the same persisted state the game service writes, so a "can play"
/// answer here is never contradicted by a doomed submission later.
pub struct StatusService {
    mongo: Database,
    redis: ConnectionManager,
}

impl StatusService {
    pub fn new(mongo: Database, redis: ConnectionManager) -> Self {
        Self { mongo, redis }
    }

    pub async fn get_status(
        &self,
        user_id: &str,
        language: Language,
    ) -> Result<LanguageStatusResponse, GameError> {
        let today = today_utc();
        let record = self.load_player(user_id).await?;

        let state = record.language(language).cloned().unwrap_or_default();
        let completed_today = state.won_on(today);
        let daily_limit_reached =
            record.global.history.contains_key(&day_key(today)) && !completed_today;
        let can_play = !daily_limit_reached && !completed_today;

        // Revealed hint prefix for today's puzzle. Before the first guess
        // the opening hint is already visible; a missing puzzle just means
        // nothing to show, not an error for the status page.
        let puzzles = PuzzleService::new(self.mongo.clone(), self.redis.clone());
        let (hints, hints_total) = match puzzles.get_puzzle(language, today).await {
            Ok(puzzle) => {
                let revealed = state
                    .attempt_on(today)
                    .map(|a| a.hints_revealed)
                    .unwrap_or(1)
                    .min(puzzle.max_hints()) as usize;
                (puzzle.hints[..revealed].to_vec(), puzzle.max_hints())
            }
            Err(GameError::PuzzleNotFound { .. }) => (Vec::new(), 0),
            Err(e) => return Err(e),
        };

        Ok(LanguageStatusResponse {
            can_play,
            daily_limit_reached,
            completed_today,
            completed_language: record.daily_winner(today),
            streak: state.streak,
            hints,
            hints_total,
            history: state.history,
        })
    }

    pub async fn get_global_status(
        &self,
        user_id: &str,
    ) -> Result<GlobalStatusResponse, GameError> {
        let record = self.load_player(user_id).await?;

        Ok(GlobalStatusResponse {
            streak: record.global.streak,
            last_played_date: record.global.last_played_date,
            history: record.global.history,
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
}
