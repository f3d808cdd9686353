use anyhow::Context;
use chrono::NaiveDate;
use mongodb::Database;
use redis::aio::ConnectionManager;

use crate::error::GameError;
use crate::metrics::{record_cache_hit, record_cache_miss};
use crate::models::{Language, PuzzleDefinition};
use crate::utils::retry::{retry_with_policy, RetryPolicy};

// Puzzles are immutable once published; the TTL only bounds cache memory.
const PUZZLE_CACHE_TTL: u64 = 3600;

pub struct PuzzleService {
    mongo: Database,
    redis: ConnectionManager,
}

impl PuzzleService {
    pub fn new(mongo: Database, redis: ConnectionManager) -> Self {
        Self { mongo, redis }
    }

    /// Deterministic lookup of the puzzle for a (language, date) pair.
    /// Past dates resolve the same way as today, so finished attempts can
    /// be reviewed against the puzzle they were played on.
    pub async fn get_puzzle(
        &self,
        language: Language,
        date: NaiveDate,
    ) -> Result<PuzzleDefinition, GameError> {
        let key = PuzzleDefinition::storage_key(language, date);

        if let Some(puzzle) = self.get_cached(&key).await {
            record_cache_hit();
            return Ok(puzzle);
        }
        record_cache_miss();

        let collection: mongodb::Collection<PuzzleDefinition> = self.mongo.collection("puzzles");
        let puzzle = retry_with_policy(RetryPolicy::default(), || async {
            collection
                .find_one(mongodb::bson::doc! { "_id": &key })
                .await
        })
        .await
        .context("Failed to query puzzles collection")?
        .ok_or(GameError::PuzzleNotFound { language, date })?;

        if puzzle.hints.is_empty() {
            return Err(GameError::Internal(anyhow::anyhow!(
                "puzzle {} has an empty hint list",
                key
            )));
        }

        if let Err(e) = self.cache_puzzle(&key, &puzzle).await {
            tracing::warn!("Failed to cache puzzle {}: {}", key, e);
        }

        Ok(puzzle)
    }

    async fn get_cached(&self, key: &str) -> Option<PuzzleDefinition> {
        let mut conn = self.redis.clone();
        let cache_key = format!("puzzle:cache:{}", key);

        let raw: Option<String> = redis::cmd("GET")
            .arg(&cache_key)
            .query_async(&mut conn)
            .await
            .ok()?;

        serde_json::from_str(&raw?).ok()
    }

    async fn cache_puzzle(&self, key: &str, puzzle: &PuzzleDefinition) -> anyhow::Result<()> {
        let mut conn = self.redis.clone();
        let cache_key = format!("puzzle:cache:{}", key);
        let json = serde_json::to_string(puzzle)?;

        redis::cmd("SETEX")
            .arg(&cache_key)
            .arg(PUZZLE_CACHE_TTL)
            .arg(json)
            .query_async::<()>(&mut conn)
            .await
            .context("Failed to cache puzzle")?;

        Ok(())
    }
}
