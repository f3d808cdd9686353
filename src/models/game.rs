use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::attempt::{DailyAttempt, LanguageState};
use super::Language;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitGuessRequest {
    pub language: Language,
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 200))]
    pub guess: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitGuessResponse {
    pub correct: bool,
    pub language: LanguageState,
    pub global: LanguageState,
    pub primary_streak: u32,
}

#[derive(Debug, Deserialize)]
pub struct RevealHintRequest {
    pub language: Language,
}

#[derive(Debug, Serialize)]
pub struct RevealHintResponse {
    pub hint: String,
    pub hints_revealed: u32,
    pub hints_total: u32,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct LanguageStatusResponse {
    pub can_play: bool,
    pub daily_limit_reached: bool,
    pub completed_today: bool,
    pub completed_language: Option<Language>,
    pub streak: u32,
    /// Hints disclosed so far for today's puzzle (prefix of the full list).
    pub hints: Vec<String>,
    pub hints_total: u32,
    pub history: BTreeMap<String, DailyAttempt>,
}

#[derive(Debug, Serialize)]
pub struct GlobalStatusResponse {
    pub streak: u32,
    pub last_played_date: Option<NaiveDate>,
    pub history: BTreeMap<String, DailyAttempt>,
}
