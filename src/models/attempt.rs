use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Language;
use crate::utils::date::{day_key, is_previous_day};

/// One user's ledger against one day's puzzle in one language.
///
/// `guesses` holds normalized guesses in submission order;
/// `guesses_status` is index-aligned with it. Once `correct` is set the
/// attempt is terminal and nothing here changes again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAttempt {
    pub guesses: Vec<String>,
    pub guesses_status: Vec<bool>,
    pub correct: bool,
    pub hints_revealed: u32,
}

impl DailyAttempt {
    pub fn new() -> Self {
        Self {
            guesses: Vec::new(),
            guesses_status: Vec::new(),
            correct: false,
            // the first hint is free
            hints_revealed: 1,
        }
    }

    /// Marker entry written into the global aggregate when a day's slot is
    /// consumed. Its own guess arrays are unused and stay empty.
    pub fn completion_marker() -> Self {
        Self {
            guesses: Vec::new(),
            guesses_status: Vec::new(),
            correct: true,
            hints_revealed: 1,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.correct
    }

    /// Highest hint number the player has earned: one up front, one more
    /// per submitted guess, capped at the puzzle's hint count.
    pub fn eligible_hints(&self, max_hints: u32) -> u32 {
        max_hints.min(self.guesses.len() as u32 + 1)
    }

    /// One guess per revealed hint while hints are still being rationed;
    /// unlimited guesses once every hint is on the table.
    pub fn guess_allowed(&self, max_hints: u32) -> bool {
        !self.is_terminal()
            && (self.hints_revealed >= max_hints
                || (self.guesses.len() as u32) < self.hints_revealed)
    }

    /// The next hint may be disclosed only after the current one has been
    /// paid for with a guess.
    pub fn hint_allowed(&self, max_hints: u32) -> bool {
        !self.is_terminal() && self.hints_revealed < self.eligible_hints(max_hints)
    }

    /// Appends an already-normalized guess. Callers check `guess_allowed`
    /// first; this only records.
    pub fn record_guess(&mut self, guess: String, matched: bool) {
        self.guesses.push(guess);
        self.guesses_status.push(matched);
        if matched {
            self.correct = true;
        }
    }

    /// Advances the revealed-hint marker and returns the new count.
    pub fn reveal_next_hint(&mut self, max_hints: u32) -> u32 {
        self.hints_revealed = (self.hints_revealed + 1).min(max_hints.max(1));
        self.hints_revealed
    }
}

impl Default for DailyAttempt {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-language record for one user. The same shape doubles as the
/// cross-language aggregate, where `history` holds completion markers and
/// `streak` is the unified streak shown to the player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageState {
    pub last_played_date: Option<NaiveDate>,
    pub streak: u32,
    #[serde(default)]
    pub history: BTreeMap<String, DailyAttempt>,
}

impl LanguageState {
    pub fn attempt_on(&self, date: NaiveDate) -> Option<&DailyAttempt> {
        self.history.get(&day_key(date))
    }

    pub fn won_on(&self, date: NaiveDate) -> bool {
        self.attempt_on(date).map(|a| a.correct).unwrap_or(false)
    }

    /// Streak law: +1 when the previous completion was exactly yesterday,
    /// unchanged on a same-day re-entry, reset to 1 after a gap or on the
    /// first completion ever. Elapsed time alone never decrements it.
    pub fn record_completion(&mut self, today: NaiveDate) {
        match self.last_played_date {
            Some(last) if last == today => return,
            Some(last) if is_previous_day(last, today) => self.streak += 1,
            _ => self.streak = 1,
        }
        self.last_played_date = Some(today);
    }
}

/// The whole per-user aggregate, stored as a single document so one
/// replace persists every state transition atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub languages: BTreeMap<String, LanguageState>,
    #[serde(default)]
    pub global: LanguageState,
    pub updated_at: DateTime<Utc>,
}

impl PlayerRecord {
    pub fn new(user_id: &str) -> Self {
        Self {
            id: user_id.to_string(),
            languages: BTreeMap::new(),
            global: LanguageState::default(),
            updated_at: Utc::now(),
        }
    }

    pub fn language(&self, language: Language) -> Option<&LanguageState> {
        self.languages.get(language.as_str())
    }

    pub fn language_mut(&mut self, language: Language) -> &mut LanguageState {
        self.languages
            .entry(language.as_str().to_string())
            .or_default()
    }

    /// Language whose winning attempt consumed today's cross-language slot.
    pub fn daily_winner(&self, today: NaiveDate) -> Option<Language> {
        Language::ALL
            .iter()
            .copied()
            .find(|l| self.language(*l).map(|s| s.won_on(today)).unwrap_or(false))
    }

    /// Cross-language daily lock: true when today's slot is already
    /// consumed and it was not `language` that consumed it.
    pub fn locked_out(&self, language: Language, today: NaiveDate) -> bool {
        self.global.history.contains_key(&day_key(today))
            && !self
                .language(language)
                .map(|s| s.won_on(today))
                .unwrap_or(false)
    }

    /// First win of the day: writes the global marker and advances both
    /// the unified streak and the winning language's own streak.
    /// Re-entrant calls on the same day are no-ops.
    pub fn complete_day(&mut self, language: Language, today: NaiveDate) {
        let key = day_key(today);
        if self.global.history.contains_key(&key) {
            return;
        }
        self.global
            .history
            .insert(key, DailyAttempt::completion_marker());
        self.global.record_completion(today);
        self.language_mut(language).record_completion(today);
    }
}
