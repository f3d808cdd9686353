use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::date::day_key;

/// Languages with a daily puzzle. The wire format uses the capitalized
/// English name; the reserved value "global" is handled at the handler
/// layer and never appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    English,
    Hindi,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::Hindi,
        Language::Tamil,
        Language::Telugu,
        Language::Kannada,
        Language::Malayalam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Kannada => "Kannada",
            Language::Malayalam => "Malayalam",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .iter()
            .copied()
            .find(|l| l.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unsupported language: {}", s))
    }
}

/// One day's puzzle for one language. Immutable once published: the same
/// (language, date) pair always resolves to the same answer and hints, so
/// finished attempts stay meaningful when reviewed later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleDefinition {
    #[serde(rename = "_id")]
    pub id: String,
    pub language: Language,
    pub date: NaiveDate,
    pub answer: String,
    pub hints: Vec<String>,
}

impl PuzzleDefinition {
    pub fn storage_key(language: Language, date: NaiveDate) -> String {
        format!("{}:{}", language, day_key(date))
    }

    pub fn max_hints(&self) -> u32 {
        self.hints.len() as u32
    }
}

pub mod attempt;
pub mod game;

pub use attempt::{DailyAttempt, LanguageState, PlayerRecord};
