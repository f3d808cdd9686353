#![allow(dead_code)]

use chrono::NaiveDate;
use modle_api::models::{Language, PuzzleDefinition};

pub fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub fn puzzle(language: Language, date: &str, answer: &str, hints: &[&str]) -> PuzzleDefinition {
    let date = day(date);
    PuzzleDefinition {
        id: PuzzleDefinition::storage_key(language, date),
        language,
        date,
        answer: answer.to_string(),
        hints: hints.iter().map(|h| h.to_string()).collect(),
    }
}

/// The usual production shape: five ordered hints.
pub fn five_hint_puzzle(language: Language, date: &str, answer: &str) -> PuzzleDefinition {
    puzzle(
        language,
        date,
        answer,
        &[
            "Released in the 2010s",
            "A period epic",
            "Directed by a famous director",
            "Two-part saga",
            "Features a waterfall climb",
        ],
    )
}
