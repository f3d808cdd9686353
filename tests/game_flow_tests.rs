//! Walks a player through several days of play the way the client drives
//! the engine: status-style checks, hint reveals between guesses, wins in
//! different languages, and the streak across gaps.

mod common;

use common::{day, five_hint_puzzle};
use modle_api::error::{GameError, RejectReason};
use modle_api::models::{Language, PlayerRecord};
use modle_api::services::game_service::{apply_hint_request, apply_submission};
use modle_api::utils::date::day_key;

#[test]
fn a_week_in_the_life_of_one_player() {
    let mut record = PlayerRecord::new("scenario-user");

    // Day 1, English: first wrong guess is accepted and earns hint 2
    let english = five_hint_puzzle(Language::English, "2024-05-01", "Bahubali");
    let d1 = day("2024-05-01");

    assert!(!apply_submission(&mut record, &english, d1, "WRONG").unwrap());
    let attempt = record
        .language(Language::English)
        .unwrap()
        .attempt_on(d1)
        .unwrap();
    assert_eq!(attempt.eligible_hints(5), 2);
    assert!(!attempt.correct);

    // Guessing again before the next hint is rendered is refused
    let res = apply_submission(&mut record, &english, d1, "WRONG");
    assert!(matches!(
        res,
        Err(GameError::GuessNotAccepted {
            reason: RejectReason::GuessPaceExceeded,
            ..
        })
    ));

    // Burn through all five hints with wrong guesses...
    for _ in 0..4 {
        apply_hint_request(&mut record, &english, d1).unwrap();
        assert!(!apply_submission(&mut record, &english, d1, "WRONG").unwrap());
    }
    // ...then solve it on the sixth guess
    assert!(apply_submission(&mut record, &english, d1, "BAHUBALI").unwrap());
    assert_eq!(record.global.streak, 1);
    assert!(record.global.history.contains_key(&day_key(d1)));

    // Same day, Hindi: the daily slot is spent
    let hindi = five_hint_puzzle(Language::Hindi, "2024-05-01", "Dangal");
    assert!(matches!(
        apply_submission(&mut record, &hindi, d1, "Dangal"),
        Err(GameError::DailyLimitReached { .. })
    ));

    // Day 2, Tamil win: the unified streak covers all languages
    let tamil = five_hint_puzzle(Language::Tamil, "2024-05-02", "Ponniyin Selvan");
    let d2 = day("2024-05-02");
    assert!(apply_submission(&mut record, &tamil, d2, "ponniyin selvan").unwrap());
    assert_eq!(record.global.streak, 2);
    assert_eq!(record.global.last_played_date, Some(d2));

    // Three idle days, then a win: the streak starts over
    let telugu = five_hint_puzzle(Language::Telugu, "2024-05-06", "Pushpa");
    let d6 = day("2024-05-06");
    assert!(apply_submission(&mut record, &telugu, d6, "PUSHPA").unwrap());
    assert_eq!(record.global.streak, 1);
    assert_eq!(record.global.last_played_date, Some(d6));

    // History review: every day's ledger is still there, untouched
    assert!(record
        .language(Language::English)
        .unwrap()
        .attempt_on(d1)
        .unwrap()
        .correct);
    assert_eq!(record.global.history.len(), 3);
}

#[test]
fn streak_follows_the_consecutive_day_law() {
    let mut record = PlayerRecord::new("streak-user");

    let days_and_streaks = [
        ("2024-05-01", 1u32),
        ("2024-05-02", 2),
        ("2024-05-03", 3),
        ("2024-05-05", 1), // one-day gap resets
        ("2024-05-06", 2),
    ];

    for (date, expected_streak) in days_and_streaks {
        let p = five_hint_puzzle(Language::Malayalam, date, "Drishyam");
        assert!(apply_submission(&mut record, &p, day(date), "Drishyam").unwrap());
        assert_eq!(record.global.streak, expected_streak, "on {}", date);
    }

    // Never decremented by idle time alone; only the next play resets it
    assert_eq!(record.global.streak, 2);
}
