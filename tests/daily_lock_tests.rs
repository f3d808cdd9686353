mod common;

use common::{day, five_hint_puzzle};
use modle_api::error::{GameError, RejectReason};
use modle_api::models::{Language, PlayerRecord};
use modle_api::services::game_service::{apply_hint_request, apply_submission};

#[test]
fn only_one_language_can_complete_per_day() {
    let english = five_hint_puzzle(Language::English, "2024-05-01", "Bahubali");
    let hindi = five_hint_puzzle(Language::Hindi, "2024-05-01", "Dangal");
    let telugu = five_hint_puzzle(Language::Telugu, "2024-05-01", "Pushpa");
    let mut record = PlayerRecord::new("lock-user");
    let today = day("2024-05-01");

    assert!(apply_submission(&mut record, &english, today, "Bahubali").unwrap());

    for p in [&hindi, &telugu] {
        let res = apply_submission(&mut record, p, today, "anything");
        match res {
            Err(GameError::DailyLimitReached { completed_language }) => {
                assert_eq!(completed_language, Some(Language::English));
            }
            other => panic!("expected DailyLimitReached, got ok={}", other.is_ok()),
        }
        assert!(record.language(p.language).is_none());
    }

    assert_eq!(record.global.streak, 1);
    assert!(record.global.attempt_on(today).unwrap().correct);
}

#[test]
fn warmup_in_one_language_cannot_finish_in_another() {
    let english = five_hint_puzzle(Language::English, "2024-05-01", "Bahubali");
    let hindi = five_hint_puzzle(Language::Hindi, "2024-05-01", "Dangal");
    let mut record = PlayerRecord::new("warmup-user");
    let today = day("2024-05-01");

    // Start Hindi without finishing it
    assert!(!apply_submission(&mut record, &hindi, today, "SULTAN").unwrap());

    // Win English; the day is now consumed
    assert!(apply_submission(&mut record, &english, today, "Bahubali").unwrap());

    // The in-progress Hindi attempt is locked out, not just fresh ones
    let res = apply_submission(&mut record, &hindi, today, "Dangal");
    assert!(matches!(res, Err(GameError::DailyLimitReached { .. })));
    assert!(matches!(
        apply_hint_request(&mut record, &hindi, today),
        Err(GameError::DailyLimitReached { .. })
    ));

    // Its ledger kept exactly the one pre-lock guess
    let hindi_attempt = record
        .language(Language::Hindi)
        .unwrap()
        .attempt_on(today)
        .unwrap();
    assert_eq!(hindi_attempt.guesses, vec!["SULTAN"]);
    assert!(!hindi_attempt.correct);
}

#[test]
fn winning_resubmission_is_idempotent() {
    let p = five_hint_puzzle(Language::Kannada, "2024-05-01", "Kantara");
    let mut record = PlayerRecord::new("retry-user");
    let today = day("2024-05-01");

    assert!(apply_submission(&mut record, &p, today, "Kantara").unwrap());
    let terminal = record
        .language(Language::Kannada)
        .unwrap()
        .attempt_on(today)
        .unwrap()
        .clone();
    assert_eq!(record.global.streak, 1);

    // A client retrying on timeout resends the identical winning guess
    for _ in 0..3 {
        let res = apply_submission(&mut record, &p, today, "Kantara");
        match res {
            Err(GameError::GuessNotAccepted { reason, attempt }) => {
                assert_eq!(reason, RejectReason::AlreadyCompleted);
                assert_eq!(attempt, terminal);
            }
            other => panic!("expected GuessNotAccepted, got ok={}", other.is_ok()),
        }
    }

    // The streak incremented exactly once
    assert_eq!(record.global.streak, 1);
    assert_eq!(record.language(Language::Kannada).unwrap().streak, 1);
}

#[test]
fn next_day_unlocks_every_language_again() {
    let english = five_hint_puzzle(Language::English, "2024-05-01", "Bahubali");
    let hindi_next = five_hint_puzzle(Language::Hindi, "2024-05-02", "Dangal");
    let mut record = PlayerRecord::new("unlock-user");

    assert!(apply_submission(&mut record, &english, day("2024-05-01"), "Bahubali").unwrap());
    assert!(record.locked_out(Language::Hindi, day("2024-05-01")));

    // Yesterday's marker does not bleed into today
    assert!(!record.locked_out(Language::Hindi, day("2024-05-02")));
    assert!(apply_submission(&mut record, &hindi_next, day("2024-05-02"), "Dangal").unwrap());
    assert_eq!(record.global.streak, 2);
}
