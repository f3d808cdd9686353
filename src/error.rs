use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

use crate::models::{DailyAttempt, Language};

/// Why a guess submission was turned away without touching the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    AlreadyCompleted,
    GuessPaceExceeded,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::AlreadyCompleted => write!(f, "puzzle already solved today"),
            RejectReason::GuessPaceExceeded => write!(f, "one guess per revealed hint"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no puzzle scheduled for {language} on {date}")]
    PuzzleNotFound {
        language: Language,
        date: NaiveDate,
    },

    #[error("daily puzzle already completed")]
    DailyLimitReached {
        completed_language: Option<Language>,
    },

    #[error("guess not accepted: {reason}")]
    GuessNotAccepted {
        reason: RejectReason,
        attempt: DailyAttempt,
    },

    #[error("next hint not available before another guess")]
    HintNotAvailable { attempt: DailyAttempt },

    #[error("another submission for this user is in progress")]
    ConcurrencyConflict,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            GameError::PuzzleNotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": message, "daily_limit_reached": false })),
            )
                .into_response(),
            GameError::DailyLimitReached { completed_language } => (
                StatusCode::CONFLICT,
                Json(json!({
                    "message": message,
                    "daily_limit_reached": true,
                    "completed_language": completed_language,
                })),
            )
                .into_response(),
            GameError::GuessNotAccepted { reason, attempt } => (
                StatusCode::CONFLICT,
                Json(json!({
                    "message": message,
                    "daily_limit_reached": false,
                    "already_completed": reason == RejectReason::AlreadyCompleted,
                    "attempt": attempt,
                })),
            )
                .into_response(),
            GameError::HintNotAvailable { attempt } => (
                StatusCode::CONFLICT,
                Json(json!({
                    "message": message,
                    "daily_limit_reached": false,
                    "attempt": attempt,
                })),
            )
                .into_response(),
            GameError::ConcurrencyConflict => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "message": message, "retryable": true })),
            )
                .into_response(),
            GameError::InvalidInput(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": message })),
            )
                .into_response(),
            GameError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}
