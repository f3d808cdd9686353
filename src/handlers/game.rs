use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::GameError,
    extractors::AppJson,
    middlewares::auth::JwtClaims,
    models::game::{RevealHintRequest, StatusQuery, SubmitGuessRequest},
    models::Language,
    services::{game_service::GameService, status_service::StatusService, AppState},
};

/// Playability check before the client renders the play screen. The
/// reserved language value "global" returns the cross-language aggregate.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    Query(query): Query<StatusQuery>,
) -> Result<Response, GameError> {
    let service = StatusService::new(state.mongo.clone(), state.redis.clone());

    if query.language.eq_ignore_ascii_case("global") {
        let status = service.get_global_status(&claims.sub).await?;
        return Ok((StatusCode::OK, Json(status)).into_response());
    }

    let language: Language = query
        .language
        .parse()
        .map_err(GameError::InvalidInput)?;

    let status = service.get_status(&claims.sub, language).await?;
    Ok((StatusCode::OK, Json(status)).into_response())
}

pub async fn submit_guess(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    AppJson(req): AppJson<SubmitGuessRequest>,
) -> Result<impl IntoResponse, GameError> {
    tracing::info!(
        "Guess submitted: user={}, language={}, date={}",
        claims.sub,
        req.language,
        req.date
    );

    let service = GameService::new(state.mongo.clone(), state.redis.clone());
    let response = service.submit_guess(&claims.sub, &req).await?;

    Ok((StatusCode::OK, Json(response)))
}

pub async fn reveal_hint(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    AppJson(req): AppJson<RevealHintRequest>,
) -> Result<impl IntoResponse, GameError> {
    tracing::info!(
        "Hint requested: user={}, language={}",
        claims.sub,
        req.language
    );

    let service = GameService::new(state.mongo.clone(), state.redis.clone());
    let response = service.reveal_hint(&claims.sub, &req).await?;

    Ok((StatusCode::OK, Json(response)))
}
