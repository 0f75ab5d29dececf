use axum::{
    extract::{Json, State},
    response::IntoResponse,
};

use app_api::{
    ConversationObservedRequest, DateRequest, EmptyRequest, EstimateRequest, ResetRequest,
    SessionResetRequest, TurnObservedRequest,
};

use crate::{errors::HttpError, state::HttpState};

pub async fn summary(
    State(state): State<HttpState>,
    Json(req): Json<DateRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::summary(&state.context, req)?;
    Ok(Json(response))
}

pub async fn state(
    State(state): State<HttpState>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::state(&state.context)?;
    Ok(Json(response))
}

pub async fn weekly_total(
    State(state): State<HttpState>,
    Json(req): Json<DateRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::weekly_total(&state.context, req)?;
    Ok(Json(response))
}

pub async fn turn_observed(
    State(state): State<HttpState>,
    Json(req): Json<TurnObservedRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::turn_observed(&state.context, req)?;
    Ok(Json(response))
}

pub async fn conversation_observed(
    State(state): State<HttpState>,
    Json(req): Json<ConversationObservedRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::conversation_observed(&state.context, req)?;
    Ok(Json(response))
}

pub async fn estimate(
    State(state): State<HttpState>,
    Json(req): Json<EstimateRequest>,
) -> impl IntoResponse {
    Json(app_api::estimate(&state.context, req))
}

pub async fn session_reset(
    State(state): State<HttpState>,
    Json(req): Json<SessionResetRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::session_reset(&state.context, req)?;
    Ok(Json(response))
}

pub async fn reset(
    State(state): State<HttpState>,
    Json(req): Json<ResetRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::reset(&state.context, req)?;
    Ok(Json(response))
}

pub async fn not_found() -> HttpError {
    HttpError::not_found()
}
