//! Controller for on-demand AI operations on a single meeting.
//!
//! Unlike ingestion, these explicit requests surface AI failures to the
//! caller: a missing credential is a 400, an upstream fault a 502.

use crate::controller::{llm_api_key_header, ApiResponse};
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::meeting::SmartSummaryParams;
use crate::response::assistant::SmartSummaryResponse;
use crate::response::meeting::MeetingResponse;
use crate::{AppState, Error};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use domain::meeting as MeetingApi;
use domain::smart_summary as SmartSummaryApi;
use domain::Id;
use log::*;

/// POST /meetings/{id}/extract_action_items
///
/// Re-extract action items from the meeting's stored transcript and persist
/// the result. Requires a transcript to exist.
#[utoipa::path(
    post,
    path = "/meetings/{id}/extract_action_items",
    params(
        ("id" = Id, Path, description = "Meeting id"),
    ),
    responses(
        (status = 200, description = "Action items re-extracted", body = MeetingResponse),
        (status = 400, description = "No transcript or no usable API credential"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Meeting not found"),
        (status = 502, description = "AI backend failure"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn extract_action_items(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Error> {
    info!("POST extract_action_items for meeting: {id}");

    let api_key = llm_api_key_header(&headers);

    let meeting = MeetingApi::reextract_action_items(
        app_state.db_conn_ref(),
        &app_state.config,
        user.id,
        id,
        api_key.as_deref(),
    )
    .await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        MeetingResponse::from(meeting),
    )))
}

/// POST /meetings/{id}/smart-summary
///
/// Generate an alternate summary view (executive, detailed, decisions,
/// persona) for a meeting that already has content.
#[utoipa::path(
    post,
    path = "/meetings/{id}/smart-summary",
    params(
        ("id" = Id, Path, description = "Meeting id"),
    ),
    request_body = SmartSummaryParams,
    responses(
        (status = 200, description = "Summary generated", body = SmartSummaryResponse),
        (status = 400, description = "Meeting has neither transcript nor summary, or no usable API credential"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Meeting not found"),
        (status = 502, description = "AI backend failure"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn smart_summary(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    headers: HeaderMap,
    Json(params): Json<SmartSummaryParams>,
) -> Result<impl IntoResponse, Error> {
    info!("POST smart-summary for meeting: {id} (mode: {})", params.mode);

    let api_key = llm_api_key_header(&headers);

    let summary = SmartSummaryApi::for_meeting(
        app_state.db_conn_ref(),
        &app_state.config,
        user.id,
        id,
        &params.mode,
        params.persona_name.as_deref(),
        api_key.as_deref(),
    )
    .await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        SmartSummaryResponse { summary },
    )))
}
