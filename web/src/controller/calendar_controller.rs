//! Controller for calendar synchronization and event listing.
//!
//! Calendar failures always propagate: the user explicitly asked for a sync
//! and must know when it failed.

use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::calendar::ListEventsParams;
use crate::params::meeting::CalendarSyncParams;
use crate::response::calendar::CalendarEventResponse;
use crate::response::meeting::MeetingResponse;
use crate::{AppState, Error};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::calendar_sync as CalendarSyncApi;
use domain::calendar_sync::SyncRequest;
use domain::gateway;
use domain::Id;
use log::*;

/// POST /meetings/{id}/sync_calendar
///
/// Create or update the external calendar event for a meeting. When an
/// event id is supplied the meeting's notes snippet is merged into that
/// event's description idempotently; otherwise a new event is created. The
/// resulting event id and time bounds are persisted onto the meeting.
#[utoipa::path(
    post,
    path = "/meetings/{id}/sync_calendar",
    params(
        ("id" = Id, Path, description = "Meeting id"),
    ),
    request_body = CalendarSyncParams,
    responses(
        (status = 200, description = "Meeting synced", body = MeetingResponse),
        (status = 400, description = "Calendar is not connected for this user"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Meeting not found"),
        (status = 502, description = "Calendar backend failure"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn sync_calendar(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<CalendarSyncParams>,
) -> Result<impl IntoResponse, Error> {
    info!("POST sync_calendar for meeting: {id}");

    let client = gateway::calendar_client(&app_state.config, &user)?;

    let meeting = CalendarSyncApi::sync(
        app_state.db_conn_ref(),
        &client,
        user.id,
        id,
        SyncRequest {
            event_id: params.event_id,
            start_time: params.start_time,
            end_time: params.end_time,
        },
    )
    .await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        MeetingResponse::from(meeting),
    )))
}

/// GET /calendar-events
///
/// Read-only listing of upcoming events from the user's primary calendar.
#[utoipa::path(
    get,
    path = "/calendar-events",
    params(ListEventsParams),
    responses(
        (status = 200, description = "Events retrieved", body = Vec<CalendarEventResponse>),
        (status = 400, description = "Calendar is not connected for this user"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Calendar backend failure"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_events(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<ListEventsParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET calendar-events for owner: {}", user.id);

    let events = CalendarSyncApi::list_events(
        &app_state.config,
        &user,
        params.start.as_deref(),
        params.end.as_deref(),
        params.max_results,
    )
    .await?;

    let responses: Vec<CalendarEventResponse> =
        events.into_iter().map(CalendarEventResponse::from).collect();
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), responses)))
}
