//! Controller for meeting CRUD, search, and organization operations.

use crate::controller::{llm_api_key_header, ApiResponse};
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::meeting::{
    FavoriteParams, FolderAssignmentParams, IndexParams, SearchParams, UpdateActionItemsParams,
    UpdateMetadataParams,
};
use crate::response::meeting::MeetingResponse;
use crate::{AppState, Error};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use domain::action_items::ActionItem;
use domain::meeting as MeetingApi;
use domain::meeting::{MetadataUpdate, NewMeeting};
use domain::Id;
use log::*;

/// GET /meetings
///
/// List the authenticated owner's meetings, newest first.
#[utoipa::path(
    get,
    path = "/meetings",
    params(IndexParams),
    responses(
        (status = 200, description = "Meetings retrieved", body = Vec<MeetingResponse>),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET meetings for owner: {}", user.id);

    let meetings = MeetingApi::find_by_owner(
        app_state.db_conn_ref(),
        user.id,
        params.folder_id,
        params.favorites_only,
    )
    .await?;

    let responses: Vec<MeetingResponse> = meetings.into_iter().map(MeetingResponse::from).collect();
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), responses)))
}

/// GET /meetings/search
///
/// Naive substring search over title, summary, and transcript.
#[utoipa::path(
    get,
    path = "/meetings/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching meetings retrieved", body = Vec<MeetingResponse>),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn search(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET meetings search for owner: {}", user.id);

    let meetings =
        MeetingApi::search_by_owner(app_state.db_conn_ref(), user.id, &params.q).await?;

    let responses: Vec<MeetingResponse> = meetings.into_iter().map(MeetingResponse::from).collect();
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), responses)))
}

/// GET /meetings/{id}
#[utoipa::path(
    get,
    path = "/meetings/{id}",
    params(
        ("id" = Id, Path, description = "Meeting id"),
    ),
    responses(
        (status = 200, description = "Meeting retrieved", body = MeetingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Meeting not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET meeting: {id}");

    let meeting = MeetingApi::find_by_id_for_owner(app_state.db_conn_ref(), user.id, id).await?;
    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        MeetingResponse::from(meeting),
    )))
}

/// POST /meetings/with-audio
///
/// Create a meeting from an uploaded audio file. Transcription, summary, and
/// action-item extraction are attempted with whatever credential is
/// available; AI unavailability degrades the record instead of failing the
/// upload.
#[utoipa::path(
    post,
    path = "/meetings/with-audio",
    request_body(content = String, content_type = "multipart/form-data", description = "Fields: title (required), folder_id, start_time, end_time, calendar_event_id, audio (required file)"),
    responses(
        (status = 201, description = "Meeting created", body = MeetingResponse),
        (status = 400, description = "Missing title or audio"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    info!("POST meetings/with-audio for owner: {}", user.id);

    let api_key = llm_api_key_header(&headers);

    let mut title: Option<String> = None;
    let mut folder_id: Option<Id> = None;
    let mut start_time: Option<String> = None;
    let mut end_time: Option<String> = None;
    let mut calendar_event_id: Option<String> = None;
    let mut audio: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| malformed_upload())?
    {
        match field.name().unwrap_or_default() {
            "title" => title = Some(field.text().await.map_err(|_| malformed_upload())?),
            "folder_id" => {
                let text = field.text().await.map_err(|_| malformed_upload())?;
                let text = text.trim();
                if !text.is_empty() {
                    folder_id = Some(text.parse().map_err(|_| {
                        domain::error::Error::bad_request("folder_id is not a valid id")
                    })?);
                }
            }
            "start_time" => start_time = Some(field.text().await.map_err(|_| malformed_upload())?),
            "end_time" => end_time = Some(field.text().await.map_err(|_| malformed_upload())?),
            "calendar_event_id" => {
                calendar_event_id = Some(field.text().await.map_err(|_| malformed_upload())?)
            }
            "audio" => {
                audio = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|_| malformed_upload())?
                        .to_vec(),
                )
            }
            _ => {}
        }
    }

    let title = title
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| domain::error::Error::bad_request("A meeting title is required"))?;
    let audio = audio
        .ok_or_else(|| domain::error::Error::bad_request("An audio file is required"))?;

    let meeting = MeetingApi::create_with_audio(
        app_state.db_conn_ref(),
        &app_state.config,
        user.id,
        NewMeeting {
            title,
            folder_id,
            start_time,
            end_time,
            calendar_event_id,
        },
        api_key.as_deref(),
        audio,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            StatusCode::CREATED.into(),
            MeetingResponse::from(meeting),
        )),
    ))
}

fn malformed_upload() -> Error {
    domain::error::Error::bad_request("Malformed multipart upload").into()
}

/// PATCH /meetings/{id}/metadata
#[utoipa::path(
    patch,
    path = "/meetings/{id}/metadata",
    params(
        ("id" = Id, Path, description = "Meeting id"),
    ),
    request_body = UpdateMetadataParams,
    responses(
        (status = 200, description = "Meeting updated", body = MeetingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Meeting not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_metadata(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<UpdateMetadataParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PATCH meeting metadata: {id}");

    let meeting = MeetingApi::update_metadata(
        app_state.db_conn_ref(),
        user.id,
        id,
        MetadataUpdate {
            title: params.title,
            start_time: params.start_time,
            end_time: params.end_time,
            calendar_event_id: params.calendar_event_id,
        },
    )
    .await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        MeetingResponse::from(meeting),
    )))
}

/// PUT /meetings/{id}/favorite
#[utoipa::path(
    put,
    path = "/meetings/{id}/favorite",
    params(
        ("id" = Id, Path, description = "Meeting id"),
    ),
    request_body = FavoriteParams,
    responses(
        (status = 200, description = "Favorite flag updated", body = MeetingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Meeting not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_favorite(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<FavoriteParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT meeting favorite: {id}");

    let meeting =
        MeetingApi::set_favorite(app_state.db_conn_ref(), user.id, id, params.favorite).await?;
    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        MeetingResponse::from(meeting),
    )))
}

/// PUT /meetings/{id}/folder
///
/// Move a meeting into a folder, or out of any folder with a null folder_id.
#[utoipa::path(
    put,
    path = "/meetings/{id}/folder",
    params(
        ("id" = Id, Path, description = "Meeting id"),
    ),
    request_body = FolderAssignmentParams,
    responses(
        (status = 200, description = "Meeting moved", body = MeetingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Meeting or folder not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn assign_folder(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<FolderAssignmentParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT meeting folder: {id}");

    let meeting =
        MeetingApi::assign_folder(app_state.db_conn_ref(), user.id, id, params.folder_id).await?;
    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        MeetingResponse::from(meeting),
    )))
}

/// PUT /meetings/{id}/action-items
///
/// Replace the meeting's action items with the client-supplied list. Items
/// without a usable task are dropped; missing statuses default to "open".
#[utoipa::path(
    put,
    path = "/meetings/{id}/action-items",
    params(
        ("id" = Id, Path, description = "Meeting id"),
    ),
    request_body = UpdateActionItemsParams,
    responses(
        (status = 200, description = "Action items replaced", body = MeetingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Meeting not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_action_items(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<UpdateActionItemsParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT meeting action items: {id}");

    let items: Vec<ActionItem> = params
        .action_items
        .into_iter()
        .filter_map(|item| {
            ActionItem::new(&item.task, item.owner, item.due_date, item.status.as_deref())
        })
        .collect();

    let meeting =
        MeetingApi::replace_action_items(app_state.db_conn_ref(), user.id, id, items).await?;
    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        MeetingResponse::from(meeting),
    )))
}

/// DELETE /meetings/{id}
///
/// Delete a meeting along with its stored audio file.
#[utoipa::path(
    delete,
    path = "/meetings/{id}",
    params(
        ("id" = Id, Path, description = "Meeting id"),
    ),
    responses(
        (status = 204, description = "Meeting deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Meeting not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    info!("DELETE meeting: {id}");

    MeetingApi::delete(app_state.db_conn_ref(), &app_state.config, user.id, id).await?;
    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
