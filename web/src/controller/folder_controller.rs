//! Controller for folder CRUD operations.

use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::folder::{CreateParams, RenameParams};
use crate::{AppState, Error};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::folder as FolderApi;
use domain::folders;
use domain::folders::Model as FolderModel;
use domain::Id;
use log::*;

/// GET /folders
#[utoipa::path(
    get,
    path = "/folders",
    responses(
        (status = 200, description = "Folders retrieved", body = Vec<folders::Model>),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET folders for owner: {}", user.id);

    let folders: Vec<FolderModel> =
        FolderApi::find_by_owner(app_state.db_conn_ref(), user.id).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), folders)))
}

/// POST /folders
#[utoipa::path(
    post,
    path = "/folders",
    request_body = CreateParams,
    responses(
        (status = 201, description = "Folder created", body = folders::Model),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST folders for owner: {}", user.id);

    let folder = FolderApi::create(app_state.db_conn_ref(), user.id, params.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), folder)),
    ))
}

/// PUT /folders/{id}
#[utoipa::path(
    put,
    path = "/folders/{id}",
    params(
        ("id" = Id, Path, description = "Folder id"),
    ),
    request_body = RenameParams,
    responses(
        (status = 200, description = "Folder renamed", body = folders::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Folder not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn rename(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<RenameParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT folder: {id}");

    let folder = FolderApi::rename(app_state.db_conn_ref(), user.id, id, params.name).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), folder)))
}

/// DELETE /folders/{id}
#[utoipa::path(
    delete,
    path = "/folders/{id}",
    params(
        ("id" = Id, Path, description = "Folder id"),
    ),
    responses(
        (status = 204, description = "Folder deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Folder not found"),
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
    info!("DELETE folder: {id}");

    FolderApi::delete(app_state.db_conn_ref(), user.id, id).await?;
    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
