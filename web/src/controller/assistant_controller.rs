//! Controller for cross-meeting AI assistant operations: free-text Q&A and
//! topic clustering over the owner's recent meetings.

use crate::controller::{llm_api_key_header, ApiResponse};
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::assistant::QaParams;
use crate::response::assistant::{QaResponse, TopicClustersResponse};
use crate::{AppState, Error};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use domain::qa as QaApi;
use domain::topics as TopicsApi;
use log::*;

/// POST /ai/qa
///
/// Answer a natural-language question from the owner's recent meetings.
#[utoipa::path(
    post,
    path = "/ai/qa",
    request_body = QaParams,
    responses(
        (status = 200, description = "Question answered", body = QaResponse),
        (status = 400, description = "Empty question or no usable API credential"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "AI backend failure"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn qa(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(params): Json<QaParams>,
) -> Result<impl IntoResponse, Error> {
    info!("POST ai/qa for owner: {}", user.id);

    let question = params.question.trim();
    if question.is_empty() {
        return Err(domain::error::Error::bad_request("Question cannot be empty").into());
    }

    let api_key = llm_api_key_header(&headers);

    let answer = QaApi::answer(
        app_state.db_conn_ref(),
        &app_state.config,
        user.id,
        question,
        api_key.as_deref(),
    )
    .await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        QaResponse::from(answer),
    )))
}

/// POST /ai/topics
///
/// Cluster the owner's recent meetings into named topics.
#[utoipa::path(
    post,
    path = "/ai/topics",
    responses(
        (status = 200, description = "Clusters generated", body = TopicClustersResponse),
        (status = 400, description = "No usable API credential"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "AI backend failure"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn topics(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Error> {
    info!("POST ai/topics for owner: {}", user.id);

    let api_key = llm_api_key_header(&headers);

    let clusters = TopicsApi::cluster(
        app_state.db_conn_ref(),
        &app_state.config,
        user.id,
        api_key.as_deref(),
    )
    .await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        TopicClustersResponse { clusters },
    )))
}
