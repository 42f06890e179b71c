use crate::controller::health_check_controller;
use crate::{params, response, AppState};
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::controller::{
    assistant_controller, calendar_controller, folder_controller, meeting,
    meeting_controller,
};

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "MeetNotes API"
        ),
        paths(
            folder_controller::index,
            folder_controller::create,
            folder_controller::rename,
            folder_controller::delete,
            meeting_controller::index,
            meeting_controller::search,
            meeting_controller::read,
            meeting_controller::create,
            meeting_controller::update_metadata,
            meeting_controller::update_favorite,
            meeting_controller::assign_folder,
            meeting_controller::update_action_items,
            meeting_controller::delete,
            meeting::ai_controller::extract_action_items,
            meeting::ai_controller::smart_summary,
            assistant_controller::qa,
            assistant_controller::topics,
            calendar_controller::sync_calendar,
            calendar_controller::list_events,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::folders::Model,
                domain::meetings::Model,
                response::meeting::MeetingResponse,
                response::assistant::SmartSummaryResponse,
                response::assistant::QaResponse,
                response::assistant::QaReferenceResponse,
                response::calendar::CalendarEventResponse,
                params::meeting::UpdateMetadataParams,
                params::meeting::FavoriteParams,
                params::meeting::FolderAssignmentParams,
                params::meeting::ActionItemParams,
                params::meeting::UpdateActionItemsParams,
                params::meeting::SmartSummaryParams,
                params::meeting::CalendarSyncParams,
                params::assistant::QaParams,
                params::folder::CreateParams,
                params::folder::RenameParams,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "meetnotes", description = "MeetNotes AI Meeting Notes API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our bearer-token authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "authorization",
                    "API token presented as `Authorization: Bearer <token>`",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(folder_routes(app_state.clone()))
        .merge(meeting_routes(app_state.clone()))
        .merge(meeting_ai_routes(app_state.clone()))
        .merge(assistant_routes(app_state.clone()))
        .merge(calendar_routes(app_state.clone()))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .nest_service("/audio", audio_routes(&app_state))
        .layer(cors_layer(&app_state))
}

fn folder_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/folders", get(folder_controller::index))
        .route("/folders", post(folder_controller::create))
        .route("/folders/:id", put(folder_controller::rename))
        .route("/folders/:id", delete(folder_controller::delete))
        .with_state(app_state)
}

fn meeting_routes(app_state: AppState) -> Router {
    Router::new()
        // Static /meetings/search is registered alongside /meetings/:id;
        // axum resolves the static segment first.
        .route("/meetings", get(meeting_controller::index))
        .route("/meetings/search", get(meeting_controller::search))
        .route("/meetings/with-audio", post(meeting_controller::create))
        .route("/meetings/:id", get(meeting_controller::read))
        .route("/meetings/:id", delete(meeting_controller::delete))
        .route(
            "/meetings/:id/metadata",
            patch(meeting_controller::update_metadata),
        )
        .route(
            "/meetings/:id/favorite",
            put(meeting_controller::update_favorite),
        )
        .route(
            "/meetings/:id/folder",
            put(meeting_controller::assign_folder),
        )
        .route(
            "/meetings/:id/action-items",
            put(meeting_controller::update_action_items),
        )
        .with_state(app_state)
}

fn meeting_ai_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/meetings/:id/extract_action_items",
            post(meeting::ai_controller::extract_action_items),
        )
        .route(
            "/meetings/:id/smart-summary",
            post(meeting::ai_controller::smart_summary),
        )
        .with_state(app_state)
}

fn assistant_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/ai/qa", post(assistant_controller::qa))
        .route("/ai/topics", post(assistant_controller::topics))
        .with_state(app_state)
}

fn calendar_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/meetings/:id/sync_calendar",
            post(calendar_controller::sync_calendar),
        )
        .route("/calendar-events", get(calendar_controller::list_events))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

// Stored audio files are served directly off disk.
fn audio_routes(app_state: &AppState) -> ServeDir {
    ServeDir::new(app_state.config.audio_dir())
}

fn cors_layer(app_state: &AppState) -> CorsLayer {
    let origins: Vec<axum::http::HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_route_responds_ok() {
        let app = health_routes();

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
