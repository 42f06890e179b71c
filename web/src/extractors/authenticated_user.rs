use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use domain::users;
use log::*;
use service::AppState;

pub(crate) struct AuthenticatedUser(pub users::Model);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = RejectionType;

    // Resolves the owner from an `Authorization: Bearer <token>` header by
    // looking the token up against stored users. Token issuance happens in
    // the account provisioning flow, outside this service.
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(unauthorized)?;

        match entity_api::user::find_by_api_token(state.db_conn_ref(), token).await {
            Ok(Some(user)) => Ok(AuthenticatedUser(user)),
            Ok(None) => {
                debug!("Rejected request carrying an unknown API token");
                Err(unauthorized())
            }
            Err(e) => {
                warn!("Failed to look up API token: {:?}", e);
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL SERVER ERROR".to_string(),
                ))
            }
        }
    }
}

fn unauthorized() -> RejectionType {
    (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
}
