//! Lookup operations for users.

use super::error::{EntityApiErrorKind, Error};
use entity::users::{Column, Entity, Model};
use entity::Id;
use sea_orm::{entity::prelude::*, DatabaseConnection};

/// Finds a user by id
pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Finds the user owning the given API token, if any
pub async fn find_by_api_token(
    db: &DatabaseConnection,
    api_token: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::ApiToken.eq(api_token))
        .one(db)
        .await?)
}
