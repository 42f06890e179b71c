//! Folder organization for meetings.

use crate::error::Error;
use entity::folders::Model;
use entity::Id;
use entity_api::folder;
use sea_orm::DatabaseConnection;

pub use entity_api::folder::{create, find_by_owner};

/// Rename one of the owner's folders.
pub async fn rename(
    db: &DatabaseConnection,
    owner_id: Id,
    id: Id,
    name: String,
) -> Result<Model, Error> {
    folder::find_by_id_for_owner(db, owner_id, id).await?;
    Ok(folder::rename(db, id, name).await?)
}

/// Delete one of the owner's folders. Meetings assigned to it fall back to
/// having no folder.
pub async fn delete(db: &DatabaseConnection, owner_id: Id, id: Id) -> Result<(), Error> {
    folder::find_by_id_for_owner(db, owner_id, id).await?;
    Ok(folder::delete_by_id(db, id).await?)
}
