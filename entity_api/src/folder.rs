//! CRUD operations for the folders table.

use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::folders::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QueryOrder, TryIntoModel,
};

/// Creates a new folder for the given owner
pub async fn create(db: &DatabaseConnection, owner_id: Id, name: String) -> Result<Model, Error> {
    debug!("Creating new folder \"{name}\" for owner: {owner_id}");

    let active_model = ActiveModel {
        id: Set(Id::new_v4()),
        name: Set(name),
        owner_id: Set(owner_id),
        created_at: Set(Utc::now().into()),
    };

    Ok(active_model.insert(db).await?)
}

/// Finds all folders belonging to the owner, oldest first
pub async fn find_by_owner(db: &DatabaseConnection, owner_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Finds a folder by id, scoped to the owner
pub async fn find_by_id_for_owner(
    db: &DatabaseConnection,
    owner_id: Id,
    id: Id,
) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .filter(Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or_else(|| Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        })
}

/// Renames an existing folder
pub async fn rename(db: &DatabaseConnection, id: Id, name: String) -> Result<Model, Error> {
    let result = Entity::find_by_id(id).one(db).await?;

    match result {
        Some(existing) => {
            debug!("Renaming folder: {id}");

            let active_model = ActiveModel {
                id: Unchanged(existing.id),
                owner_id: Unchanged(existing.owner_id),
                created_at: Unchanged(existing.created_at),
                name: Set(name),
            };

            Ok(active_model.update(db).await?.try_into_model()?)
        }
        None => Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }),
    }
}

/// Deletes a folder by id
pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
