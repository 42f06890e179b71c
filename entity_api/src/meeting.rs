//! CRUD and query operations for the meetings table.

use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::meetings::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    Condition, DatabaseConnection, QueryOrder, QuerySelect, TryIntoModel,
};

/// Creates a new meeting record
pub async fn create(db: &DatabaseConnection, model: Model) -> Result<Model, Error> {
    debug!("Creating new meeting \"{}\" for owner: {}", model.title, model.owner_id);

    let now = Utc::now();

    let active_model = ActiveModel {
        id: Set(model.id),
        title: Set(model.title),
        folder_id: Set(model.folder_id),
        owner_id: Set(model.owner_id),
        status: Set(model.status),
        transcript: Set(model.transcript),
        summary: Set(model.summary),
        audio_path: Set(model.audio_path),
        calendar_event_id: Set(model.calendar_event_id),
        action_items: Set(model.action_items),
        is_favorite: Set(model.is_favorite),
        start_time: Set(model.start_time),
        end_time: Set(model.end_time),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    Ok(active_model.insert(db).await?)
}

/// Updates an existing meeting record. The id, owner, and creation timestamp
/// are never changed by an update.
pub async fn update(db: &DatabaseConnection, id: Id, model: Model) -> Result<Model, Error> {
    let result = Entity::find_by_id(id).one(db).await?;

    match result {
        Some(existing) => {
            debug!("Updating meeting: {id}");

            let active_model = ActiveModel {
                id: Unchanged(existing.id),
                owner_id: Unchanged(existing.owner_id),
                created_at: Unchanged(existing.created_at),
                title: Set(model.title),
                folder_id: Set(model.folder_id),
                status: Set(model.status),
                transcript: Set(model.transcript),
                summary: Set(model.summary),
                audio_path: Set(model.audio_path),
                calendar_event_id: Set(model.calendar_event_id),
                action_items: Set(model.action_items),
                is_favorite: Set(model.is_favorite),
                start_time: Set(model.start_time),
                end_time: Set(model.end_time),
                updated_at: Set(Utc::now().into()),
            };

            Ok(active_model.update(db).await?.try_into_model()?)
        }
        None => {
            debug!("Meeting with id {id} not found");
            Err(Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordNotFound,
            })
        }
    }
}

/// Finds a meeting by id, scoped to the owner
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

/// Finds the owner's meetings, newest first, optionally restricted to a
/// folder and/or to favorites
pub async fn find_by_owner(
    db: &DatabaseConnection,
    owner_id: Id,
    folder_id: Option<Id>,
    favorites_only: bool,
) -> Result<Vec<Model>, Error> {
    let mut query = Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .order_by_desc(Column::CreatedAt);

    if let Some(folder_id) = folder_id {
        query = query.filter(Column::FolderId.eq(folder_id));
    }
    if favorites_only {
        query = query.filter(Column::IsFavorite.eq(true));
    }

    Ok(query.all(db).await?)
}

/// Finds the owner's most recent meetings, newest first
pub async fn find_recent_by_owner(
    db: &DatabaseConnection,
    owner_id: Id,
    limit: u64,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .order_by_desc(Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await?)
}

/// Finds the subset of the given ids that belong to the owner, newest first
pub async fn find_by_ids_for_owner(
    db: &DatabaseConnection,
    owner_id: Id,
    ids: Vec<Id>,
) -> Result<Vec<Model>, Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    Ok(Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .filter(Column::Id.is_in(ids))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Case-insensitive substring search over title, summary, and transcript
pub async fn search_by_owner(
    db: &DatabaseConnection,
    owner_id: Id,
    term: &str,
) -> Result<Vec<Model>, Error> {
    let pattern = format!("%{term}%");

    Ok(Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .filter(
            Condition::any()
                .add(Expr::col(Column::Title).ilike(pattern.clone()))
                .add(Expr::col(Column::Summary).ilike(pattern.clone()))
                .add(Expr::col(Column::Transcript).ilike(pattern)),
        )
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Deletes a meeting by id
pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
