//! SeaORM Entity for the users table.
//!
//! Account provisioning and credential issuance happen outside this service;
//! rows here are only ever looked up by API token and read for their
//! calendar credential.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::users::Model)]
#[sea_orm(schema_name = "meetnotes", table_name = "users")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    pub email: String,

    /// Bearer credential presented on every API request
    #[serde(skip_serializing)]
    pub api_token: String,

    /// OAuth access token for the user's calendar, managed externally
    #[serde(skip_serializing)]
    #[sea_orm(column_type = "Text", nullable)]
    pub calendar_access_token: Option<String>,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::folders::Entity")]
    Folders,

    #[sea_orm(has_many = "super::meetings::Entity")]
    Meetings,
}

impl Related<super::folders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Folders.def()
    }
}

impl Related<super::meetings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meetings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
