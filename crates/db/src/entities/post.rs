//! Post entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(column_type = "Text")]
    pub caption: String,

    /// Storage path or URL of the image
    pub image: String,

    #[sea_orm(indexed)]
    pub created_by: i64,
    pub updated_by: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Creator,

    #[sea_orm(has_many = "super::post_like::Entity")]
    Likes,

    #[sea_orm(has_many = "super::post_save::Entity")]
    Saves,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::post_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl Related<super::post_save::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Saves.def()
    }
}

impl Related<super::hashtag::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_hashtag::Relation::Hashtag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_hashtag::Relation::Post.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
