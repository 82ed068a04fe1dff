//! Comment entity.
//!
//! The commented-on record is referenced by a `(target_kind, target_id)`
//! pair rather than a foreign key, so a comment may point at any
//! annotatable kind and survives deletion of its target.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Kind tag of the target ("post", "story")
    pub target_kind: String,

    pub target_id: i64,

    #[sea_orm(column_type = "Text")]
    pub text: String,

    /// Parent comment for threaded replies
    #[sea_orm(nullable, indexed)]
    pub parent_id: Option<i64>,

    pub created_by: i64,
    pub updated_by: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
