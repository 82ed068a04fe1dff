//! Hashtag entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hashtag")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// The hashtag name (lowercase, without #)
    #[sea_orm(unique)]
    pub name: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_hashtag::Relation::Post.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_hashtag::Relation::Hashtag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
