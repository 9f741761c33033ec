//! `projects` table model

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub region: String,
    pub target_trees: i32,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trees::Entity")]
    Trees,
}

impl Related<super::trees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
