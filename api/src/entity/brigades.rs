//! `brigades` table model

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "brigades")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub owner_id: Uuid,
    pub name: String,
    pub region: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::brigadists::Entity")]
    Brigadists,
    #[sea_orm(has_many = "super::brigade_actions::Entity")]
    Actions,
    #[sea_orm(has_many = "super::brigade_tasks::Entity")]
    Tasks,
}

impl Related<super::brigadists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brigadists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
