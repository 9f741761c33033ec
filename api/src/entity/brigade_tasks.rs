//! `brigade_tasks` table model

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "brigade_tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brigade_id: Uuid,
    pub title: String,
    pub detail: String,
    pub due_on: Option<Date>,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::brigades::Entity",
        from = "Column::BrigadeId",
        to = "super::brigades::Column::Id"
    )]
    Brigade,
}

impl Related<super::brigades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brigade.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
