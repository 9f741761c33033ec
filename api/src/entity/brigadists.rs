//! `brigadists` membership table model

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "brigadists")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub brigade_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub role: String,
    pub joined_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::brigades::Entity",
        from = "Column::BrigadeId",
        to = "super::brigades::Column::Id"
    )]
    Brigade,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::brigades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brigade.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
