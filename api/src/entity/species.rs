//! `species` table model

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "species")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub scientific_name: String,
    pub co2_kg_per_year: f64,
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
