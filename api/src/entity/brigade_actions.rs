//! `brigade_actions` table model
//!
//! The table also carries a PostGIS `location geography(Point, 4326)`
//! column kept in sync by the repository's raw insert; it is not mapped
//! here because inserts and radius queries go through raw SQL.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "brigade_actions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brigade_id: Uuid,
    pub brigadist_id: Uuid,
    pub kind: String,
    pub lat: f64,
    pub lon: f64,
    pub tree_id: Option<Uuid>,
    pub media_url: Option<String>,
    pub note: String,
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
