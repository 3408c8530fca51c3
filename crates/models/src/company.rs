use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub logo: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub manager_ids: Vec<i64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Addresses,
    WorkingHours,
    Services,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Addresses => Entity::has_many(super::address::Entity).into(),
            Relation::WorkingHours => Entity::has_one(super::working_hours::Entity).into(),
            Relation::Services => Entity::has_many(super::service::Entity).into(),
        }
    }
}

impl Related<super::address::Entity> for Entity {
    fn to() -> RelationDef { Relation::Addresses.def() }
}

impl Related<super::working_hours::Entity> for Entity {
    fn to() -> RelationDef { Relation::WorkingHours.def() }
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Services.def() }
}

impl ActiveModelBehavior for ActiveModel {}
