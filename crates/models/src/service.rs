use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Minutes.
    pub average_duration: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Company,
    ServiceAddresses,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Company => Entity::belongs_to(super::company::Entity)
                .from(Column::CompanyId)
                .to(super::company::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::ServiceAddresses => Entity::has_many(super::service_address::Entity).into(),
        }
    }
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef { Relation::Company.def() }
}

impl Related<super::service_address::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceAddresses.def() }
}

impl ActiveModelBehavior for ActiveModel {}
