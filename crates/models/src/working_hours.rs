//! One row per company; the weekly schedule flattened into 21 columns.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "working_hours")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub company_id: i64,
    pub monday_is_open: bool,
    pub monday_open_time: Option<Time>,
    pub monday_close_time: Option<Time>,
    pub tuesday_is_open: bool,
    pub tuesday_open_time: Option<Time>,
    pub tuesday_close_time: Option<Time>,
    pub wednesday_is_open: bool,
    pub wednesday_open_time: Option<Time>,
    pub wednesday_close_time: Option<Time>,
    pub thursday_is_open: bool,
    pub thursday_open_time: Option<Time>,
    pub thursday_close_time: Option<Time>,
    pub friday_is_open: bool,
    pub friday_open_time: Option<Time>,
    pub friday_close_time: Option<Time>,
    pub saturday_is_open: bool,
    pub saturday_open_time: Option<Time>,
    pub saturday_close_time: Option<Time>,
    pub sunday_is_open: bool,
    pub sunday_open_time: Option<Time>,
    pub sunday_close_time: Option<Time>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Company,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Company => Entity::belongs_to(super::company::Entity)
                .from(Column::CompanyId)
                .to(super::company::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef { Relation::Company.def() }
}

impl ActiveModelBehavior for ActiveModel {}
