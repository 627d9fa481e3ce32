//! The module contains `BatteryModel` struct and its table.

use std::fmt;

use sea_orm::entity::prelude::*;

/// A kind of battery stock, e.g. "Rechargeable 1.2V".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatteryModel {
    pub id: i32,
    pub description: String,
}

impl From<Model> for BatteryModel {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
        }
    }
}

impl fmt::Display for BatteryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "battery_models")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub description: String,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::assignments::Entity")]
    Assignments,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
