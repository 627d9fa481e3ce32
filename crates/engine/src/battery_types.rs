//! The module contains `BatteryType` struct and its table.

use std::fmt;

use sea_orm::entity::prelude::*;

/// A battery form factor, e.g. "AA".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatteryType {
    pub id: i32,
    pub code: String,
    pub description: String,
}

impl From<Model> for BatteryType {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            description: model.description,
        }
    }
}

impl fmt::Display for BatteryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "battery_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub code: String,
    pub description: String,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::devices::Entity")]
    Devices,
}

impl Related<super::devices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Devices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
