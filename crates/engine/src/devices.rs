//! The module contains `Device` struct and its table.

use std::fmt;

use sea_orm::entity::prelude::*;

use crate::battery_types;

/// Smallest capacity a device can declare.
pub const MIN_CAPACITY: i32 = 1;
/// Largest capacity a device can declare.
pub const MAX_CAPACITY: i32 = 10;

/// A device holding `capacity` batteries of one type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    pub id: i32,
    pub description: String,
    pub battery_type_id: i32,
    /// Code of the referenced battery type.
    pub battery_type: String,
    pub capacity: i32,
}

impl Device {
    pub(crate) fn from_models(model: Model, battery_type: &battery_types::Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            battery_type_id: model.battery_type_id,
            battery_type: battery_type.code.clone(),
            capacity: model.capacity,
        }
    }
}

/// "Remote (2x AAA)"
impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}x {})",
            self.description, self.capacity, self.battery_type
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub description: String,
    pub battery_type_id: i32,
    pub capacity: i32,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::battery_types::Entity",
        from = "Column::BatteryTypeId",
        to = "super::battery_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    BatteryTypes,
    #[sea_orm(has_many = "super::assignments::Entity")]
    Assignments,
}

impl Related<super::battery_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BatteryTypes.def()
    }
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
