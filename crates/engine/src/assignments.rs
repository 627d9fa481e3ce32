//! The module contains `Assignment` struct and its table.

use std::fmt;

use sea_orm::entity::prelude::*;

/// A quantity of one battery model installed in one device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub id: i32,
    pub device_id: i32,
    /// Label of the referenced device, see [`crate::Device`].
    pub device: String,
    pub battery_model_id: i32,
    /// Description of the referenced battery model.
    pub battery_model: String,
    pub quantity: i32,
}

/// "Remote (2x AAA) (1x Rechargeable 1.2V)"
impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}x {})",
            self.device, self.quantity, self.battery_model
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub device_id: i32,
    pub battery_model_id: i32,
    pub quantity: i32,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::devices::Entity",
        from = "Column::DeviceId",
        to = "super::devices::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Devices,
    #[sea_orm(
        belongs_to = "super::battery_models::Entity",
        from = "Column::BatteryModelId",
        to = "super::battery_models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    BatteryModels,
}

impl Related<super::devices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Devices.def()
    }
}

impl Related<super::battery_models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BatteryModels.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
