use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Device, EngineError, MAX_CAPACITY, MIN_CAPACITY, ResultEngine, assignments, battery_noun,
    battery_types, devices,
};

use super::{Engine, MAX_DESCRIPTION_LEN, active_filter, normalize_required_text, with_tx};

/// Optional filters of [`Engine::list_devices`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    pub battery_type: Option<i32>,
}

/// Fields of a device write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInput {
    pub description: String,
    pub battery_type_id: i32,
    pub capacity: i32,
}

/// Devices matching a filter and the batteries they hold when full.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceList {
    pub devices: Vec<Device>,
    pub battery_total: i64,
}

fn validate_capacity(capacity: i32) -> ResultEngine<()> {
    if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
        return Err(EngineError::InvalidCapacity(format!(
            "capacity must be between {MIN_CAPACITY} and {MAX_CAPACITY}"
        )));
    }
    Ok(())
}

impl Engine {
    pub async fn list_devices(&self, owner: &str, filter: DeviceFilter) -> ResultEngine<DeviceList> {
        let mut query = devices::Entity::find()
            .filter(devices::Column::UserId.eq(owner.to_string()))
            .order_by_asc(devices::Column::Id);
        if let Some(battery_type) = active_filter(filter.battery_type) {
            query = query.filter(devices::Column::BatteryTypeId.eq(battery_type));
        }

        let rows = query
            .find_also_related(battery_types::Entity)
            .all(&self.database)
            .await?;

        let mut devices = Vec::with_capacity(rows.len());
        for (model, battery_type) in rows {
            let Some(battery_type) = battery_type else { continue };
            devices.push(Device::from_models(model, &battery_type));
        }
        let battery_total = devices.iter().map(|d| i64::from(d.capacity)).sum();

        Ok(DeviceList {
            devices,
            battery_total,
        })
    }

    /// Return a device of the owner.
    pub async fn device(&self, owner: &str, id: i32) -> ResultEngine<Device> {
        let model = Self::require_device(&self.database, owner, id).await?;
        let battery_type =
            Self::require_battery_type(&self.database, owner, model.battery_type_id).await?;
        Ok(Device::from_models(model, &battery_type))
    }

    pub async fn new_device(&self, owner: &str, input: DeviceInput) -> ResultEngine<i32> {
        let description =
            normalize_required_text(&input.description, "description", MAX_DESCRIPTION_LEN)?;
        validate_capacity(input.capacity)?;
        with_tx!(self, |db_tx| {
            Self::require_battery_type(&db_tx, owner, input.battery_type_id).await?;
            let model = devices::ActiveModel {
                description: ActiveValue::Set(description),
                battery_type_id: ActiveValue::Set(input.battery_type_id),
                capacity: ActiveValue::Set(input.capacity),
                user_id: ActiveValue::Set(owner.to_string()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            Ok(model.id)
        })
    }

    /// Updates a device in place.
    ///
    /// The capacity cannot drop below the quantity already assigned to the
    /// device.
    pub async fn update_device(&self, owner: &str, id: i32, input: DeviceInput) -> ResultEngine<()> {
        let description =
            normalize_required_text(&input.description, "description", MAX_DESCRIPTION_LEN)?;
        validate_capacity(input.capacity)?;

        let _guard = self.device_locks.lock(id).await;
        with_tx!(self, |db_tx| {
            Self::require_device(&db_tx, owner, id).await?;
            Self::require_battery_type(&db_tx, owner, input.battery_type_id).await?;

            let assigned = Self::assigned_quantity_in(&db_tx, owner, id, None).await?;
            if input.capacity < assigned {
                return Err(EngineError::InvalidCapacity(format!(
                    "{assigned} {} already assigned to this device",
                    battery_noun(assigned)
                )));
            }

            devices::ActiveModel {
                id: ActiveValue::Unchanged(id),
                description: ActiveValue::Set(description),
                battery_type_id: ActiveValue::Set(input.battery_type_id),
                capacity: ActiveValue::Set(input.capacity),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            Ok(())
        })
    }

    /// Deletes a device and its assignments.
    pub async fn delete_device(&self, owner: &str, id: i32) -> ResultEngine<()> {
        let _guard = self.device_locks.lock(id).await;
        with_tx!(self, |db_tx| {
            Self::require_device(&db_tx, owner, id).await?;
            assignments::Entity::delete_many()
                .filter(assignments::Column::DeviceId.eq(id))
                .exec(&db_tx)
                .await?;
            devices::Entity::delete_by_id(id).exec(&db_tx).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_bounds_are_inclusive() {
        assert!(validate_capacity(1).is_ok());
        assert!(validate_capacity(10).is_ok());
        assert!(validate_capacity(0).is_err());
        assert!(validate_capacity(11).is_err());
    }
}
