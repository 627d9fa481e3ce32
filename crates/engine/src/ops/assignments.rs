use std::collections::HashMap;

use sea_orm::{
    ActiveValue, ConnectionTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};

use crate::{
    AllocationRequest, Assignment, Device, ResultEngine, assignments, battery_models,
    battery_types, devices, validate_allocation,
};

use super::{Engine, active_filter, with_tx};

/// Optional filters of [`Engine::list_assignments`]. Both apply together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssignmentFilter {
    pub battery_type: Option<i32>,
    pub battery_model: Option<i32>,
}

/// Fields of an assignment write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssignmentInput {
    pub device_id: i32,
    pub battery_model_id: i32,
    pub quantity: i32,
}

/// Assignments matching a filter and the batteries they account for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignmentList {
    pub assignments: Vec<Assignment>,
    pub battery_total: i64,
}

impl Engine {
    pub async fn list_assignments(
        &self,
        owner: &str,
        filter: AssignmentFilter,
    ) -> ResultEngine<AssignmentList> {
        let mut query = assignments::Entity::find()
            .filter(assignments::Column::UserId.eq(owner.to_string()))
            .order_by_asc(assignments::Column::Id);
        if let Some(battery_type) = active_filter(filter.battery_type) {
            query = query
                .join(JoinType::InnerJoin, assignments::Relation::Devices.def())
                .filter(devices::Column::BatteryTypeId.eq(battery_type));
        }
        if let Some(battery_model) = active_filter(filter.battery_model) {
            query = query.filter(assignments::Column::BatteryModelId.eq(battery_model));
        }
        let models = query.all(&self.database).await?;

        let device_labels = Self::device_labels(&self.database, owner).await?;
        let model_labels = Self::battery_model_labels(&self.database, owner).await?;

        let assignments: Vec<Assignment> = models
            .into_iter()
            .map(|model| Self::label_assignment(model, &device_labels, &model_labels))
            .collect();
        let battery_total = assignments.iter().map(|a| i64::from(a.quantity)).sum();

        Ok(AssignmentList {
            assignments,
            battery_total,
        })
    }

    /// Return an assignment of the owner.
    pub async fn assignment(&self, owner: &str, id: i32) -> ResultEngine<Assignment> {
        let model = Self::require_assignment(&self.database, owner, id).await?;
        let device = Self::require_device(&self.database, owner, model.device_id).await?;
        let battery_type =
            Self::require_battery_type(&self.database, owner, device.battery_type_id).await?;
        let battery_model =
            Self::require_battery_model(&self.database, owner, model.battery_model_id).await?;

        Ok(Assignment {
            id: model.id,
            device_id: model.device_id,
            device: Device::from_models(device, &battery_type).to_string(),
            battery_model_id: model.battery_model_id,
            battery_model: battery_model.description,
            quantity: model.quantity,
        })
    }

    /// Installs `quantity` batteries of a model in a device.
    ///
    /// The device lock is held across the capacity check and the insert, so
    /// two concurrent writes to the same device never both pass the check.
    pub async fn new_assignment(&self, owner: &str, input: AssignmentInput) -> ResultEngine<i32> {
        let _guard = self.device_locks.lock(input.device_id).await;
        with_tx!(self, |db_tx| {
            let device = Self::require_device(&db_tx, owner, input.device_id).await?;
            Self::require_battery_model(&db_tx, owner, input.battery_model_id).await?;

            let others = Self::assigned_quantity_in(&db_tx, owner, device.id, None).await?;
            validate_allocation(&AllocationRequest::excluding_current(
                device.capacity,
                others,
                input.quantity,
            ))?;

            let model = assignments::ActiveModel {
                device_id: ActiveValue::Set(input.device_id),
                battery_model_id: ActiveValue::Set(input.battery_model_id),
                quantity: ActiveValue::Set(input.quantity),
                user_id: ActiveValue::Set(owner.to_string()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            Ok(model.id)
        })
    }

    /// Rewrites an assignment, possibly moving it to another device.
    ///
    /// The edited assignment's own quantity does not count against the
    /// target device's capacity.
    pub async fn update_assignment(
        &self,
        owner: &str,
        id: i32,
        input: AssignmentInput,
    ) -> ResultEngine<()> {
        let _guard = self.device_locks.lock(input.device_id).await;
        with_tx!(self, |db_tx| {
            Self::require_assignment(&db_tx, owner, id).await?;
            let device = Self::require_device(&db_tx, owner, input.device_id).await?;
            Self::require_battery_model(&db_tx, owner, input.battery_model_id).await?;

            let others = Self::assigned_quantity_in(&db_tx, owner, device.id, Some(id)).await?;
            validate_allocation(&AllocationRequest::excluding_current(
                device.capacity,
                others,
                input.quantity,
            ))?;

            assignments::ActiveModel {
                id: ActiveValue::Unchanged(id),
                device_id: ActiveValue::Set(input.device_id),
                battery_model_id: ActiveValue::Set(input.battery_model_id),
                quantity: ActiveValue::Set(input.quantity),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            Ok(())
        })
    }

    pub async fn delete_assignment(&self, owner: &str, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            Self::require_assignment(&db_tx, owner, id).await?;
            assignments::Entity::delete_by_id(id).exec(&db_tx).await?;
            Ok(())
        })
    }

    async fn device_labels<C: ConnectionTrait>(
        db: &C,
        owner: &str,
    ) -> ResultEngine<HashMap<i32, String>> {
        let rows = devices::Entity::find()
            .filter(devices::Column::UserId.eq(owner.to_string()))
            .find_also_related(battery_types::Entity)
            .all(db)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(device, battery_type)| {
                let battery_type = battery_type?;
                let id = device.id;
                Some((id, Device::from_models(device, &battery_type).to_string()))
            })
            .collect())
    }

    async fn battery_model_labels<C: ConnectionTrait>(
        db: &C,
        owner: &str,
    ) -> ResultEngine<HashMap<i32, String>> {
        let models = battery_models::Entity::find()
            .filter(battery_models::Column::UserId.eq(owner.to_string()))
            .all(db)
            .await?;
        Ok(models
            .into_iter()
            .map(|model| (model.id, model.description))
            .collect())
    }

    fn label_assignment(
        model: assignments::Model,
        device_labels: &HashMap<i32, String>,
        model_labels: &HashMap<i32, String>,
    ) -> Assignment {
        Assignment {
            id: model.id,
            device_id: model.device_id,
            device: device_labels
                .get(&model.device_id)
                .cloned()
                .unwrap_or_default(),
            battery_model_id: model.battery_model_id,
            battery_model: model_labels
                .get(&model.battery_model_id)
                .cloned()
                .unwrap_or_default(),
            quantity: model.quantity,
        }
    }
}
