use sea_orm::{ConnectionTrait, QueryFilter, Statement, prelude::*};

use crate::{
    EngineError, ResultEngine, assignments, battery_models, battery_types, devices, users,
};

use super::Engine;

/// Generates a `require_*` lookup that only finds rows of the given owner.
macro_rules! impl_owned_lookup {
    ($require_fn:ident, $module:ident, $err_msg:literal) => {
        pub(super) async fn $require_fn<C: ConnectionTrait>(
            db: &C,
            owner: &str,
            id: i32,
        ) -> ResultEngine<$module::Model> {
            $module::Entity::find_by_id(id)
                .filter($module::Column::UserId.eq(owner.to_string()))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_owned_lookup!(require_battery_type, battery_types, "battery type not exists");

    impl_owned_lookup!(require_battery_model, battery_models, "battery model not exists");

    impl_owned_lookup!(require_device, devices, "device not exists");

    impl_owned_lookup!(require_assignment, assignments, "assignment not exists");

    pub(super) async fn require_user_exists<C: ConnectionTrait>(
        db: &C,
        username: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    /// Sum of `quantity` over the owner's assignments on `device_id`,
    /// leaving out the assignment `excluding` when given.
    pub(super) async fn assigned_quantity_in<C: ConnectionTrait>(
        db: &C,
        owner: &str,
        device_id: i32,
        excluding: Option<i32>,
    ) -> ResultEngine<i32> {
        let backend = db.get_database_backend();
        let stmt = match excluding {
            Some(assignment_id) => Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(quantity), 0) AS sum \
                 FROM assignments \
                 WHERE user_id = ? AND device_id = ? AND id <> ?",
                vec![owner.into(), device_id.into(), assignment_id.into()],
            ),
            None => Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(quantity), 0) AS sum \
                 FROM assignments \
                 WHERE user_id = ? AND device_id = ?",
                vec![owner.into(), device_id.into()],
            ),
        };

        let sum: i64 = match db.query_one(stmt).await? {
            Some(row) => row.try_get("", "sum")?,
            None => 0,
        };
        i32::try_from(sum).map_err(|_| {
            EngineError::InvalidCapacity(format!("assigned sum {sum} out of range"))
        })
    }

    /// Declared capacity of one of the owner's devices.
    pub async fn device_capacity(&self, owner: &str, device_id: i32) -> ResultEngine<i32> {
        let device = Self::require_device(&self.database, owner, device_id).await?;
        Ok(device.capacity)
    }

    /// Quantity already assigned to one of the owner's devices, optionally
    /// leaving out one assignment (the one being edited).
    pub async fn assigned_quantity(
        &self,
        owner: &str,
        device_id: i32,
        excluding: Option<i32>,
    ) -> ResultEngine<i32> {
        Self::require_device(&self.database, owner, device_id).await?;
        Self::assigned_quantity_in(&self.database, owner, device_id, excluding).await
    }
}
