use sea_orm::{ActiveValue, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*};

use crate::{BatteryType, ResultEngine, battery_types};

use super::{
    Engine, MAX_CODE_LEN, MAX_DESCRIPTION_LEN, normalize_optional_text, normalize_required_text,
    with_tx,
};

impl Engine {
    /// Lists the owner's battery types in creation order.
    pub async fn list_battery_types(&self, owner: &str) -> ResultEngine<Vec<BatteryType>> {
        let models = battery_types::Entity::find()
            .filter(battery_types::Column::UserId.eq(owner.to_string()))
            .order_by_asc(battery_types::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(BatteryType::from).collect())
    }

    /// Return a battery type of the owner.
    pub async fn battery_type(&self, owner: &str, id: i32) -> ResultEngine<BatteryType> {
        let model = Self::require_battery_type(&self.database, owner, id).await?;
        Ok(BatteryType::from(model))
    }

    /// Add a new battery type. `description` may be blank.
    pub async fn new_battery_type(
        &self,
        owner: &str,
        code: &str,
        description: Option<&str>,
    ) -> ResultEngine<i32> {
        let code = normalize_required_text(code, "code", MAX_CODE_LEN)?;
        let description = normalize_optional_text(description, "description", MAX_DESCRIPTION_LEN)?;
        with_tx!(self, |db_tx| {
            Self::require_user_exists(&db_tx, owner).await?;
            let model = battery_types::ActiveModel {
                code: ActiveValue::Set(code),
                description: ActiveValue::Set(description),
                user_id: ActiveValue::Set(owner.to_string()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            Ok(model.id)
        })
    }

    pub async fn update_battery_type(
        &self,
        owner: &str,
        id: i32,
        code: &str,
        description: Option<&str>,
    ) -> ResultEngine<()> {
        let code = normalize_required_text(code, "code", MAX_CODE_LEN)?;
        let description = normalize_optional_text(description, "description", MAX_DESCRIPTION_LEN)?;
        with_tx!(self, |db_tx| {
            Self::require_battery_type(&db_tx, owner, id).await?;
            battery_types::ActiveModel {
                id: ActiveValue::Unchanged(id),
                code: ActiveValue::Set(code),
                description: ActiveValue::Set(description),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            Ok(())
        })
    }

    /// Deletes a battery type together with its devices and their
    /// assignments.
    pub async fn delete_battery_type(&self, owner: &str, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            Self::require_battery_type(&db_tx, owner, id).await?;
            let backend = self.database.get_database_backend();

            // 1) assignments on devices of this type
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM assignments WHERE device_id IN \
                     (SELECT id FROM devices WHERE battery_type_id = ?);",
                    vec![id.into()],
                ))
                .await?;

            // 2) devices
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM devices WHERE battery_type_id = ?;",
                    vec![id.into()],
                ))
                .await?;

            // 3) battery type
            battery_types::Entity::delete_by_id(id).exec(&db_tx).await?;

            Ok(())
        })
    }
}
