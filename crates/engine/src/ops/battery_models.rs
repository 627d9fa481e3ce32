use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{BatteryModel, ResultEngine, assignments, battery_models};

use super::{Engine, MAX_DESCRIPTION_LEN, normalize_required_text, with_tx};

impl Engine {
    /// Lists the owner's battery models in creation order.
    pub async fn list_battery_models(&self, owner: &str) -> ResultEngine<Vec<BatteryModel>> {
        let models = battery_models::Entity::find()
            .filter(battery_models::Column::UserId.eq(owner.to_string()))
            .order_by_asc(battery_models::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(BatteryModel::from).collect())
    }

    /// Return a battery model of the owner.
    pub async fn battery_model(&self, owner: &str, id: i32) -> ResultEngine<BatteryModel> {
        let model = Self::require_battery_model(&self.database, owner, id).await?;
        Ok(BatteryModel::from(model))
    }

    pub async fn new_battery_model(&self, owner: &str, description: &str) -> ResultEngine<i32> {
        let description = normalize_required_text(description, "description", MAX_DESCRIPTION_LEN)?;
        with_tx!(self, |db_tx| {
            Self::require_user_exists(&db_tx, owner).await?;
            let model = battery_models::ActiveModel {
                description: ActiveValue::Set(description),
                user_id: ActiveValue::Set(owner.to_string()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            Ok(model.id)
        })
    }

    pub async fn update_battery_model(
        &self,
        owner: &str,
        id: i32,
        description: &str,
    ) -> ResultEngine<()> {
        let description = normalize_required_text(description, "description", MAX_DESCRIPTION_LEN)?;
        with_tx!(self, |db_tx| {
            Self::require_battery_model(&db_tx, owner, id).await?;
            battery_models::ActiveModel {
                id: ActiveValue::Unchanged(id),
                description: ActiveValue::Set(description),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            Ok(())
        })
    }

    /// Deletes a battery model and every assignment of it.
    pub async fn delete_battery_model(&self, owner: &str, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            Self::require_battery_model(&db_tx, owner, id).await?;
            assignments::Entity::delete_many()
                .filter(assignments::Column::BatteryModelId.eq(id))
                .exec(&db_tx)
                .await?;
            battery_models::Entity::delete_by_id(id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
