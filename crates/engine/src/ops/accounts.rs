//! Account provisioning.
//!
//! Accounts are created by an administrator; there is no self-service
//! signup. Every new account is seeded with a starter set of battery types
//! and models.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ActiveValue, ConnectionTrait, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, User, battery_models, battery_types, users};

use super::{Engine, MAX_USERNAME_LEN, normalize_required_text, with_tx};

/// Battery type codes every new account starts with.
pub const DEFAULT_BATTERY_TYPES: [&str; 2] = ["AA", "AAA"];

/// Battery model descriptions every new account starts with.
pub const DEFAULT_BATTERY_MODELS: [&str; 3] =
    ["Non-Rechargeable", "Rechargeable 1.2V", "Rechargeable 1.5V"];

impl Engine {
    /// Creates an account and runs the post-creation hook (see
    /// [`Engine::on_account_created`]) in the same transaction.
    pub async fn create_account(&self, username: &str, password: &str) -> ResultEngine<User> {
        let username = normalize_required_text(username, "username", MAX_USERNAME_LEN)?;
        if password.is_empty() {
            return Err(EngineError::InvalidInput {
                field: "password",
                reason: "must not be empty".to_string(),
            });
        }
        let password_hash = hash_password(password)?;

        let created: ResultEngine<User> = with_tx!(self, |db_tx| {
            let exists = users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(username));
            }

            let active = users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                password: ActiveValue::Set(password_hash),
            };
            let model = active.insert(&db_tx).await?;

            Self::account_created_in(&db_tx, &model.username).await?;
            Ok(User::from(model))
        });
        let user = created?;

        tracing::info!("created account {}", user.username);
        Ok(user)
    }

    /// Post-creation hook of the account provisioning flow, run on its own
    /// transaction for an existing account.
    pub async fn on_account_created(&self, owner: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            Self::require_user_exists(&db_tx, owner).await?;
            Self::account_created_in(&db_tx, owner).await
        })
    }

    /// The hook itself: seeds the default battery types and models for
    /// `owner` on `db`.
    async fn account_created_in<C: ConnectionTrait>(db: &C, owner: &str) -> ResultEngine<()> {
        for code in DEFAULT_BATTERY_TYPES {
            battery_types::ActiveModel {
                code: ActiveValue::Set(code.to_string()),
                description: ActiveValue::Set(String::new()),
                user_id: ActiveValue::Set(owner.to_string()),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }

        for description in DEFAULT_BATTERY_MODELS {
            battery_models::ActiveModel {
                description: ActiveValue::Set(description.to_string()),
                user_id: ActiveValue::Set(owner.to_string()),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }

        Ok(())
    }

    /// Checks a username/password pair.
    ///
    /// Unknown users and wrong passwords both return `Ok(None)`.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<User>> {
        let Some(model) = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };

        if verify_password(password, &model.password)? {
            Ok(Some(User::from(model)))
        } else {
            Ok(None)
        }
    }

    /// Lists every account, ordered by username.
    pub async fn list_accounts(&self) -> ResultEngine<Vec<User>> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::Username)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }
}

fn hash_password(password: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| EngineError::Password(err.to_string()))
}

fn verify_password(password: &str, hash: &str) -> ResultEngine<bool> {
    let parsed = PasswordHash::new(hash).map_err(|err| EngineError::Password(err.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(EngineError::Password(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_its_password() {
        let hash = hash_password("correct-horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct-horse", &hash).unwrap());
        assert!(!verify_password("wrong-horse", &hash).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(EngineError::Password(_))
        ));
    }
}
