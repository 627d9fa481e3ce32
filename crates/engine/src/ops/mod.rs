use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod accounts;
mod assignments;
mod battery_models;
mod battery_types;
mod devices;
mod locks;

pub use accounts::{DEFAULT_BATTERY_MODELS, DEFAULT_BATTERY_TYPES};
pub use assignments::{AssignmentFilter, AssignmentInput, AssignmentList};
pub use devices::{DeviceFilter, DeviceInput, DeviceList};

use locks::DeviceLocks;

const MAX_CODE_LEN: usize = 10;
const MAX_DESCRIPTION_LEN: usize = 100;
const MAX_USERNAME_LEN: usize = 150;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Owner-scoped access to the inventory tables.
///
/// Every operation takes the owner's username and only ever sees that
/// owner's rows; anything else is reported as not found.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    device_locks: DeviceLocks,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_text(value: &str, field: &'static str, max_len: usize) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    check_length(trimmed, field, max_len)?;
    Ok(trimmed.to_string())
}

fn normalize_optional_text(
    value: Option<&str>,
    field: &'static str,
    max_len: usize,
) -> ResultEngine<String> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    check_length(trimmed, field, max_len)?;
    Ok(trimmed.to_string())
}

fn check_length(value: &str, field: &'static str, max_len: usize) -> ResultEngine<()> {
    if value.chars().count() > max_len {
        return Err(EngineError::InvalidInput {
            field,
            reason: format!("must be at most {max_len} characters"),
        });
    }
    Ok(())
}

/// List filters treat `0` like an absent value.
fn active_filter(value: Option<i32>) -> Option<i32> {
    value.filter(|id| *id != 0)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            device_locks: DeviceLocks::default(),
        })
    }
}
