pub use allocation::{AllocationRequest, CapacityExceeded, battery_noun, validate_allocation};
pub use assignments::Assignment;
pub use battery_models::BatteryModel;
pub use battery_types::BatteryType;
pub use devices::{Device, MAX_CAPACITY, MIN_CAPACITY};
pub use error::EngineError;
pub use ops::{
    AssignmentFilter, AssignmentInput, AssignmentList, DEFAULT_BATTERY_MODELS,
    DEFAULT_BATTERY_TYPES, DeviceFilter, DeviceInput, DeviceList, Engine, EngineBuilder,
};
pub use users::User;

pub mod allocation;
mod assignments;
mod battery_models;
mod battery_types;
mod devices;
mod error;
mod ops;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
