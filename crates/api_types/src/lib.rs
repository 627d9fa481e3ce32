use serde::{Deserialize, Deserializer, Serialize};

/// Reads an optional id filter from a query string, where an empty value
/// (`?battery_type=`) means the same as leaving the parameter out.
fn optional_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Response body of every create endpoint.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub id: i32,
}

pub mod battery_type {
    use super::*;

    /// Request body for creating/updating a battery type.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BatteryTypeUpsert {
        pub code: String,
        /// Free text, may be omitted or blank.
        #[serde(default)]
        pub description: Option<String>,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BatteryTypeView {
        pub id: i32,
        pub code: String,
        pub description: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BatteryTypeListResponse {
        pub battery_types: Vec<BatteryTypeView>,
    }
}

pub mod battery_model {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BatteryModelUpsert {
        pub description: String,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BatteryModelView {
        pub id: i32,
        pub description: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BatteryModelListResponse {
        pub battery_models: Vec<BatteryModelView>,
    }
}

pub mod device {
    use super::*;

    /// Query string of the device list.
    ///
    /// `battery_type=0` and `battery_type=` behave like an absent parameter.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DeviceListQuery {
        #[serde(default, deserialize_with = "super::optional_id")]
        pub battery_type: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeviceUpsert {
        pub description: String,
        pub battery_type_id: i32,
        pub capacity: i32,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DeviceView {
        pub id: i32,
        pub description: String,
        pub battery_type_id: i32,
        /// Code of the device's battery type.
        pub battery_type: String,
        pub capacity: i32,
        /// Display label, e.g. "Remote (2x AAA)".
        pub label: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeviceListResponse {
        pub devices: Vec<DeviceView>,
        /// Sum of the listed devices' capacities.
        pub battery_total: i64,
    }
}

pub mod assignment {
    use super::*;

    /// Query string of the assignment list. Both filters apply together and
    /// `0` or an empty value behaves like an absent parameter.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AssignmentListQuery {
        #[serde(default, deserialize_with = "super::optional_id")]
        pub battery_type: Option<i32>,
        #[serde(default, deserialize_with = "super::optional_id")]
        pub battery_model: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AssignmentUpsert {
        pub device_id: i32,
        pub battery_model_id: i32,
        pub quantity: i32,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AssignmentView {
        pub id: i32,
        pub device_id: i32,
        /// Label of the device, e.g. "Remote (2x AAA)".
        pub device: String,
        pub battery_model_id: i32,
        pub battery_model: String,
        pub quantity: i32,
        /// Display label, e.g. "Remote (2x AAA) (1x Rechargeable 1.2V)".
        pub label: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AssignmentListResponse {
        pub assignments: Vec<AssignmentView>,
        /// Sum of the listed assignments' quantities.
        pub battery_total: i64,
    }
}
