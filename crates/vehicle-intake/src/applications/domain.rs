use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for persisted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier assigned to a vehicle by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId(pub String);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a vehicle within one application.
///
/// Saved vehicles are addressed by their identifier. Vehicles that have never been
/// persisted have no identifier yet, so their VIN stands in until the first save.
/// Serialized as `{"kind": "persisted" | "pending", "id": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum VehicleKey {
    Persisted(VehicleId),
    Pending(String),
}

/// Mailing address owned by exactly one application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Vehicle entry as submitted by the client or read back from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::form::deserialize_vehicle_id"
    )]
    pub id: Option<VehicleId>,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, deserialize_with = "super::form::deserialize_model_year")]
    pub year: Option<i32>,
    #[serde(default)]
    pub vin: String,
    /// Set by the client when a previously listed vehicle should be dropped.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub remove: bool,
}

impl Vehicle {
    pub fn key(&self) -> VehicleKey {
        match &self.id {
            Some(id) => VehicleKey::Persisted(id.clone()),
            None => VehicleKey::Pending(self.vin.clone()),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.remove
    }
}

/// Typed application candidate produced by the form boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

impl ApplicationSubmission {
    pub fn active_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter().filter(|vehicle| vehicle.is_active())
    }
}
