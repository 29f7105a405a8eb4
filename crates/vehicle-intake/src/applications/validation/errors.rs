use serde::{Deserialize, Serialize};

use super::super::domain::VehicleKey;

/// Field-level validation messages shaped like the submitted application.
///
/// A `None` field is valid. The presentation layer renders each message next to the
/// input it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorTree {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicles: Option<VehicleErrors>,
}

impl ErrorTree {
    pub fn has_errors(&self) -> bool {
        self.name.is_some()
            || self.first_name.is_some()
            || self.last_name.is_some()
            || self.dob.is_some()
            || self.address.as_ref().is_some_and(AddressErrors::has_errors)
            || self.vehicles.as_ref().is_some_and(VehicleErrors::has_errors)
    }

    /// Collapse an empty tree to `None`.
    pub fn into_option(self) -> Option<Self> {
        self.has_errors().then_some(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

impl AddressErrors {
    pub fn has_errors(&self) -> bool {
        self.street.is_some() || self.city.is_some() || self.state.is_some() || self.zip.is_some()
    }
}

/// Errors attached to the vehicle collection.
///
/// Serializes as a bare message when the collection itself is at fault, or as a list of
/// per-vehicle entries otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VehicleErrors {
    Collection(String),
    Entries(Vec<VehicleError>),
}

impl VehicleErrors {
    pub fn has_errors(&self) -> bool {
        match self {
            VehicleErrors::Collection(_) => true,
            VehicleErrors::Entries(entries) => !entries.is_empty(),
        }
    }

    pub fn entries(&self) -> &[VehicleError] {
        match self {
            VehicleErrors::Collection(_) => &[],
            VehicleErrors::Entries(entries) => entries,
        }
    }

    pub fn find(&self, key: &VehicleKey) -> Option<&VehicleError> {
        self.entries().iter().find(|entry| &entry.key == key)
    }
}

/// Partial error object for one vehicle, tagged so the renderer can find its sub-form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleError {
    /// Flattened into `kind` and `id`, where `id` is the vehicle id or the pending VIN.
    #[serde(flatten)]
    pub key: VehicleKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
}

impl VehicleError {
    pub fn has_errors(&self) -> bool {
        self.make.is_some() || self.model.is_some() || self.year.is_some() || self.vin.is_some()
    }
}
