//! Typed boundary between posted form fields and the intake engine.
//!
//! The presentation layer posts flat string fields plus a JSON-encoded vehicle list.
//! Everything is decoded into an [`ApplicationSubmission`] here so that malformed shapes
//! are rejected before any business rule runs.

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{Address, ApplicationSubmission, Vehicle, VehicleId};

/// Raw form payload exactly as the browser submits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    /// JSON array of vehicle objects.
    #[serde(default)]
    pub vehicles: Option<String>,
}

impl ApplicationForm {
    /// Re-encode a typed submission so it can be handed back to the form renderer.
    pub fn from_submission(submission: &ApplicationSubmission) -> Result<Self, FormError> {
        let vehicles = serde_json::to_string(&submission.vehicles)
            .map_err(|source| FormError::EncodeVehicles { source })?;

        Ok(Self {
            name: Some(submission.name.clone()),
            first_name: Some(submission.first_name.clone()),
            last_name: Some(submission.last_name.clone()),
            dob: Some(submission.dob.clone()),
            street: Some(submission.address.street.clone()),
            city: Some(submission.address.city.clone()),
            state: Some(submission.address.state.clone()),
            zip: Some(submission.address.zip.clone()),
            vehicles: Some(vehicles),
        })
    }
}

impl TryFrom<ApplicationForm> for ApplicationSubmission {
    type Error = FormError;

    fn try_from(form: ApplicationForm) -> Result<Self, Self::Error> {
        let vehicles = decode_vehicles(form.vehicles.as_deref())?;

        Ok(ApplicationSubmission {
            name: form.name.unwrap_or_default(),
            first_name: form.first_name.unwrap_or_default(),
            last_name: form.last_name.unwrap_or_default(),
            dob: form.dob.unwrap_or_default(),
            address: Address {
                street: form.street.unwrap_or_default(),
                city: form.city.unwrap_or_default(),
                state: form.state.unwrap_or_default(),
                zip: form.zip.unwrap_or_default(),
            },
            vehicles,
        })
    }
}

/// Decode the JSON-encoded vehicle list carried by the form.
///
/// A missing or blank field means the client sent no vehicles. Anything else must be a
/// JSON array of vehicle objects.
pub fn decode_vehicles(raw: Option<&str>) -> Result<Vec<Vehicle>, FormError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(Vec::new()),
        Some(raw) => raw,
    };

    serde_json::from_str::<Vec<Vehicle>>(raw).map_err(|source| FormError::MalformedVehicles { source })
}

/// Malformed request payloads. These fail the whole request.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("vehicle payload is not a valid vehicle list: {source}")]
    MalformedVehicles { source: serde_json::Error },
    #[error("unable to encode vehicle list: {source}")]
    EncodeVehicles { source: serde_json::Error },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdentifier {
    Text(String),
    Number(u64),
}

pub(crate) fn deserialize_vehicle_id<'de, D>(deserializer: D) -> Result<Option<VehicleId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawIdentifier>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawIdentifier::Text(text)) if !text.trim().is_empty() => {
            Some(VehicleId(text.trim().to_string()))
        }
        Some(RawIdentifier::Number(number)) => Some(VehicleId(number.to_string())),
        _ => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawYear {
    Number(i64),
    Text(String),
}

pub(crate) fn deserialize_model_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawYear>::deserialize(deserializer)?;
    let number = match raw {
        None => return Ok(None),
        Some(RawYear::Number(number)) => number,
        Some(RawYear::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<i64>().map_err(|_| {
                serde::de::Error::custom(format!("year '{text}' is not a whole number"))
            })?
        }
    };

    i32::try_from(number)
        .map(Some)
        .map_err(|_| serde::de::Error::custom(format!("year {number} is out of range")))
}
