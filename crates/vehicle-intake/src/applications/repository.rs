use serde::{Deserialize, Serialize};

use super::domain::{Address, ApplicationId, ApplicationSubmission, Vehicle};
use super::reconcile::ReconciliationBatch;

/// Persisted application with its address and saved vehicles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub completed: bool,
    pub address: Address,
    pub vehicles: Vec<Vehicle>,
}

impl ApplicationRecord {
    pub fn summary(&self) -> ApplicationSummary {
        ApplicationSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            completed: self.completed,
        }
    }

    /// View of the stored record in the same shape the validator consumes.
    pub fn to_submission(&self) -> ApplicationSubmission {
        ApplicationSubmission {
            name: self.name.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            dob: self.dob.clone(),
            address: self.address.clone(),
            vehicles: self.vehicles.clone(),
        }
    }
}

/// Row shown in the application list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSummary {
    pub id: ApplicationId,
    pub name: String,
    pub completed: bool,
}

/// Validated scalar and address fields to upsert on the application itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFields {
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub completed: bool,
    pub address: Address,
}

impl ApplicationFields {
    pub fn from_submission(submission: &ApplicationSubmission, completed: bool) -> Self {
        Self {
            name: submission.name.clone(),
            first_name: submission.first_name.clone(),
            last_name: submission.last_name.clone(),
            dob: submission.dob.clone(),
            completed,
            address: submission.address.clone(),
        }
    }
}

/// Everything needed to create an application: its fields and initial vehicles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub id: ApplicationId,
    pub fields: ApplicationFields,
    pub vehicles: ReconciliationBatch,
}

/// Update to an existing application: replacement fields plus vehicle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationChanges {
    pub fields: ApplicationFields,
    pub vehicles: ReconciliationBatch,
}

/// Storage abstraction so the intake service can be exercised in isolation.
///
/// Implementations assign vehicle identifiers to `to_create` entries and apply each
/// batch atomically.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: NewApplication) -> Result<ApplicationRecord, RepositoryError>;
    fn apply(
        &self,
        id: &ApplicationId,
        changes: ApplicationChanges,
    ) -> Result<ApplicationRecord, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<ApplicationSummary>, RepositoryError>;
    fn delete(&self, id: &ApplicationId) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
