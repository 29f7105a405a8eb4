//! Application intake: validation, completeness, and vehicle reconciliation.
//!
//! [`validation`] and [`reconcile`] are pure and hold all of the decision logic. The
//! service, repository contract, and router are thin adapters around them.

pub mod domain;
pub mod form;
pub mod policy;
pub mod reconcile;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{Address, ApplicationId, ApplicationSubmission, Vehicle, VehicleId, VehicleKey};
pub use form::{ApplicationForm, FormError};
pub use policy::IntakePolicy;
pub use reconcile::{reconcile, ReconcileError, ReconciliationBatch, Reconciler};
pub use repository::{
    ApplicationChanges, ApplicationFields, ApplicationRecord, ApplicationRepository,
    ApplicationSummary, NewApplication, RepositoryError,
};
pub use router::application_router;
pub use service::{ApplicationIntakeService, IntakeError};
pub use validation::{
    AddressErrors, ErrorTree, ValidationMode, Validator, VehicleError, VehicleErrors,
};
