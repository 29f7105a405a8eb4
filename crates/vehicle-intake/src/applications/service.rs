use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use super::domain::{ApplicationId, ApplicationSubmission, Vehicle};
use super::form::{ApplicationForm, FormError};
use super::policy::IntakePolicy;
use super::reconcile::{ReconcileError, Reconciler};
use super::repository::{
    ApplicationChanges, ApplicationFields, ApplicationRecord, ApplicationRepository,
    ApplicationSummary, NewApplication, RepositoryError,
};
use super::validation::{ErrorTree, ValidationMode, Validator};

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Service composing form decoding, validation, reconciliation and persistence.
pub struct ApplicationIntakeService<R> {
    repository: Arc<R>,
    policy: IntakePolicy,
    reconciler: Reconciler,
    clock: Clock,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

impl<R> ApplicationIntakeService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: IntakePolicy) -> Self {
        Self::with_clock(repository, policy, || Local::now().date_naive())
    }

    /// Build a service that judges ages and model years against a custom clock.
    pub fn with_clock<F>(repository: Arc<R>, policy: IntakePolicy, clock: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        Self {
            repository,
            policy,
            reconciler: Reconciler::new(&policy),
            clock: Arc::new(clock),
        }
    }

    pub fn validator(&self) -> Validator {
        Validator::new(self.policy, (self.clock)())
    }

    /// Create a new application from a submitted form.
    pub fn create(&self, form: ApplicationForm) -> Result<ApplicationRecord, IntakeError> {
        let submission = ApplicationSubmission::try_from(form)?;
        let validator = self.validator();
        Self::ensure_valid(&validator, &submission)?;

        let vehicles = self.reconciler.reconcile(&submission.vehicles).map_err(|err| {
            warn!(error = %err, "vehicle list rejected on create");
            err
        })?;
        let completed = validator.is_complete(&submission);

        let id = next_application_id();
        let record = self.repository.insert(NewApplication {
            id: id.clone(),
            fields: ApplicationFields::from_submission(&submission, completed),
            vehicles,
        })?;

        info!(application_id = %id, completed, vehicles = record.vehicles.len(), "application created");
        Ok(record)
    }

    /// Apply a submitted form to an existing application.
    pub fn update(
        &self,
        id: &ApplicationId,
        form: ApplicationForm,
    ) -> Result<ApplicationRecord, IntakeError> {
        let stored = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        let submission = ApplicationSubmission::try_from(form)?;
        let validator = self.validator();
        Self::ensure_valid(&validator, &submission)?;

        let vehicles = self
            .reconciler
            .reconcile_against(&stored.vehicles, &submission.vehicles)
            .map_err(|err| {
                warn!(application_id = %id, error = %err, "vehicle list rejected on update");
                err
            })?;
        let completed = validator.is_complete(&resulting_submission(&stored, &submission));

        debug!(
            application_id = %id,
            create = vehicles.to_create.len(),
            update = vehicles.to_update.len(),
            delete = vehicles.to_delete.len(),
            "vehicle batch reconciled"
        );

        let record = self.repository.apply(
            id,
            ApplicationChanges {
                fields: ApplicationFields::from_submission(&submission, completed),
                vehicles,
            },
        )?;

        info!(application_id = %id, completed, "application updated");
        Ok(record)
    }

    pub fn get(&self, id: &ApplicationId) -> Result<ApplicationRecord, IntakeError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list(&self) -> Result<Vec<ApplicationSummary>, IntakeError> {
        Ok(self.repository.list()?)
    }

    pub fn delete(&self, id: &ApplicationId) -> Result<(), IntakeError> {
        self.repository.delete(id)?;
        info!(application_id = %id, "application deleted");
        Ok(())
    }

    fn ensure_valid(validator: &Validator, submission: &ApplicationSubmission) -> Result<(), IntakeError> {
        match validator.validate(submission, ValidationMode::Lenient) {
            None => Ok(()),
            Some(errors) => {
                debug!(?errors, "submission failed validation");
                Err(IntakeError::Invalid(errors))
            }
        }
    }
}

/// The application as it will look once the batch is applied: stored vehicles the client
/// omitted stay in place alongside the submitted list.
fn resulting_submission(stored: &ApplicationRecord, submission: &ApplicationSubmission) -> ApplicationSubmission {
    let mut vehicles: Vec<Vehicle> = stored
        .vehicles
        .iter()
        .filter(|kept| {
            !submission
                .vehicles
                .iter()
                .any(|candidate| candidate.id.is_some() && candidate.id == kept.id)
        })
        .cloned()
        .collect();
    vehicles.extend(submission.vehicles.iter().cloned());

    ApplicationSubmission {
        vehicles,
        ..submission.clone()
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Malformed(#[from] FormError),
    #[error("application failed validation")]
    Invalid(ErrorTree),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
