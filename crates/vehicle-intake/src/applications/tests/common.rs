use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::applications::domain::{
    Address, ApplicationId, ApplicationSubmission, Vehicle, VehicleId,
};
use crate::applications::form::ApplicationForm;
use crate::applications::policy::IntakePolicy;
use crate::applications::repository::{
    ApplicationChanges, ApplicationRecord, ApplicationRepository, ApplicationSummary,
    NewApplication, RepositoryError,
};
use crate::applications::validation::Validator;
use crate::applications::{application_router, ApplicationIntakeService};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date")
}

pub(super) fn validator() -> Validator {
    Validator::new(IntakePolicy::default(), today())
}

pub(super) fn address() -> Address {
    Address {
        street: "123 Main St".to_string(),
        city: "Anytown".to_string(),
        state: "CA".to_string(),
        zip: "12345".to_string(),
    }
}

pub(super) fn vehicle(vin: &str) -> Vehicle {
    Vehicle {
        id: None,
        make: "Toyota".to_string(),
        model: "Corolla".to_string(),
        year: Some(2010),
        vin: vin.to_string(),
        remove: false,
    }
}

pub(super) fn saved_vehicle(id: &str, vin: &str) -> Vehicle {
    Vehicle {
        id: Some(VehicleId(id.to_string())),
        ..vehicle(vin)
    }
}

pub(super) fn removed(mut vehicle: Vehicle) -> Vehicle {
    vehicle.remove = true;
    vehicle
}

pub(super) fn submission() -> ApplicationSubmission {
    ApplicationSubmission {
        name: "John Doe".to_string(),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        dob: "2000-01-01".to_string(),
        address: address(),
        vehicles: vec![vehicle("12345678901234567")],
    }
}

pub(super) fn draft_submission() -> ApplicationSubmission {
    ApplicationSubmission {
        vehicles: Vec::new(),
        ..submission()
    }
}

pub(super) fn form(submission: &ApplicationSubmission) -> ApplicationForm {
    ApplicationForm::from_submission(submission).expect("submission encodes")
}

pub(super) fn build_service() -> (ApplicationIntakeService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service =
        ApplicationIntakeService::with_clock(repository.clone(), IntakePolicy::default(), today);
    (service, repository)
}

pub(super) fn application_router_with_service(
    service: ApplicationIntakeService<MemoryRepository>,
) -> axum::Router {
    application_router(Arc::new(service))
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<BTreeMap<ApplicationId, ApplicationRecord>>,
    vehicle_sequence: AtomicU64,
    pub(super) applied: Mutex<Vec<ApplicationChanges>>,
}

impl MemoryRepository {
    fn assign_id(&self, vehicle: Vehicle) -> Vehicle {
        let next = self.vehicle_sequence.fetch_add(1, Ordering::Relaxed) + 1;
        Vehicle {
            id: Some(VehicleId(format!("veh-{next}"))),
            remove: false,
            ..vehicle
        }
    }

    pub(super) fn seed(&self, record: ApplicationRecord) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(record.id.clone(), record);
    }
}

impl ApplicationRepository for MemoryRepository {
    fn insert(&self, application: NewApplication) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }

        let fields = application.fields;
        let record = ApplicationRecord {
            id: application.id,
            name: fields.name,
            first_name: fields.first_name,
            last_name: fields.last_name,
            dob: fields.dob,
            completed: fields.completed,
            address: fields.address,
            vehicles: application
                .vehicles
                .to_create
                .into_iter()
                .map(|vehicle| self.assign_id(vehicle))
                .collect(),
        };
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn apply(
        &self,
        id: &ApplicationId,
        changes: ApplicationChanges,
    ) -> Result<ApplicationRecord, RepositoryError> {
        self.applied
            .lock()
            .expect("applied mutex poisoned")
            .push(changes.clone());

        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;

        let fields = changes.fields;
        record.name = fields.name;
        record.first_name = fields.first_name;
        record.last_name = fields.last_name;
        record.dob = fields.dob;
        record.completed = fields.completed;
        record.address = fields.address;

        let batch = changes.vehicles;
        record
            .vehicles
            .retain(|vehicle| !batch.to_delete.iter().any(|id| vehicle.id.as_ref() == Some(id)));
        for update in batch.to_update {
            if let Some(stored) = record.vehicles.iter_mut().find(|vehicle| vehicle.id == update.id) {
                *stored = update;
            }
        }
        for created in batch.to_create {
            let created = self.assign_id(created);
            record.vehicles.push(created);
        }

        Ok(record.clone())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ApplicationSummary>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().map(ApplicationRecord::summary).collect())
    }

    fn delete(&self, id: &ApplicationId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _application: NewApplication) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn apply(
        &self,
        _id: &ApplicationId,
        _changes: ApplicationChanges,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<ApplicationSummary>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &ApplicationId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
