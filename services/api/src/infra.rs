use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use vehicle_intake::applications::{
    ApplicationChanges, ApplicationId, ApplicationRecord, ApplicationRepository,
    ApplicationSummary, NewApplication, RepositoryError, Vehicle, VehicleId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store standing in for the database.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<BTreeMap<ApplicationId, ApplicationRecord>>>,
    vehicle_sequence: Arc<AtomicU64>,
}

impl InMemoryApplicationRepository {
    fn persist_vehicle(&self, vehicle: Vehicle) -> Vehicle {
        let next = self.vehicle_sequence.fetch_add(1, Ordering::Relaxed) + 1;
        Vehicle {
            id: Some(VehicleId(format!("veh-{next:06}"))),
            remove: false,
            ..vehicle
        }
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<ApplicationId, ApplicationRecord>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: NewApplication) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }

        let NewApplication {
            id,
            fields,
            vehicles,
        } = application;
        let record = ApplicationRecord {
            id,
            name: fields.name,
            first_name: fields.first_name,
            last_name: fields.last_name,
            dob: fields.dob,
            completed: fields.completed,
            address: fields.address,
            vehicles: vehicles
                .to_create
                .into_iter()
                .map(|vehicle| self.persist_vehicle(vehicle))
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
        let mut guard = self.lock()?;
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;

        let ApplicationChanges { fields, vehicles } = changes;
        record.name = fields.name;
        record.first_name = fields.first_name;
        record.last_name = fields.last_name;
        record.dob = fields.dob;
        record.completed = fields.completed;
        record.address = fields.address;

        record.vehicles.retain(|stored| {
            stored
                .id
                .as_ref()
                .map_or(true, |stored_id| !vehicles.to_delete.contains(stored_id))
        });
        for update in vehicles.to_update {
            if let Some(stored) = record.vehicles.iter_mut().find(|stored| stored.id == update.id) {
                *stored = update;
            }
        }
        for created in vehicles.to_create {
            let created = self.persist_vehicle(created);
            record.vehicles.push(created);
        }

        Ok(record.clone())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ApplicationSummary>, RepositoryError> {
        Ok(self.lock()?.values().map(ApplicationRecord::summary).collect())
    }

    fn delete(&self, id: &ApplicationId) -> Result<(), RepositoryError> {
        self.lock()?
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
