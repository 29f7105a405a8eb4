//! Classification of a client-edited vehicle list into persistence operations.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::domain::{Vehicle, VehicleId, VehicleKey};
use super::policy::IntakePolicy;

/// Vehicle operations to hand to the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationBatch {
    pub to_create: Vec<Vehicle>,
    pub to_update: Vec<Vehicle>,
    pub to_delete: Vec<VehicleId>,
}

impl ReconciliationBatch {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }
}

/// Structural problems with the candidate list as a whole.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error("at most {limit} vehicles are allowed per application (found {count})")]
    CapacityExceeded { count: usize, limit: usize },
    #[error("duplicate VIN(s) in vehicle list: {}", vins.join(", "))]
    DuplicateVin { vins: Vec<String> },
    #[error("vehicle {0} does not belong to this application")]
    UnknownVehicle(VehicleId),
    #[error("vehicle {0} appears more than once in the vehicle list")]
    DuplicateVehicle(VehicleId),
}

/// Classifies candidates for an application with no persisted vehicles to compare against.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    max_vehicles: usize,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(&IntakePolicy::default())
    }
}

impl Reconciler {
    pub fn new(policy: &IntakePolicy) -> Self {
        Self {
            max_vehicles: policy.max_vehicles,
        }
    }

    /// Classify every candidate into create, update or delete.
    ///
    /// Capacity and VIN uniqueness are checked first; a failure produces no batch.
    pub fn reconcile(&self, candidates: &[Vehicle]) -> Result<ReconciliationBatch, ReconcileError> {
        check_identifiers(candidates)?;
        self.check_collection(candidates.iter().filter(|vehicle| vehicle.is_active()))?;
        Ok(classify(candidates))
    }

    /// Reconcile against the vehicles currently stored for the application.
    ///
    /// Candidates must only reference stored identifiers. Stored vehicles the client left
    /// out of the list are kept as they are, so they still count toward capacity and VIN
    /// uniqueness.
    pub fn reconcile_against(
        &self,
        previous: &[Vehicle],
        candidates: &[Vehicle],
    ) -> Result<ReconciliationBatch, ReconcileError> {
        check_identifiers(candidates)?;
        let known: HashSet<&VehicleId> = previous.iter().filter_map(|vehicle| vehicle.id.as_ref()).collect();

        let mut referenced = HashSet::new();
        for id in candidates.iter().filter_map(|vehicle| vehicle.id.as_ref()) {
            if !known.contains(id) {
                return Err(ReconcileError::UnknownVehicle(id.clone()));
            }
            referenced.insert(id);
        }

        let retained = previous.iter().filter(|vehicle| {
            vehicle
                .id
                .as_ref()
                .map_or(true, |id| !referenced.contains(id))
        });
        let active = candidates.iter().filter(|vehicle| vehicle.is_active());

        self.check_collection(retained.chain(active))?;
        Ok(classify(candidates))
    }

    fn check_collection<'a>(
        &self,
        vehicles: impl Iterator<Item = &'a Vehicle>,
    ) -> Result<(), ReconcileError> {
        let mut count = 0usize;
        let mut vins: BTreeMap<&str, usize> = BTreeMap::new();
        for vehicle in vehicles {
            count += 1;
            *vins.entry(vehicle.vin.as_str()).or_default() += 1;
        }

        if count > self.max_vehicles {
            return Err(ReconcileError::CapacityExceeded {
                count,
                limit: self.max_vehicles,
            });
        }

        let duplicates: Vec<String> = vins
            .into_iter()
            .filter(|(_, occurrences)| *occurrences > 1)
            .map(|(vin, _)| vin.to_string())
            .collect();
        if !duplicates.is_empty() {
            return Err(ReconcileError::DuplicateVin { vins: duplicates });
        }

        Ok(())
    }
}

/// Reconcile with the default vehicle capacity.
pub fn reconcile(candidates: &[Vehicle]) -> Result<ReconciliationBatch, ReconcileError> {
    Reconciler::default().reconcile(candidates)
}

/// Each persisted vehicle may be listed once, removed or not.
fn check_identifiers(candidates: &[Vehicle]) -> Result<(), ReconcileError> {
    let mut seen = HashSet::new();
    for id in candidates.iter().filter_map(|vehicle| vehicle.id.as_ref()) {
        if !seen.insert(id) {
            return Err(ReconcileError::DuplicateVehicle(id.clone()));
        }
    }
    Ok(())
}

fn classify(candidates: &[Vehicle]) -> ReconciliationBatch {
    let mut batch = ReconciliationBatch::default();

    for vehicle in candidates {
        match (vehicle.key(), vehicle.remove) {
            (VehicleKey::Persisted(id), true) => batch.to_delete.push(id),
            (VehicleKey::Persisted(_), false) => batch.to_update.push(vehicle.clone()),
            (VehicleKey::Pending(_), false) => batch.to_create.push(vehicle.clone()),
            // Added and removed before it was ever saved.
            (VehicleKey::Pending(_), true) => {}
        }
    }

    batch
}
