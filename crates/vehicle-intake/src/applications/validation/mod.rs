mod errors;
pub(crate) mod rules;

pub use errors::{AddressErrors, ErrorTree, VehicleError, VehicleErrors};

use chrono::NaiveDate;

use super::domain::{Address, ApplicationSubmission, Vehicle};
use super::policy::IntakePolicy;

/// Selects how the vehicle collection is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Saving a draft: an application without vehicles is acceptable.
    Lenient,
    /// Deciding completeness: at least one active vehicle is required.
    Strict,
}

/// Stateless field validator evaluated against a fixed reference date.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    policy: IntakePolicy,
    today: NaiveDate,
}

impl Validator {
    pub fn new(policy: IntakePolicy, today: NaiveDate) -> Self {
        Self { policy, today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    /// Validate the application, returning `None` when every field passes.
    pub fn validate(
        &self,
        application: &ApplicationSubmission,
        mode: ValidationMode,
    ) -> Option<ErrorTree> {
        let tree = ErrorTree {
            name: rules::name(&application.name),
            first_name: rules::name(&application.first_name),
            last_name: rules::name(&application.last_name),
            dob: rules::date_of_birth(&application.dob, self.policy.minimum_age_years, self.today),
            address: self.validate_address(&application.address),
            vehicles: self.validate_vehicles(&application.vehicles, mode),
        };

        tree.into_option()
    }

    /// An application is complete once it passes strict validation.
    pub fn is_complete(&self, application: &ApplicationSubmission) -> bool {
        self.validate(application, ValidationMode::Strict).is_none()
    }

    fn validate_address(&self, address: &Address) -> Option<AddressErrors> {
        let errors = AddressErrors {
            street: rules::street(&address.street),
            city: rules::city(&address.city),
            state: rules::state(&address.state),
            zip: rules::zip(&address.zip),
        };

        errors.has_errors().then_some(errors)
    }

    fn validate_vehicles(&self, vehicles: &[Vehicle], mode: ValidationMode) -> Option<VehicleErrors> {
        let mut active = 0usize;
        let mut entries = Vec::new();

        for vehicle in vehicles.iter().filter(|vehicle| vehicle.is_active()) {
            active += 1;
            if let Some(error) = self.validate_vehicle(vehicle) {
                entries.push(error);
            }
        }

        if !entries.is_empty() {
            return Some(VehicleErrors::Entries(entries));
        }

        if mode == ValidationMode::Strict && active == 0 {
            return Some(VehicleErrors::Collection(rules::REQUIRED.to_string()));
        }

        None
    }

    fn validate_vehicle(&self, vehicle: &Vehicle) -> Option<VehicleError> {
        // The key is taken before the VIN is judged, so an invalid VIN still tags its own error.
        let error = VehicleError {
            key: vehicle.key(),
            make: rules::name(&vehicle.make),
            model: rules::name(&vehicle.model),
            year: rules::model_year(vehicle.year, self.policy.earliest_model_year, self.today),
            vin: rules::vin(&vehicle.vin),
        };

        error.has_errors().then_some(error)
    }
}
