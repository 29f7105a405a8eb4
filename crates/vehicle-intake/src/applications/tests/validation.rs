use super::common::*;
use crate::applications::domain::{ApplicationSubmission, VehicleId, VehicleKey};
use crate::applications::policy::IntakePolicy;
use crate::applications::validation::{
    AddressErrors, ErrorTree, ValidationMode, Validator, VehicleError, VehicleErrors,
};
use serde_json::json;

#[test]
fn valid_application_passes_both_modes() {
    let validator = validator();
    let application = submission();

    assert_eq!(validator.validate(&application, ValidationMode::Lenient), None);
    assert_eq!(validator.validate(&application, ValidationMode::Strict), None);
    assert!(validator.is_complete(&application));
}

#[test]
fn lenient_mode_accepts_vehicle_less_drafts() {
    let validator = validator();
    let draft = draft_submission();

    assert_eq!(validator.validate(&draft, ValidationMode::Lenient), None);

    let strict = validator
        .validate(&draft, ValidationMode::Strict)
        .expect("strict mode requires vehicles");
    assert_eq!(
        strict,
        ErrorTree {
            vehicles: Some(VehicleErrors::Collection("Required".to_string())),
            ..ErrorTree::default()
        }
    );
    assert!(!validator.is_complete(&draft));
}

#[test]
fn strict_mode_ignores_removed_vehicles_when_counting() {
    let validator = validator();
    let mut application = draft_submission();
    application.vehicles = vec![removed(saved_vehicle("veh-1", "12345678901234567"))];

    let errors = validator
        .validate(&application, ValidationMode::Strict)
        .expect("only removed vehicles remain");
    assert_eq!(
        errors.vehicles,
        Some(VehicleErrors::Collection("Required".to_string()))
    );
    assert_eq!(validator.validate(&application, ValidationMode::Lenient), None);
}

#[test]
fn removed_vehicles_are_not_validated() {
    let validator = validator();
    let mut application = submission();
    let mut broken = saved_vehicle("veh-9", "bad!");
    broken.make = String::new();
    application.vehicles.push(removed(broken));

    assert_eq!(validator.validate(&application, ValidationMode::Strict), None);
}

#[test]
fn empty_application_reports_every_required_field() {
    let validator = validator();
    let mut application = draft_submission();
    application.name.clear();
    application.first_name.clear();
    application.last_name.clear();
    application.dob.clear();
    application.address = Default::default();

    let errors = validator
        .validate(&application, ValidationMode::Strict)
        .expect("errors reported");

    assert_eq!(
        errors,
        ErrorTree {
            name: Some("Required".to_string()),
            first_name: Some("Required".to_string()),
            last_name: Some("Required".to_string()),
            dob: Some("Invalid Date. Must be at least 16 years old".to_string()),
            address: Some(AddressErrors {
                street: Some("Required".to_string()),
                city: Some("Required".to_string()),
                state: Some("Required".to_string()),
                zip: Some("Required".to_string()),
            }),
            vehicles: Some(VehicleErrors::Collection("Required".to_string())),
        }
    );
}

#[test]
fn single_invalid_field_reports_only_that_field() {
    let validator = validator();
    type Mutation = Box<dyn Fn(&mut ApplicationSubmission)>;
    let cases: Vec<(Mutation, ErrorTree)> = vec![
        (
            Box::new(|app: &mut ApplicationSubmission| app.name = "Jo".to_string()) as Mutation,
            ErrorTree {
                name: Some("Must be at least 3 characters".to_string()),
                ..ErrorTree::default()
            },
        ),
        (
            Box::new(|app: &mut ApplicationSubmission| app.first_name = "a".repeat(31)) as Mutation,
            ErrorTree {
                first_name: Some("Must be less than 30 characters".to_string()),
                ..ErrorTree::default()
            },
        ),
        (
            Box::new(|app: &mut ApplicationSubmission| app.last_name = "Doe!".to_string()) as Mutation,
            ErrorTree {
                last_name: Some("Must be alphanumeric".to_string()),
                ..ErrorTree::default()
            },
        ),
        (
            Box::new(|app: &mut ApplicationSubmission| app.dob = "2015-06-01".to_string()) as Mutation,
            ErrorTree {
                dob: Some("Invalid Date. Must be at least 16 years old".to_string()),
                ..ErrorTree::default()
            },
        ),
        (
            Box::new(|app: &mut ApplicationSubmission| app.address.city = "Area 51".to_string()) as Mutation,
            ErrorTree {
                address: Some(AddressErrors {
                    city: Some("Shouldn't contain numbers or special characters".to_string()),
                    ..AddressErrors::default()
                }),
                ..ErrorTree::default()
            },
        ),
        (
            Box::new(|app: &mut ApplicationSubmission| app.address.zip = "1234".to_string()) as Mutation,
            ErrorTree {
                address: Some(AddressErrors {
                    zip: Some("Must be 5 digits".to_string()),
                    ..AddressErrors::default()
                }),
                ..ErrorTree::default()
            },
        ),
    ];

    for (mutate, expected) in cases {
        let mut application = submission();
        mutate(&mut application);
        let errors = validator
            .validate(&application, ValidationMode::Strict)
            .expect("one field invalid");
        assert_eq!(errors, expected);
    }
}

#[test]
fn vehicle_errors_are_tagged_by_identifier_or_vin() {
    let validator = validator();
    let mut application = submission();

    let mut saved = saved_vehicle("veh-7", "12345678901234568");
    saved.year = Some(1984);
    let pending = vehicle("1GNEK13Z23R29898");
    application.vehicles = vec![saved, pending];

    let errors = validator
        .validate(&application, ValidationMode::Lenient)
        .expect("vehicle errors");
    let vehicles = errors.vehicles.expect("vehicle errors present");

    assert_eq!(
        vehicles,
        VehicleErrors::Entries(vec![
            VehicleError {
                key: VehicleKey::Persisted(VehicleId("veh-7".to_string())),
                make: None,
                model: None,
                year: Some("Must be at least 1985".to_string()),
                vin: None,
            },
            VehicleError {
                key: VehicleKey::Pending("1GNEK13Z23R29898".to_string()),
                make: None,
                model: None,
                year: None,
                vin: Some("Must be 17 characters. Currently 16".to_string()),
            },
        ])
    );
    assert!(vehicles
        .find(&VehicleKey::Pending("1GNEK13Z23R29898".to_string()))
        .is_some());
}

#[test]
fn model_year_upper_bound_tracks_current_year() {
    let validator = validator();
    let mut application = submission();
    application.vehicles[0].year = Some(2028);

    let errors = validator
        .validate(&application, ValidationMode::Strict)
        .expect("year too new");
    let vehicles = errors.vehicles.expect("vehicle errors");
    let entry = &vehicles.entries()[0];
    assert_eq!(entry.year.as_deref(), Some("Must be less than 2028"));
}

#[test]
fn policy_limits_change_messages() {
    let policy = IntakePolicy {
        minimum_age_years: 18,
        earliest_model_year: 1990,
        ..IntakePolicy::default()
    };
    let validator = Validator::new(policy, today());
    let mut application = submission();
    application.dob = "2010-01-01".to_string();
    application.vehicles[0].year = Some(1989);

    let errors = validator
        .validate(&application, ValidationMode::Strict)
        .expect("errors");
    assert_eq!(
        errors.dob.as_deref(),
        Some("Invalid Date. Must be at least 18 years old")
    );
    assert_eq!(
        errors.vehicles.expect("vehicle errors").entries()[0].year.as_deref(),
        Some("Must be at least 1990")
    );
}

#[test]
fn validation_is_repeatable() {
    let validator = validator();
    let mut application = submission();
    application.name = "J".to_string();
    application.vehicles[0].vin = "bad vin".to_string();
    let snapshot = application.clone();

    let first = validator.validate(&application, ValidationMode::Strict);
    let second = validator.validate(&application, ValidationMode::Strict);

    assert_eq!(first, second);
    assert_eq!(application, snapshot);
}

#[test]
fn error_tree_serializes_in_form_shape() {
    let validator = validator();
    let mut application = submission();
    application.first_name = String::new();
    application.address.state = "California".to_string();
    application.vehicles[0].make = "VW".to_string();

    let errors = validator
        .validate(&application, ValidationMode::Lenient)
        .expect("errors");

    assert_eq!(
        serde_json::to_value(&errors).expect("serializes"),
        json!({
            "firstName": "Required",
            "address": { "state": "Must be 2 characters" },
            "vehicles": [
                {
                    "kind": "pending",
                    "id": "12345678901234567",
                    "make": "Must be at least 3 characters"
                }
            ]
        })
    );
}

#[test]
fn collection_error_serializes_as_message() {
    let errors = validator()
        .validate(&draft_submission(), ValidationMode::Strict)
        .expect("strict errors");

    assert_eq!(
        serde_json::to_value(&errors).expect("serializes"),
        json!({ "vehicles": "Required" })
    );
}

#[test]
fn empty_subtrees_do_not_count_as_errors() {
    let tree = ErrorTree {
        address: Some(AddressErrors::default()),
        vehicles: Some(VehicleErrors::Entries(Vec::new())),
        ..ErrorTree::default()
    };

    assert!(!tree.has_errors());
    assert_eq!(tree.into_option(), None);
}

#[test]
fn vehicle_errors_expose_a_flat_identifier() {
    let validator = validator();
    let mut application = submission();
    let mut saved = saved_vehicle("veh-3", "12345678901234568");
    saved.model = String::new();
    application.vehicles = vec![saved];

    let errors = validator
        .validate(&application, ValidationMode::Lenient)
        .expect("errors");
    let rendered = serde_json::to_value(&errors).expect("serializes");

    assert_eq!(
        rendered["vehicles"],
        json!([{ "kind": "persisted", "id": "veh-3", "model": "Required" }])
    );

    let decoded: ErrorTree = serde_json::from_value(rendered).expect("deserializes");
    assert_eq!(decoded, errors);
}
