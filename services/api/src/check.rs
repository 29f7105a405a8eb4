use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use vehicle_intake::applications::{
    ApplicationSubmission, ErrorTree, IntakePolicy, ReconciliationBatch,
    Reconciler, ValidationMode, Validator,
};
use vehicle_intake::config::AppConfig;
use vehicle_intake::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Path to an application document in JSON form
    pub(crate) path: PathBuf,
    /// Evaluate date rules as of this day (YYYY-MM-DD) instead of the local date
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckReport {
    pub(crate) lenient: Option<ErrorTree>,
    pub(crate) strict: Option<ErrorTree>,
    pub(crate) completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) batch: Option<ReconciliationBatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) conflict: Option<String>,
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let policy = AppConfig::load()?.intake;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let raw = fs::read_to_string(&args.path)?;
    let submission: ApplicationSubmission = serde_json::from_str(&raw)?;
    debug!(path = %args.path.display(), %today, "checking application document");

    let report = build_report(&submission, policy, today);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn build_report(
    submission: &ApplicationSubmission,
    policy: IntakePolicy,
    today: NaiveDate,
) -> CheckReport {
    let reconciler = Reconciler::new(&policy);
    let validator = Validator::new(policy, today);

    let (batch, conflict) = match reconciler.reconcile(&submission.vehicles) {
        Ok(batch) => (Some(batch), None),
        Err(err) => (None, Some(err.to_string())),
    };

    CheckReport {
        lenient: validator.validate(submission, ValidationMode::Lenient),
        strict: validator.validate(submission, ValidationMode::Strict),
        completed: validator.is_complete(submission),
        batch,
        conflict,
    }
}
