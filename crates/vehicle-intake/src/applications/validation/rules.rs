use chrono::{DateTime, Datelike, Months, NaiveDate};

pub(crate) const REQUIRED: &str = "Required";
const MIN_TEXT_LENGTH: usize = 3;
const MAX_TEXT_LENGTH: usize = 30;
const STATE_LENGTH: usize = 2;
const ZIP_LENGTH: usize = 5;
const VIN_LENGTH: usize = 17;

fn is_alphanumeric_or_space(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' '
}

fn is_alphabetic_or_space(c: char) -> bool {
    c.is_ascii_alphabetic() || c == ' '
}

/// Shared shape of the free-text rules: required, bounded length, restricted charset.
fn bounded_text(value: &str, allowed: fn(char) -> bool, charset_message: &str) -> Option<String> {
    let length = value.chars().count();
    if value.is_empty() {
        Some(REQUIRED.to_string())
    } else if length < MIN_TEXT_LENGTH {
        Some(format!("Must be at least {MIN_TEXT_LENGTH} characters"))
    } else if length > MAX_TEXT_LENGTH {
        Some(format!("Must be less than {MAX_TEXT_LENGTH} characters"))
    } else if !value.chars().all(allowed) {
        Some(charset_message.to_string())
    } else {
        None
    }
}

/// Applicant names, vehicle make and model, and street lines.
pub(crate) fn name(value: &str) -> Option<String> {
    bounded_text(value, is_alphanumeric_or_space, "Must be alphanumeric")
}

pub(crate) fn street(value: &str) -> Option<String> {
    name(value)
}

pub(crate) fn city(value: &str) -> Option<String> {
    bounded_text(
        value,
        is_alphabetic_or_space,
        "Shouldn't contain numbers or special characters",
    )
}

pub(crate) fn state(value: &str) -> Option<String> {
    if value.is_empty() {
        Some(REQUIRED.to_string())
    } else if value.chars().count() != STATE_LENGTH {
        Some(format!("Must be {STATE_LENGTH} characters"))
    } else if !value.chars().all(|c| c.is_ascii_alphabetic()) {
        Some("Must be alphabetic".to_string())
    } else {
        None
    }
}

pub(crate) fn zip(value: &str) -> Option<String> {
    if value.is_empty() {
        Some(REQUIRED.to_string())
    } else if value.chars().count() != ZIP_LENGTH {
        Some(format!("Must be {ZIP_LENGTH} digits"))
    } else if !value.chars().all(|c| c.is_ascii_digit()) {
        Some("Must be numeric".to_string())
    } else {
        None
    }
}

pub(crate) fn vin(value: &str) -> Option<String> {
    let length = value.chars().count();
    if value.is_empty() {
        Some(REQUIRED.to_string())
    } else if length != VIN_LENGTH {
        Some(format!("Must be {VIN_LENGTH} characters. Currently {length}"))
    } else if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some("Must be alphanumeric".to_string())
    } else {
        None
    }
}

/// Model year must fall between the earliest accepted year and next year's models.
pub(crate) fn model_year(year: Option<i32>, earliest: i32, today: NaiveDate) -> Option<String> {
    let latest = today.year() + 1;
    match year {
        None | Some(0) => Some(REQUIRED.to_string()),
        Some(year) if year < earliest => Some(format!("Must be at least {earliest}")),
        Some(year) if year > latest => Some(format!("Must be less than {}", latest + 1)),
        Some(_) => None,
    }
}

/// Date of birth must parse and put the applicant at or over the minimum age today.
pub(crate) fn date_of_birth(value: &str, minimum_age_years: u32, today: NaiveDate) -> Option<String> {
    let message = || Some(format!("Invalid Date. Must be at least {minimum_age_years} years old"));

    let Some(dob) = parse_date(value) else {
        return message();
    };

    let latest_allowed = today.checked_sub_months(Months::new(minimum_age_years.saturating_mul(12)));
    match latest_allowed {
        Some(latest_allowed) if dob <= latest_allowed => None,
        _ => message(),
    }
}

/// Accepts the `YYYY-MM-DD` value date inputs post, or a full RFC 3339 timestamp.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}
