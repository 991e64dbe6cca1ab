//! Pure validation predicates for incoming fields.
//!
//! Each function is side-effect free and independent of storage; a violation
//! fails with `ServiceError::Validation` carrying a human-readable message.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

use crate::errors::ServiceError;
use crate::models::{TodoInput, TodoPatch};

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// An email must have the shape `local@domain.tld`: a non-whitespace local
/// part and a non-whitespace domain containing a dot.
pub fn validate_email(email: &str) -> Result<(), ServiceError> {
    if !email_regex().is_match(email) {
        return Err(ServiceError::Validation("Invalid email format".to_string()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.len() < 6 {
        return Err(ServiceError::Validation(
            "Password must be at least 6 characters long".to_string(),
        ));
    }
    Ok(())
}

/// Parse a due date: a plain calendar date ("2026-08-06") or the date part
/// of an RFC 3339 timestamp.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, ServiceError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime.date_naive());
    }
    Err(ServiceError::Validation(
        "Invalid due date format".to_string(),
    ))
}

/// Checks a create input: title required and non-blank after trimming, due
/// date (if present) a valid calendar date. Status needs no check here: the
/// external mapping is total and the internal type is an enum.
pub fn validate_todo_input(input: &TodoInput) -> Result<(), ServiceError> {
    if input.title.trim().is_empty() {
        return Err(ServiceError::Validation("title is required".to_string()));
    }
    if input.title.trim().chars().count() > 255 {
        return Err(ServiceError::Validation(
            "title must be at most 255 characters".to_string(),
        ));
    }
    if let Some(raw) = &input.due_date {
        parse_due_date(raw)?;
    }
    Ok(())
}

/// Checks an update input: absence of any field is allowed, but a supplied
/// title must not be blank after trimming.
pub fn validate_update_todo_input(patch: &TodoPatch) -> Result<(), ServiceError> {
    if let Some(title) = &patch.title {
        if title.trim().is_empty() {
            return Err(ServiceError::Validation(
                "title cannot be empty".to_string(),
            ));
        }
        if title.trim().chars().count() > 255 {
            return Err(ServiceError::Validation(
                "title must be at most 255 characters".to_string(),
            ));
        }
    }
    if let Some(Some(raw)) = &patch.due_date {
        parse_due_date(raw)?;
    }
    Ok(())
}
