use crate::shared::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Africa::Dakar;

/// Largest amount accepted at entry (FCFA)
pub const MAX_AMOUNT: i64 = 9_999_999_999;

/// French month names used by reports
pub const MONTH_NAMES: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

/// Current time in Africa/Dakar as an RFC 3339 string
pub fn get_current_timestamp() -> String {
    Utc::now().with_timezone(&Dakar).to_rfc3339()
}

/// Today's calendar date in Africa/Dakar
pub fn today() -> NaiveDate {
    Utc::now().with_timezone(&Dakar).date_naive()
}

/// Name of a month (1-12), or `None` outside that range
pub fn month_name(month: u32) -> Option<&'static str> {
    if (1..=12).contains(&month) {
        Some(MONTH_NAMES[(month - 1) as usize])
    } else {
        None
    }
}

/// Validate a required text field
///
/// # Arguments
/// * `text` - value to check
/// * `field_name` - field name for the error message
pub fn validate_required_field(text: &str, field_name: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::validation(format!("{field_name} est requis")));
    }
    Ok(())
}

/// Validate a minimum number of characters (after trimming)
pub fn validate_min_length(text: &str, min_length: usize, field_name: &str) -> AppResult<()> {
    if text.trim().chars().count() < min_length {
        return Err(AppError::validation(format!(
            "{field_name} doit contenir au moins {min_length} caractères"
        )));
    }
    Ok(())
}

/// Validate a maximum number of characters
pub fn validate_text_length(text: &str, max_length: usize, field_name: &str) -> AppResult<()> {
    let char_count = text.chars().count();
    if char_count > max_length {
        return Err(AppError::validation(format!(
            "{field_name} doit contenir au plus {max_length} caractères (actuellement {char_count})"
        )));
    }
    Ok(())
}

/// Validate a payment or fee amount
///
/// # Rules
/// - strictly positive
/// - at most ten digits
pub fn validate_amount(amount: i64) -> AppResult<()> {
    if amount <= 0 {
        return Err(AppError::validation("Le montant doit être supérieur à 0"));
    }
    if amount > MAX_AMOUNT {
        return Err(AppError::validation(
            "Le montant ne peut pas dépasser 10 chiffres",
        ));
    }
    Ok(())
}

/// Validate a month number (1-12)
pub fn validate_month(month: u32) -> AppResult<()> {
    if !(1..=12).contains(&month) {
        return Err(AppError::validation("Le mois doit être compris entre 1 et 12"));
    }
    Ok(())
}

/// Validate a year (1900-2100)
pub fn validate_year(year: i32) -> AppResult<()> {
    if !(1900..=2100).contains(&year) {
        return Err(AppError::validation(
            "L'année doit être comprise entre 1900 et 2100",
        ));
    }
    Ok(())
}

/// Validate that a date falls in the supported range
pub fn validate_date(date: NaiveDate, field_name: &str) -> AppResult<()> {
    if !(1900..=2100).contains(&date.year()) {
        return Err(AppError::validation(format!(
            "{field_name} doit être comprise entre 1900 et 2100"
        )));
    }
    Ok(())
}
