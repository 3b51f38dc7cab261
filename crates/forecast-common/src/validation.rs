//! Structural validation of hourly forecast entries.

use crate::{ForecastEntry, ValidationError};

/// Check that an entry carries a usable weather condition.
///
/// Only the first condition is inspected. Checks run in a fixed order and the
/// first failure wins.
pub fn validate(entry: &ForecastEntry) -> Result<(), ValidationError> {
    let condition = entry
        .conditions
        .first()
        .ok_or(ValidationError::MissingWeather)?;

    if condition.id == 0 {
        return Err(ValidationError::MissingWeatherId);
    }
    if condition.main.is_empty() {
        return Err(ValidationError::MissingMainType);
    }
    if condition.description.is_empty() {
        return Err(ValidationError::MissingDescription);
    }

    Ok(())
}
