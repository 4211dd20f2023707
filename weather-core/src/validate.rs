//! Form input and field validation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::FieldError;
use crate::model::{Card, Unit, parse_numeric};

/// Named form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    City,
    Country,
    Unit,
    Temperature,
    Feels,
    Condition,
    Humidity,
    Wind,
}

impl Field {
    /// Fields that must be blank or numeric.
    pub const NUMERIC: [Field; 4] = [Field::Temperature, Field::Feels, Field::Humidity, Field::Wind];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::City => "city",
            Field::Country => "country",
            Field::Unit => "unit",
            Field::Temperature => "temperature",
            Field::Feels => "feels",
            Field::Condition => "condition",
            Field::Humidity => "humidity",
            Field::Wind => "wind",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw field values as read from the form at submission time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub city: String,
    pub country: String,
    pub unit: String,
    pub temperature: String,
    pub feels: String,
    pub condition: String,
    pub humidity: String,
    pub wind: String,
}

impl FormInput {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::City => &self.city,
            Field::Country => &self.country,
            Field::Unit => &self.unit,
            Field::Temperature => &self.temperature,
            Field::Feels => &self.feels,
            Field::Condition => &self.condition,
            Field::Humidity => &self.humidity,
            Field::Wind => &self.wind,
        }
    }

    pub fn validate(&self) -> Validation {
        validate(self)
    }

    /// Validate and build a new card stamped with `now`.
    ///
    /// Numeric fields are converted once here; text fields are trimmed.
    pub fn to_card(&self, now: DateTime<Utc>) -> Result<Card, Validation> {
        let validation = self.validate();
        if !validation.is_valid() {
            return Err(validation);
        }

        // Already validated, so a parse failure cannot occur here.
        let numeric = |raw: &str| parse_numeric(raw).ok().flatten();

        Ok(Card {
            id: Card::new_id(),
            city: self.city.trim().to_string(),
            country: self.country.trim().to_string(),
            unit: Unit::parse_or_default(&self.unit),
            temperature: numeric(&self.temperature),
            feels: numeric(&self.feels),
            condition: self.condition.trim().to_string(),
            humidity: numeric(&self.humidity),
            wind: numeric(&self.wind),
            updated_at: now.timestamp_millis(),
        })
    }
}

/// Outcome of one validation pass: only failing fields are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    errors: BTreeMap<Field, FieldError>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    pub fn errors(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.errors.iter().map(|(field, err)| (*field, *err))
    }
}

impl std::fmt::Display for Validation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> =
            self.errors().map(|(field, err)| format!("{field}: {err}")).collect();
        f.write_str(&parts.join("; "))
    }
}

/// Check a candidate input. Pure: every call returns a fresh result.
pub fn validate(input: &FormInput) -> Validation {
    let mut errors = BTreeMap::new();

    if input.city.trim().is_empty() {
        errors.insert(Field::City, FieldError::RequiredFieldMissing);
    }

    for field in Field::NUMERIC {
        if let Err(err) = parse_numeric(input.get(field)) {
            errors.insert(field, err);
        }
    }

    Validation { errors }
}
