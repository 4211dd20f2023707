use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::FieldError;

/// Temperature unit a card was recorded in. Also selects the wind unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Unit {
    #[default]
    C,
    F,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::C => "C",
            Unit::F => "F",
        }
    }

    /// Lenient parse used for form and stored input: anything other than
    /// `F`/`f` is Celsius.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim() {
            "F" | "f" => Unit::F,
            _ => Unit::C,
        }
    }

    pub fn wind_suffix(&self) -> &'static str {
        match self {
            Unit::C => "km/h",
            Unit::F => "mph",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => Unit::parse_or_default(&s),
            _ => Unit::C,
        })
    }
}

/// Parse an optional numeric field.
///
/// Blank input means "unknown" and yields `Ok(None)`. Anything else must be a
/// finite number.
pub fn parse_numeric(raw: &str) -> Result<Option<f64>, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(FieldError::NotANumber),
    }
}

/// One user-submitted weather observation.
///
/// Numeric fields are stored as strings in the slot (empty string for
/// unknown) and held as `Option<f64>` in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    pub city: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub country: String,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default, with = "numeric_string")]
    pub temperature: Option<f64>,
    #[serde(default, with = "numeric_string")]
    pub feels: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub condition: String,
    #[serde(default, with = "numeric_string")]
    pub humidity: Option<f64>,
    #[serde(default, with = "numeric_string")]
    pub wind: Option<f64>,
    /// Creation time in epoch milliseconds. Zero means unknown.
    #[serde(default, deserialize_with = "lenient_millis")]
    pub updated_at: i64,
}

impl Card {
    /// Fresh opaque id for a new card.
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// Whether a record read back from storage upholds the card invariants.
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_empty() && !self.city.trim().is_empty()
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Timestamps outside the representable date range read back as unknown.
fn lenient_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let millis = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    };
    Ok(millis.filter(|ms| DateTime::<Utc>::from_timestamp_millis(*ms).is_some()).unwrap_or(0))
}

mod numeric_string {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use super::parse_numeric;
    use crate::format::format_number;

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(n) => serializer.serialize_str(&format_number(*n)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => parse_numeric(&s).ok().flatten(),
            Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Card {
        Card {
            id: "abc123".into(),
            city: "Lisbon".into(),
            country: "PT".into(),
            unit: Unit::C,
            temperature: Some(21.5),
            feels: None,
            condition: "Sunny".into(),
            humidity: Some(40.0),
            wind: Some(12.0),
            updated_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn parse_numeric_treats_blank_as_unknown() {
        assert_eq!(parse_numeric(""), Ok(None));
        assert_eq!(parse_numeric("   "), Ok(None));
    }

    #[test]
    fn parse_numeric_accepts_signed_and_exponent_forms() {
        assert_eq!(parse_numeric(" -4.5 "), Ok(Some(-4.5)));
        assert_eq!(parse_numeric("1e3"), Ok(Some(1000.0)));
        assert_eq!(parse_numeric("-20"), Ok(Some(-20.0)));
    }

    #[test]
    fn parse_numeric_rejects_text_and_non_finite() {
        assert_eq!(parse_numeric("warm"), Err(FieldError::NotANumber));
        assert_eq!(parse_numeric("12abc"), Err(FieldError::NotANumber));
        assert_eq!(parse_numeric("inf"), Err(FieldError::NotANumber));
        assert_eq!(parse_numeric("NaN"), Err(FieldError::NotANumber));
    }

    #[test]
    fn serializes_numbers_as_strings_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).expect("serialize");

        assert_eq!(json["temperature"], "21.5");
        assert_eq!(json["feels"], "");
        assert_eq!(json["humidity"], "40");
        assert_eq!(json["unit"], "C");
        assert_eq!(json["updatedAt"], 1_700_000_000_000i64);
    }

    #[test]
    fn deserialize_fills_defaults_for_missing_fields() {
        let card: Card =
            serde_json::from_str(r#"{"id":"x","city":"Oslo"}"#).expect("minimal record");

        assert_eq!(card.unit, Unit::C);
        assert_eq!(card.temperature, None);
        assert_eq!(card.country, "");
        assert_eq!(card.updated_at, 0);
    }

    #[test]
    fn out_of_range_timestamps_read_back_as_unknown() {
        for raw in ["-9223372036854775808", "-1e300", "1e300", "9223372036854775807"] {
            let json = format!(r#"{{"id":"x","city":"Oslo","updatedAt":{raw}}}"#);
            let card: Card = serde_json::from_str(&json).expect("lenient record");
            assert_eq!(card.updated_at, 0, "updatedAt {raw}");
        }
    }

    #[test]
    fn numeric_id_is_read_as_text() {
        let card: Card =
            serde_json::from_str(r#"{"id":1700000000,"city":"Oslo"}"#).expect("numeric id");
        assert_eq!(card.id, "1700000000");
        assert!(card.is_well_formed());

        let card: Card = serde_json::from_str(r#"{"id":null,"city":"Oslo"}"#).expect("null id");
        assert!(!card.is_well_formed());
        assert!(serde_json::from_str::<Card>(r#"{"city":"Oslo"}"#).is_err());
    }

    #[test]
    fn deserialize_recovers_corrupt_unit_and_numbers() {
        let card: Card = serde_json::from_str(
            r#"{"id":"x","city":"Oslo","unit":"Kelvin","temperature":"hot","wind":7,"feels":null}"#,
        )
        .expect("lenient record");

        assert_eq!(card.unit, Unit::C);
        assert_eq!(card.temperature, None);
        assert_eq!(card.wind, Some(7.0));
        assert_eq!(card.feels, None);
    }

    #[test]
    fn json_roundtrip_preserves_card() {
        let card = Card { unit: Unit::F, temperature: Some(-0.25), ..sample() };
        let json = serde_json::to_string(&card).expect("serialize");
        let back: Card = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(back, card);
    }

    #[test]
    fn well_formed_requires_id_and_city() {
        assert!(sample().is_well_formed());
        assert!(!Card { city: "  ".into(), ..sample() }.is_well_formed());
        assert!(!Card { id: String::new(), ..sample() }.is_well_formed());
    }
}
