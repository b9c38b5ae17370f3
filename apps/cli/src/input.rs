use std::fs;
use std::io::{self, Read};
use std::path::Path;

use chd_model::{Field, Measurement, RiskForm};
use serde_json::{Map, Value};

const HEIGHT_KEY: &str = "height_cm";
const WEIGHT_KEY: &str = "weight_kg";

#[derive(Debug)]
pub enum InputError {
    Io(io::Error),
    Json(serde_json::Error),
    NotAnObject,
    UnknownField(String),
    UnsupportedValue { key: String, value: Value },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read input: {e}"),
            Self::Json(e) => write!(f, "input is not valid JSON: {e}"),
            Self::NotAnObject => f.write_str("input must be a JSON object keyed by field name"),
            Self::UnknownField(key) => write!(f, "unknown field `{key}`"),
            Self::UnsupportedValue { key, value } => {
                write!(f, "field `{key}` has unsupported value {value}")
            }
        }
    }
}

impl std::error::Error for InputError {}

/// Reads the document at `path`, or stdin for `-`.
pub fn read_source(path: &Path) -> Result<String, InputError> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map_err(InputError::Io)?;
        Ok(buf)
    } else {
        fs::read_to_string(path).map_err(InputError::Io)
    }
}

/// Builds a form from a JSON object keyed by wire names. Fields are applied
/// in form order so the smoker flag lands before the cigarette count.
pub fn parse_form(text: &str) -> Result<RiskForm, InputError> {
    let value: Value = serde_json::from_str(text).map_err(InputError::Json)?;
    let Value::Object(map) = value else {
        return Err(InputError::NotAnObject);
    };

    if let Some(key) = map
        .keys()
        .find(|k| Field::from_wire_name(k).is_none() && ![HEIGHT_KEY, WEIGHT_KEY].contains(&k.as_str()))
    {
        return Err(InputError::UnknownField(key.clone()));
    }

    let mut form = RiskForm::new();
    for field in Field::ALL {
        if let Some(raw) = raw_value(&map, field.wire_name())? {
            form = form.with_value(field, &raw);
        }
    }
    for (key, measurement) in [(HEIGHT_KEY, Measurement::HeightCm), (WEIGHT_KEY, Measurement::WeightKg)] {
        if let Some(raw) = raw_value(&map, key)? {
            form = form.with_measurement(measurement, &raw);
        }
    }
    Ok(form)
}

fn raw_value(map: &Map<String, Value>, key: &str) -> Result<Option<String>, InputError> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(String::new())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Bool(b)) => Ok(Some(if *b { "1" } else { "0" }.to_string())),
        Some(other) => Err(InputError::UnsupportedValue {
            key: key.to_string(),
            value: other.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_map_onto_fields() {
        let form = parse_form(
            r#"{"age": 61, "sex": 0, "is_smoking": true, "cigsPerDay": 12, "BMI": "27.5", "glucose": null}"#,
        )
        .unwrap();
        assert_eq!(form.raw(Field::Age), "61");
        assert_eq!(form.raw(Field::Sex), "0");
        assert_eq!(form.raw(Field::IsSmoking), "1");
        assert_eq!(form.raw(Field::CigsPerDay), "12");
        assert_eq!(form.raw(Field::Bmi), "27.5");
        assert_eq!(form.raw(Field::Glucose), "");
    }

    #[test]
    fn measurements_fill_in_bmi() {
        let form = parse_form(r#"{"height_cm": 175, "weight_kg": 70}"#).unwrap();
        assert_eq!(form.raw(Field::Bmi), "22.86");
    }

    #[test]
    fn rejects_unknown_keys_and_nested_values() {
        assert!(matches!(parse_form(r#"{"cholesterol": 200}"#), Err(InputError::UnknownField(k)) if k == "cholesterol"));
        assert!(matches!(parse_form(r#"{"age": [45]}"#), Err(InputError::UnsupportedValue { .. })));
        assert!(matches!(parse_form("[1, 2]"), Err(InputError::NotAnObject)));
        assert!(matches!(parse_form("{"), Err(InputError::Json(_))));
    }
}
