//! `/predict` response contract.

use chd_model::{Impact, PredictError, PredictionResult, RiskClass, RiskFactor};
use log::warn;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct RawResponse {
    prediction: Option<Value>,
    probability: Option<Value>,
    message: Option<Value>,
    risk_factors: Option<Value>,
    error: Option<String>,
}

/// Maps a response body to a result. `prediction` must be 0 or 1 and
/// `probability` a finite number in `[0, 1]`. `message` and `risk_factors`
/// are optional; ill-typed parts of them are dropped.
pub fn parse_response(body: &str) -> Result<PredictionResult, PredictError> {
    let raw: RawResponse =
        serde_json::from_str(body).map_err(|e| PredictError::Malformed(e.to_string()))?;

    if let Some(message) = raw.error {
        return Err(PredictError::Server { status: None, message });
    }

    let classification = match raw.prediction.as_ref().and_then(Value::as_i64) {
        Some(1) => RiskClass::HighRisk,
        Some(0) => RiskClass::LowRisk,
        Some(other) => {
            return Err(PredictError::Malformed(format!("prediction must be 0 or 1, got {other}")));
        }
        None => return Err(PredictError::Malformed("missing integer `prediction`".to_string())),
    };

    let probability = raw
        .probability
        .as_ref()
        .and_then(Value::as_f64)
        .ok_or_else(|| PredictError::Malformed("missing numeric `probability`".to_string()))?;
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(PredictError::Malformed(format!(
            "probability {probability} outside [0, 1]"
        )));
    }

    let message = match raw.message {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => {
            warn!("ignoring non-string message {other}");
            None
        }
    };

    Ok(PredictionResult {
        classification,
        probability,
        message,
        risk_factors: risk_factors(raw.risk_factors),
    })
}

fn risk_factors(raw: Option<Value>) -> Vec<RiskFactor> {
    let entries = match raw {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            warn!("ignoring non-list risk_factors {other}");
            return Vec::new();
        }
    };
    entries
        .into_iter()
        .filter_map(|entry| {
            let name = entry.get("name").and_then(Value::as_str);
            let weight = entry.get("impact").and_then(Value::as_f64);
            match (name, weight) {
                (Some(name), Some(weight)) => Some(RiskFactor {
                    name: name.to_string(),
                    impact: Impact::from_weight(weight),
                }),
                _ => {
                    warn!("dropping ill-formed risk factor {entry}");
                    None
                }
            }
        })
        .collect()
}

/// Pulls the `error` string out of a failed response body, if there is one.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<RawResponse>(body).ok()?.error
}
