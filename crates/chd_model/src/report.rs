use serde::Serialize;

use crate::error::PredictError;
use crate::result::{Impact, PredictionResult, RiskClass};

pub const HIGH_RISK_SUMMARY: &str =
    "You have a higher risk of developing coronary heart disease in the next 10 years.";
pub const LOW_RISK_SUMMARY: &str =
    "You have a lower risk of developing coronary heart disease in the next 10 years.";
pub const FAILURE_MESSAGE: &str =
    "An error occurred while making the prediction. Please try again.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorLine {
    pub name: String,
    pub increases: bool,
    pub tag: &'static str,
}

/// What the result panel shows for one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultReport {
    Success {
        classification: RiskClass,
        label: &'static str,
        summary: String,
        bar_percent: f64,
        probability_text: String,
        factors: Vec<FactorLine>,
    },
    Failure {
        message: &'static str,
        detail: String,
    },
}

impl ResultReport {
    pub fn from_result(result: &PredictionResult) -> Self {
        let summary = match &result.message {
            Some(msg) if !msg.trim().is_empty() => msg.clone(),
            _ => match result.classification {
                RiskClass::HighRisk => HIGH_RISK_SUMMARY.to_string(),
                RiskClass::LowRisk => LOW_RISK_SUMMARY.to_string(),
            },
        };
        let bar_percent = (result.probability * 100.0).clamp(0.0, 100.0);
        let factors = result
            .risk_factors
            .iter()
            .map(|f| FactorLine {
                name: f.name.clone(),
                increases: f.impact == Impact::Increases,
                tag: f.impact.label(),
            })
            .collect();

        ResultReport::Success {
            classification: result.classification,
            label: result.classification.label(),
            summary,
            bar_percent,
            probability_text: format!("{bar_percent:.1}%"),
            factors,
        }
    }

    pub fn from_error(err: &PredictError) -> Self {
        ResultReport::Failure {
            message: FAILURE_MESSAGE,
            detail: err.to_string(),
        }
    }

    pub fn from_outcome(outcome: &Result<PredictionResult, PredictError>) -> Self {
        match outcome {
            Ok(result) => Self::from_result(result),
            Err(err) => Self::from_error(err),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ResultReport::Failure { .. })
    }

    /// Risk factors to list; always empty for a failure.
    pub fn factors(&self) -> &[FactorLine] {
        match self {
            ResultReport::Success { factors, .. } => factors,
            ResultReport::Failure { .. } => &[],
        }
    }

    /// Fixed-width bar, `#` for the filled share and `-` for the rest.
    pub fn text_bar(&self, width: usize) -> Option<String> {
        let ResultReport::Success { bar_percent, .. } = self else {
            return None;
        };
        let filled = ((bar_percent / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        Some(format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled)))
    }

    /// Multi-line plain-text rendering used by the command-line tool.
    pub fn to_text(&self, bar_width: usize) -> String {
        match self {
            ResultReport::Success { label, summary, probability_text, factors, .. } => {
                let mut out = format!("{label}\n{summary}\n");
                if let Some(bar) = self.text_bar(bar_width) {
                    out.push_str(&format!("Risk Probability: {bar} {probability_text}"));
                }
                if !factors.is_empty() {
                    out.push_str("\nRisk Factors:");
                    for factor in factors {
                        let sign = if factor.increases { '+' } else { '-' };
                        out.push_str(&format!("\n  {sign} {} ({})", factor.name, factor.tag));
                    }
                }
                out
            }
            ResultReport::Failure { message, detail } => format!("Error: {message}\n{detail}"),
        }
    }
}
