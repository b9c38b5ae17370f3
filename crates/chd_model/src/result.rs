use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskClass {
    HighRisk,
    LowRisk,
}

impl RiskClass {
    /// Above one half is high risk; exactly 0.5 is not.
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.5 {
            RiskClass::HighRisk
        } else {
            RiskClass::LowRisk
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskClass::HighRisk => "High Risk",
            RiskClass::LowRisk => "Low Risk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Impact {
    Increases,
    Decreases,
}

impl Impact {
    /// Positive wire impacts raise risk; zero and negative lower it.
    pub fn from_weight(weight: f64) -> Self {
        if weight > 0.0 {
            Impact::Increases
        } else {
            Impact::Decreases
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Impact::Increases => "Increases Risk",
            Impact::Decreases => "Decreases Risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactor {
    pub name: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub classification: RiskClass,
    pub probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub risk_factors: Vec<RiskFactor>,
}

impl PredictionResult {
    pub fn from_probability(probability: f64) -> Self {
        Self {
            classification: RiskClass::from_probability(probability),
            probability,
            message: None,
            risk_factors: Vec::new(),
        }
    }

    pub fn is_high_risk(&self) -> bool {
        self.classification == RiskClass::HighRisk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_threshold_is_strict() {
        assert_eq!(RiskClass::from_probability(0.5), RiskClass::LowRisk);
        assert_eq!(RiskClass::from_probability(0.500_001), RiskClass::HighRisk);
        assert_eq!(RiskClass::from_probability(0.0), RiskClass::LowRisk);
        assert_eq!(RiskClass::from_probability(1.0), RiskClass::HighRisk);
    }

    #[test]
    fn impact_sign_decides_direction() {
        assert_eq!(Impact::from_weight(1.0), Impact::Increases);
        assert_eq!(Impact::from_weight(-1.0), Impact::Decreases);
        assert_eq!(Impact::from_weight(0.0), Impact::Decreases);
    }
}
