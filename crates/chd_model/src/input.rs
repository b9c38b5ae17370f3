use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Serialize for Sex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Sex::Male => 1,
            Sex::Female => 0,
        })
    }
}

/// Education level, 1 (some high school) to 4 (college).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Education(u8);

impl Education {
    pub fn new(level: u8) -> Option<Self> {
        (1..=4).contains(&level).then_some(Self(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

impl Default for Education {
    fn default() -> Self {
        Self(1)
    }
}

/// A validated questionnaire record, ready for a predictor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskInput {
    pub age: u32,
    pub sex: Sex,
    pub education: Education,
    #[serde(rename = "is_smoking", serialize_with = "flag")]
    pub is_smoking: bool,
    #[serde(rename = "cigsPerDay")]
    pub cigs_per_day: f64,
    #[serde(rename = "BPMeds", serialize_with = "flag")]
    pub bp_meds: bool,
    #[serde(rename = "prevalentStroke", serialize_with = "flag")]
    pub prevalent_stroke: bool,
    #[serde(rename = "prevalentHyp", serialize_with = "flag")]
    pub prevalent_hyp: bool,
    #[serde(serialize_with = "flag")]
    pub diabetes: bool,
    #[serde(rename = "totChol")]
    pub tot_chol: f64,
    #[serde(rename = "sysBP")]
    pub sys_bp: f64,
    #[serde(rename = "diaBP")]
    pub dia_bp: f64,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "heartRate")]
    pub heart_rate: f64,
    pub glucose: Option<f64>,
}

impl RiskInput {
    /// Re-applies the smoking invariant.
    pub fn normalized(mut self) -> Self {
        if !self.is_smoking {
            self.cigs_per_day = 0.0;
        }
        self
    }
}

fn flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

#[cfg(test)]
pub(crate) fn sample_input() -> RiskInput {
    RiskInput {
        age: 45,
        sex: Sex::Male,
        education: Education::new(3).unwrap_or_default(),
        is_smoking: true,
        cigs_per_day: 10.0,
        bp_meds: false,
        prevalent_stroke: false,
        prevalent_hyp: true,
        diabetes: false,
        tot_chol: 210.0,
        sys_bp: 140.0,
        dia_bp: 90.0,
        bmi: 28.5,
        heart_rate: 75.0,
        glucose: Some(95.0),
    }
}
