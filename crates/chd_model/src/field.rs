use std::ops::RangeInclusive;

/// Every input the questionnaire collects, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Age,
    Sex,
    Education,
    IsSmoking,
    CigsPerDay,
    BpMeds,
    PrevalentStroke,
    PrevalentHyp,
    Diabetes,
    TotChol,
    SysBp,
    DiaBp,
    Bmi,
    HeartRate,
    Glucose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Number,
    Flag,
    Sex,
    Education,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::Age,
        Field::Sex,
        Field::Education,
        Field::IsSmoking,
        Field::CigsPerDay,
        Field::BpMeds,
        Field::PrevalentStroke,
        Field::PrevalentHyp,
        Field::Diabetes,
        Field::TotChol,
        Field::SysBp,
        Field::DiaBp,
        Field::Bmi,
        Field::HeartRate,
        Field::Glucose,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::Sex => "Sex",
            Field::Education => "Education",
            Field::IsSmoking => "Current Smoker",
            Field::CigsPerDay => "Cigarettes Per Day",
            Field::BpMeds => "On BP Medication",
            Field::PrevalentStroke => "Previous Stroke",
            Field::PrevalentHyp => "Hypertension",
            Field::Diabetes => "Diabetes",
            Field::TotChol => "Total Cholesterol",
            Field::SysBp => "Systolic BP",
            Field::DiaBp => "Diastolic BP",
            Field::Bmi => "BMI",
            Field::HeartRate => "Heart Rate",
            Field::Glucose => "Glucose",
        }
    }

    /// Key used in the `/predict` request body and in CLI input files.
    pub fn wire_name(self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Sex => "sex",
            Field::Education => "education",
            Field::IsSmoking => "is_smoking",
            Field::CigsPerDay => "cigsPerDay",
            Field::BpMeds => "BPMeds",
            Field::PrevalentStroke => "prevalentStroke",
            Field::PrevalentHyp => "prevalentHyp",
            Field::Diabetes => "diabetes",
            Field::TotChol => "totChol",
            Field::SysBp => "sysBP",
            Field::DiaBp => "diaBP",
            Field::Bmi => "BMI",
            Field::HeartRate => "heartRate",
            Field::Glucose => "glucose",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.wire_name() == name)
    }

    pub fn unit(self) -> Option<&'static str> {
        match self {
            Field::Age => Some("years"),
            Field::TotChol | Field::Glucose => Some("mg/dL"),
            Field::SysBp | Field::DiaBp => Some("mmHg"),
            Field::HeartRate => Some("bpm"),
            Field::Bmi => Some("kg/m²"),
            _ => None,
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Age => FieldKind::Integer,
            Field::Sex => FieldKind::Sex,
            Field::Education => FieldKind::Education,
            Field::IsSmoking
            | Field::BpMeds
            | Field::PrevalentStroke
            | Field::PrevalentHyp
            | Field::Diabetes => FieldKind::Flag,
            Field::CigsPerDay
            | Field::TotChol
            | Field::SysBp
            | Field::DiaBp
            | Field::Bmi
            | Field::HeartRate
            | Field::Glucose => FieldKind::Number,
        }
    }

    /// Accepted numeric range, if the field is numeric.
    pub fn range(self) -> Option<RangeInclusive<f64>> {
        match self {
            Field::Age => Some(20.0..=100.0),
            Field::CigsPerDay => Some(0.0..=100.0),
            Field::TotChol => Some(100.0..=600.0),
            Field::SysBp => Some(80.0..=300.0),
            Field::DiaBp => Some(40.0..=150.0),
            Field::Bmi => Some(15.0..=50.0),
            Field::HeartRate => Some(40.0..=200.0),
            Field::Glucose => Some(40.0..=400.0),
            _ => None,
        }
    }

    /// Required fields block submission while empty.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            Field::Age
                | Field::Sex
                | Field::IsSmoking
                | Field::TotChol
                | Field::SysBp
                | Field::DiaBp
                | Field::Bmi
                | Field::HeartRate
        )
    }

    /// Raw value a fresh form starts with.
    pub fn default_raw(self) -> &'static str {
        match self {
            Field::Sex | Field::Education => "1",
            Field::IsSmoking
            | Field::CigsPerDay
            | Field::BpMeds
            | Field::PrevalentStroke
            | Field::PrevalentHyp
            | Field::Diabetes => "0",
            _ => "",
        }
    }

    /// Choices cycled by toggle-style inputs, in display order.
    pub fn choices(self) -> &'static [&'static str] {
        match self.kind() {
            FieldKind::Flag => &["0", "1"],
            FieldKind::Sex => &["1", "0"],
            FieldKind::Education => &["1", "2", "3", "4"],
            FieldKind::Integer | FieldKind::Number => &[],
        }
    }

    pub fn is_toggle(self) -> bool {
        !self.choices().is_empty()
    }

    /// Human-readable rendering of a raw value.
    pub fn display_value(self, raw: &str) -> String {
        match self.kind() {
            FieldKind::Flag => match parse_flag(raw) {
                Some(true) => "Yes".to_string(),
                Some(false) => "No".to_string(),
                None => raw.to_string(),
            },
            FieldKind::Sex => match parse_sex_raw(raw) {
                Some(true) => "Male".to_string(),
                Some(false) => "Female".to_string(),
                None => raw.to_string(),
            },
            FieldKind::Education => match raw.trim() {
                "1" => "Some High School".to_string(),
                "2" => "High School / GED".to_string(),
                "3" => "Some College".to_string(),
                "4" => "College".to_string(),
                other => other.to_string(),
            },
            FieldKind::Integer | FieldKind::Number => raw.to_string(),
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// `true` for male.
pub(crate) fn parse_sex_raw(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "male" | "m" => Some(true),
        "0" | "female" | "f" => Some(false),
        _ => None,
    }
}
