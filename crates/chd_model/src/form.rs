use crate::bmi::body_mass_index;
use crate::field::{parse_flag, Field};

/// Auxiliary entries feeding the BMI calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Measurement {
    HeightCm,
    WeightKg,
}

impl Measurement {
    pub fn label(self) -> &'static str {
        match self {
            Measurement::HeightCm => "Height (cm)",
            Measurement::WeightKg => "Weight (kg)",
        }
    }
}

/// The editable questionnaire draft. Values are kept as the user typed them
/// and only become typed in [`crate::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct RiskForm {
    age: String,
    sex: String,
    education: String,
    is_smoking: String,
    cigs_per_day: String,
    bp_meds: String,
    prevalent_stroke: String,
    prevalent_hyp: String,
    diabetes: String,
    tot_chol: String,
    sys_bp: String,
    dia_bp: String,
    bmi: String,
    heart_rate: String,
    glucose: String,
    height_cm: String,
    weight_kg: String,
}

impl Default for RiskForm {
    fn default() -> Self {
        let d = |field: Field| field.default_raw().to_string();
        Self {
            age: d(Field::Age),
            sex: d(Field::Sex),
            education: d(Field::Education),
            is_smoking: d(Field::IsSmoking),
            cigs_per_day: d(Field::CigsPerDay),
            bp_meds: d(Field::BpMeds),
            prevalent_stroke: d(Field::PrevalentStroke),
            prevalent_hyp: d(Field::PrevalentHyp),
            diabetes: d(Field::Diabetes),
            tot_chol: d(Field::TotChol),
            sys_bp: d(Field::SysBp),
            dia_bp: d(Field::DiaBp),
            bmi: d(Field::Bmi),
            heart_rate: d(Field::HeartRate),
            glucose: d(Field::Glucose),
            height_cm: String::new(),
            weight_kg: String::new(),
        }
    }
}

impl RiskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, field: Field) -> &str {
        match field {
            Field::Age => &self.age,
            Field::Sex => &self.sex,
            Field::Education => &self.education,
            Field::IsSmoking => &self.is_smoking,
            Field::CigsPerDay => &self.cigs_per_day,
            Field::BpMeds => &self.bp_meds,
            Field::PrevalentStroke => &self.prevalent_stroke,
            Field::PrevalentHyp => &self.prevalent_hyp,
            Field::Diabetes => &self.diabetes,
            Field::TotChol => &self.tot_chol,
            Field::SysBp => &self.sys_bp,
            Field::DiaBp => &self.dia_bp,
            Field::Bmi => &self.bmi,
            Field::HeartRate => &self.heart_rate,
            Field::Glucose => &self.glucose,
        }
    }

    fn raw_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Age => &mut self.age,
            Field::Sex => &mut self.sex,
            Field::Education => &mut self.education,
            Field::IsSmoking => &mut self.is_smoking,
            Field::CigsPerDay => &mut self.cigs_per_day,
            Field::BpMeds => &mut self.bp_meds,
            Field::PrevalentStroke => &mut self.prevalent_stroke,
            Field::PrevalentHyp => &mut self.prevalent_hyp,
            Field::Diabetes => &mut self.diabetes,
            Field::TotChol => &mut self.tot_chol,
            Field::SysBp => &mut self.sys_bp,
            Field::DiaBp => &mut self.dia_bp,
            Field::Bmi => &mut self.bmi,
            Field::HeartRate => &mut self.heart_rate,
            Field::Glucose => &mut self.glucose,
        }
    }

    pub fn measurement(&self, measurement: Measurement) -> &str {
        match measurement {
            Measurement::HeightCm => &self.height_cm,
            Measurement::WeightKg => &self.weight_kg,
        }
    }

    pub fn is_smoking(&self) -> bool {
        parse_flag(&self.is_smoking).unwrap_or(false)
    }

    /// Cigarettes per day only accepts input while the smoker flag is set.
    pub fn is_enabled(&self, field: Field) -> bool {
        field != Field::CigsPerDay || self.is_smoking()
    }

    /// Returns a copy with `field` set to `raw`. Edits to a disabled field
    /// are ignored.
    pub fn with_value(&self, field: Field, raw: &str) -> Self {
        let mut next = self.clone();
        if next.is_enabled(field) {
            *next.raw_mut(field) = raw.trim().to_string();
        }
        next.enforce_smoking_rule();
        next
    }

    /// Steps a toggle field to its next (or previous) choice.
    pub fn with_cycled(&self, field: Field, forward: bool) -> Self {
        let choices = field.choices();
        if choices.is_empty() {
            return self.clone();
        }
        let current = choices.iter().position(|c| *c == self.raw(field));
        let next = match (current, forward) {
            (Some(idx), true) => (idx + 1) % choices.len(),
            (Some(0), false) | (None, false) => choices.len() - 1,
            (Some(idx), false) => idx - 1,
            (None, true) => 0,
        };
        self.with_value(field, choices[next])
    }

    /// Returns a copy with a height/weight entry updated. Once both parse as
    /// positive numbers the BMI field is recomputed from them.
    pub fn with_measurement(&self, measurement: Measurement, raw: &str) -> Self {
        let mut next = self.clone();
        let slot = match measurement {
            Measurement::HeightCm => &mut next.height_cm,
            Measurement::WeightKg => &mut next.weight_kg,
        };
        *slot = raw.trim().to_string();

        let height = next.height_cm.parse::<f64>().ok();
        let weight = next.weight_kg.parse::<f64>().ok();
        if let (Some(h), Some(w)) = (height, weight) {
            if let Some(bmi) = body_mass_index(h, w) {
                next.bmi = format!("{bmi:.2}");
            }
        }
        next
    }

    fn enforce_smoking_rule(&mut self) {
        if !self.is_smoking() {
            self.cigs_per_day = "0".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_fresh_questionnaire() {
        let form = RiskForm::new();
        assert_eq!(form.raw(Field::Sex), "1");
        assert_eq!(form.raw(Field::Education), "1");
        assert_eq!(form.raw(Field::CigsPerDay), "0");
        assert_eq!(form.raw(Field::Age), "");
        assert_eq!(form.raw(Field::Glucose), "");
        assert!(!form.is_smoking());
    }

    #[test]
    fn turning_smoking_off_resets_cigarettes() {
        let form = RiskForm::new()
            .with_value(Field::IsSmoking, "1")
            .with_value(Field::CigsPerDay, "25");
        assert_eq!(form.raw(Field::CigsPerDay), "25");

        let form = form.with_value(Field::IsSmoking, "0");
        assert_eq!(form.raw(Field::CigsPerDay), "0");
        assert!(!form.is_enabled(Field::CigsPerDay));
    }

    #[test]
    fn cigarettes_ignore_edits_while_disabled() {
        let form = RiskForm::new().with_value(Field::CigsPerDay, "15");
        assert_eq!(form.raw(Field::CigsPerDay), "0");
    }

    #[test]
    fn cycling_wraps_in_both_directions() {
        let form = RiskForm::new();
        let form = form.with_cycled(Field::Education, false);
        assert_eq!(form.raw(Field::Education), "4");
        let form = form.with_cycled(Field::Education, true);
        assert_eq!(form.raw(Field::Education), "1");

        let form = form.with_cycled(Field::Sex, true);
        assert_eq!(form.raw(Field::Sex), "0");
        assert_eq!(Field::Sex.display_value(form.raw(Field::Sex)), "Female");
    }

    #[test]
    fn measurements_fill_in_bmi() {
        let form = RiskForm::new()
            .with_measurement(Measurement::HeightCm, "180")
            .with_measurement(Measurement::WeightKg, "81");
        assert_eq!(form.raw(Field::Bmi), "25.00");
        assert_eq!(form.measurement(Measurement::HeightCm), "180");
    }

    #[test]
    fn incomplete_measurements_leave_bmi_alone() {
        let form = RiskForm::new()
            .with_value(Field::Bmi, "22.1")
            .with_measurement(Measurement::HeightCm, "180")
            .with_measurement(Measurement::WeightKg, "abc");
        assert_eq!(form.raw(Field::Bmi), "22.1");
    }
}
