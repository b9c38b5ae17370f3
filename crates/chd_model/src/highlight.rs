//! Per-field risk decoration.
//!
//! Severity is derived from fixed clinical thresholds, one field at a time,
//! and never feeds back into validation or submission.

use std::collections::BTreeMap;

use crate::field::{parse_flag, Field, FieldKind};
use crate::form::RiskForm;
use crate::input::RiskInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    None,
    Moderate,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Moderate => "moderate",
            Severity::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(moderate, high)`: strictly above `moderate` is moderate, strictly above
/// `high` is high.
fn thresholds(field: Field) -> Option<(f64, f64)> {
    match field {
        Field::Age => Some((50.0, 60.0)),
        Field::CigsPerDay => Some((10.0, 20.0)),
        Field::TotChol => Some((200.0, 240.0)),
        Field::SysBp => Some((120.0, 140.0)),
        Field::DiaBp => Some((80.0, 90.0)),
        Field::Bmi => Some((25.0, 30.0)),
        _ => None,
    }
}

/// Flags whose `true` value is a risk factor on its own.
fn flag_is_risk(field: Field) -> bool {
    matches!(
        field,
        Field::IsSmoking | Field::PrevalentStroke | Field::PrevalentHyp | Field::Diabetes
    )
}

/// Severity of a single numeric reading.
pub fn numeric_severity(field: Field, value: f64) -> Severity {
    match thresholds(field) {
        Some((_, high)) if value > high => Severity::High,
        Some((moderate, _)) if value > moderate => Severity::Moderate,
        _ => Severity::None,
    }
}

/// Severity of a yes/no answer.
pub fn flag_severity(field: Field, value: bool) -> Severity {
    if value && flag_is_risk(field) {
        Severity::High
    } else {
        Severity::None
    }
}

/// Field-to-severity map covering every [`Field`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RiskHighlights {
    levels: BTreeMap<Field, Severity>,
}

impl RiskHighlights {
    fn collect(mut severity_of: impl FnMut(Field) -> Severity) -> Self {
        let levels = Field::ALL.into_iter().map(|f| (f, severity_of(f))).collect();
        Self { levels }
    }

    pub fn get(&self, field: Field) -> Severity {
        self.levels.get(&field).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, Severity)> + '_ {
        self.levels.iter().map(|(f, s)| (*f, *s))
    }

    /// Fields above `none`, in form order.
    pub fn flagged(&self) -> impl Iterator<Item = (Field, Severity)> + '_ {
        self.iter().filter(|(_, s)| *s != Severity::None)
    }

    pub fn highest(&self) -> Severity {
        self.levels.values().copied().max().unwrap_or_default()
    }
}

/// Highlights for a draft. Empty or unparsable values count as absent.
pub fn highlight_form(form: &RiskForm) -> RiskHighlights {
    RiskHighlights::collect(|field| {
        let raw = form.raw(field);
        match field.kind() {
            FieldKind::Flag => parse_flag(raw)
                .map(|v| flag_severity(field, v))
                .unwrap_or_default(),
            FieldKind::Integer | FieldKind::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| numeric_severity(field, v))
                .unwrap_or_default(),
            FieldKind::Sex | FieldKind::Education => Severity::None,
        }
    })
}

/// Highlights for a validated record.
pub fn highlight(input: &RiskInput) -> RiskHighlights {
    RiskHighlights::collect(|field| match field {
        Field::Age => numeric_severity(field, f64::from(input.age)),
        Field::CigsPerDay => numeric_severity(field, input.cigs_per_day),
        Field::TotChol => numeric_severity(field, input.tot_chol),
        Field::SysBp => numeric_severity(field, input.sys_bp),
        Field::DiaBp => numeric_severity(field, input.dia_bp),
        Field::Bmi => numeric_severity(field, input.bmi),
        Field::IsSmoking => flag_severity(field, input.is_smoking),
        Field::PrevalentStroke => flag_severity(field, input.prevalent_stroke),
        Field::PrevalentHyp => flag_severity(field, input.prevalent_hyp),
        Field::Diabetes => flag_severity(field, input.diabetes),
        Field::Sex
        | Field::Education
        | Field::BpMeds
        | Field::HeartRate
        | Field::Glucose => Severity::None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::sample_input;

    #[test]
    fn age_bands() {
        assert_eq!(numeric_severity(Field::Age, 50.0), Severity::None);
        assert_eq!(numeric_severity(Field::Age, 51.0), Severity::Moderate);
        assert_eq!(numeric_severity(Field::Age, 60.0), Severity::Moderate);
        assert_eq!(numeric_severity(Field::Age, 61.0), Severity::High);
    }

    #[test]
    fn upper_bound_of_moderate_band_is_inclusive() {
        assert_eq!(numeric_severity(Field::TotChol, 240.0), Severity::Moderate);
        assert_eq!(numeric_severity(Field::SysBp, 140.0), Severity::Moderate);
        assert_eq!(numeric_severity(Field::DiaBp, 90.0), Severity::Moderate);
        assert_eq!(numeric_severity(Field::Bmi, 30.0), Severity::Moderate);
        assert_eq!(numeric_severity(Field::SysBp, 120.0), Severity::None);
    }

    #[test]
    fn untracked_fields_never_flag() {
        assert_eq!(numeric_severity(Field::HeartRate, 199.0), Severity::None);
        assert_eq!(numeric_severity(Field::Glucose, 390.0), Severity::None);
        assert_eq!(flag_severity(Field::BpMeds, true), Severity::None);
    }

    #[test]
    fn hypertensive_smoker_with_high_cholesterol_is_high_across_the_board() {
        let form = RiskForm::new()
            .with_value(Field::SysBp, "160")
            .with_value(Field::DiaBp, "95")
            .with_value(Field::TotChol, "245")
            .with_value(Field::IsSmoking, "1");
        let highlights = highlight_form(&form);
        for field in [Field::SysBp, Field::DiaBp, Field::TotChol, Field::IsSmoking] {
            assert_eq!(highlights.get(field), Severity::High, "{field}");
        }
        assert_eq!(highlights.highest(), Severity::High);
    }

    #[test]
    fn partial_form_treats_blank_and_garbage_as_absent() {
        let form = RiskForm::new()
            .with_value(Field::Age, "")
            .with_value(Field::Bmi, "heavy");
        let highlights = highlight_form(&form);
        assert_eq!(highlights.flagged().count(), 0);
        assert_eq!(highlights.iter().count(), Field::ALL.len());
    }

    #[test]
    fn form_and_record_highlights_agree() {
        let input = sample_input();
        let form = Field::ALL.into_iter().fold(RiskForm::new(), |form, field| {
            let raw = match field {
                Field::Age => input.age.to_string(),
                Field::IsSmoking => "1".to_string(),
                Field::CigsPerDay => input.cigs_per_day.to_string(),
                Field::PrevalentHyp => "1".to_string(),
                Field::TotChol => input.tot_chol.to_string(),
                Field::SysBp => input.sys_bp.to_string(),
                Field::DiaBp => input.dia_bp.to_string(),
                Field::Bmi => input.bmi.to_string(),
                _ => form.raw(field).to_string(),
            };
            form.with_value(field, &raw)
        });
        assert_eq!(highlight_form(&form), highlight(&input));
    }
}
