use log::warn;

use crate::error::{ValidationErrors, ValidationIssue};
use crate::field::{parse_flag, parse_sex_raw, Field};
use crate::form::RiskForm;
use crate::input::{Education, RiskInput, Sex};

/// Turns a draft into a [`RiskInput`], or reports every field that blocks
/// submission.
pub fn validate(form: &RiskForm) -> Result<RiskInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut check = Checker { form, errors: &mut errors };

    let age = check.integer(Field::Age);
    let sex = check.sex();
    let education = check.education();
    let is_smoking = check.flag(Field::IsSmoking);
    let cigs_per_day = if is_smoking.unwrap_or(false) {
        check.number(Field::CigsPerDay).or(Some(0.0))
    } else {
        Some(0.0)
    };
    let bp_meds = check.flag(Field::BpMeds);
    let prevalent_stroke = check.flag(Field::PrevalentStroke);
    let prevalent_hyp = check.flag(Field::PrevalentHyp);
    let diabetes = check.flag(Field::Diabetes);
    let tot_chol = check.number(Field::TotChol);
    let sys_bp = check.number(Field::SysBp);
    let dia_bp = check.number(Field::DiaBp);
    let bmi = check.number(Field::Bmi);
    let heart_rate = check.number(Field::HeartRate);
    let glucose = check.number(Field::Glucose);

    if !errors.is_empty() {
        warn!("form rejected with {} issue(s)", errors.len());
        return Err(errors);
    }

    // Each value below is `Some` once no errors were recorded; the fallbacks
    // only cover optional fields.
    Ok(RiskInput {
        age: age.unwrap_or_default() as u32,
        sex: sex.unwrap_or(Sex::Male),
        education: education.unwrap_or_default(),
        is_smoking: is_smoking.unwrap_or(false),
        cigs_per_day: cigs_per_day.unwrap_or(0.0),
        bp_meds: bp_meds.unwrap_or(false),
        prevalent_stroke: prevalent_stroke.unwrap_or(false),
        prevalent_hyp: prevalent_hyp.unwrap_or(false),
        diabetes: diabetes.unwrap_or(false),
        tot_chol: tot_chol.unwrap_or_default(),
        sys_bp: sys_bp.unwrap_or_default(),
        dia_bp: dia_bp.unwrap_or_default(),
        bmi: bmi.unwrap_or_default(),
        heart_rate: heart_rate.unwrap_or_default(),
        glucose,
    }
    .normalized())
}

struct Checker<'a> {
    form: &'a RiskForm,
    errors: &'a mut ValidationErrors,
}

impl<'a> Checker<'a> {
    /// `None` for an empty value; records `Missing` when the field is required.
    fn present(&mut self, field: Field) -> Option<&'a str> {
        let form = self.form;
        let raw = form.raw(field).trim();
        if raw.is_empty() {
            if field.is_required() {
                self.errors.push(field, ValidationIssue::Missing);
            }
            None
        } else {
            Some(raw)
        }
    }

    fn number(&mut self, field: Field) -> Option<f64> {
        let raw = self.present(field)?;
        let value = match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                self.errors.push(field, ValidationIssue::NotANumber);
                return None;
            }
        };
        if let Some(range) = field.range() {
            if !range.contains(&value) {
                self.errors.push(
                    field,
                    ValidationIssue::OutOfRange { min: *range.start(), max: *range.end() },
                );
                return None;
            }
        }
        Some(value)
    }

    fn integer(&mut self, field: Field) -> Option<f64> {
        let form = self.form;
        let raw = form.raw(field).trim();
        if let Ok(v) = raw.parse::<f64>() {
            if v.is_finite() && v.fract() != 0.0 {
                self.errors.push(field, ValidationIssue::NotAWholeNumber);
                return None;
            }
        }
        self.number(field)
    }

    fn flag(&mut self, field: Field) -> Option<bool> {
        let raw = self.present(field)?;
        let value = parse_flag(raw);
        if value.is_none() {
            self.errors.push(field, ValidationIssue::InvalidChoice);
        }
        value
    }

    fn sex(&mut self) -> Option<Sex> {
        let raw = self.present(Field::Sex)?;
        match parse_sex_raw(raw) {
            Some(true) => Some(Sex::Male),
            Some(false) => Some(Sex::Female),
            None => {
                self.errors.push(Field::Sex, ValidationIssue::InvalidChoice);
                None
            }
        }
    }

    fn education(&mut self) -> Option<Education> {
        let raw = self.present(Field::Education)?;
        let level = raw.parse::<u8>().ok().and_then(Education::new);
        if level.is_none() {
            self.errors.push(Field::Education, ValidationIssue::InvalidChoice);
        }
        level
    }
}

#[cfg(test)]
pub(crate) fn complete_form() -> RiskForm {
    RiskForm::new()
        .with_value(Field::Age, "45")
        .with_value(Field::TotChol, "210")
        .with_value(Field::SysBp, "130")
        .with_value(Field::DiaBp, "85")
        .with_value(Field::Bmi, "26.1")
        .with_value(Field::HeartRate, "72")
}
