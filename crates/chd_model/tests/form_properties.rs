use chd_model::{highlight_form, numeric_severity, validate, Field, RiskForm, Severity};
use proptest::prelude::*;

fn any_field() -> impl Strategy<Value = Field> {
    (0..Field::ALL.len()).prop_map(|idx| Field::ALL[idx])
}

fn any_raw() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("0".to_string()),
        Just("1".to_string()),
        (0u32..700).prop_map(|v| v.to_string()),
        (0.0f64..700.0).prop_map(|v| format!("{v:.1}")),
        "[a-z]{1,6}",
    ]
}

proptest! {
    #[test]
    fn non_smokers_always_have_zero_cigarettes(
        edits in prop::collection::vec((any_field(), any_raw()), 1..40)
    ) {
        let form = edits
            .iter()
            .fold(RiskForm::new(), |form, (field, raw)| form.with_value(*field, raw));
        if !form.is_smoking() {
            prop_assert_eq!(form.raw(Field::CigsPerDay), "0");
            if let Ok(input) = validate(&form) {
                prop_assert_eq!(input.cigs_per_day, 0.0);
            }
        }
    }

    #[test]
    fn age_severity_follows_the_bands(age in 20u32..=100) {
        let expected = if age > 60 {
            Severity::High
        } else if age > 50 {
            Severity::Moderate
        } else {
            Severity::None
        };
        prop_assert_eq!(numeric_severity(Field::Age, f64::from(age)), expected);

        let form = RiskForm::new().with_value(Field::Age, &age.to_string());
        prop_assert_eq!(highlight_form(&form).get(Field::Age), expected);
    }

    #[test]
    fn highlighting_is_total_and_deterministic(
        edits in prop::collection::vec((any_field(), any_raw()), 0..20)
    ) {
        let form = edits
            .iter()
            .fold(RiskForm::new(), |form, (field, raw)| form.with_value(*field, raw));
        let first = highlight_form(&form);
        prop_assert_eq!(first.iter().count(), Field::ALL.len());
        prop_assert_eq!(first, highlight_form(&form));
    }
}

#[test]
fn empty_required_fields_block_validation() {
    let errors = validate(&RiskForm::new()).expect_err("empty form must not validate");
    assert!(errors.len() >= 6);
}
