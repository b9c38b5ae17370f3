use chd_model::{
    highlight_form, validate, Field, Measurement, PredictError, PredictionResult, ResultReport,
    RiskForm, RiskHighlights, RiskInput, ValidationErrors,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTab {
    Form,
    History,
}

/// One selectable row of the form view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Input(Field),
    Measure(Measurement),
}

impl Slot {
    pub const ALL: [Slot; 17] = [
        Slot::Input(Field::Age),
        Slot::Input(Field::Sex),
        Slot::Input(Field::Education),
        Slot::Input(Field::IsSmoking),
        Slot::Input(Field::CigsPerDay),
        Slot::Input(Field::BpMeds),
        Slot::Input(Field::PrevalentStroke),
        Slot::Input(Field::PrevalentHyp),
        Slot::Input(Field::Diabetes),
        Slot::Input(Field::TotChol),
        Slot::Input(Field::SysBp),
        Slot::Input(Field::DiaBp),
        Slot::Measure(Measurement::HeightCm),
        Slot::Measure(Measurement::WeightKg),
        Slot::Input(Field::Bmi),
        Slot::Input(Field::HeartRate),
        Slot::Input(Field::Glucose),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Slot::Input(field) => field.label(),
            Slot::Measure(m) => m.label(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Editing,
    Submitting,
    Reviewing,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Submit,
    PredictionSucceeded,
    PredictionFailed,
    Reset,
}

#[derive(Debug, Clone, Copy)]
pub struct TransitionResult {
    pub next_phase: SubmissionPhase,
    pub applied: bool,
}

/// Guards the submit/complete/reset cycle. Rejected events leave the phase
/// untouched.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionMachine {
    phase: SubmissionPhase,
}

impl Default for SubmissionMachine {
    fn default() -> Self {
        Self { phase: SubmissionPhase::Editing }
    }
}

impl SubmissionMachine {
    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn dispatch(&mut self, event: FormEvent) -> TransitionResult {
        use SubmissionPhase::*;
        let current = self.phase;
        let (next, applied) = match (current, event) {
            (Editing | Reviewing | Failed, FormEvent::Submit) => (Submitting, true),
            (Submitting, FormEvent::PredictionSucceeded) => (Reviewing, true),
            (Submitting, FormEvent::PredictionFailed) => (Failed, true),
            (Editing | Reviewing | Failed, FormEvent::Reset) => (Editing, true),
            _ => (current, false),
        };
        if applied {
            self.phase = next;
        }
        TransitionResult { next_phase: self.phase, applied }
    }
}

/// Everything the form view shows, as one immutable value. Each transition
/// builds the next snapshot.
#[derive(Debug, Clone)]
pub struct FormSnapshot {
    pub form: RiskForm,
    pub highlights: RiskHighlights,
    pub errors: ValidationErrors,
    pub outcome: Option<Result<PredictionResult, PredictError>>,
    machine: SubmissionMachine,
}

pub enum Submission {
    /// Validation failed; the snapshot carries the inline errors.
    Blocked(FormSnapshot),
    Accepted(FormSnapshot, RiskInput),
    /// A request is already in flight.
    Rejected,
}

impl Default for FormSnapshot {
    fn default() -> Self {
        Self::from_form(RiskForm::new())
    }
}

impl FormSnapshot {
    fn from_form(form: RiskForm) -> Self {
        Self {
            highlights: highlight_form(&form),
            form,
            errors: ValidationErrors::new(),
            outcome: None,
            machine: SubmissionMachine::default(),
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.machine.phase()
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == SubmissionPhase::Submitting
    }

    pub fn report(&self) -> Option<ResultReport> {
        self.outcome.as_ref().map(ResultReport::from_outcome)
    }

    fn with_form(&self, form: RiskForm, touched: Option<Field>) -> Self {
        let mut next = self.clone();
        next.highlights = highlight_form(&form);
        next.form = form;
        if let Some(field) = touched {
            next.errors = next.errors.without(field);
        }
        // Locked fields carry no errors.
        for field in Field::ALL {
            if !next.form.is_enabled(field) {
                next.errors = next.errors.without(field);
            }
        }
        next
    }

    pub fn edited(&self, field: Field, raw: &str) -> Self {
        self.with_form(self.form.with_value(field, raw), Some(field))
    }

    pub fn cycled(&self, field: Field, forward: bool) -> Self {
        self.with_form(self.form.with_cycled(field, forward), Some(field))
    }

    pub fn measured(&self, measurement: Measurement, raw: &str) -> Self {
        self.with_form(self.form.with_measurement(measurement, raw), Some(Field::Bmi))
    }

    pub fn submitted(&self) -> Submission {
        if self.is_loading() {
            return Submission::Rejected;
        }
        match validate(&self.form) {
            Err(errors) => {
                let mut next = self.clone();
                next.errors = errors;
                Submission::Blocked(next)
            }
            Ok(input) => {
                let mut next = self.clone();
                if !next.machine.dispatch(FormEvent::Submit).applied {
                    return Submission::Rejected;
                }
                next.errors = ValidationErrors::new();
                next.outcome = None;
                Submission::Accepted(next, input)
            }
        }
    }

    pub fn completed(&self, outcome: Result<PredictionResult, PredictError>) -> Self {
        let mut next = self.clone();
        let event = if outcome.is_ok() {
            FormEvent::PredictionSucceeded
        } else {
            FormEvent::PredictionFailed
        };
        if next.machine.dispatch(event).applied {
            next.outcome = Some(outcome);
        }
        next
    }

    /// Fresh form; `None` while a request is in flight.
    pub fn reset(&self) -> Option<Self> {
        let mut machine = self.machine;
        if !machine.dispatch(FormEvent::Reset).applied {
            return None;
        }
        Some(Self::default())
    }
}

pub struct AppState {
    pub is_running: bool,
    pub active_tab: ActiveTab,
    pub selected_slot: usize,
    pub input_mode: bool,
    pub input_buffer: String,
    pub selected_record: usize,
    pub confirm_clear: bool,
    pub show_help: bool,
    pub status: Option<String>,
    pub ticks: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            is_running: true,
            active_tab: ActiveTab::Form,
            selected_slot: 0,
            input_mode: false,
            input_buffer: String::new(),
            selected_record: 0,
            confirm_clear: false,
            show_help: false,
            status: None,
            ticks: 0,
        }
    }

    pub fn quit(&mut self) {
        self.is_running = false;
    }

    pub fn current_slot(&self) -> Slot {
        Slot::ALL[self.selected_slot.min(Slot::ALL.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chd_model::{Severity, ValidationIssue};

    fn filled() -> FormSnapshot {
        FormSnapshot::default()
            .edited(Field::Age, "52")
            .edited(Field::TotChol, "190")
            .edited(Field::SysBp, "118")
            .edited(Field::DiaBp, "76")
            .edited(Field::Bmi, "23.4")
            .edited(Field::HeartRate, "70")
    }

    #[test]
    fn valid_transitions_are_deterministic() {
        let mut sm = SubmissionMachine::default();
        assert!(sm.dispatch(FormEvent::Submit).applied);
        assert_eq!(sm.phase(), SubmissionPhase::Submitting);
        assert!(sm.dispatch(FormEvent::PredictionFailed).applied);
        assert_eq!(sm.phase(), SubmissionPhase::Failed);
        assert!(sm.dispatch(FormEvent::Submit).applied);
        assert!(sm.dispatch(FormEvent::PredictionSucceeded).applied);
        assert_eq!(sm.phase(), SubmissionPhase::Reviewing);
        assert!(sm.dispatch(FormEvent::Reset).applied);
        assert_eq!(sm.phase(), SubmissionPhase::Editing);
    }

    #[test]
    fn in_flight_request_blocks_resubmit_and_reset() {
        let mut sm = SubmissionMachine::default();
        sm.dispatch(FormEvent::Submit);
        let result = sm.dispatch(FormEvent::Submit);
        assert!(!result.applied);
        assert_eq!(result.next_phase, SubmissionPhase::Submitting);
        assert!(!sm.dispatch(FormEvent::Reset).applied);
    }

    #[test]
    fn stray_completion_is_ignored() {
        let mut sm = SubmissionMachine::default();
        assert!(!sm.dispatch(FormEvent::PredictionSucceeded).applied);
        assert_eq!(sm.phase(), SubmissionPhase::Editing);
    }

    #[test]
    fn edits_recompute_highlights_and_clear_that_fields_error() {
        let Submission::Blocked(blocked) = FormSnapshot::default().submitted() else {
            panic!("empty form must be blocked");
        };
        assert_eq!(
            blocked.errors.for_field(Field::Age).map(|e| &e.issue),
            Some(&ValidationIssue::Missing)
        );
        let next = blocked.edited(Field::Age, "65");
        assert!(next.errors.for_field(Field::Age).is_none());
        assert!(next.errors.for_field(Field::SysBp).is_some());
        assert_eq!(next.highlights.get(Field::Age), Severity::High);
        assert_eq!(blocked.highlights.get(Field::Age), Severity::None);
    }

    #[test]
    fn turning_smoking_off_drops_the_cigarette_error() {
        let heavy = filled()
            .edited(Field::IsSmoking, "1")
            .edited(Field::CigsPerDay, "120");
        let Submission::Blocked(blocked) = heavy.submitted() else {
            panic!("out of range count must be blocked");
        };
        assert!(matches!(
            blocked.errors.for_field(Field::CigsPerDay).map(|e| &e.issue),
            Some(ValidationIssue::OutOfRange { .. })
        ));

        let quit = blocked.cycled(Field::IsSmoking, true);
        assert!(!quit.form.is_enabled(Field::CigsPerDay));
        assert_eq!(quit.form.raw(Field::CigsPerDay), "0");
        assert!(quit.errors.for_field(Field::CigsPerDay).is_none());
        assert!(quit.errors.is_empty());
    }

    #[test]
    fn accepted_submission_enters_loading_and_completion_leaves_it() {
        let Submission::Accepted(loading, input) = filled().submitted() else {
            panic!("filled form must be accepted");
        };
        assert_eq!(input.age, 52);
        assert!(loading.is_loading());
        assert!(matches!(loading.submitted(), Submission::Rejected));
        assert!(loading.reset().is_none());

        let failed = loading.completed(Err(PredictError::Transport("down".into())));
        assert!(!failed.is_loading());
        assert_eq!(failed.phase(), SubmissionPhase::Failed);
        let report = failed.report().expect("failure is reported");
        assert!(report.is_failure());
        assert!(report.factors().is_empty());

        let fresh = failed.reset().expect("reset allowed after failure");
        assert!(fresh.outcome.is_none());
        assert_eq!(fresh.form, RiskForm::new());
    }

    #[test]
    fn measurements_update_bmi_highlight() {
        let snap = FormSnapshot::default()
            .measured(Measurement::HeightCm, "170")
            .measured(Measurement::WeightKg, "95");
        assert_eq!(snap.form.raw(Field::Bmi), "32.87");
        assert_eq!(snap.highlights.get(Field::Bmi), Severity::High);
    }
}
