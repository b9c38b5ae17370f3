//! Domain model for the CHD risk questionnaire: the field catalogue, the
//! editable form, validation into a typed [`RiskInput`], per-field risk
//! highlighting, prediction results and the in-memory prediction history.

mod bmi;
mod error;
mod field;
mod form;
mod highlight;
mod history;
mod input;
mod report;
mod result;
mod validation;

pub use bmi::body_mass_index;
pub use error::{PredictError, ValidationError, ValidationErrors, ValidationIssue};
pub use field::{Field, FieldKind};
pub use form::{Measurement, RiskForm};
pub use highlight::{
    flag_severity, highlight, highlight_form, numeric_severity, RiskHighlights, Severity,
};
pub use history::{History, HistoryRecord, HistoryStats};
pub use input::{Education, RiskInput, Sex};
pub use report::{
    FactorLine, ResultReport, FAILURE_MESSAGE, HIGH_RISK_SUMMARY, LOW_RISK_SUMMARY,
};
pub use result::{Impact, PredictionResult, RiskClass, RiskFactor};
pub use validation::validate;
