use crate::field::Field;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    Missing,
    NotANumber,
    NotAWholeNumber,
    OutOfRange { min: f64, max: f64 },
    InvalidChoice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: Field,
    pub issue: ValidationIssue,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = self.field.label();
        match &self.issue {
            ValidationIssue::Missing => write!(f, "{label} is required"),
            ValidationIssue::NotANumber => write!(f, "{label} must be a number"),
            ValidationIssue::NotAWholeNumber => write!(f, "{label} must be a whole number"),
            ValidationIssue::OutOfRange { min, max } => {
                write!(f, "{label} must be between {min} and {max}")
            }
            ValidationIssue::InvalidChoice => write!(f, "{label} has an invalid selection"),
        }
    }
}

/// Every problem found in one validation pass, in form order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, issue: ValidationIssue) {
        self.0.push(ValidationError { field, issue });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn for_field(&self, field: Field) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field)
    }

    pub fn without(&self, field: Field) -> Self {
        Self(self.0.iter().filter(|e| e.field != field).cloned().collect())
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Why a prediction attempt failed. Every variant is scoped to a single
/// submission; the user resubmits manually.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictError {
    Transport(String),
    Server { status: Option<u16>, message: String },
    Malformed(String),
}

impl std::fmt::Display for PredictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "request failed: {msg}"),
            Self::Server { status: Some(code), message } => {
                write!(f, "server error ({code}): {message}")
            }
            Self::Server { status: None, message } => write!(f, "server error: {message}"),
            Self::Malformed(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for PredictError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let mut errors = ValidationErrors::new();
        errors.push(Field::Age, ValidationIssue::Missing);
        errors.push(Field::SysBp, ValidationIssue::OutOfRange { min: 80.0, max: 300.0 });
        assert_eq!(
            errors.to_string(),
            "Age is required; Systolic BP must be between 80 and 300"
        );
    }

    #[test]
    fn without_drops_only_that_field() {
        let mut errors = ValidationErrors::new();
        errors.push(Field::Age, ValidationIssue::Missing);
        errors.push(Field::Bmi, ValidationIssue::NotANumber);
        let rest = errors.without(Field::Age);
        assert_eq!(rest.len(), 1);
        assert!(rest.for_field(Field::Bmi).is_some());
        assert!(rest.for_field(Field::Age).is_none());
    }
}
