use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PsrResult<T> = Result<T, PsrError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PsrErrorCategory {
    Success,
    InputValidationError,
    IoSystemError,
    ComputationError,
    InternalError,
}

impl PsrErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::ComputationError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ComputationError => "ComputationError",
            Self::InternalError => "InternalError",
        }
    }

    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Success)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsrError {
    category: PsrErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl PsrError {
    pub fn new(
        category: PsrErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(PsrErrorCategory::InputValidationError, placeholder, message)
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(PsrErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn computation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(PsrErrorCategory::ComputationError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(PsrErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> PsrErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        let severity = if self.category.is_fatal() {
            "ERROR"
        } else {
            "INFO"
        };
        format!("{}: [{}] {}", severity, self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> Option<String> {
        self.category
            .is_fatal()
            .then(|| format!("FATAL EXIT CODE: {}", self.exit_code()))
    }
}

impl Display for PsrError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for PsrError {}

#[cfg(test)]
mod tests {
    use super::{PsrError, PsrErrorCategory};

    #[test]
    fn exit_mapping_is_stable() {
        let cases = [
            (PsrErrorCategory::Success, 0, "Success"),
            (
                PsrErrorCategory::InputValidationError,
                2,
                "InputValidationError",
            ),
            (PsrErrorCategory::IoSystemError, 3, "IoSystemError"),
            (PsrErrorCategory::ComputationError, 4, "ComputationError"),
            (PsrErrorCategory::InternalError, 5, "InternalError"),
        ];

        for (category, exit_code, name) in cases {
            assert_eq!(category.exit_code(), exit_code);
            assert_eq!(category.as_str(), name);
        }
    }

    #[test]
    fn fatal_error_renders_diagnostic_lines() {
        let error = PsrError::input_validation(
            "INPUT.UNSUPPORTED_SPECTRUM",
            "spectrum 'Gaussian' is not yet supported",
        );

        assert_eq!(error.exit_code(), 2);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [INPUT.UNSUPPORTED_SPECTRUM] spectrum 'Gaussian' is not yet supported"
        );
        assert_eq!(
            error.fatal_exit_line().as_deref(),
            Some("FATAL EXIT CODE: 2")
        );
    }

    #[test]
    fn success_category_has_no_fatal_line() {
        let info = PsrError::new(PsrErrorCategory::Success, "RUN.DONE", "completed");
        assert_eq!(info.diagnostic_line(), "INFO: [RUN.DONE] completed");
        assert!(info.fatal_exit_line().is_none());
    }
}
