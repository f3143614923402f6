use serde::{Deserialize, Serialize};

pub type UseCaseResult<T> = Result<T, UseCaseError>;

/// Failure of a client-side step, before anything reaches the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseCaseError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl UseCaseError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// "<label> es obligatorio"
    pub fn required(label: &str) -> Self {
        Self::validation(format!("{} es obligatorio", label))
    }

    pub fn is_validation(&self) -> bool {
        self.code == "VALIDATION_ERROR"
    }
}

impl std::fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(details) = &self.details {
            write!(f, ": {}", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for UseCaseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = UseCaseError::required("DNI");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "DNI es obligatorio");
        let err = UseCaseError::new("CONFLICT", "Camión con pedidos").with_details("#3");
        assert_eq!(err.to_string(), "Camión con pedidos: #3");
    }
}
