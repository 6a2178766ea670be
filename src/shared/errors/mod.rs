use thiserror::Error;

/// Unified error type used across the whole crate
#[derive(Debug, Error)]
pub enum AppError {
    /// Database failure
    #[error("Database error: {0}")]
    Database(String),

    /// Input rejected at the entry boundary
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Access code or session failure
    #[error("Security error: {0}")]
    Security(String),

    /// Configuration failure
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Lock poisoning on shared state
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Severity of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    /// User input errors
    Low,
    /// Recoverable runtime errors
    Medium,
    /// Storage and configuration errors
    High,
    /// Security errors
    Critical,
}

impl AppError {
    /// Get a message suitable for display to the user
    ///
    /// # Returns
    /// A user-facing error message
    pub fn user_message(&self) -> &str {
        match self {
            AppError::Database(_) => "Une erreur est survenue lors de l'accès aux données",
            AppError::Validation(msg) => msg,
            AppError::NotFound(msg) => msg,
            AppError::Security(_) => "Accès refusé",
            AppError::Configuration(_) => "Erreur de configuration",
            AppError::Concurrency(_) => "Opération concurrente impossible",
            AppError::Io(_) => "Erreur de lecture ou d'écriture de fichier",
            AppError::Json(_) => "Format de données invalide",
        }
    }

    /// Get the detailed error text (for logging)
    pub fn details(&self) -> String {
        format!("{self}")
    }

    /// Get the severity of the error
    ///
    /// # Returns
    /// The severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Database(_) => ErrorSeverity::High,
            AppError::Validation(_) => ErrorSeverity::Low,
            AppError::NotFound(_) => ErrorSeverity::Low,
            AppError::Security(_) => ErrorSeverity::Critical,
            AppError::Configuration(_) => ErrorSeverity::High,
            AppError::Concurrency(_) => ErrorSeverity::High,
            AppError::Io(_) => ErrorSeverity::Medium,
            AppError::Json(_) => ErrorSeverity::Medium,
        }
    }

    /// Create a validation error
    ///
    /// # Arguments
    /// * `message` - validation message shown to the user
    pub fn validation<S: Into<String>>(message: S) -> Self {
        AppError::Validation(message.into())
    }

    /// Create a not-found error
    ///
    /// # Arguments
    /// * `resource` - description of the missing resource
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        AppError::NotFound(format!("{} introuvable", resource.into()))
    }

    /// Create a security error
    pub fn security<S: Into<String>>(message: S) -> Self {
        AppError::Security(message.into())
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// Create a concurrency error
    pub fn concurrency<S: Into<String>>(message: S) -> Self {
        AppError::Concurrency(message.into())
    }
}

/// Conversion from rusqlite::Error
impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        AppError::Database(error.to_string())
    }
}

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        assert_eq!(AppError::validation("test").severity(), ErrorSeverity::Low);
        assert_eq!(AppError::not_found("Membre").severity(), ErrorSeverity::Low);
        assert_eq!(
            AppError::security("bad code").severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            AppError::configuration("bad dir").severity(),
            ErrorSeverity::High
        );
        assert_eq!(
            AppError::concurrency("poisoned").severity(),
            ErrorSeverity::High
        );
    }

    #[test]
    fn test_user_message() {
        let validation_error = AppError::validation("Le montant doit être supérieur à 0");
        assert_eq!(
            validation_error.user_message(),
            "Le montant doit être supérieur à 0"
        );

        let not_found_error = AppError::not_found("Membre");
        assert_eq!(not_found_error.user_message(), "Membre introuvable");

        let security_error = AppError::security("wrong access code");
        assert_eq!(security_error.user_message(), "Accès refusé");
    }

    #[test]
    fn test_rusqlite_conversion() {
        let error: AppError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(error, AppError::Database(_)));
        assert_eq!(error.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_error_details() {
        let error = AppError::validation("details test");
        assert!(error.details().contains("details test"));
    }
}
