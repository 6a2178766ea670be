/// Shared error types
pub mod errors;

/// Database connection management
pub mod database;

/// Configuration
pub mod config;

/// Validation, time and formatting helpers
pub mod utils;

pub use config::{
    get_database_filename, get_environment, initialize_application, initialize_logging_system,
    load_environment_variables, log_initialization_complete, Environment, EnvironmentConfig,
    InitializationResult,
};
pub use database::{create_tables, initialize_database, open_in_memory_database};
pub use errors::{AppError, AppResult, ErrorSeverity};
