/// Environment detection, logging and `.env` loading
pub mod environment;

/// Data directory and database file initialization
pub mod initialization;

pub use environment::{
    get_database_filename, get_environment, initialize_logging_system,
    load_environment_variables, Environment, EnvironmentConfig,
};
pub use initialization::{initialize_application, log_initialization_complete, InitializationResult};
