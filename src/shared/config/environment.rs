use std::path::PathBuf;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "DAHIRA_DATA_DIR";

/// Runtime environment of the application
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// Development
    Development,
    /// Production
    Production,
}

/// Configuration resolved from the environment
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// Runtime environment name ("development" or "production")
    pub environment: String,
    /// Whether debug mode is enabled
    pub debug_mode: bool,
    /// Log level
    pub log_level: String,
    /// Explicit data directory, if configured
    pub data_dir: Option<PathBuf>,
}

impl EnvironmentConfig {
    /// Read the configuration from environment variables
    ///
    /// # Returns
    /// The resolved configuration
    pub fn from_env() -> Self {
        let environment = get_environment();
        let debug_mode = environment == Environment::Development;
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
            if debug_mode {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });
        let data_dir = std::env::var(DATA_DIR_ENV)
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Self {
            environment: format!("{environment:?}").to_lowercase(),
            debug_mode,
            log_level,
            data_dir,
        }
    }

    /// Whether this is the production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether this is the development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Resolve the application data directory
    ///
    /// # Returns
    /// The configured directory, or `<platform data dir>/dahira`
    pub fn resolve_data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("dahira")))
    }
}

/// Determine the current runtime environment
///
/// # Resolution order
/// 1. Value embedded at compile time
/// 2. `ENVIRONMENT` at runtime
/// 3. Development for debug builds
/// 4. Production for release builds
pub fn get_environment() -> Environment {
    if let Some(embedded_env) = option_env!("EMBEDDED_ENVIRONMENT") {
        let env = match embedded_env {
            "production" => Environment::Production,
            _ => Environment::Development,
        };
        log::debug!("Environment: embedded value {embedded_env} -> {env:?}");
        return env;
    }

    if let Ok(env_var) = std::env::var("ENVIRONMENT") {
        let env = match env_var.as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        };
        log::debug!("Environment: runtime variable {env_var} -> {env:?}");
        return env;
    }

    let env = if cfg!(debug_assertions) {
        Environment::Development
    } else {
        Environment::Production
    };
    log::debug!(
        "Environment: build profile debug_assertions={} -> {env:?}",
        cfg!(debug_assertions)
    );
    env
}

/// Get the database file name for an environment
///
/// # File names
/// - Development: "dev_dahira.db"
/// - Production: "dahira.db"
pub fn get_database_filename(env: Environment) -> &'static str {
    match env {
        Environment::Development => "dev_dahira.db",
        Environment::Production => "dahira.db",
    }
}

/// Load the `.env` file matching the environment
pub fn load_environment_variables() {
    if let Some(env) = option_env!("EMBEDDED_ENVIRONMENT") {
        log::info!("Using embedded environment: {env}");
        return;
    }

    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    let env_file = match environment.as_str() {
        "production" => ".env.production",
        _ => ".env",
    };

    log::info!("Environment: {environment}, loading {env_file}");

    match dotenv::from_filename(env_file) {
        Ok(_) => {
            log::info!("Loaded {env_file}");
        }
        Err(_) => {
            if env_file != ".env" && dotenv::dotenv().is_ok() {
                log::warn!("{env_file} not found, loaded the default .env instead");
            } else {
                log::warn!("No .env file found, using process environment only");
            }
        }
    }
}

/// Initialize the logging system
///
/// The level comes from [`EnvironmentConfig::log_level`]. Calling this twice
/// keeps the first logger.
pub fn initialize_logging_system() {
    let env_config = EnvironmentConfig::from_env();

    let log_level = match env_config.log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };

    let result = env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .try_init();

    if result.is_err() {
        log::debug!("Logger already initialized");
        return;
    }

    log::info!(
        "Logging initialized: level={}, environment={}",
        env_config.log_level,
        env_config.environment
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_database_filename() {
        assert_eq!(
            get_database_filename(Environment::Development),
            "dev_dahira.db"
        );
        assert_eq!(get_database_filename(Environment::Production), "dahira.db");
    }

    #[test]
    fn test_environment_equality() {
        assert_eq!(Environment::Development, Environment::Development);
        assert_ne!(Environment::Development, Environment::Production);
    }

    #[test]
    fn test_get_environment() {
        let env = get_environment();
        assert!(matches!(
            env,
            Environment::Development | Environment::Production
        ));
    }

    #[test]
    fn test_resolve_data_dir_prefers_explicit_dir() {
        let config = EnvironmentConfig {
            environment: "development".to_string(),
            debug_mode: true,
            log_level: "debug".to_string(),
            data_dir: Some(PathBuf::from("/tmp/dahira-test")),
        };

        assert!(config.is_development());
        assert!(!config.is_production());
        assert_eq!(
            config.resolve_data_dir(),
            Some(PathBuf::from("/tmp/dahira-test"))
        );
    }

    #[test]
    fn test_initialize_logging_twice_does_not_panic() {
        initialize_logging_system();
        initialize_logging_system();
    }
}
