use super::environment::{get_database_filename, get_environment, Environment, EnvironmentConfig};
use crate::shared::errors::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of application initialization
#[derive(Debug)]
pub struct InitializationResult {
    /// Whether the database file did not exist yet
    pub is_first_run: bool,
    /// Application data directory
    pub app_data_dir: PathBuf,
    /// Database file path
    pub database_path: PathBuf,
    /// Runtime environment
    pub environment: Environment,
}

/// Prepare the data directory and locate the database file
///
/// # Arguments
/// * `data_dir` - explicit data directory; falls back to the environment configuration
///
/// # Returns
/// The initialization result, or a configuration error
///
/// # Steps
/// 1. Resolve and create the data directory
/// 2. Pick the database file name for the environment
/// 3. Detect first run from the file's existence
pub fn initialize_application(data_dir: Option<&Path>) -> AppResult<InitializationResult> {
    let environment = get_environment();

    let app_data_dir = match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => EnvironmentConfig::from_env()
            .resolve_data_dir()
            .ok_or_else(|| AppError::configuration("Unable to resolve the data directory"))?,
    };
    ensure_app_data_directory(&app_data_dir)?;

    let db_filename = get_database_filename(environment.clone());
    let database_path = app_data_dir.join(db_filename);

    let is_first_run = !database_path.exists();

    if is_first_run {
        log_first_run_initialization(&environment, &app_data_dir, &database_path);
    }

    Ok(InitializationResult {
        is_first_run,
        app_data_dir,
        database_path,
        environment,
    })
}

fn ensure_app_data_directory(app_data_dir: &Path) -> AppResult<()> {
    if !app_data_dir.exists() {
        fs::create_dir_all(app_data_dir).map_err(|e| {
            AppError::configuration(format!("Failed to create the data directory: {e}"))
        })?;

        log::info!("Created data directory: {app_data_dir:?}");
    }

    Ok(())
}

fn log_first_run_initialization(
    environment: &Environment,
    app_data_dir: &Path,
    database_path: &Path,
) {
    log::info!("=== First run ===");
    log::info!("Environment: {environment:?}");
    log::info!("Data directory: {app_data_dir:?}");
    log::info!("Database file: {database_path:?}");
}

/// Log the end of initialization
///
/// # Arguments
/// * `result` - initialization result
pub fn log_initialization_complete(result: &InitializationResult) {
    if result.is_first_run {
        log::info!("First-run initialization completed");
    } else {
        log::info!("Started with existing database");
    }
    log::info!("Environment: {:?}", result.environment);
    log::info!("Database: {:?}", result.database_path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_application_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("nested").join("dahira");

        let result = initialize_application(Some(&data_dir)).unwrap();

        assert!(data_dir.exists());
        assert!(result.is_first_run);
        assert_eq!(result.app_data_dir, data_dir);
        assert!(result.database_path.starts_with(&data_dir));
    }

    #[test]
    fn test_second_run_is_detected() {
        let temp_dir = TempDir::new().unwrap();

        let first = initialize_application(Some(temp_dir.path())).unwrap();
        fs::write(&first.database_path, b"").unwrap();

        let second = initialize_application(Some(temp_dir.path())).unwrap();
        assert!(!second.is_first_run);
        log_initialization_complete(&second);
    }
}
