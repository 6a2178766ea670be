pub mod features;
pub mod shared;

use features::settings::SettingsService;
use log::{error, info, warn};
use rusqlite::Connection;
use shared::config::{
    initialize_application, initialize_logging_system, load_environment_variables,
    log_initialization_complete,
};
use shared::database::{initialize_database, open_in_memory_database};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub use features::dues::{
    collection_rate, compute_monthly_due, month_status, yearly_reconciliation, DuesCalculator,
    MonthStatus, MonthlyDue,
};
pub use shared::errors::{AppError, AppResult, ErrorSeverity};

/// Application state (database connection and settings session)
pub struct AppState {
    pub db: Mutex<Connection>,
    pub settings: Mutex<SettingsService>,
}

impl AppState {
    /// Wrap an open connection, loading the stored settings from it
    pub fn new(conn: Connection) -> AppResult<Self> {
        let settings = SettingsService::load(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
            settings: Mutex::new(settings),
        })
    }

    /// Start the application against its on-disk database
    ///
    /// # Arguments
    /// * `data_dir` - explicit data directory; `None` uses the environment configuration
    ///
    /// # Steps
    /// 1. Load `.env` and initialize logging
    /// 2. Prepare the data directory
    /// 3. Open the database and create the schema
    /// 4. Load the settings
    pub fn initialize(data_dir: Option<&Path>) -> AppResult<Self> {
        load_environment_variables();
        initialize_logging_system();

        info!("Starting application initialization...");

        let init_result = initialize_application(data_dir).map_err(|e| {
            error!("Application initialization failed: {e}");
            e
        })?;

        let conn = initialize_database(&init_result.database_path).map_err(|e| {
            error!("Database initialization failed: {e}");
            e
        })?;

        let state = Self::new(conn)?;
        if init_result.is_first_run {
            let settings = state.lock_settings()?;
            settings.save(&*state.lock_db()?)?;
            info!("Default settings stored");
        }

        log_initialization_complete(&init_result);
        Ok(state)
    }

    /// State over a throwaway in-memory database
    pub fn in_memory() -> AppResult<Self> {
        Self::new(open_in_memory_database()?)
    }

    pub(crate) fn lock_db(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.db.lock().map_err(|e| {
            error!("Database lock error: {e}");
            AppError::concurrency(format!("Database lock error: {e}"))
        })
    }

    pub(crate) fn lock_settings(&self) -> AppResult<MutexGuard<'_, SettingsService>> {
        self.settings.lock().map_err(|e| {
            error!("Settings lock error: {e}");
            AppError::concurrency(format!("Settings lock error: {e}"))
        })
    }

    /// Fail with a security error outside an administrator session
    pub(crate) fn require_authenticated(&self) -> AppResult<()> {
        self.lock_settings()?.require_authenticated().map_err(|e| {
            warn!("Rejected unauthenticated change");
            e
        })
    }
}
