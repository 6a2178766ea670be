use super::models::{hash_access_code, AppSettings};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{get_current_timestamp, validate_min_length, validate_required_field};
use rusqlite::{params, Connection, OptionalExtension};

/// Key of the settings document in `app_settings`
const SETTINGS_KEY: &str = "settings";

const MIN_ACCESS_CODE_LENGTH: usize = 4;

/// Settings and session state of the running application
///
/// The authenticated flag lives only in memory; every load starts logged out.
#[derive(Debug, Clone)]
pub struct SettingsService {
    settings: AppSettings,
    authenticated: bool,
}

impl SettingsService {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            settings,
            authenticated: false,
        }
    }

    /// Load the stored settings, or the defaults on first run
    pub fn load(conn: &Connection) -> AppResult<Self> {
        let stored: Option<String> = conn
            .query_row(
                "SELECT value FROM app_settings WHERE key = ?1",
                params![SETTINGS_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let settings = match stored {
            Some(json) => serde_json::from_str(&json)?,
            None => {
                log::info!("No stored settings, using defaults");
                AppSettings::default()
            }
        };

        Ok(Self::new(settings))
    }

    /// Persist the current settings
    pub fn save(&self, conn: &Connection) -> AppResult<()> {
        store(conn, &self.settings)
    }

    /// Store `updated`, then make it current; a failed write changes nothing
    fn commit(&mut self, conn: &Connection, updated: AppSettings) -> AppResult<()> {
        store(conn, &updated)?;
        self.settings = updated;
        Ok(())
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn dahira_name(&self) -> &str {
        &self.settings.dahira_name
    }

    pub fn verify_access_code(&self, code: &str) -> bool {
        hash_access_code(code) == self.settings.access_code_hash
    }

    /// Open an administrator session
    ///
    /// # Returns
    /// A security error when the code is wrong
    pub fn login(&mut self, code: &str) -> AppResult<()> {
        if !self.verify_access_code(code) {
            log::warn!("Login rejected: wrong access code");
            return Err(AppError::security("Code d'accès incorrect"));
        }
        self.authenticated = true;
        log::info!("Administrator session opened");
        Ok(())
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
        log::info!("Administrator session closed");
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Fail with a security error outside an administrator session
    pub fn require_authenticated(&self) -> AppResult<()> {
        if self.authenticated {
            Ok(())
        } else {
            Err(AppError::security("Authentification requise"))
        }
    }

    /// Replace the access code after checking the current one
    ///
    /// # Arguments
    /// * `conn` - database connection the settings are saved to
    /// * `current_code` - the code in use
    /// * `new_code` - replacement, at least four characters
    pub fn update_access_code(
        &mut self,
        conn: &Connection,
        current_code: &str,
        new_code: &str,
    ) -> AppResult<()> {
        if !self.verify_access_code(current_code) {
            log::warn!("Access code change rejected: wrong current code");
            return Err(AppError::security("Code d'accès actuel incorrect"));
        }
        validate_min_length(new_code, MIN_ACCESS_CODE_LENGTH, "Le nouveau code d'accès")?;

        let updated = AppSettings {
            access_code_hash: hash_access_code(new_code),
            ..self.settings.clone()
        };
        self.commit(conn, updated)?;
        log::info!("Access code updated");
        Ok(())
    }

    pub fn sections(&self) -> &[String] {
        &self.settings.sections
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.settings.sections.iter().any(|s| s == section)
    }

    /// Add a section; adding an existing one is a no-op
    pub fn add_section(&mut self, conn: &Connection, section: &str) -> AppResult<()> {
        validate_required_field(section, "La section")?;
        let section = section.trim();
        if self.has_section(section) {
            return Ok(());
        }

        let mut updated = self.settings.clone();
        updated.sections.push(section.to_string());
        self.commit(conn, updated)?;
        log::info!("Section added: {section}");
        Ok(())
    }

    /// Remove a section
    ///
    /// Members already assigned to it keep it.
    pub fn remove_section(&mut self, conn: &Connection, section: &str) -> AppResult<()> {
        if !self.has_section(section) {
            return Err(AppError::not_found(format!("Section {section}")));
        }

        let mut updated = self.settings.clone();
        updated.sections.retain(|s| s != section);
        self.commit(conn, updated)?;
        log::info!("Section removed: {section}");
        Ok(())
    }

    pub fn set_dahira_name(&mut self, conn: &Connection, name: &str) -> AppResult<()> {
        validate_min_length(name, 2, "Le nom du Dahira")?;
        let updated = AppSettings {
            dahira_name: name.trim().to_string(),
            ..self.settings.clone()
        };
        self.commit(conn, updated)
    }
}

fn store(conn: &Connection, settings: &AppSettings) -> AppResult<()> {
    let json = serde_json::to_string(settings)?;
    conn.execute(
        "INSERT INTO app_settings (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![SETTINGS_KEY, json, get_current_timestamp()],
    )?;
    Ok(())
}
