use super::models::AppSettings;
use crate::shared::errors::AppResult;
use crate::AppState;

/// Open an administrator session
pub fn login(access_code: &str, state: &AppState) -> AppResult<()> {
    state.lock_settings()?.login(access_code)
}

pub fn logout(state: &AppState) -> AppResult<()> {
    state.lock_settings()?.logout();
    Ok(())
}

pub fn is_authenticated(state: &AppState) -> AppResult<bool> {
    Ok(state.lock_settings()?.is_authenticated())
}

/// Current settings
pub fn get_settings(state: &AppState) -> AppResult<AppSettings> {
    Ok(state.lock_settings()?.settings().clone())
}

pub fn get_sections(state: &AppState) -> AppResult<Vec<String>> {
    Ok(state.lock_settings()?.sections().to_vec())
}

/// Replace the access code
///
/// # Arguments
/// * `current_code` - the code in use
/// * `new_code` - replacement code
/// * `state` - application state
pub fn update_access_code(
    current_code: &str,
    new_code: &str,
    state: &AppState,
) -> AppResult<()> {
    let mut settings = state.lock_settings()?;
    settings.require_authenticated()?;
    let db = state.lock_db()?;
    settings.update_access_code(&db, current_code, new_code)
}

pub fn add_section(section: &str, state: &AppState) -> AppResult<()> {
    let mut settings = state.lock_settings()?;
    settings.require_authenticated()?;
    let db = state.lock_db()?;
    settings.add_section(&db, section)
}

pub fn remove_section(section: &str, state: &AppState) -> AppResult<()> {
    let mut settings = state.lock_settings()?;
    settings.require_authenticated()?;
    let db = state.lock_db()?;
    settings.remove_section(&db, section)
}

pub fn set_dahira_name(name: &str, state: &AppState) -> AppResult<()> {
    let mut settings = state.lock_settings()?;
    settings.require_authenticated()?;
    let db = state.lock_db()?;
    settings.set_dahira_name(&db, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::settings::models::DEFAULT_ACCESS_CODE;
    use crate::shared::errors::AppError;

    #[test]
    fn test_settings_commands() {
        let state = AppState::in_memory().unwrap();

        assert!(matches!(
            add_section("Thiès", &state).unwrap_err(),
            AppError::Security(_)
        ));
        assert!(login("0000", &state).is_err());

        login(DEFAULT_ACCESS_CODE, &state).unwrap();
        assert!(is_authenticated(&state).unwrap());

        add_section("Thiès", &state).unwrap();
        remove_section("Médina", &state).unwrap();
        set_dahira_name("Dahira Noukhbaou", &state).unwrap();
        update_access_code(DEFAULT_ACCESS_CODE, "2468", &state).unwrap();

        let settings = get_settings(&state).unwrap();
        assert_eq!(settings.dahira_name, "Dahira Noukhbaou");
        assert!(get_sections(&state).unwrap().contains(&"Thiès".to_string()));
        assert!(!settings.sections.contains(&"Médina".to_string()));

        logout(&state).unwrap();
        assert!(!is_authenticated(&state).unwrap());
        assert!(login(DEFAULT_ACCESS_CODE, &state).is_err());
        login("2468", &state).unwrap();
    }
}
