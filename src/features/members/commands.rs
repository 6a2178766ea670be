use super::models::{CreateMemberDto, Member, MemberFilter, UpdateMemberDto};
use super::repository;
use crate::features::contribution_types::repository as contribution_types;
use crate::features::contributions::repository as contributions;
use crate::features::dues::{yearly_reconciliation, DuesCalculator, MonthReconciliation, MonthlyDue};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{
    today, validate_date, validate_min_length, validate_required_field, validate_text_length,
    validate_year,
};
use crate::AppState;

const MAX_TEXT_LENGTH: usize = 100;

/// List members
///
/// # Arguments
/// * `filter` - name/phone search and section filter
/// * `state` - application state
pub fn get_members(filter: MemberFilter, state: &AppState) -> AppResult<Vec<Member>> {
    let db = state.lock_db()?;
    repository::find_all(&db, &filter)
}

/// Get one member
pub fn get_member(id: i64, state: &AppState) -> AppResult<Member> {
    let db = state.lock_db()?;
    repository::find_by_id(&db, id)
}

/// Register a member
///
/// # Arguments
/// * `dto` - member fields
/// * `state` - application state
///
/// # Returns
/// The stored member; requires an administrator session
pub fn create_member(dto: CreateMemberDto, state: &AppState) -> AppResult<Member> {
    let sections = {
        let settings = state.lock_settings()?;
        settings.require_authenticated()?;
        settings.sections().to_vec()
    };

    validate_create_member_dto(&dto, &sections).map_err(|e| {
        log::warn!("Member registration rejected: {e}");
        e
    })?;

    let db = state.lock_db()?;
    repository::create(&db, dto)
}

/// Edit a member; fields left `None` keep their stored value
pub fn update_member(id: i64, dto: UpdateMemberDto, state: &AppState) -> AppResult<Member> {
    let sections = {
        let settings = state.lock_settings()?;
        settings.require_authenticated()?;
        settings.sections().to_vec()
    };

    validate_update_member_dto(&dto, &sections).map_err(|e| {
        log::warn!("Member update rejected: {e}");
        e
    })?;

    let db = state.lock_db()?;
    repository::update(&db, id, dto)
}

/// Delete a member and every payment they made
pub fn delete_member(id: i64, state: &AppState) -> AppResult<()> {
    state.require_authenticated()?;
    let db = state.lock_db()?;
    repository::delete(&db, id)
}

/// What a member owes each month as of today
pub fn get_member_monthly_due(id: i64, state: &AppState) -> AppResult<MonthlyDue> {
    let db = state.lock_db()?;
    let member = repository::find_by_id(&db, id)?;
    let types = contribution_types::list_all(&db)?;

    Ok(DuesCalculator::new(&types, today()).monthly_due(&member))
}

/// Month-by-month payment tracker of a member for one year
pub fn get_member_payment_tracker(
    id: i64,
    year: i32,
    state: &AppState,
) -> AppResult<Vec<MonthReconciliation>> {
    validate_year(year)?;

    let db = state.lock_db()?;
    let member = repository::find_by_id(&db, id)?;
    let types = contribution_types::list_all(&db)?;
    let payments = contributions::find_by_member(&db, id)?;

    let calculator = DuesCalculator::new(&types, today());
    Ok(yearly_reconciliation(&calculator, &member, year, &payments))
}

fn validate_section(section: &str, sections: &[String]) -> AppResult<()> {
    validate_required_field(section, "La section")?;
    if !sections.iter().any(|s| s == section.trim()) {
        return Err(AppError::validation(format!("Section inconnue: {section}")));
    }
    Ok(())
}

fn validate_sass_amount(sass_amount: i64) -> AppResult<()> {
    if sass_amount < 0 {
        return Err(AppError::validation("Le Sass ne peut pas être négatif"));
    }
    Ok(())
}

fn validate_create_member_dto(dto: &CreateMemberDto, sections: &[String]) -> AppResult<()> {
    validate_min_length(&dto.first_name, 2, "Le prénom")?;
    validate_text_length(&dto.first_name, MAX_TEXT_LENGTH, "Le prénom")?;
    validate_min_length(&dto.last_name, 2, "Le nom")?;
    validate_text_length(&dto.last_name, MAX_TEXT_LENGTH, "Le nom")?;
    validate_min_length(&dto.birth_place, 2, "Le lieu de naissance")?;
    validate_min_length(&dto.address, 5, "L'adresse")?;
    validate_min_length(&dto.phone, 9, "Le téléphone")?;
    validate_section(&dto.section, sections)?;
    validate_date(dto.birth_date, "La date de naissance")?;
    validate_date(dto.join_date, "La date d'adhésion")?;
    validate_sass_amount(dto.sass_amount)?;
    Ok(())
}

fn validate_update_member_dto(dto: &UpdateMemberDto, sections: &[String]) -> AppResult<()> {
    if let Some(ref first_name) = dto.first_name {
        validate_min_length(first_name, 2, "Le prénom")?;
        validate_text_length(first_name, MAX_TEXT_LENGTH, "Le prénom")?;
    }
    if let Some(ref last_name) = dto.last_name {
        validate_min_length(last_name, 2, "Le nom")?;
        validate_text_length(last_name, MAX_TEXT_LENGTH, "Le nom")?;
    }
    if let Some(ref birth_place) = dto.birth_place {
        validate_min_length(birth_place, 2, "Le lieu de naissance")?;
    }
    if let Some(ref address) = dto.address {
        validate_min_length(address, 5, "L'adresse")?;
    }
    if let Some(ref phone) = dto.phone {
        validate_min_length(phone, 9, "Le téléphone")?;
    }
    if let Some(ref section) = dto.section {
        validate_section(section, sections)?;
    }
    if let Some(birth_date) = dto.birth_date {
        validate_date(birth_date, "La date de naissance")?;
    }
    if let Some(join_date) = dto.join_date {
        validate_date(join_date, "La date d'adhésion")?;
    }
    if let Some(sass_amount) = dto.sass_amount {
        validate_sass_amount(sass_amount)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::dues::MonthStatus;
    use crate::features::members::models::Gender;
    use crate::features::members::repository::tests::member_dto;
    use crate::features::settings::models::DEFAULT_ACCESS_CODE;

    fn logged_in_state() -> AppState {
        let state = AppState::in_memory().unwrap();
        state.lock_settings().unwrap().login(DEFAULT_ACCESS_CODE).unwrap();
        state
    }

    #[test]
    fn test_mutations_require_authentication() {
        let state = AppState::in_memory().unwrap();

        let result = create_member(member_dto("Moussa", Gender::Male, "Médina"), &state);
        assert!(matches!(result.unwrap_err(), AppError::Security(_)));
        assert!(matches!(
            delete_member(1, &state).unwrap_err(),
            AppError::Security(_)
        ));
        assert!(get_members(MemberFilter::default(), &state).unwrap().is_empty());
    }

    #[test]
    fn test_create_member_validation() {
        let state = logged_in_state();

        let mut short_phone = member_dto("Moussa", Gender::Male, "Médina");
        short_phone.phone = "7700".to_string();
        assert!(matches!(
            create_member(short_phone, &state).unwrap_err(),
            AppError::Validation(_)
        ));

        let unknown_section = member_dto("Moussa", Gender::Male, "Tambacounda");
        assert!(create_member(unknown_section, &state).is_err());

        let mut negative_sass = member_dto("Moussa", Gender::Male, "Médina");
        negative_sass.sass_amount = -1;
        assert!(create_member(negative_sass, &state).is_err());

        let mut short_name = member_dto("M", Gender::Male, "Médina");
        short_name.address = "Rue 10".to_string();
        assert!(create_member(short_name, &state).is_err());

        let created = create_member(member_dto("Moussa", Gender::Male, "Médina"), &state).unwrap();
        assert_eq!(get_member(created.id, &state).unwrap().first_name, "Moussa");
    }

    #[test]
    fn test_update_and_delete_member() {
        let state = logged_in_state();
        let created = create_member(member_dto("Fatou", Gender::Female, "Pikine"), &state).unwrap();

        let updated = update_member(
            created.id,
            UpdateMemberDto {
                section: Some("Rufisque".to_string()),
                ..Default::default()
            },
            &state,
        )
        .unwrap();
        assert_eq!(updated.section, "Rufisque");

        let invalid = UpdateMemberDto {
            section: Some("Nulle part".to_string()),
            ..Default::default()
        };
        assert!(update_member(created.id, invalid, &state).is_err());

        delete_member(created.id, &state).unwrap();
        assert!(matches!(
            get_member(created.id, &state).unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn test_member_due_and_tracker() {
        let state = logged_in_state();
        let created = create_member(member_dto("Fatou", Gender::Female, "Pikine"), &state).unwrap();

        // Joined in 2022 with a 12000 Sass: 1000 + 500 + 1000 + 500.
        let due = get_member_monthly_due(created.id, &state).unwrap();
        assert_eq!(due.total, 3000);

        let tracker = get_member_payment_tracker(created.id, 2022, &state).unwrap();
        assert_eq!(tracker.len(), 12);
        assert!(tracker.iter().all(|row| row.due == 3000 && row.paid == 0));

        let before_join = get_member_payment_tracker(created.id, 2021, &state).unwrap();
        assert!(before_join
            .iter()
            .all(|row| row.status == MonthStatus::NotRequired && row.due == 0));
    }
}
