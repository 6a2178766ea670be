use super::models::{Contribution, CreateContributionDto};
use super::repository;
use crate::shared::errors::AppResult;
use crate::shared::utils::{validate_month, validate_year};
use crate::AppState;

/// Record a payment
///
/// # Arguments
/// * `dto` - payment fields
/// * `state` - application state
///
/// # Returns
/// The stored payment; requires an administrator session
pub fn record_contribution(
    dto: CreateContributionDto,
    state: &AppState,
) -> AppResult<Contribution> {
    state.require_authenticated()?;

    let db = state.lock_db()?;
    repository::create(&db, dto).map_err(|e| {
        log::warn!("Payment rejected: {e}");
        e
    })
}

/// Every recorded payment
pub fn get_contributions(state: &AppState) -> AppResult<Vec<Contribution>> {
    let db = state.lock_db()?;
    repository::find_all(&db)
}

pub fn get_member_contributions(
    member_id: i64,
    state: &AppState,
) -> AppResult<Vec<Contribution>> {
    let db = state.lock_db()?;
    repository::find_by_member(&db, member_id)
}

/// Payments credited to one month
pub fn get_contributions_by_period(
    month: u32,
    year: i32,
    state: &AppState,
) -> AppResult<Vec<Contribution>> {
    validate_month(month)?;
    validate_year(year)?;

    let db = state.lock_db()?;
    repository::find_by_period(&db, month, year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::contribution_types::models::{
        ContributionTypeKey, StandardContributionType,
    };
    use crate::features::members::models::Gender;
    use crate::features::members::repository as members;
    use crate::features::members::repository::tests::member_dto;
    use crate::features::settings::models::DEFAULT_ACCESS_CODE;
    use crate::shared::errors::AppError;

    fn payment(member_id: i64, amount: i64) -> CreateContributionDto {
        CreateContributionDto {
            member_id,
            contribution_type: ContributionTypeKey::Standard(StandardContributionType::Social),
            amount,
            month: 5,
            year: 2024,
            payment_date: None,
        }
    }

    #[test]
    fn test_record_contribution_requires_session() {
        let state = AppState::in_memory().unwrap();
        let member_id = {
            let db = state.lock_db().unwrap();
            members::create(&db, member_dto("Awa", Gender::Female, "Plateau"))
                .unwrap()
                .id
        };

        assert!(matches!(
            record_contribution(payment(member_id, 500), &state).unwrap_err(),
            AppError::Security(_)
        ));

        state.lock_settings().unwrap().login(DEFAULT_ACCESS_CODE).unwrap();
        record_contribution(payment(member_id, 500), &state).unwrap();
        assert!(record_contribution(payment(member_id, 0), &state).is_err());

        assert_eq!(get_contributions(&state).unwrap().len(), 1);
        assert_eq!(get_member_contributions(member_id, &state).unwrap().len(), 1);
        assert_eq!(get_contributions_by_period(5, 2024, &state).unwrap().len(), 1);
        assert!(get_contributions_by_period(13, 2024, &state).is_err());
    }
}
