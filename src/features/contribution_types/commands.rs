use super::models::{
    ContributionTypeDefinition, CreateCustomContributionTypeDto, CustomContributionType,
    UpdateCustomContributionTypeDto,
};
use super::repository;
use crate::shared::errors::AppResult;
use crate::shared::utils::{validate_amount, validate_required_field, validate_text_length};
use crate::AppState;

const MAX_LABEL_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Standard types followed by custom types
pub fn get_contribution_types(state: &AppState) -> AppResult<Vec<ContributionTypeDefinition>> {
    let db = state.lock_db()?;
    repository::list_all(&db)
}

/// Create a custom contribution type
///
/// # Arguments
/// * `dto` - type fields
/// * `state` - application state
///
/// # Returns
/// The stored type; requires an administrator session
pub fn create_custom_contribution_type(
    dto: CreateCustomContributionTypeDto,
    state: &AppState,
) -> AppResult<CustomContributionType> {
    state.require_authenticated()?;
    validate_label(&dto.label)?;
    validate_text_length(&dto.description, MAX_DESCRIPTION_LENGTH, "La description")?;
    if let Some(amount) = dto.amount {
        validate_amount(amount)?;
    }

    let db = state.lock_db()?;
    repository::create_custom(&db, dto)
}

pub fn update_custom_contribution_type(
    id: i64,
    dto: UpdateCustomContributionTypeDto,
    state: &AppState,
) -> AppResult<CustomContributionType> {
    state.require_authenticated()?;
    if let Some(ref label) = dto.label {
        validate_label(label)?;
    }
    if let Some(ref description) = dto.description {
        validate_text_length(description, MAX_DESCRIPTION_LENGTH, "La description")?;
    }
    if let Some(Some(amount)) = dto.amount {
        validate_amount(amount)?;
    }

    let db = state.lock_db()?;
    repository::update_custom(&db, id, dto)
}

/// Delete a custom contribution type; recorded payments keep their reference
pub fn delete_custom_contribution_type(id: i64, state: &AppState) -> AppResult<()> {
    state.require_authenticated()?;
    let db = state.lock_db()?;
    repository::delete_custom(&db, id)
}

fn validate_label(label: &str) -> AppResult<()> {
    validate_required_field(label, "Le libellé")?;
    validate_text_length(label, MAX_LABEL_LENGTH, "Le libellé")
}
