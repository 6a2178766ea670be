use super::models::{
    ContributionTypeDefinition, ContributionTypeKey, CreateCustomContributionTypeDto,
    CustomContributionType, StandardContributionType, UpdateCustomContributionTypeDto,
};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::get_current_timestamp;
use rusqlite::{params, Connection, OptionalExtension, Row};

fn map_custom_type(row: &Row<'_>) -> rusqlite::Result<CustomContributionType> {
    Ok(CustomContributionType {
        id: row.get(0)?,
        label: row.get(1)?,
        description: row.get(2)?,
        amount: row.get(3)?,
        mandatory: row.get::<_, i64>(4)? != 0,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// The built-in contribution types, in display order
pub fn list_standard_types() -> Vec<ContributionTypeDefinition> {
    StandardContributionType::ALL
        .iter()
        .copied()
        .map(ContributionTypeDefinition::from)
        .collect()
}

/// The administrator-defined contribution types, ordered by label
pub fn list_custom_types(conn: &Connection) -> AppResult<Vec<ContributionTypeDefinition>> {
    Ok(find_all_custom(conn)?
        .into_iter()
        .map(ContributionTypeDefinition::Custom)
        .collect())
}

/// Standard types followed by custom types
pub fn list_all(conn: &Connection) -> AppResult<Vec<ContributionTypeDefinition>> {
    let mut types = list_standard_types();
    types.extend(list_custom_types(conn)?);
    Ok(types)
}

/// Resolve a payment's contribution type
///
/// # Returns
/// `None` when the key refers to a deleted custom type
pub fn find_definition(
    conn: &Connection,
    key: ContributionTypeKey,
) -> AppResult<Option<ContributionTypeDefinition>> {
    match key {
        ContributionTypeKey::Standard(standard) => Ok(Some(standard.into())),
        ContributionTypeKey::Custom(id) => Ok(find_custom_optional(conn, id)?
            .map(ContributionTypeDefinition::Custom)),
    }
}

/// All custom contribution types
pub fn find_all_custom(conn: &Connection) -> AppResult<Vec<CustomContributionType>> {
    let mut stmt = conn.prepare(
        "SELECT id, label, description, amount, mandatory, created_at, updated_at
         FROM custom_contribution_types ORDER BY label, id",
    )?;
    let custom_types = stmt
        .query_map([], map_custom_type)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(custom_types)
}

/// Get a custom contribution type by id
pub fn find_custom_optional(conn: &Connection, id: i64) -> AppResult<Option<CustomContributionType>> {
    let custom_type = conn
        .query_row(
            "SELECT id, label, description, amount, mandatory, created_at, updated_at
             FROM custom_contribution_types WHERE id = ?1",
            params![id],
            map_custom_type,
        )
        .optional()?;
    Ok(custom_type)
}

/// Create a custom contribution type
///
/// # Arguments
/// * `conn` - database connection
/// * `dto` - type fields
///
/// # Returns
/// The stored type
pub fn create_custom(
    conn: &Connection,
    dto: CreateCustomContributionTypeDto,
) -> AppResult<CustomContributionType> {
    let now = get_current_timestamp();

    conn.execute(
        "INSERT INTO custom_contribution_types (label, description, amount, mandatory, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            dto.label.trim(),
            dto.description.trim(),
            dto.amount,
            dto.mandatory as i64,
            now,
            now
        ],
    )?;

    let id = conn.last_insert_rowid();
    log::info!("Custom contribution type created: id={id}");
    find_custom_optional(conn, id)?
        .ok_or_else(|| AppError::not_found(format!("Type de cotisation {id}")))
}

/// Update a custom contribution type
pub fn update_custom(
    conn: &Connection,
    id: i64,
    dto: UpdateCustomContributionTypeDto,
) -> AppResult<CustomContributionType> {
    let now = get_current_timestamp();
    let existing = find_custom_optional(conn, id)?
        .ok_or_else(|| AppError::not_found(format!("Type de cotisation {id}")))?;

    let label = dto.label.unwrap_or(existing.label);
    let description = dto.description.unwrap_or(existing.description);
    let amount = dto.amount.unwrap_or(existing.amount);
    let mandatory = dto.mandatory.unwrap_or(existing.mandatory);

    conn.execute(
        "UPDATE custom_contribution_types
         SET label = ?1, description = ?2, amount = ?3, mandatory = ?4, updated_at = ?5
         WHERE id = ?6",
        params![
            label.trim(),
            description.trim(),
            amount,
            mandatory as i64,
            now,
            id
        ],
    )?;

    find_custom_optional(conn, id)?
        .ok_or_else(|| AppError::not_found(format!("Type de cotisation {id}")))
}

/// Delete a custom contribution type
///
/// Payments already recorded under this type are left untouched.
pub fn delete_custom(conn: &Connection, id: i64) -> AppResult<()> {
    let rows_affected = conn.execute(
        "DELETE FROM custom_contribution_types WHERE id = ?1",
        params![id],
    )?;

    if rows_affected == 0 {
        return Err(AppError::not_found(format!("Type de cotisation {id}")));
    }

    log::info!("Custom contribution type deleted: id={id}");
    Ok(())
}
