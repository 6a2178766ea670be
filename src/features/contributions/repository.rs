use super::models::{Contribution, CreateContributionDto};
use crate::features::contribution_types::repository as contribution_types;
use crate::features::members::repository as members;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{
    get_current_timestamp, today, validate_amount, validate_month, validate_year,
};
use rusqlite::{params, Connection, Row};

const CONTRIBUTION_COLUMNS: &str =
    "id, member_id, contribution_type, amount, month, year, payment_date, created_at";

fn map_contribution(row: &Row<'_>) -> rusqlite::Result<Contribution> {
    Ok(Contribution {
        id: row.get(0)?,
        member_id: row.get(1)?,
        contribution_type: row.get(2)?,
        amount: row.get(3)?,
        month: row.get(4)?,
        year: row.get(5)?,
        payment_date: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Record a payment
///
/// The ledger is append-only: there is no update or delete. Payments
/// disappear only when their member is deleted.
///
/// # Arguments
/// * `conn` - database connection
/// * `dto` - payment fields
///
/// # Returns
/// The stored payment, or a validation error when the amount is not
/// positive, the period is invalid, or the member or contribution type is unknown
pub fn create(conn: &Connection, dto: CreateContributionDto) -> AppResult<Contribution> {
    validate_amount(dto.amount)?;
    validate_month(dto.month)?;
    validate_year(dto.year)?;

    if members::find_optional(conn, dto.member_id)?.is_none() {
        return Err(AppError::not_found(format!("Membre {}", dto.member_id)));
    }
    if contribution_types::find_definition(conn, dto.contribution_type)?.is_none() {
        return Err(AppError::validation(format!(
            "Type de cotisation inconnu: {}",
            dto.contribution_type
        )));
    }

    let now = get_current_timestamp();
    let payment_date = dto.payment_date.unwrap_or_else(today);

    conn.execute(
        "INSERT INTO contributions (member_id, contribution_type, amount, month, year, payment_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            dto.member_id,
            dto.contribution_type,
            dto.amount,
            dto.month,
            dto.year,
            payment_date,
            now
        ],
    )?;

    let id = conn.last_insert_rowid();
    log::info!(
        "Payment recorded: id={id}, member={}, type={}, amount={}, period={}/{}",
        dto.member_id,
        dto.contribution_type,
        dto.amount,
        dto.month,
        dto.year
    );

    conn.query_row(
        &format!("SELECT {CONTRIBUTION_COLUMNS} FROM contributions WHERE id = ?1"),
        params![id],
        map_contribution,
    )
    .map_err(AppError::from)
}

/// Every payment, oldest first
pub fn find_all(conn: &Connection) -> AppResult<Vec<Contribution>> {
    query_list(
        conn,
        &format!("SELECT {CONTRIBUTION_COLUMNS} FROM contributions ORDER BY created_at, id"),
        [],
    )
}

/// Payments of one member, oldest first
pub fn find_by_member(conn: &Connection, member_id: i64) -> AppResult<Vec<Contribution>> {
    query_list(
        conn,
        &format!(
            "SELECT {CONTRIBUTION_COLUMNS} FROM contributions WHERE member_id = ?1 ORDER BY created_at, id"
        ),
        params![member_id],
    )
}

/// Payments credited to one month of one year
pub fn find_by_period(conn: &Connection, month: u32, year: i32) -> AppResult<Vec<Contribution>> {
    query_list(
        conn,
        &format!(
            "SELECT {CONTRIBUTION_COLUMNS} FROM contributions WHERE month = ?1 AND year = ?2 ORDER BY created_at, id"
        ),
        params![month, year],
    )
}

/// Payments credited to one year
pub fn find_by_year(conn: &Connection, year: i32) -> AppResult<Vec<Contribution>> {
    query_list(
        conn,
        &format!(
            "SELECT {CONTRIBUTION_COLUMNS} FROM contributions WHERE year = ?1 ORDER BY month, created_at, id"
        ),
        params![year],
    )
}

fn query_list<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> AppResult<Vec<Contribution>> {
    let mut stmt = conn.prepare(sql)?;
    let contributions = stmt
        .query_map(params, map_contribution)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(contributions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::contribution_types::models::{
        ContributionTypeKey, CreateCustomContributionTypeDto, StandardContributionType,
    };
    use crate::features::members::models::Gender;
    use crate::features::members::repository::tests::member_dto;
    use crate::shared::database::open_in_memory_database;

    fn payment(member_id: i64, amount: i64, month: u32, year: i32) -> CreateContributionDto {
        CreateContributionDto {
            member_id,
            contribution_type: ContributionTypeKey::Standard(StandardContributionType::Monthly),
            amount,
            month,
            year,
            payment_date: None,
        }
    }

    #[test]
    fn test_create_and_list_payments() {
        let conn = open_in_memory_database().unwrap();
        let member = members::create(&conn, member_dto("Moussa", Gender::Male, "Médina")).unwrap();

        let recorded = create(&conn, payment(member.id, 1500, 3, 2024)).unwrap();
        assert_eq!(recorded.amount, 1500);
        assert_eq!(recorded.month, 3);
        assert_eq!(
            recorded.contribution_type,
            ContributionTypeKey::Standard(StandardContributionType::Monthly)
        );

        create(&conn, payment(member.id, 1500, 3, 2024)).unwrap();
        create(&conn, payment(member.id, 3000, 4, 2024)).unwrap();
        create(&conn, payment(member.id, 3000, 4, 2023)).unwrap();

        assert_eq!(find_all(&conn).unwrap().len(), 4);
        assert_eq!(find_by_member(&conn, member.id).unwrap().len(), 4);
        assert_eq!(find_by_period(&conn, 3, 2024).unwrap().len(), 2);
        assert_eq!(find_by_year(&conn, 2024).unwrap().len(), 3);
    }

    #[test]
    fn test_non_positive_amount_is_rejected() {
        let conn = open_in_memory_database().unwrap();
        let member = members::create(&conn, member_dto("Moussa", Gender::Male, "Médina")).unwrap();

        for amount in [0, -500] {
            let result = create(&conn, payment(member.id, amount, 3, 2024));
            assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
        }
        assert!(find_all(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_period_is_rejected() {
        let conn = open_in_memory_database().unwrap();
        let member = members::create(&conn, member_dto("Moussa", Gender::Male, "Médina")).unwrap();

        assert!(create(&conn, payment(member.id, 500, 0, 2024)).is_err());
        assert!(create(&conn, payment(member.id, 500, 13, 2024)).is_err());
    }

    #[test]
    fn test_unknown_member_or_type_is_rejected() {
        let conn = open_in_memory_database().unwrap();
        let member = members::create(&conn, member_dto("Moussa", Gender::Male, "Médina")).unwrap();

        assert!(matches!(
            create(&conn, payment(999, 500, 1, 2024)).unwrap_err(),
            AppError::NotFound(_)
        ));

        let mut unknown_type = payment(member.id, 500, 1, 2024);
        unknown_type.contribution_type = ContributionTypeKey::Custom(42);
        assert!(matches!(
            create(&conn, unknown_type).unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_custom_type_payment_survives_type_deletion() {
        let conn = open_in_memory_database().unwrap();
        let member = members::create(&conn, member_dto("Moussa", Gender::Male, "Médina")).unwrap();
        let magal = contribution_types::create_custom(
            &conn,
            CreateCustomContributionTypeDto {
                label: "Magal".to_string(),
                description: String::new(),
                amount: None,
                mandatory: false,
            },
        )
        .unwrap();

        let mut dto = payment(member.id, 5000, 8, 2024);
        dto.contribution_type = ContributionTypeKey::Custom(magal.id);
        create(&conn, dto).unwrap();

        contribution_types::delete_custom(&conn, magal.id).unwrap();

        let payments = find_by_member(&conn, member.id).unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].contribution_type, ContributionTypeKey::Custom(magal.id));
    }

    #[test]
    fn test_member_deletion_cascades_to_payments() {
        let conn = open_in_memory_database().unwrap();
        let deleted = members::create(&conn, member_dto("Moussa", Gender::Male, "Médina")).unwrap();
        let kept = members::create(&conn, member_dto("Fatou", Gender::Female, "Pikine")).unwrap();

        create(&conn, payment(deleted.id, 1000, 1, 2024)).unwrap();
        create(&conn, payment(deleted.id, 2000, 2, 2024)).unwrap();
        create(&conn, payment(kept.id, 1000, 1, 2024)).unwrap();

        members::delete(&conn, deleted.id).unwrap();

        assert!(find_by_member(&conn, deleted.id).unwrap().is_empty());
        assert_eq!(find_by_member(&conn, kept.id).unwrap().len(), 1);
        assert_eq!(find_all(&conn).unwrap().len(), 1);
    }
}
