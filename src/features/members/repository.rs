use super::models::{CreateMemberDto, Member, MemberFilter, UpdateMemberDto};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::get_current_timestamp;
use rusqlite::{params, Connection, OptionalExtension, Row};

const MEMBER_COLUMNS: &str = "id, first_name, last_name, gender, birth_date, birth_place, address, phone,
     section, sub_section, join_date, sass_amount, dues_status, created_at, updated_at";

fn map_member(row: &Row<'_>) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        gender: row.get(3)?,
        birth_date: row.get(4)?,
        birth_place: row.get(5)?,
        address: row.get(6)?,
        phone: row.get(7)?,
        section: row.get(8)?,
        sub_section: row.get(9)?,
        join_date: row.get(10)?,
        sass_amount: row.get(11)?,
        dues_status: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

/// Register a member
///
/// # Arguments
/// * `conn` - database connection
/// * `dto` - member fields
///
/// # Returns
/// The stored member
pub fn create(conn: &Connection, dto: CreateMemberDto) -> AppResult<Member> {
    let now = get_current_timestamp();

    conn.execute(
        "INSERT INTO members (first_name, last_name, gender, birth_date, birth_place, address, phone,
             section, sub_section, join_date, sass_amount, dues_status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            dto.first_name.trim(),
            dto.last_name.trim(),
            dto.gender,
            dto.birth_date,
            dto.birth_place.trim(),
            dto.address.trim(),
            dto.phone.trim(),
            dto.section.trim(),
            normalize_sub_section(dto.sub_section),
            dto.join_date,
            dto.sass_amount,
            dto.dues_status,
            now,
            now
        ],
    )?;

    let id = conn.last_insert_rowid();
    log::info!("Member registered: id={id}");
    find_by_id(conn, id)
}

/// Get a member by id, failing with `NotFound` when absent
pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Member> {
    find_optional(conn, id)?.ok_or_else(|| AppError::not_found(format!("Membre {id}")))
}

/// Get a member by id
///
/// # Returns
/// `None` when no member has this id
pub fn find_optional(conn: &Connection, id: i64) -> AppResult<Option<Member>> {
    let member = conn
        .query_row(
            &format!("SELECT {MEMBER_COLUMNS} FROM members WHERE id = ?1"),
            params![id],
            map_member,
        )
        .optional()?;
    Ok(member)
}

/// List members matching a filter, ordered by last then first name
///
/// # Arguments
/// * `conn` - database connection
/// * `filter` - name/phone search and section filter
pub fn find_all(conn: &Connection, filter: &MemberFilter) -> AppResult<Vec<Member>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MEMBER_COLUMNS} FROM members ORDER BY last_name, first_name, id"
    ))?;
    let members = stmt
        .query_map([], map_member)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(members
        .into_iter()
        .filter(|member| filter.matches(member))
        .collect())
}

/// Update a member; absent fields keep their stored value
///
/// # Arguments
/// * `conn` - database connection
/// * `id` - member id
/// * `dto` - fields to change
///
/// # Returns
/// The updated member
pub fn update(conn: &Connection, id: i64, dto: UpdateMemberDto) -> AppResult<Member> {
    let now = get_current_timestamp();
    let existing = find_by_id(conn, id)?;

    let first_name = dto.first_name.unwrap_or(existing.first_name);
    let last_name = dto.last_name.unwrap_or(existing.last_name);
    let gender = dto.gender.unwrap_or(existing.gender);
    let birth_date = dto.birth_date.unwrap_or(existing.birth_date);
    let birth_place = dto.birth_place.unwrap_or(existing.birth_place);
    let address = dto.address.unwrap_or(existing.address);
    let phone = dto.phone.unwrap_or(existing.phone);
    let section = dto.section.unwrap_or(existing.section);
    let sub_section = match dto.sub_section {
        Some(sub_section) => normalize_sub_section(Some(sub_section)),
        None => existing.sub_section,
    };
    let join_date = dto.join_date.unwrap_or(existing.join_date);
    let sass_amount = dto.sass_amount.unwrap_or(existing.sass_amount);
    let dues_status = dto.dues_status.unwrap_or(existing.dues_status);

    conn.execute(
        "UPDATE members
         SET first_name = ?1, last_name = ?2, gender = ?3, birth_date = ?4, birth_place = ?5,
             address = ?6, phone = ?7, section = ?8, sub_section = ?9, join_date = ?10,
             sass_amount = ?11, dues_status = ?12, updated_at = ?13
         WHERE id = ?14",
        params![
            first_name.trim(),
            last_name.trim(),
            gender,
            birth_date,
            birth_place.trim(),
            address.trim(),
            phone.trim(),
            section.trim(),
            sub_section,
            join_date,
            sass_amount,
            dues_status,
            now,
            id
        ],
    )?;

    find_by_id(conn, id)
}

/// Delete a member together with all of their payments
///
/// # Arguments
/// * `conn` - database connection
/// * `id` - member id
pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    let removed_payments = tx.execute(
        "DELETE FROM contributions WHERE member_id = ?1",
        params![id],
    )?;
    let rows_affected = tx.execute("DELETE FROM members WHERE id = ?1", params![id])?;

    if rows_affected == 0 {
        return Err(AppError::not_found(format!("Membre {id}")));
    }

    tx.commit()?;
    log::info!("Member deleted: id={id}, payments removed={removed_payments}");

    Ok(())
}

fn normalize_sub_section(sub_section: Option<String>) -> Option<String> {
    sub_section
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
