use crate::shared::errors::AppResult;
use rusqlite::Connection;
use std::path::Path;

/// Open the database file and make sure the schema exists
///
/// # Arguments
/// * `database_path` - path of the SQLite file (created when missing)
///
/// # Returns
/// An open connection with foreign keys enabled
pub fn initialize_database(database_path: &Path) -> AppResult<Connection> {
    let conn = Connection::open(database_path)?;
    configure_connection(&conn)?;
    create_tables(&conn)?;

    log::info!("Database initialized: {:?}", database_path);

    Ok(conn)
}

/// Open a fresh in-memory database with the full schema
pub fn open_in_memory_database() -> AppResult<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_connection(&conn)?;
    create_tables(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> AppResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(())
}

/// Create every table and index
///
/// # Arguments
/// * `conn` - database connection
pub fn create_tables(conn: &Connection) -> AppResult<()> {
    create_members_table(conn)?;
    create_contributions_table(conn)?;
    create_custom_contribution_types_table(conn)?;
    create_app_settings_table(conn)?;
    Ok(())
}

fn create_members_table(conn: &Connection) -> AppResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            gender TEXT NOT NULL CHECK(gender IN ('male', 'female')),
            birth_date TEXT NOT NULL,
            birth_place TEXT NOT NULL,
            address TEXT NOT NULL,
            phone TEXT NOT NULL,
            section TEXT NOT NULL,
            sub_section TEXT,
            join_date TEXT NOT NULL,
            sass_amount INTEGER NOT NULL CHECK(sass_amount >= 0),
            dues_status TEXT NOT NULL CHECK(dues_status IN ('active_payer', 'non_payer')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_members_section ON members(section)",
        [],
    )?;

    Ok(())
}

fn create_contributions_table(conn: &Connection) -> AppResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS contributions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_id INTEGER NOT NULL REFERENCES members(id) ON DELETE CASCADE,
            contribution_type TEXT NOT NULL,
            amount INTEGER NOT NULL CHECK(amount > 0),
            month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
            year INTEGER NOT NULL,
            payment_date TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contributions_member ON contributions(member_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contributions_period ON contributions(year, month)",
        [],
    )?;

    Ok(())
}

fn create_custom_contribution_types_table(conn: &Connection) -> AppResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS custom_contribution_types (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            label TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            amount INTEGER CHECK(amount IS NULL OR amount > 0),
            mandatory INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

fn create_app_settings_table(conn: &Connection) -> AppResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}
