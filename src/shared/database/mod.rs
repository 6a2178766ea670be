/// Connection opening and schema creation
pub mod connection;

pub use connection::{create_tables, initialize_database, open_in_memory_database};
