/// Settings feature
///
/// Access code gate, section list and dahira name, persisted as one JSON
/// document.
pub mod commands;
pub mod models;
pub mod service;

pub use models::AppSettings;
pub use service::SettingsService;
