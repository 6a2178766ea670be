/// Feature modules
///
/// Each feature is a self-contained unit holding its models, repository or
/// service, and commands.
pub mod contribution_types;
pub mod contributions;
pub mod dues;
pub mod members;
pub mod reports;
pub mod settings;
