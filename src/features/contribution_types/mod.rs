/// Contribution type feature
///
/// Built-in types and administrator-defined custom types behind one lookup.
pub mod commands;
pub mod models;
pub mod repository;

pub use commands::{
    create_custom_contribution_type, delete_custom_contribution_type, get_contribution_types,
    update_custom_contribution_type,
};

pub use models::{
    ContributionTypeDefinition, ContributionTypeKey, CreateCustomContributionTypeDto,
    CustomContributionType, StandardContributionType, UpdateCustomContributionTypeDto,
};
