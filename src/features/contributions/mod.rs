/// Payment feature
///
/// An append-only ledger of recorded contributions.
pub mod commands;
pub mod models;
pub mod repository;

pub use commands::{
    get_contributions, get_contributions_by_period, get_member_contributions, record_contribution,
};

pub use models::{Contribution, CreateContributionDto};
