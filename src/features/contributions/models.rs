use crate::features::contribution_types::models::ContributionTypeKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A recorded payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: i64,
    pub member_id: i64,
    pub contribution_type: ContributionTypeKey,
    pub amount: i64,
    /// Month the payment is credited to (1-12)
    pub month: u32,
    pub year: i32,
    pub payment_date: NaiveDate,
    pub created_at: String,
}

impl Contribution {
    /// Whether this payment is credited to the given member and period
    pub fn applies_to(&self, member_id: i64, month: u32, year: i32) -> bool {
        self.member_id == member_id && self.month == month && self.year == year
    }
}

/// Fields for recording a payment
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContributionDto {
    pub member_id: i64,
    pub contribution_type: ContributionTypeKey,
    pub amount: i64,
    pub month: u32,
    pub year: i32,
    /// Defaults to today when absent
    pub payment_date: Option<NaiveDate>,
}
