use crate::features::contribution_types::models::{ContributionTypeDefinition, ContributionTypeKey};
use crate::features::contributions::models::Contribution;
use crate::features::members::models::{Gender, Member};
use chrono::NaiveDate;
use serde::Serialize;

/// Label shown for a member or contribution type that no longer exists
pub const UNKNOWN_LABEL: &str = "Inconnu";

/// One line of the member census
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CensusEntry {
    pub member_id: i64,
    pub full_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub address: String,
    pub phone: String,
    pub section: String,
    pub join_date: NaiveDate,
}

/// Member census: headcount by gender and the full roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CensusReport {
    pub total_members: usize,
    pub male_count: usize,
    pub female_count: usize,
    pub members: Vec<CensusEntry>,
}

/// Figures of the dashboard for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub year: i32,
    pub month: u32,
    pub total_members: usize,
    pub active_payers: usize,
    /// Active payers whose month is complete
    pub up_to_date_members: usize,
    pub monthly_collected: i64,
    pub monthly_expected: i64,
    /// Rounded percentage of the expected dues collected
    pub collection_rate: u32,
    /// Latest registrations, newest first
    pub recent_members: Vec<Member>,
}

/// Amount collected in one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCollection {
    pub month: u32,
    pub month_name: String,
    pub amount: i64,
}

/// Amount collected under one contribution type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributionTypeTotal {
    pub contribution_type: ContributionTypeKey,
    pub label: String,
    pub amount: i64,
    pub payment_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualReport {
    pub year: i32,
    pub total_collected: i64,
    pub payment_count: usize,
    pub active_payers: usize,
    /// January to December
    pub monthly_collections: Vec<MonthlyCollection>,
    pub by_contribution_type: Vec<ContributionTypeTotal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    pub section: String,
    pub member_count: usize,
    pub active_payers: usize,
    pub collected: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionReport {
    pub year: i32,
    pub sections: Vec<SectionSummary>,
}

/// A payment with its member and type resolved for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionHistoryEntry {
    pub contribution: Contribution,
    pub member_name: String,
    pub contribution_type_label: String,
}

/// An active payer with unpaid or partially paid months
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatePayment {
    pub member_id: i64,
    pub member_name: String,
    pub section: String,
    pub phone: String,
    pub late_months: Vec<u32>,
    /// Sum of what remains owed over the late months
    pub amount_owed: i64,
    pub last_payment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatePaymentReport {
    pub year: i32,
    /// Last month checked, inclusive
    pub through_month: u32,
    pub members: Vec<LatePayment>,
    pub total_owed: i64,
}

/// Full data dump for backups
#[derive(Debug, Clone, Serialize)]
pub struct ExportData<'a> {
    pub exported_at: String,
    pub dahira_name: &'a str,
    pub sections: &'a [String],
    pub members: &'a [Member],
    pub contributions: &'a [Contribution],
    pub contribution_types: &'a [ContributionTypeDefinition],
}
