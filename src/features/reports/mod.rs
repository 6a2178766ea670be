/// Report feature
///
/// Member census, dashboard figures, annual and per-section reports, payment
/// history, late payments and the JSON export.
pub mod commands;
pub mod models;
pub mod service;

pub use commands::{
    export_data, get_annual_report, get_census_report, get_contribution_history,
    get_dashboard_stats, get_late_payment_report, get_section_report,
};

pub use models::{
    AnnualReport, CensusEntry, CensusReport, ContributionHistoryEntry, DashboardStats,
    LatePayment, LatePaymentReport, SectionReport, SectionSummary,
};

pub use service::ReportData;
