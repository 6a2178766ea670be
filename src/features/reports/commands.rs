use super::models::{
    AnnualReport, CensusReport, ContributionHistoryEntry, DashboardStats, LatePaymentReport, SectionReport,
};
use super::service::{self, ReportData};
use crate::shared::errors::AppResult;
use crate::shared::utils::{today, validate_year};
use crate::AppState;

fn load_report_data(state: &AppState) -> AppResult<ReportData> {
    let db = state.lock_db()?;
    ReportData::load(&db)
}

/// Member headcount and roster
pub fn get_census_report(state: &AppState) -> AppResult<CensusReport> {
    let data = load_report_data(state)?;
    Ok(service::census_report(&data))
}

/// Dashboard figures for the current month
pub fn get_dashboard_stats(state: &AppState) -> AppResult<DashboardStats> {
    let data = load_report_data(state)?;
    Ok(service::dashboard_stats(&data, today()))
}

pub fn get_annual_report(year: i32, state: &AppState) -> AppResult<AnnualReport> {
    validate_year(year)?;
    let data = load_report_data(state)?;
    Ok(service::annual_report(&data, year))
}

/// Members and collections per configured section
pub fn get_section_report(year: i32, state: &AppState) -> AppResult<SectionReport> {
    validate_year(year)?;
    let sections = state.lock_settings()?.sections().to_vec();
    let data = load_report_data(state)?;
    Ok(service::section_report(&data, &sections, year))
}

pub fn get_contribution_history(state: &AppState) -> AppResult<Vec<ContributionHistoryEntry>> {
    let data = load_report_data(state)?;
    Ok(service::contribution_history(&data))
}

/// Active payers behind on their dues in `year`
pub fn get_late_payment_report(year: i32, state: &AppState) -> AppResult<LatePaymentReport> {
    validate_year(year)?;
    let data = load_report_data(state)?;
    Ok(service::late_payment_report(&data, today(), year))
}

/// Export every member, payment and type as JSON
///
/// # Returns
/// Pretty-printed JSON; requires an administrator session
pub fn export_data(state: &AppState) -> AppResult<String> {
    let settings = {
        let settings = state.lock_settings()?;
        settings.require_authenticated()?;
        settings.settings().clone()
    };
    let data = load_report_data(state)?;
    service::export_data(&data, &settings)
}
