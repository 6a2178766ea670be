use super::models::{
    AnnualReport, CensusEntry, CensusReport, ContributionHistoryEntry, ContributionTypeTotal, DashboardStats, ExportData,
    LatePayment, LatePaymentReport, MonthlyCollection, SectionReport, SectionSummary,
    UNKNOWN_LABEL,
};
use crate::features::contribution_types::models::ContributionTypeDefinition;
use crate::features::contribution_types::repository as contribution_types;
use crate::features::contributions::models::Contribution;
use crate::features::contributions::repository as contributions;
use crate::features::dues::{
    collection_rate, count_complete, yearly_reconciliation, DuesCalculator,
};
use crate::features::members::models::{Gender, Member, MemberFilter};
use crate::features::members::repository as members;
use crate::features::settings::models::AppSettings;
use crate::shared::errors::AppResult;
use crate::shared::utils::{get_current_timestamp, month_name};
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use std::collections::BTreeMap;

const RECENT_MEMBERS_LIMIT: usize = 5;

/// Snapshot of everything reports are built from
#[derive(Debug, Clone, Default)]
pub struct ReportData {
    pub members: Vec<Member>,
    pub contributions: Vec<Contribution>,
    pub contribution_types: Vec<ContributionTypeDefinition>,
}

impl ReportData {
    pub fn load(conn: &Connection) -> AppResult<Self> {
        Ok(Self {
            members: members::find_all(conn, &MemberFilter::default())?,
            contributions: contributions::find_all(conn)?,
            contribution_types: contribution_types::list_all(conn)?,
        })
    }

    pub fn calculator(&self, today: NaiveDate) -> DuesCalculator<'_> {
        DuesCalculator::new(&self.contribution_types, today)
    }

    fn member_name(&self, member_id: i64) -> String {
        self.members
            .iter()
            .find(|member| member.id == member_id)
            .map(Member::full_name)
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }

    fn type_label(&self, contribution: &Contribution) -> String {
        self.contribution_types
            .iter()
            .find(|definition| definition.key() == contribution.contribution_type)
            .map(|definition| definition.label().to_string())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }

    fn payments_in_year(&self, year: i32) -> impl Iterator<Item = &Contribution> {
        self.contributions
            .iter()
            .filter(move |contribution| contribution.year == year)
    }
}

/// Headcount by gender and the member roster, in listing order
pub fn census_report(data: &ReportData) -> CensusReport {
    let count_gender =
        |gender: Gender| data.members.iter().filter(|m| m.gender == gender).count();

    CensusReport {
        total_members: data.members.len(),
        male_count: count_gender(Gender::Male),
        female_count: count_gender(Gender::Female),
        members: data
            .members
            .iter()
            .map(|member| CensusEntry {
                member_id: member.id,
                full_name: member.full_name(),
                gender: member.gender,
                birth_date: member.birth_date,
                address: member.address.clone(),
                phone: member.phone.clone(),
                section: member.section.clone(),
                join_date: member.join_date,
            })
            .collect(),
    }
}

/// Dashboard figures for the current month
pub fn dashboard_stats(data: &ReportData, today: NaiveDate) -> DashboardStats {
    let calculator = data.calculator(today);
    let (year, month) = (today.year(), today.month());

    let monthly_collected: i64 = data
        .contributions
        .iter()
        .filter(|contribution| contribution.month == month && contribution.year == year)
        .map(|contribution| contribution.amount)
        .sum();
    let monthly_expected: i64 = data
        .members
        .iter()
        .map(|member| calculator.monthly_due(member).total)
        .sum();

    let mut recent_members = data.members.clone();
    recent_members.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    recent_members.truncate(RECENT_MEMBERS_LIMIT);

    DashboardStats {
        year,
        month,
        total_members: data.members.len(),
        active_payers: data.members.iter().filter(|m| m.is_active_payer()).count(),
        up_to_date_members: count_complete(
            &calculator,
            &data.members,
            &data.contributions,
            month,
            year,
        ),
        monthly_collected,
        monthly_expected,
        collection_rate: collection_rate(
            &calculator,
            &data.members,
            &data.contributions,
            month,
            year,
        ),
        recent_members,
    }
}

/// Collections of one year, by month and by contribution type
pub fn annual_report(data: &ReportData, year: i32) -> AnnualReport {
    let mut monthly_amounts = [0i64; 12];
    let mut by_type: BTreeMap<String, ContributionTypeTotal> = BTreeMap::new();
    let mut payment_count = 0;

    for contribution in data.payments_in_year(year) {
        payment_count += 1;
        let slot = (contribution.month as usize)
            .checked_sub(1)
            .and_then(|index| monthly_amounts.get_mut(index));
        if let Some(slot) = slot {
            *slot += contribution.amount;
        }

        let total = by_type
            .entry(contribution.contribution_type.to_string())
            .or_insert_with(|| ContributionTypeTotal {
                contribution_type: contribution.contribution_type,
                label: data.type_label(contribution),
                amount: 0,
                payment_count: 0,
            });
        total.amount += contribution.amount;
        total.payment_count += 1;
    }

    let monthly_collections = (1..=12u32)
        .zip(monthly_amounts)
        .map(|(month, amount)| MonthlyCollection {
            month,
            month_name: month_name(month).unwrap_or_default().to_string(),
            amount,
        })
        .collect();

    let mut by_contribution_type: Vec<_> = by_type.into_values().collect();
    by_contribution_type.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.label.cmp(&b.label)));

    AnnualReport {
        year,
        total_collected: monthly_amounts.iter().sum(),
        payment_count,
        active_payers: data.members.iter().filter(|m| m.is_active_payer()).count(),
        monthly_collections,
        by_contribution_type,
    }
}

/// Members and collections per section
///
/// Configured sections come first in their configured order, followed by any
/// section still carried by a member after being removed from the list.
pub fn section_report(
    data: &ReportData,
    configured_sections: &[String],
    year: i32,
) -> SectionReport {
    let mut section_names: Vec<String> = configured_sections.to_vec();
    for member in &data.members {
        if !section_names.contains(&member.section) {
            section_names.push(member.section.clone());
        }
    }

    let sections = section_names
        .into_iter()
        .map(|section| {
            let section_members: Vec<&Member> = data
                .members
                .iter()
                .filter(|member| member.section == section)
                .collect();
            let collected: i64 = data
                .payments_in_year(year)
                .filter(|contribution| {
                    section_members
                        .iter()
                        .any(|member| member.id == contribution.member_id)
                })
                .map(|contribution| contribution.amount)
                .sum();

            SectionSummary {
                member_count: section_members.len(),
                active_payers: section_members.iter().filter(|m| m.is_active_payer()).count(),
                collected,
                section,
            }
        })
        .collect();

    SectionReport { year, sections }
}

/// Every payment, newest first, with member and type names resolved
pub fn contribution_history(data: &ReportData) -> Vec<ContributionHistoryEntry> {
    let mut history: Vec<ContributionHistoryEntry> = data
        .contributions
        .iter()
        .map(|contribution| ContributionHistoryEntry {
            member_name: data.member_name(contribution.member_id),
            contribution_type_label: data.type_label(contribution),
            contribution: contribution.clone(),
        })
        .collect();

    history.sort_by(|a, b| {
        b.contribution
            .payment_date
            .cmp(&a.contribution.payment_date)
            .then(b.contribution.id.cmp(&a.contribution.id))
    });
    history
}

/// Active payers with unpaid or partial months in `year`
///
/// Months are checked up to the current month for the current year, through
/// December for past years, and not at all for future years. Months before a
/// member joined are never counted.
pub fn late_payment_report(data: &ReportData, today: NaiveDate, year: i32) -> LatePaymentReport {
    let through_month = match year.cmp(&today.year()) {
        std::cmp::Ordering::Less => 12,
        std::cmp::Ordering::Equal => today.month(),
        std::cmp::Ordering::Greater => 0,
    };
    let calculator = data.calculator(today);

    let late_members: Vec<LatePayment> = data
        .members
        .iter()
        .filter(|member| member.is_active_payer())
        .filter_map(|member| {
            let late_rows: Vec<_> =
                yearly_reconciliation(&calculator, member, year, &data.contributions)
                    .into_iter()
                    .filter(|row| row.month <= through_month && row.status.is_delinquent())
                    .collect();
            if late_rows.is_empty() {
                return None;
            }

            let last_payment_date = data
                .contributions
                .iter()
                .filter(|contribution| contribution.member_id == member.id)
                .map(|contribution| contribution.payment_date)
                .max();

            Some(LatePayment {
                member_id: member.id,
                member_name: member.full_name(),
                section: member.section.clone(),
                phone: member.phone.clone(),
                late_months: late_rows.iter().map(|row| row.month).collect(),
                amount_owed: late_rows.iter().map(|row| row.remaining).sum(),
                last_payment_date,
            })
        })
        .collect();

    if !late_members.is_empty() {
        log::debug!("{} member(s) late for {year}", late_members.len());
    }

    LatePaymentReport {
        year,
        through_month,
        total_owed: late_members.iter().map(|late| late.amount_owed).sum(),
        members: late_members,
    }
}

/// Serialize all data to pretty-printed JSON
pub fn export_data(data: &ReportData, settings: &AppSettings) -> AppResult<String> {
    let export = ExportData {
        exported_at: get_current_timestamp(),
        dahira_name: &settings.dahira_name,
        sections: &settings.sections,
        members: &data.members,
        contributions: &data.contributions,
        contribution_types: &data.contribution_types,
    };
    let json = serde_json::to_string_pretty(&export)?;
    log::info!(
        "Data exported: {} members, {} payments",
        data.members.len(),
        data.contributions.len()
    );
    Ok(json)
}
