//! Payment reconciliation
//!
//! Classifies each month of a member's year by comparing what was paid
//! against what the dues calculator says is owed.

use super::calculator::DuesCalculator;
use crate::features::contributions::models::Contribution;
use crate::features::members::models::Member;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Payment state of one member for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthStatus {
    /// Before the member joined
    NotRequired,
    Unpaid,
    Partial,
    Complete,
}

impl MonthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonthStatus::NotRequired => "not_required",
            MonthStatus::Unpaid => "unpaid",
            MonthStatus::Partial => "partial",
            MonthStatus::Complete => "complete",
        }
    }

    /// Whether the month counts as late
    pub fn is_delinquent(&self) -> bool {
        matches!(self, MonthStatus::Unpaid | MonthStatus::Partial)
    }
}

/// One row of a member's yearly tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthReconciliation {
    pub month: u32,
    pub paid: i64,
    pub due: i64,
    /// What is still owed, never negative
    pub remaining: i64,
    pub status: MonthStatus,
}

/// First month of the join year for which dues are owed
pub fn first_payable_month(join_date: NaiveDate) -> u32 {
    join_date.month()
}

/// Sum of a member's payments credited to a month, all contribution types included
pub fn paid_for_month(member_id: i64, month: u32, year: i32, payments: &[Contribution]) -> i64 {
    payments
        .iter()
        .filter(|payment| payment.applies_to(member_id, month, year))
        .map(|payment| payment.amount)
        .sum()
}

/// A zero due is trivially met, so non-payers always read as complete.
fn classify(paid: i64, due: i64) -> MonthStatus {
    if paid >= due {
        MonthStatus::Complete
    } else if paid > 0 {
        MonthStatus::Partial
    } else {
        MonthStatus::Unpaid
    }
}

/// Years before the join year are owed nothing at all.
fn is_before_join(member: &Member, month: u32, year: i32) -> bool {
    match year.cmp(&member.join_year()) {
        Ordering::Less => true,
        Ordering::Equal => month < first_payable_month(member.join_date),
        Ordering::Greater => false,
    }
}

/// Status of one member for one month
///
/// # Arguments
/// * `calculator` - dues calculator for the current date and type set
/// * `member` - the member
/// * `year` / `month` - the evaluated period
/// * `payments` - recorded payments; only the member's payments for the period are counted
pub fn month_status(
    calculator: &DuesCalculator<'_>,
    member: &Member,
    year: i32,
    month: u32,
    payments: &[Contribution],
) -> MonthStatus {
    if is_before_join(member, month, year) {
        return MonthStatus::NotRequired;
    }

    let paid = paid_for_month(member.id, month, year, payments);
    let due = calculator.monthly_due(member).total;
    classify(paid, due)
}

/// Twelve tracker rows, January to December
pub fn yearly_reconciliation(
    calculator: &DuesCalculator<'_>,
    member: &Member,
    year: i32,
    payments: &[Contribution],
) -> Vec<MonthReconciliation> {
    let due = calculator.monthly_due(member).total;

    (1..=12)
        .map(|month| {
            let paid = paid_for_month(member.id, month, year, payments);
            let (due, status) = if is_before_join(member, month, year) {
                (0, MonthStatus::NotRequired)
            } else {
                (due, classify(paid, due))
            };
            MonthReconciliation {
                month,
                paid,
                due,
                remaining: (due - paid).max(0),
                status,
            }
        })
        .collect()
}

/// Share of the expected dues collected in a month, as a rounded percentage
///
/// Expected dues sum over all members, so non-payers add nothing. Returns 0
/// when nothing is expected.
pub fn collection_rate(
    calculator: &DuesCalculator<'_>,
    members: &[Member],
    payments: &[Contribution],
    month: u32,
    year: i32,
) -> u32 {
    let expected: i64 = members
        .iter()
        .map(|member| calculator.monthly_due(member).total)
        .sum();
    if expected <= 0 {
        return 0;
    }

    let collected: i64 = payments
        .iter()
        .filter(|payment| payment.month == month && payment.year == year)
        .map(|payment| payment.amount)
        .sum();

    (100.0 * collected as f64 / expected as f64).round() as u32
}

/// Number of active payers whose month is complete
pub fn count_complete(
    calculator: &DuesCalculator<'_>,
    members: &[Member],
    payments: &[Contribution],
    month: u32,
    year: i32,
) -> usize {
    members
        .iter()
        .filter(|member| member.is_active_payer())
        .filter(|member| {
            month_status(calculator, member, year, month, payments) == MonthStatus::Complete
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::contribution_types::models::{
        ContributionTypeKey, StandardContributionType,
    };
    use crate::features::dues::calculator::tests::{date, member};
    use crate::features::members::models::{DuesStatus, Gender};

    fn paid(
        id: i64,
        member_id: i64,
        key: StandardContributionType,
        amount: i64,
        month: u32,
        year: i32,
    ) -> Contribution {
        Contribution {
            id,
            member_id,
            contribution_type: ContributionTypeKey::Standard(key),
            amount,
            month,
            year,
            payment_date: date(year, month, 10),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_month_status_ordering_for_june_joiner() {
        let today = date(2024, 8, 1);
        let calculator = DuesCalculator::standard(today);
        let joiner = member(1, Gender::Male, date(2024, 6, 12), 7000, DuesStatus::ActivePayer);
        let due = calculator.monthly_due(&joiner).total;
        let payments = vec![paid(1, 1, StandardContributionType::Monthly, due, 6, 2024)];

        for month in 1..=5 {
            assert_eq!(
                month_status(&calculator, &joiner, 2024, month, &payments),
                MonthStatus::NotRequired
            );
        }
        assert_eq!(
            month_status(&calculator, &joiner, 2024, 6, &payments),
            MonthStatus::Complete
        );
        for month in 7..=12 {
            assert_eq!(
                month_status(&calculator, &joiner, 2024, month, &payments),
                MonthStatus::Unpaid
            );
        }
        // The join-month boundary only applies to the join year.
        assert_eq!(
            month_status(&calculator, &joiner, 2025, 1, &payments),
            MonthStatus::Unpaid
        );
    }

    #[test]
    fn test_years_before_join_are_not_required() {
        let calculator = DuesCalculator::standard(date(2024, 8, 1));
        let joiner = member(1, Gender::Male, date(2024, 6, 1), 0, DuesStatus::ActivePayer);

        for month in 1..=12 {
            assert_eq!(
                month_status(&calculator, &joiner, 2023, month, &[]),
                MonthStatus::NotRequired
            );
        }
        let rows = yearly_reconciliation(&calculator, &joiner, 2023, &[]);
        assert!(rows
            .iter()
            .all(|row| row.status == MonthStatus::NotRequired && row.due == 0 && row.remaining == 0));
    }

    #[test]
    fn test_status_thresholds() {
        let today = date(2024, 8, 1);
        let calculator = DuesCalculator::standard(today);
        // 12000 / 12 = 1000 Sass share + 500 + 1000 + 500 = 3000.
        let woman = member(1, Gender::Female, date(2020, 1, 1), 12_000, DuesStatus::ActivePayer);
        assert_eq!(calculator.monthly_due(&woman).total, 3000);

        let cases = [
            (0, MonthStatus::Unpaid),
            (1500, MonthStatus::Partial),
            (3000, MonthStatus::Complete),
            (4000, MonthStatus::Complete),
        ];
        for (amount, expected) in cases {
            let payments = if amount > 0 {
                vec![paid(1, 1, StandardContributionType::Monthly, amount, 3, 2024)]
            } else {
                Vec::new()
            };
            assert_eq!(
                month_status(&calculator, &woman, 2024, 3, &payments),
                expected,
                "paid {amount}"
            );
        }
    }

    #[test]
    fn test_payments_accumulate_across_types() {
        let calculator = DuesCalculator::standard(date(2024, 8, 1));
        let woman = member(1, Gender::Female, date(2020, 1, 1), 12_000, DuesStatus::ActivePayer);
        let payments = vec![
            paid(1, 1, StandardContributionType::Social, 500, 4, 2024),
            paid(2, 1, StandardContributionType::SassMonthly, 1000, 4, 2024),
            paid(3, 1, StandardContributionType::Alarba, 1500, 4, 2024),
            paid(4, 2, StandardContributionType::Monthly, 5000, 4, 2024),
            paid(5, 1, StandardContributionType::Monthly, 5000, 4, 2023),
        ];

        assert_eq!(paid_for_month(1, 4, 2024, &payments), 3000);
        assert_eq!(
            month_status(&calculator, &woman, 2024, 4, &payments),
            MonthStatus::Complete
        );
    }

    #[test]
    fn test_non_payer_months_are_complete() {
        let calculator = DuesCalculator::standard(date(2024, 8, 1));
        let exempt = member(1, Gender::Male, date(2020, 1, 1), 12_000, DuesStatus::NonPayer);

        assert_eq!(
            month_status(&calculator, &exempt, 2024, 3, &[]),
            MonthStatus::Complete
        );
    }

    #[test]
    fn test_yearly_reconciliation_rows() {
        let calculator = DuesCalculator::standard(date(2024, 8, 1));
        let joiner = member(1, Gender::Male, date(2024, 6, 1), 7000, DuesStatus::ActivePayer);
        // 7000 / 7 = 1000 Sass share + 1000 + 1000 + 500 = 3500.
        let payments = vec![
            paid(1, 1, StandardContributionType::Monthly, 3500, 6, 2024),
            paid(2, 1, StandardContributionType::Monthly, 2000, 7, 2024),
        ];

        let rows = yearly_reconciliation(&calculator, &joiner, 2024, &payments);
        assert_eq!(rows.len(), 12);
        assert_eq!(rows.iter().map(|r| r.month).collect::<Vec<_>>(), (1..=12).collect::<Vec<_>>());

        assert_eq!(rows[4].status, MonthStatus::NotRequired);
        assert_eq!(rows[4].due, 0);
        assert_eq!(rows[5].status, MonthStatus::Complete);
        assert_eq!(rows[5].remaining, 0);
        assert_eq!(rows[6].status, MonthStatus::Partial);
        assert_eq!(rows[6].remaining, 1500);
        assert_eq!(rows[7].status, MonthStatus::Unpaid);
        assert_eq!(rows[7].remaining, 3500);
    }

    #[test]
    fn test_collection_rate() {
        let calculator = DuesCalculator::standard(date(2024, 8, 1));
        let members = vec![
            member(1, Gender::Female, date(2020, 1, 1), 12_000, DuesStatus::ActivePayer),
            member(2, Gender::Female, date(2020, 1, 1), 12_000, DuesStatus::ActivePayer),
            member(3, Gender::Male, date(2020, 1, 1), 12_000, DuesStatus::NonPayer),
        ];
        let payments = vec![
            paid(1, 1, StandardContributionType::Monthly, 3000, 3, 2024),
            paid(2, 2, StandardContributionType::Monthly, 1000, 3, 2024),
            paid(3, 2, StandardContributionType::Monthly, 1000, 4, 2024),
        ];

        // 4000 collected out of 6000 expected.
        assert_eq!(collection_rate(&calculator, &members, &payments, 3, 2024), 67);
        assert_eq!(count_complete(&calculator, &members, &payments, 3, 2024), 1);
    }

    #[test]
    fn test_collection_rate_zero_guard() {
        let calculator = DuesCalculator::standard(date(2024, 8, 1));
        let exempt = vec![member(1, Gender::Male, date(2020, 1, 1), 0, DuesStatus::NonPayer)];
        let payments = vec![paid(1, 1, StandardContributionType::Alarba, 2000, 3, 2024)];

        assert_eq!(collection_rate(&calculator, &[], &[], 3, 2024), 0);
        assert_eq!(collection_rate(&calculator, &exempt, &payments, 3, 2024), 0);
    }
}
