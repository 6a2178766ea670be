//! Monthly dues schedule
//!
//! Derives what a member owes each month from their profile. The current
//! date is always passed in as `today`, never read from the clock here.

use crate::features::contribution_types::models::{
    ContributionTypeDefinition, ContributionTypeKey, StandardContributionType,
};
use crate::features::members::models::Member;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Granularity of the amortized Sass share (FCFA)
pub const SASS_ROUNDING_STEP: i64 = 50;

/// One fee line coming from a mandatory custom contribution type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomDueLine {
    pub contribution_type: ContributionTypeKey,
    pub label: String,
    pub amount: i64,
}

/// What a member owes for one month, by component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyDue {
    /// Amortized share of the Sass lump sum
    pub sass_share: i64,
    /// Gender-differentiated monthly fee
    pub monthly_fee: i64,
    /// Sass Wer Bi fee
    pub sass_wer_bi_fee: i64,
    /// Social fee
    pub social_fee: i64,
    /// Mandatory custom types with a fixed amount
    pub custom_fees: Vec<CustomDueLine>,
    pub total: i64,
}

impl MonthlyDue {
    /// The breakdown of a member who owes nothing
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Round to the nearest multiple of 50, halves rounding up
pub fn round_to_nearest_50(value: f64) -> i64 {
    let step = SASS_ROUNDING_STEP as f64;
    ((value / step).round() as i64) * SASS_ROUNDING_STEP
}

/// Number of months the Sass is spread over
///
/// Joining in the current year spreads it over the join month and the months
/// after it (`13 - join_month`); any other year uses all 12 months.
pub fn remaining_months(join_date: NaiveDate, today: NaiveDate) -> u32 {
    let remaining = if join_date.year() == today.year() {
        13 - join_date.month()
    } else {
        12
    };
    debug_assert!((1..=12).contains(&remaining));
    remaining
}

/// Monthly share of the Sass lump sum, rounded to the nearest 50
///
/// The twelve rounded shares need not add up to the lump sum; no true-up is applied.
pub fn sass_share(sass_amount: i64, join_date: NaiveDate, today: NaiveDate) -> i64 {
    let months = remaining_months(join_date, today);
    round_to_nearest_50(sass_amount as f64 / f64::from(months))
}

/// Monthly due of a member using the standard fees only
///
/// # Arguments
/// * `member` - the member
/// * `today` - current date; decides whether the member is in their join year
pub fn compute_monthly_due(member: &Member, today: NaiveDate) -> MonthlyDue {
    DuesCalculator::standard(today).monthly_due(member)
}

/// Dues calculator over a set of contribution-type definitions
///
/// Standard fees always apply. Every custom type in `types` that is mandatory
/// and has a fixed amount adds one line to the due.
#[derive(Debug, Clone, Copy)]
pub struct DuesCalculator<'a> {
    types: &'a [ContributionTypeDefinition],
    today: NaiveDate,
}

impl<'a> DuesCalculator<'a> {
    pub fn new(types: &'a [ContributionTypeDefinition], today: NaiveDate) -> Self {
        Self { types, today }
    }

    /// Calculator without custom types
    pub fn standard(today: NaiveDate) -> DuesCalculator<'static> {
        DuesCalculator { types: &[], today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Compute the monthly due of a member
    ///
    /// Non-payers owe nothing, whatever their profile.
    pub fn monthly_due(&self, member: &Member) -> MonthlyDue {
        if !member.is_active_payer() {
            return MonthlyDue::zero();
        }

        let sass_share = sass_share(member.sass_amount, member.join_date, self.today);
        let monthly_fee = StandardContributionType::Monthly
            .fixed_amount(member.gender)
            .unwrap_or_default();
        let sass_wer_bi_fee = StandardContributionType::SassWerBi
            .fixed_amount(member.gender)
            .unwrap_or_default();
        let social_fee = StandardContributionType::Social
            .fixed_amount(member.gender)
            .unwrap_or_default();

        let custom_fees: Vec<CustomDueLine> = self
            .types
            .iter()
            .filter(|definition| definition.is_custom() && definition.is_mandatory())
            .filter_map(|definition| {
                definition
                    .fixed_amount(member.gender)
                    .map(|amount| CustomDueLine {
                        contribution_type: definition.key(),
                        label: definition.label().to_string(),
                        amount,
                    })
            })
            .collect();

        let total = sass_share
            + monthly_fee
            + sass_wer_bi_fee
            + social_fee
            + custom_fees.iter().map(|line| line.amount).sum::<i64>();

        MonthlyDue {
            sass_share,
            monthly_fee,
            sass_wer_bi_fee,
            social_fee,
            custom_fees,
            total,
        }
    }
}
