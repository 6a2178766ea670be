/// Dues feature
///
/// Pure computations: the monthly dues schedule of a member and the
/// reconciliation of recorded payments against it.
pub mod calculator;
pub mod reconciliation;

pub use calculator::{
    compute_monthly_due, remaining_months, round_to_nearest_50, sass_share, CustomDueLine,
    DuesCalculator, MonthlyDue,
};

pub use reconciliation::{
    collection_rate, count_complete, first_payable_month, month_status, paid_for_month,
    yearly_reconciliation, MonthReconciliation, MonthStatus,
};
