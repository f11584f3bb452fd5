//! Transaction data aggregation for the dashboard.
//!
//! Provides functions to total transactions by kind and category, group them
//! into a monthly series, and rank expense categories.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use time_tz::{OffsetDateTimeExt, Tz};

use crate::transaction::{Category, Transaction, TransactionKind};

/// The totals of a set of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PeriodTotals {
    /// The sum of all income amounts.
    pub total_income: Decimal,
    /// The sum of all expense amounts.
    pub total_expenses: Decimal,
    /// Income minus expenses, may be negative.
    pub balance: Decimal,
    /// The number of transactions of either kind.
    pub transaction_count: usize,
    /// Expense totals per category. Categories with no transactions are absent.
    pub expenses_by_category: BTreeMap<Category, Decimal>,
    /// Income totals per category. Categories with no transactions are absent.
    pub income_by_category: BTreeMap<Category, Decimal>,
}

/// Total `transactions` by kind and by category.
///
/// An empty slice gives zero totals and empty category maps.
pub fn summarize(transactions: &[Transaction]) -> PeriodTotals {
    let mut totals = PeriodTotals::default();

    for transaction in transactions {
        let (total, by_category) = match transaction.kind {
            TransactionKind::Income => (&mut totals.total_income, &mut totals.income_by_category),
            TransactionKind::Expense => {
                (&mut totals.total_expenses, &mut totals.expenses_by_category)
            }
        };

        *total += transaction.amount;
        *by_category
            .entry(transaction.category)
            .or_insert(Decimal::ZERO) += transaction.amount;
    }

    totals.balance = totals.total_income - totals.total_expenses;
    totals.transaction_count = transactions.len();

    totals
}

/// The total of one kind of transaction in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendPoint {
    /// The calendar year.
    pub year: i32,
    /// The month number, 1 for January through to 12 for December.
    pub month: u8,
    /// Whether the total is for income or expenses.
    pub kind: TransactionKind,
    /// The sum of the amounts.
    pub total: Decimal,
}

/// Group `transactions` by the calendar month they happened in and their kind,
/// summing the amounts of each group.
///
/// Months are taken from each transaction's date in `timezone`, with the
/// offset in effect at that date.
/// Points are ordered by year and month, with income before expenses within
/// a month. Months without transactions of a kind have no point.
pub fn monthly_series(transactions: &[Transaction], timezone: &Tz) -> Vec<TrendPoint> {
    let mut totals: BTreeMap<(i32, u8, TransactionKind), Decimal> = BTreeMap::new();

    for transaction in transactions {
        let date = transaction.occurred_at.to_timezone(timezone).date();
        let key = (date.year(), u8::from(date.month()), transaction.kind);
        *totals.entry(key).or_insert(Decimal::ZERO) += transaction.amount;
    }

    totals
        .into_iter()
        .map(|((year, month, kind), total)| TrendPoint {
            year,
            month,
            kind,
            total,
        })
        .collect()
}

/// The total spent in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTotal {
    /// The expense category.
    pub category: Category,
    /// The sum of the amounts.
    pub total: Decimal,
}

/// The `limit` expense categories with the largest totals across all of
/// `transactions`, largest first.
///
/// Equal totals are ordered by the category's position in the vocabulary.
/// Income transactions are ignored.
pub fn top_expense_categories(transactions: &[Transaction], limit: usize) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<Category, Decimal> = BTreeMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Expense)
    {
        *totals
            .entry(transaction.category)
            .or_insert(Decimal::ZERO) += transaction.amount;
    }

    let mut ranked: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
    ranked.sort_by(|a, b| b.total.cmp(&a.total).then(a.category.cmp(&b.category)));
    ranked.truncate(limit);

    ranked
}
