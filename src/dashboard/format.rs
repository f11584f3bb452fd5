//! Shapes dashboard results into the JSON response bodies.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    dashboard::{
        aggregation::{CategoryTotal, TrendPoint},
        summary::Summary,
        trends::Trends,
    },
    transaction::{Category, DateInterval, Transaction, TransactionKind},
};

/// The response body of the summary endpoint.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    success: bool,
    summary: SummaryBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryBody {
    total_income: Decimal,
    total_expenses: Decimal,
    balance: Decimal,
    month: u8,
    year: i32,
    transaction_count: usize,
    expenses_by_category: BTreeMap<Category, Decimal>,
    income_by_category: BTreeMap<Category, Decimal>,
    recent_transactions: Vec<Transaction>,
}

impl From<Summary> for SummaryResponse {
    fn from(summary: Summary) -> Self {
        let Summary {
            period,
            totals,
            recent_transactions,
        } = summary;

        Self {
            success: true,
            summary: SummaryBody {
                total_income: totals.total_income,
                total_expenses: totals.total_expenses,
                balance: totals.balance,
                month: period.month,
                year: period.year,
                transaction_count: totals.transaction_count,
                expenses_by_category: totals.expenses_by_category,
                income_by_category: totals.income_by_category,
                recent_transactions,
            },
        }
    }
}

/// The response body of the trends endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsResponse {
    success: bool,
    trends: Vec<TrendPointBody>,
    categories: Vec<CategoryBody>,
    date_range: DateRangeBody,
}

#[derive(Debug, Serialize)]
struct TrendPointBody {
    year: i32,
    month: u8,
    kind: TransactionKind,
    total: Decimal,
}

impl From<TrendPoint> for TrendPointBody {
    fn from(point: TrendPoint) -> Self {
        Self {
            year: point.year,
            month: point.month,
            kind: point.kind,
            total: point.total,
        }
    }
}

#[derive(Debug, Serialize)]
struct CategoryBody {
    name: &'static str,
    amount: Decimal,
    category: Category,
}

impl From<CategoryTotal> for CategoryBody {
    fn from(total: CategoryTotal) -> Self {
        Self {
            name: total.category.label(),
            amount: total.total,
            category: total.category,
        }
    }
}

#[derive(Debug, Serialize)]
struct DateRangeBody {
    #[serde(flatten)]
    interval: DateInterval,
    range: &'static str,
}

impl From<Trends> for TrendsResponse {
    fn from(trends: Trends) -> Self {
        Self {
            success: true,
            trends: trends.series.into_iter().map(TrendPointBody::from).collect(),
            categories: trends
                .categories
                .into_iter()
                .map(CategoryBody::from)
                .collect(),
            date_range: DateRangeBody {
                interval: trends.interval,
                range: trends.range.as_token(),
            },
        }
    }
}
