//! The JSON payloads accepted by the transaction endpoints.

use rust_decimal::Decimal;
use serde::Deserialize;
use time::{Date, OffsetDateTime};
use time_tz::Tz;

use crate::{
    timezone::{end_of_day, start_of_day},
    transaction::{
        category::{Category, TransactionKind},
        core::{Transaction, TransactionBuilder},
        query::TransactionQuery,
    },
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// The body of a request to create or replace a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The magnitude of the transaction.
    pub amount: Decimal,
    /// What the transaction was for.
    pub description: String,
    /// The category, from the vocabulary of `kind`.
    pub category: Category,
    /// When the transaction happened as an RFC 3339 date-time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    /// Free-text labels.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<TransactionForm> for TransactionBuilder {
    fn from(form: TransactionForm) -> Self {
        Transaction::build(form.kind, form.amount, form.category, &form.description)
            .occurred_at(form.date)
            .tags(form.tags)
    }
}

/// The query string of a request to list transactions.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsParams {
    /// Only include transactions of this kind.
    #[serde(rename = "type", alias = "kind")]
    pub kind: Option<TransactionKind>,
    /// Only include transactions in this category.
    pub category: Option<Category>,
    /// Only include transactions on or after this local date.
    #[serde(default, alias = "start_date", with = "iso_date::option")]
    pub start_date: Option<Date>,
    /// Only include transactions on or before this local date.
    #[serde(default, alias = "end_date", with = "iso_date::option")]
    pub end_date: Option<Date>,
    /// The 1-indexed page to return.
    pub page: Option<u64>,
    /// The number of transactions per page.
    pub limit: Option<u64>,
}

impl ListTransactionsParams {
    /// Convert the parameters into a query, interpreting dates as whole days
    /// in `timezone`.
    ///
    /// `page` and `page_size` must already be resolved against the
    /// pagination config.
    pub fn into_query(self, timezone: &Tz, page: u64, page_size: u64) -> TransactionQuery {
        TransactionQuery {
            kind: self.kind,
            category: self.category,
            start: self.start_date.and_then(|date| start_of_day(date, timezone)),
            end: self.end_date.and_then(|date| end_of_day(date, timezone)),
            page,
            page_size,
        }
    }
}
