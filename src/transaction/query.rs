//! Database query helpers for listing a user's transactions.

use rusqlite::{Connection, params_from_iter, types::Value};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error,
    pagination::page_count,
    transaction::{
        category::{Category, TransactionKind},
        core::{TRANSACTION_COLUMNS, Transaction, map_transaction_row, to_sql_timestamp},
    },
    user::UserID,
};

/// The filters supported when listing transactions.
///
/// Every filter is optional and filters are combined with AND.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Only include transactions of this kind.
    pub kind: Option<TransactionKind>,
    /// Only include transactions in this category.
    pub category: Option<Category>,
    /// Only include transactions dated on or after this instant.
    pub start: Option<OffsetDateTime>,
    /// Only include transactions dated on or before this instant.
    pub end: Option<OffsetDateTime>,
    /// The 1-indexed page to return.
    pub page: u64,
    /// The number of transactions per page.
    pub page_size: u64,
}

/// One page of transactions, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionPage {
    /// The number of transactions in this page.
    pub count: usize,
    /// The number of transactions matching the filters across all pages.
    pub total: u64,
    /// The 1-indexed page number.
    pub page: u64,
    /// The number of pages.
    pub pages: u64,
    /// The transactions in this page.
    pub transactions: Vec<Transaction>,
}

/// Get a page of `owner`'s transactions matching `query`.
///
/// Transactions are sorted by date, newest first, and then by ID so that
/// pages are stable.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub fn query_transactions(
    owner: UserID,
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<TransactionPage, Error> {
    let (where_clause, mut params) = build_where_clause(owner, query);

    let total: i64 = connection.query_row(
        &format!("SELECT COUNT(id) FROM \"transaction\" WHERE {where_clause}"),
        params_from_iter(params.iter()),
        |row| row.get(0),
    )?;
    let total = u64::try_from(total).unwrap_or_default();

    let page_size = i64::try_from(query.page_size).unwrap_or(i64::MAX);
    let offset = i64::try_from(query.page.saturating_sub(1).saturating_mul(query.page_size))
        .unwrap_or(i64::MAX);
    params.push(Value::Integer(page_size));
    params.push(Value::Integer(offset));

    let transactions = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
            WHERE {where_clause} \
            ORDER BY occurred_at DESC, id DESC \
            LIMIT ? OFFSET ?"
        ))?
        .query_map(params_from_iter(params.iter()), map_transaction_row)?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()?;

    Ok(TransactionPage {
        count: transactions.len(),
        total,
        page: query.page,
        pages: page_count(total, query.page_size),
        transactions,
    })
}

fn build_where_clause(owner: UserID, query: &TransactionQuery) -> (String, Vec<Value>) {
    let mut conditions = vec!["owner_id = ?"];
    let mut params = vec![Value::Integer(owner.as_i64())];

    if let Some(kind) = query.kind {
        conditions.push("kind = ?");
        params.push(Value::Text(kind.as_key().to_owned()));
    }

    if let Some(category) = query.category {
        conditions.push("category = ?");
        params.push(Value::Text(category.as_key().to_owned()));
    }

    if let Some(start) = query.start {
        conditions.push("occurred_at >= ?");
        params.push(Value::Integer(to_sql_timestamp(start)));
    }

    if let Some(end) = query.end {
        conditions.push("occurred_at <= ?");
        params.push(Value::Integer(to_sql_timestamp(end)));
    }

    (conditions.join(" AND "), params)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::macros::datetime;

    use crate::{
        transaction::{
            Category, TransactionKind,
            query::{TransactionQuery, query_transactions},
            test_utils::{get_test_connection, insert_transaction},
        },
        user::UserID,
    };

    const OWNER: UserID = UserID::new(1);

    fn unfiltered(page: u64, page_size: u64) -> TransactionQuery {
        TransactionQuery {
            kind: None,
            category: None,
            start: None,
            end: None,
            page,
            page_size,
        }
    }

    #[test]
    fn pages_newest_first() {
        let conn = get_test_connection();
        let mut want = Vec::new();
        for day in 1..=25 {
            want.push(insert_transaction(
                OWNER,
                Decimal::from(day),
                Category::Food,
                datetime!(2024-01-01 12:00:00 UTC).replace_day(day).unwrap(),
                &conn,
            ));
        }
        want.reverse();

        let page = query_transactions(OWNER, &unfiltered(2, 10), &conn).unwrap();

        assert_eq!(page.total, 25);
        assert_eq!(page.pages, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.count, 10);
        assert_eq!(page.transactions, want[10..20].to_vec());
    }

    #[test]
    fn last_page_is_partial() {
        let conn = get_test_connection();
        for day in 1..=25 {
            insert_transaction(
                OWNER,
                Decimal::ONE,
                Category::Food,
                datetime!(2024-01-01 12:00:00 UTC).replace_day(day).unwrap(),
                &conn,
            );
        }

        let page = query_transactions(OWNER, &unfiltered(3, 10), &conn).unwrap();

        assert_eq!(page.count, 5);
    }

    #[test]
    fn filters_by_kind_category_and_dates() {
        let conn = get_test_connection();
        let salary = insert_transaction(
            OWNER,
            Decimal::from(1000),
            Category::Salary,
            datetime!(2024-04-05 09:00:00 UTC),
            &conn,
        );
        let food = insert_transaction(
            OWNER,
            Decimal::from(40),
            Category::Food,
            datetime!(2024-04-06 09:00:00 UTC),
            &conn,
        );
        let travel = insert_transaction(
            OWNER,
            Decimal::from(300),
            Category::Travel,
            datetime!(2024-05-06 09:00:00 UTC),
            &conn,
        );
        insert_transaction(
            UserID::new(2),
            Decimal::from(40),
            Category::Food,
            datetime!(2024-04-06 09:00:00 UTC),
            &conn,
        );

        let by_kind = TransactionQuery {
            kind: Some(TransactionKind::Expense),
            ..unfiltered(1, 10)
        };
        let got = query_transactions(OWNER, &by_kind, &conn).unwrap();
        assert_eq!(got.transactions, vec![travel.clone(), food.clone()]);

        let by_category = TransactionQuery {
            category: Some(Category::Salary),
            ..unfiltered(1, 10)
        };
        let got = query_transactions(OWNER, &by_category, &conn).unwrap();
        assert_eq!(got.transactions, vec![salary.clone()]);

        let by_dates = TransactionQuery {
            start: Some(datetime!(2024-04-06 00:00:00 UTC)),
            end: Some(datetime!(2024-05-06 09:00:00 UTC)),
            ..unfiltered(1, 10)
        };
        let got = query_transactions(OWNER, &by_dates, &conn).unwrap();
        assert_eq!(got.transactions, vec![travel, food]);
        assert_eq!(got.total, 2);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let conn = get_test_connection();

        let page = query_transactions(OWNER, &unfiltered(1, 10), &conn).unwrap();

        assert_eq!(page.total, 0);
        assert_eq!(page.pages, 0);
        assert!(page.transactions.is_empty());
    }
}
