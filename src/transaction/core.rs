//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{
    Error,
    database_id::DatabaseId,
    transaction::category::{Category, TransactionKind},
    user::UserID,
};

/// Alias for the integer type used for transaction IDs.
pub type TransactionId = DatabaseId;

/// The columns selected for every query that returns whole transactions, in
/// the order expected by [map_transaction_row].
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, owner_id, kind, amount, category, occurred_at, description, tags";

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
///
/// The JSON field names follow the public API: `kind` is sent as `type`,
/// `owner` as `user` and `occurred_at` as `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    #[serde(rename = "user")]
    pub owner: UserID,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money spent or earned, always zero or greater.
    pub amount: Decimal,
    /// What the transaction was for.
    pub category: Category,
    /// When the transaction happened, in UTC.
    ///
    /// This is the date used for every period calculation, not the time the
    /// transaction was recorded.
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Free-text labels.
    pub tags: Vec<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        kind: TransactionKind,
        amount: Decimal,
        category: Category,
        description: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            kind,
            amount,
            category,
            description: description.to_owned(),
            occurred_at: None,
            tags: Vec::new(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The builder is validated when it is written to the database, see
/// [create_transaction] and [update_transaction].
///
/// # Examples
///
/// ```ignore
/// use rust_decimal::Decimal;
/// use time::macros::datetime;
///
/// use crate::transaction::{Category, Transaction, TransactionKind};
///
/// let transaction = Transaction::build(
///         TransactionKind::Expense,
///         Decimal::new(4599, 2),
///         Category::Food,
///         "Coffee beans",
///     )
///     .occurred_at(Some(datetime!(2025-01-15 09:30 UTC)))
///     .tags(vec!["weekly".to_owned()]);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether money was earned or spent.
    pub kind: TransactionKind,

    /// The magnitude of the transaction.
    ///
    /// Must not be negative, the direction of the money is given by `kind`.
    pub amount: Decimal,

    /// The category, which must belong to the vocabulary of `kind`.
    pub category: Category,

    /// A human-readable description of the transaction.
    ///
    /// Surrounding whitespace is trimmed and the result must not be empty.
    pub description: String,

    /// When the transaction happened.
    ///
    /// When creating a transaction, `None` means now. When updating a
    /// transaction, `None` keeps the existing date.
    pub occurred_at: Option<OffsetDateTime>,

    /// Free-text labels. Labels are trimmed and empty labels are dropped.
    pub tags: Vec<String>,
}

impl TransactionBuilder {
    /// Set the date the transaction happened.
    pub fn occurred_at(mut self, occurred_at: Option<OffsetDateTime>) -> Self {
        self.occurred_at = occurred_at;
        self
    }

    /// Set the tags for the transaction.
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Check the invariants of a transaction and normalise the text fields.
    fn validate(self) -> Result<ValidatedTransaction, Error> {
        if self.amount < Decimal::ZERO {
            return Err(Error::NegativeAmount(self.amount));
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        self.category.check_kind(self.kind)?;

        let tags_json = serde_json::to_string(&normalize_tags(self.tags))
            .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

        Ok(ValidatedTransaction {
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            description: description.to_owned(),
            occurred_at: self.occurred_at.map(to_sql_timestamp),
            tags_json,
        })
    }
}

/// The fields of a [TransactionBuilder] after validation, ready to be bound
/// to SQL parameters.
struct ValidatedTransaction {
    kind: TransactionKind,
    amount: Decimal,
    category: Category,
    description: String,
    occurred_at: Option<i64>,
    tags_json: String,
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_owned())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Convert a date-time to the whole seconds since the Unix epoch that is
/// stored in the database and used for date comparisons in SQL.
pub(crate) fn to_sql_timestamp(date_time: OffsetDateTime) -> i64 {
    let whole_seconds = date_time - Duration::nanoseconds(date_time.nanosecond().into());
    whole_seconds.to_offset(UtcOffset::UTC).unix_timestamp()
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction for `owner` in the database from a builder.
///
/// If the builder has no date, the transaction is dated now.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is less than zero,
/// - [Error::EmptyDescription] if the description is blank,
/// - [Error::CategoryKindMismatch] if the category does not match the kind,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    owner: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = builder.validate()?;
    let occurred_at = transaction
        .occurred_at
        .unwrap_or_else(|| to_sql_timestamp(OffsetDateTime::now_utc()));

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (owner_id, kind, amount, category, occurred_at, description, tags)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                owner.as_i64(),
                transaction.kind,
                transaction.amount.to_string(),
                transaction.category,
                occurred_at,
                transaction.description,
                transaction.tags_json,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction with `id` owned by `owner`.
///
/// Transactions owned by other users are reported as missing.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `owner`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    owner: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1 AND owner_id = ?2"
        ))?
        .query_row((id, owner.as_i64()), map_transaction_row)?;

    Ok(transaction)
}

/// Replace every field of the transaction with `id` owned by `owner`.
///
/// If the builder has no date, the existing date is kept.
///
/// # Errors
/// This function will return a:
/// - validation error as for [create_transaction],
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction owned by `owner`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    owner: UserID,
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = builder.validate()?;

    connection
        .prepare(&format!(
            "UPDATE \"transaction\"
            SET \
                kind = ?1, \
                amount = ?2, \
                category = ?3, \
                occurred_at = COALESCE(?4, occurred_at), \
                description = ?5, \
                tags = ?6 \
            WHERE id = ?7 AND owner_id = ?8
            RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                transaction.kind,
                transaction.amount.to_string(),
                transaction.category,
                transaction.occurred_at,
                transaction.description,
                transaction.tags_json,
                id,
                owner.as_i64(),
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction(id),
            error => error.into(),
        })
}

/// Delete the transaction with `id` owned by `owner`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction owned by `owner`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    owner: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND owner_id = ?2",
        (id, owner.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction(id));
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id INTEGER NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                amount TEXT NOT NULL,
                category TEXT NOT NULL,
                occurred_at INTEGER NOT NULL,
                description TEXT NOT NULL,
                tags TEXT NOT NULL DEFAULT '[]'
                )",
        (),
    )?;

    // Indexes for the owner scoped queries used by the dashboard and listing.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_owner_date ON \"transaction\"(owner_id, occurred_at);",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_owner_kind ON \"transaction\"(owner_id, kind);",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_owner_category ON \"transaction\"(owner_id, category);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// The row must contain the columns in [TRANSACTION_COLUMNS].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let owner = UserID::new(row.get(1)?);
    let kind = row.get(2)?;

    let amount: String = row.get(3)?;
    let amount = amount
        .parse::<Decimal>()
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error)))?;

    let category = row.get(4)?;

    let occurred_at = OffsetDateTime::from_unix_timestamp(row.get(5)?).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, Box::new(error))
    })?;

    let description = row.get(6)?;

    let tags: String = row.get(7)?;
    let tags = serde_json::from_str(&tags)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(error)))?;

    Ok(Transaction {
        id,
        owner,
        kind,
        amount,
        category,
        occurred_at,
        description,
        tags,
    })
}

// ============================================================================
// TESTS
// ============================================================================
