//! Defines the read-only transaction store used by the dashboard and its
//! SQLite implementation.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error,
    transaction::core::{TRANSACTION_COLUMNS, Transaction, map_transaction_row, to_sql_timestamp},
    user::UserID,
};

/// A closed interval of instants, both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateInterval {
    /// The first instant in the interval.
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    /// The last instant in the interval.
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

/// Retrieves a user's transactions for reporting.
///
/// Implementations must never return transactions owned by another user.
pub trait TransactionStore {
    /// Retrieve all of `owner`'s transactions that happened within `interval`.
    ///
    /// Transactions dated exactly on either end of the interval are included.
    fn find(&self, owner: UserID, interval: DateInterval) -> Result<Vec<Transaction>, Error>;

    /// Retrieve up to `limit` of `owner`'s most recently dated transactions,
    /// newest first, regardless of date.
    fn find_recent(&self, owner: UserID, limit: u64) -> Result<Vec<Transaction>, Error>;
}

/// Reads transactions from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Retrieve all of `owner`'s transactions within `interval`, oldest first.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if the query fails.
    fn find(&self, owner: UserID, interval: DateInterval) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;

        connection
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
                WHERE owner_id = ?1 AND occurred_at BETWEEN ?2 AND ?3 \
                ORDER BY occurred_at ASC, id ASC"
            ))?
            .query_map(
                (
                    owner.as_i64(),
                    to_sql_timestamp(interval.start),
                    to_sql_timestamp(interval.end),
                ),
                map_transaction_row,
            )?
            .collect::<Result<Vec<Transaction>, rusqlite::Error>>()
            .map_err(|error| error.into())
    }

    /// Retrieve up to `limit` of `owner`'s newest transactions.
    ///
    /// Transactions on the same date are ordered by ID, newest first.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if the query fails.
    fn find_recent(&self, owner: UserID, limit: u64) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        connection
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
                WHERE owner_id = ?1 \
                ORDER BY occurred_at DESC, id DESC \
                LIMIT ?2"
            ))?
            .query_map((owner.as_i64(), limit), map_transaction_row)?
            .collect::<Result<Vec<Transaction>, rusqlite::Error>>()
            .map_err(|error| error.into())
    }
}
