//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, its kinds and categories, and `TransactionBuilder`
//! - Database functions for storing, querying, and managing transactions
//! - The read-only `TransactionStore` used by the dashboard
//! - JSON route handlers for the transaction API

mod category;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod get_endpoint;
mod list_endpoint;
mod query;
mod state;
mod store;

#[cfg(test)]
pub(crate) mod test_utils;

pub use category::{Category, TransactionKind};
pub use core::{
    Transaction, TransactionBuilder, TransactionId, create_transaction, create_transaction_table,
    delete_transaction, get_transaction, map_transaction_row, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use form::{ListTransactionsParams, TransactionForm};
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use query::{TransactionPage, TransactionQuery, query_transactions};
pub use store::{DateInterval, SQLiteTransactionStore, TransactionStore};
