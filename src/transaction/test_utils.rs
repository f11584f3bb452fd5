use rusqlite::Connection;
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    db::initialize,
    transaction::{Category, Transaction, create_transaction},
    user::UserID,
};

pub fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}

/// Insert a transaction whose kind is taken from `category`.
#[track_caller]
pub fn insert_transaction(
    owner: UserID,
    amount: Decimal,
    category: Category,
    occurred_at: OffsetDateTime,
    conn: &Connection,
) -> Transaction {
    create_transaction(
        owner,
        Transaction::build(category.kind(), amount, category, category.label())
            .occurred_at(Some(occurred_at)),
        conn,
    )
    .expect("Could not create transaction")
}
