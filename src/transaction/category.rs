//! The fixed vocabularies used to classify transactions.
//!
//! Income and expenses each have their own set of categories. A transaction
//! must use a category from the vocabulary matching its kind.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Whether money was earned or spent.
///
/// Income is ordered before expenses so that series grouped by kind list
/// income first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// The key used to store the kind and send it over the wire.
    pub fn as_key(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// The categories that transactions of this kind may use.
    pub fn categories(self) -> &'static [Category] {
        match self {
            Self::Income => &Category::ALL[..6],
            Self::Expense => &Category::ALL[6..],
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_key())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(Error::InvalidCategory(other.to_owned())),
        }
    }
}

/// What a transaction was for.
///
/// The variants are declared income vocabulary first, then expense
/// vocabulary, and this order is used when listing categories.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Salary,
    Freelance,
    Investment,
    Business,
    Gift,
    OtherIncome,
    Food,
    Transportation,
    Housing,
    Utilities,
    Entertainment,
    Healthcare,
    Shopping,
    Education,
    Travel,
    Insurance,
    OtherExpense,
}

impl Category {
    /// Every category, income vocabulary first.
    pub const ALL: [Category; 17] = [
        Self::Salary,
        Self::Freelance,
        Self::Investment,
        Self::Business,
        Self::Gift,
        Self::OtherIncome,
        Self::Food,
        Self::Transportation,
        Self::Housing,
        Self::Utilities,
        Self::Entertainment,
        Self::Healthcare,
        Self::Shopping,
        Self::Education,
        Self::Travel,
        Self::Insurance,
        Self::OtherExpense,
    ];

    /// The vocabulary this category belongs to.
    pub fn kind(self) -> TransactionKind {
        match self {
            Self::Salary
            | Self::Freelance
            | Self::Investment
            | Self::Business
            | Self::Gift
            | Self::OtherIncome => TransactionKind::Income,
            Self::Food
            | Self::Transportation
            | Self::Housing
            | Self::Utilities
            | Self::Entertainment
            | Self::Healthcare
            | Self::Shopping
            | Self::Education
            | Self::Travel
            | Self::Insurance
            | Self::OtherExpense => TransactionKind::Expense,
        }
    }

    /// The snake_case key used in the database and in JSON.
    pub fn as_key(self) -> &'static str {
        match self {
            Self::Salary => "salary",
            Self::Freelance => "freelance",
            Self::Investment => "investment",
            Self::Business => "business",
            Self::Gift => "gift",
            Self::OtherIncome => "other_income",
            Self::Food => "food",
            Self::Transportation => "transportation",
            Self::Housing => "housing",
            Self::Utilities => "utilities",
            Self::Entertainment => "entertainment",
            Self::Healthcare => "healthcare",
            Self::Shopping => "shopping",
            Self::Education => "education",
            Self::Travel => "travel",
            Self::Insurance => "insurance",
            Self::OtherExpense => "other_expense",
        }
    }

    /// The label shown to users, e.g. "Other expense".
    pub fn label(self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Freelance => "Freelance",
            Self::Investment => "Investment",
            Self::Business => "Business",
            Self::Gift => "Gift",
            Self::OtherIncome => "Other income",
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Housing => "Housing",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Healthcare => "Healthcare",
            Self::Shopping => "Shopping",
            Self::Education => "Education",
            Self::Travel => "Travel",
            Self::Insurance => "Insurance",
            Self::OtherExpense => "Other expense",
        }
    }

    /// Check that this category may be used for a transaction of `kind`.
    ///
    /// # Errors
    /// Returns [Error::CategoryKindMismatch] if the category belongs to the
    /// other vocabulary.
    pub fn check_kind(self, kind: TransactionKind) -> Result<(), Error> {
        if self.kind() == kind {
            Ok(())
        } else {
            Err(Error::CategoryKindMismatch {
                category: self.as_key().to_owned(),
                kind: kind.as_key().to_owned(),
            })
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_key())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_key() == s)
            .ok_or_else(|| Error::InvalidCategory(s.to_owned()))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_key()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_key()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}
