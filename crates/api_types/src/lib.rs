use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Monetary amount as received from a client, before coercion.
///
/// Clients send either a JSON number (`50`, `12.5`) or a numeric string
/// (`"50"`, `"12,50"`). The server parses the textual form into cents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body returned by single-entity deletes.
#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub success: bool,
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
        pub timestamp: DateTime<Utc>,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Signup {
        pub email: String,
        pub password: String,
        #[serde(default)]
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: String,
        pub email: Option<String>,
        pub name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignupResponse {
        pub user: UserView,
    }
}

pub mod transaction {
    use super::*;

    /// Direction of a transaction. Amounts are always positive.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionType {
        Income,
        Expense,
    }

    /// Body of `POST /transactions` and `PUT /transactions/{id}`.
    ///
    /// Updates are full replacements, so both share the same shape. Extra
    /// fields (such as `id` or `userId` from an export file) are ignored.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub amount: Amount,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub category: String,
        #[serde(default)]
        pub description: String,
        /// Calendar date, `YYYY-MM-DD`.
        pub date: NaiveDate,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BudgetPeriod {
        Weekly,
        Monthly,
    }

    /// Body of `POST /budgets` and `PUT /budgets/{id}`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category: String,
        /// Spending limit for the category.
        pub amount: Amount,
        pub period: BudgetPeriod,
    }
}

pub mod data {
    use super::*;
    use budget::BudgetNew;
    use transaction::TransactionNew;

    /// Body of `POST /import`. An export file is accepted as-is.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ImportRequest {
        #[serde(default)]
        pub transactions: Vec<TransactionNew>,
        #[serde(default)]
        pub budgets: Vec<BudgetNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntityCounts {
        pub transactions: usize,
        pub budgets: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ImportResponse {
        pub success: bool,
        pub imported: EntityCounts,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeleteAccountResponse {
        pub success: bool,
        pub deleted: EntityCounts,
    }
}
