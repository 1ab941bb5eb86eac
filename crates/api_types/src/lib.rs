use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    /// Request body for `POST /users/signup`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserRegister {
        pub email: String,
        pub password: String,
        pub full_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub email: String,
        pub full_name: Option<String>,
        pub is_active: bool,
        pub is_superuser: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Message {
        pub message: String,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub description: String,
    }

    /// Partial update: absent fields keep their stored value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i32,
        pub name: String,
        pub description: String,
    }

    /// Query string for `GET /categories`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryListQuery {
        pub skip: Option<u64>,
        pub limit: Option<u64>,
        /// Case-insensitive substring match on the category name.
        pub search_query: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub items: Vec<CategoryView>,
        pub total: u64,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionType {
        Income,
        Expense,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethod {
        Cash,
        Card,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        /// Amount in minor currency units; must be > 0.
        pub amount: i64,
        pub transaction_type: TransactionType,
        pub category_id: i32,
        pub payment_method: Option<PaymentMethod>,
        pub description: Option<String>,
        /// Defaults to the creation instant when absent.
        pub transaction_date: Option<DateTime<Utc>>,
    }

    /// Partial update: absent fields keep their stored value; a blank
    /// `description` clears it.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub amount: Option<i64>,
        pub transaction_type: Option<TransactionType>,
        pub category_id: Option<i32>,
        pub payment_method: Option<PaymentMethod>,
        pub description: Option<String>,
        pub transaction_date: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i32,
        pub user_id: Uuid,
        pub amount: i64,
        pub transaction_type: TransactionType,
        pub payment_method: Option<PaymentMethod>,
        pub description: Option<String>,
        /// RFC3339 timestamp in UTC.
        pub transaction_date: DateTime<Utc>,
        pub category: Option<super::category::CategoryView>,
        pub created_at: DateTime<Utc>,
        pub updated_at: Option<DateTime<Utc>>,
    }

    /// Query string for `GET /transactions`.
    ///
    /// All criteria are optional and combine with AND. `start_date` and
    /// `end_date` are calendar days, both inclusive (`end_date` covers the
    /// whole day). Non-positive amount bounds and blank `search_query` are
    /// ignored. `sort_by` is `date` or `amount` (unknown values fall back to
    /// `date`), `sort_order` is `asc` or `desc`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub skip: Option<u64>,
        /// Page size, clamped server-side to 1000.
        pub limit: Option<u64>,
        pub transaction_type: Option<TransactionType>,
        pub category_id: Option<i32>,
        pub payment_method: Option<PaymentMethod>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub min_amount: Option<i64>,
        pub max_amount: Option<i64>,
        pub search_query: Option<String>,
        pub sort_by: Option<String>,
        pub sort_order: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub items: Vec<TransactionView>,
        /// Count of all rows matching the criteria, ignoring `skip`/`limit`.
        pub total: u64,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpendingQuery {
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpending {
        pub category_id: i32,
        pub category_name: String,
        pub total_amount: i64,
        pub transaction_count: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyTrendsQuery {
        pub months: Option<usize>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyTrend {
        pub year: i32,
        pub month: u32,
        pub income: i64,
        pub expense: i64,
        /// `income - expense`.
        pub net: i64,
    }
}
