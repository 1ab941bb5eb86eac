//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{PaymentMethod, TransactionType};

/// Record a new transaction.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub user_id: Uuid,
    pub category_id: i32,
    pub amount: i64,
    pub transaction_type: TransactionType,
    pub payment_method: Option<PaymentMethod>,
    pub description: Option<String>,
    /// Defaults to the creation instant when `None`.
    pub transaction_date: Option<DateTime<Utc>>,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: Uuid,
        category_id: i32,
        amount: i64,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            user_id,
            category_id,
            amount,
            transaction_type,
            payment_method: None,
            description: None,
            transaction_date: None,
        }
    }

    #[must_use]
    pub fn payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = Some(payment_method);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn transaction_date(mut self, transaction_date: DateTime<Utc>) -> Self {
        self.transaction_date = Some(transaction_date);
        self
    }
}

/// Patch an existing transaction; only supplied fields overwrite.
///
/// A blank `description` clears the stored value.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub user_id: Uuid,
    pub transaction_id: i32,
    pub amount: Option<i64>,
    pub transaction_type: Option<TransactionType>,
    pub category_id: Option<i32>,
    pub payment_method: Option<PaymentMethod>,
    pub description: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(user_id: Uuid, transaction_id: i32) -> Self {
        Self {
            user_id,
            transaction_id,
            amount: None,
            transaction_type: None,
            category_id: None,
            payment_method: None,
            description: None,
            transaction_date: None,
        }
    }

    #[must_use]
    pub fn amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = Some(payment_method);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn transaction_date(mut self, transaction_date: DateTime<Utc>) -> Self {
        self.transaction_date = Some(transaction_date);
        self
    }
}

/// Create a category.
#[derive(Clone, Debug)]
pub struct NewCategoryCmd {
    pub name: String,
    pub description: String,
}

impl NewCategoryCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Patch an existing category; only supplied fields overwrite.
#[derive(Clone, Debug)]
pub struct UpdateCategoryCmd {
    pub category_id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateCategoryCmd {
    #[must_use]
    pub fn new(category_id: i32) -> Self {
        Self {
            category_id,
            name: None,
            description: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
