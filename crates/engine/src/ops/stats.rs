use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use sea_orm::{
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{ResultEngine, TransactionType, categories, transactions};

use super::{Engine, with_tx};

/// Default number of categories reported by [`Engine::category_spending`].
pub const DEFAULT_SPENDING_LIMIT: u64 = 10;
/// Default number of months reported by [`Engine::monthly_trends`].
pub const DEFAULT_TREND_MONTHS: usize = 6;

/// Spending totals for one category, expenses only.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct CategorySpending {
    pub category_id: i32,
    pub category_name: String,
    pub total_amount: i64,
    pub transaction_count: i64,
}

/// A calendar month in UTC. `Ord` follows chronology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(ts: DateTime<Utc>) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }
}

/// Income/expense totals for one calendar month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    pub income: i64,
    pub expense: i64,
    /// `income - expense`.
    pub net: i64,
}

impl Engine {
    /// Top spending categories for a user, summed over expenses only.
    ///
    /// Ordered by summed amount descending, truncated to `limit` rows.
    /// Categories with no matching expense do not appear.
    pub async fn category_spending(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> ResultEngine<Vec<CategorySpending>> {
        with_tx!(self, |db_tx| {
            let rows = transactions::Entity::find()
                .select_only()
                .column(transactions::Column::CategoryId)
                .column_as(categories::Column::Name, "category_name")
                .column_as(transactions::Column::Amount.sum(), "total_amount")
                .column_as(transactions::Column::Id.count(), "transaction_count")
                .join(JoinType::InnerJoin, transactions::Relation::Category.def())
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(
                    transactions::Column::TransactionType
                        .eq(TransactionType::Expense.as_str()),
                )
                .group_by(transactions::Column::CategoryId)
                .group_by(categories::Column::Name)
                .order_by_desc(transactions::Column::Amount.sum())
                .limit(limit)
                .into_model::<CategorySpending>()
                .all(&db_tx)
                .await?;
            Ok(rows)
        })
    }

    /// Monthly income/expense/net buckets, oldest first.
    ///
    /// Buckets by the UTC calendar month of `transaction_date`. Only months
    /// containing at least one transaction are reported, so "the last
    /// `months` months" means the most recent *active* months, not the most
    /// recent calendar months.
    pub async fn monthly_trends(
        &self,
        user_id: Uuid,
        months: usize,
    ) -> ResultEngine<Vec<MonthlyTrend>> {
        with_tx!(self, |db_tx| {
            let models = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .all(&db_tx)
                .await?;

            let mut buckets: BTreeMap<MonthKey, (i64, i64)> = BTreeMap::new();
            for model in models {
                let key = MonthKey::of(model.transaction_date);
                let entry = buckets.entry(key).or_insert((0, 0));
                match TransactionType::try_from(model.transaction_type.as_str())? {
                    TransactionType::Income => entry.0 += model.amount,
                    TransactionType::Expense => entry.1 += model.amount,
                }
            }

            let mut trends: Vec<MonthlyTrend> = buckets
                .into_iter()
                .rev()
                .take(months)
                .map(|(key, (income, expense))| MonthlyTrend {
                    year: key.year,
                    month: key.month,
                    income,
                    expense,
                    net: income - expense,
                })
                .collect();
            trends.reverse();

            Ok(trends)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_keys_order_chronologically() {
        let earlier = MonthKey {
            year: 2023,
            month: 12,
        };
        let later = MonthKey {
            year: 2024,
            month: 1,
        };
        assert!(earlier < later);
        assert!(
            MonthKey {
                year: 2024,
                month: 2
            } > later
        );
    }
}
