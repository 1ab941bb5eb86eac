use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{Category, PaymentMethod, ResultEngine, Transaction, TransactionType, categories,
    transactions};

use super::super::{Engine, with_tx};

/// Default page size when the caller supplies no limit.
pub const DEFAULT_PAGE_SIZE: u64 = 100;
/// Hard cap on the page size; larger requests are clamped.
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Optional criteria for listing transactions.
///
/// Clauses combine with AND on top of the mandatory owner clause, which is
/// never part of this struct: the engine applies it unconditionally.
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub category_id: Option<i32>,
    pub payment_method: Option<PaymentMethod>,
    /// Inclusive, from 00:00:00 of that day (UTC).
    pub start_date: Option<NaiveDate>,
    /// Inclusive, through 23:59:59 of that day (UTC).
    pub end_date: Option<NaiveDate>,
    /// Inclusive lower bound; ignored unless strictly positive.
    pub min_amount: Option<i64>,
    /// Inclusive upper bound; ignored unless strictly positive.
    pub max_amount: Option<i64>,
    /// Case-insensitive substring on the description; blank means unset.
    pub search_query: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Date,
    Amount,
}

impl SortField {
    /// Parse a raw query value; unrecognized values fall back to `Date`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("amount") => Self::Amount,
            _ => Self::Date,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parse a raw query value; unrecognized values fall back to `Desc`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }
}

/// Sort directive: field plus direction, newest-first by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransactionSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl TransactionSort {
    pub fn from_params(sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        Self {
            field: SortField::parse(sort_by),
            order: SortOrder::parse(sort_order),
        }
    }
}

/// An offset/limit window over the ordered result set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    pub fn from_params(skip: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            skip: skip.unwrap_or(0),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
        }
    }
}

/// One page of a user's transactions plus the unwindowed match count.
#[derive(Clone, Debug)]
pub struct TransactionPage {
    pub items: Vec<(Transaction, Option<Category>)>,
    /// Rows matching the criteria, ignoring `skip`/`limit`.
    pub total: u64,
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    // 23:59:59 is a valid wall-clock time on every calendar day.
    let end = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    date.and_time(end).and_utc()
}

fn positive_bound(bound: Option<i64>) -> Option<i64> {
    bound.filter(|value| *value > 0)
}

fn normalize_search(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionFilter) -> Self {
        if let Some(kind) = filter.transaction_type {
            self = self.filter(transactions::Column::TransactionType.eq(kind.as_str()));
        }
        if let Some(category_id) = filter.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(method) = filter.payment_method {
            self = self.filter(transactions::Column::PaymentMethod.eq(method.as_str()));
        }
        if let Some(start) = filter.start_date {
            self = self.filter(transactions::Column::TransactionDate.gte(day_start(start)));
        }
        if let Some(end) = filter.end_date {
            self = self.filter(transactions::Column::TransactionDate.lte(day_end(end)));
        }
        if let Some(min) = positive_bound(filter.min_amount) {
            self = self.filter(transactions::Column::Amount.gte(min));
        }
        if let Some(max) = positive_bound(filter.max_amount) {
            self = self.filter(transactions::Column::Amount.lte(max));
        }
        if let Some(query) = normalize_search(filter.search_query.as_deref()) {
            self = self.filter(Expr::cust_with_values(
                "LOWER(description) LIKE ?",
                [format!("%{query}%")],
            ));
        }
        self
    }
}

trait ApplyTxSort: QueryOrder + Sized {
    fn apply_tx_sort(self, sort: TransactionSort) -> Self;
}

impl<T> ApplyTxSort for T
where
    T: QueryOrder + Sized,
{
    fn apply_tx_sort(self, sort: TransactionSort) -> Self {
        let column = match sort.field {
            SortField::Date => transactions::Column::TransactionDate,
            SortField::Amount => transactions::Column::Amount,
        };
        // `id` as the secondary key keeps tie order deterministic.
        match sort.order {
            SortOrder::Asc => self
                .order_by_asc(column)
                .order_by_asc(transactions::Column::Id),
            SortOrder::Desc => self
                .order_by_desc(column)
                .order_by_desc(transactions::Column::Id),
        }
    }
}

impl Engine {
    /// Lists a page of the caller's transactions with resolved categories.
    ///
    /// `total` counts every row matching the same predicate before the
    /// window is applied, so callers can compute page counts even when
    /// `skip` points past the result set.
    pub async fn list_transactions(
        &self,
        user_id: Uuid,
        filter: &TransactionFilter,
        sort: TransactionSort,
        page: Page,
    ) -> ResultEngine<TransactionPage> {
        with_tx!(self, |db_tx| {
            let base = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .apply_tx_filters(filter);

            let total = base.clone().count(&db_tx).await?;

            let rows = base
                .find_also_related(categories::Entity)
                .apply_tx_sort(sort)
                .offset(page.skip)
                .limit(page.limit)
                .all(&db_tx)
                .await?;

            let mut items = Vec::with_capacity(rows.len());
            for (tx_model, category_model) in rows {
                items.push((
                    Transaction::try_from(tx_model)?,
                    category_model.map(Category::from),
                ));
            }

            Ok(TransactionPage { items, total })
        })
    }

    /// Fetches one transaction with its category, enforcing ownership.
    pub async fn transaction_detail(
        &self,
        user_id: Uuid,
        transaction_id: i32,
    ) -> ResultEngine<(Transaction, Option<Category>)> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction_owned(&db_tx, transaction_id, user_id)
                .await?;
            let category = categories::Entity::find_by_id(model.category_id)
                .one(&db_tx)
                .await?;
            Ok((Transaction::try_from(model)?, category.map(Category::from)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sort_field_falls_back_to_date() {
        assert_eq!(SortField::parse(Some("price")), SortField::Date);
        assert_eq!(SortField::parse(None), SortField::Date);
        assert_eq!(SortField::parse(Some("amount")), SortField::Amount);
    }

    #[test]
    fn sort_order_defaults_to_desc() {
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("upside-down")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(None), SortOrder::Desc);
    }

    #[test]
    fn page_clamps_oversized_limits() {
        let page = Page::from_params(Some(5), Some(10_000));
        assert_eq!(page.skip, 5);
        assert_eq!(page.limit, MAX_PAGE_SIZE);

        let page = Page::from_params(None, None);
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn non_positive_amount_bounds_are_unset() {
        assert_eq!(positive_bound(Some(0)), None);
        assert_eq!(positive_bound(Some(-5)), None);
        assert_eq!(positive_bound(Some(1)), Some(1));
        assert_eq!(positive_bound(None), None);
    }

    #[test]
    fn blank_search_is_unset() {
        assert_eq!(normalize_search(Some("")), None);
        assert_eq!(normalize_search(Some("   ")), None);
        assert_eq!(normalize_search(Some("  Lunch ")), Some("lunch".to_string()));
        assert_eq!(normalize_search(None), None);
    }

    #[test]
    fn end_date_bound_covers_the_whole_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let bound = day_end(date);
        assert_eq!(bound.to_rfc3339(), "2024-01-15T23:59:59+00:00");
        assert_eq!(day_start(date).to_rfc3339(), "2024-01-15T00:00:00+00:00");
    }
}
