//! Statistics API endpoints

use api_types::stats::{CategorySpending, CategorySpendingQuery, MonthlyTrend, MonthlyTrendsQuery};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{ServerError, server::ServerState, user};

/// Top expense categories for the authenticated user.
pub async fn category_spending(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(params): Query<CategorySpendingQuery>,
) -> Result<Json<Vec<CategorySpending>>, ServerError> {
    let limit = params.limit.unwrap_or(engine::DEFAULT_SPENDING_LIMIT);
    let rows = state.engine.category_spending(user.id, limit).await?;

    Ok(Json(
        rows.into_iter()
            .map(|row| CategorySpending {
                category_id: row.category_id,
                category_name: row.category_name,
                total_amount: row.total_amount,
                transaction_count: row.transaction_count,
            })
            .collect(),
    ))
}

/// Monthly income/expense trend for the authenticated user, oldest first.
pub async fn monthly_trends(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(params): Query<MonthlyTrendsQuery>,
) -> Result<Json<Vec<MonthlyTrend>>, ServerError> {
    let months = params.months.unwrap_or(engine::DEFAULT_TREND_MONTHS);
    let rows = state.engine.monthly_trends(user.id, months).await?;

    Ok(Json(
        rows.into_iter()
            .map(|row| MonthlyTrend {
                year: row.year,
                month: row.month,
                income: row.income,
                expense: row.expense,
                net: row.net,
            })
            .collect(),
    ))
}
