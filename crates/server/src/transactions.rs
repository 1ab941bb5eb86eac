//! Transactions API endpoints

use api_types::category::CategoryView;
use api_types::transaction::{
    PaymentMethod as ApiPaymentMethod, TransactionListQuery, TransactionListResponse,
    TransactionNew, TransactionType as ApiTransactionType, TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user};

fn map_type(kind: ApiTransactionType) -> engine::TransactionType {
    match kind {
        ApiTransactionType::Income => engine::TransactionType::Income,
        ApiTransactionType::Expense => engine::TransactionType::Expense,
    }
}

fn map_type_view(kind: engine::TransactionType) -> ApiTransactionType {
    match kind {
        engine::TransactionType::Income => ApiTransactionType::Income,
        engine::TransactionType::Expense => ApiTransactionType::Expense,
    }
}

fn map_method(method: ApiPaymentMethod) -> engine::PaymentMethod {
    match method {
        ApiPaymentMethod::Cash => engine::PaymentMethod::Cash,
        ApiPaymentMethod::Card => engine::PaymentMethod::Card,
    }
}

fn map_method_view(method: engine::PaymentMethod) -> ApiPaymentMethod {
    match method {
        engine::PaymentMethod::Cash => ApiPaymentMethod::Cash,
        engine::PaymentMethod::Card => ApiPaymentMethod::Card,
    }
}

fn map_category_view(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        description: category.description,
    }
}

fn view((tx, category): (engine::Transaction, Option<engine::Category>)) -> TransactionView {
    TransactionView {
        id: tx.id,
        user_id: tx.user_id,
        amount: tx.amount,
        transaction_type: map_type_view(tx.transaction_type),
        payment_method: tx.payment_method.map(map_method_view),
        description: tx.description,
        transaction_date: tx.transaction_date,
        category: category.map(map_category_view),
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(params): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let filter = engine::TransactionFilter {
        transaction_type: params.transaction_type.map(map_type),
        category_id: params.category_id,
        payment_method: params.payment_method.map(map_method),
        start_date: params.start_date,
        end_date: params.end_date,
        min_amount: params.min_amount,
        max_amount: params.max_amount,
        search_query: params.search_query.clone(),
    };
    let sort = engine::TransactionSort::from_params(
        params.sort_by.as_deref(),
        params.sort_order.as_deref(),
    );
    let page = engine::Page::from_params(params.skip, params.limit);

    let result = state
        .engine
        .list_transactions(user.id, &filter, sort, page)
        .await?;

    Ok(Json(TransactionListResponse {
        total: result.total,
        items: result.items.into_iter().map(view).collect(),
    }))
}

pub async fn get_detail(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<TransactionView>, ServerError> {
    let item = state.engine.transaction_detail(user.id, id).await?;
    Ok(Json(view(item)))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let mut cmd = engine::NewTransactionCmd::new(
        user.id,
        payload.category_id,
        payload.amount,
        map_type(payload.transaction_type),
    );
    if let Some(method) = payload.payment_method {
        cmd = cmd.payment_method(map_method(method));
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(date) = payload.transaction_date {
        cmd = cmd.transaction_date(date);
    }

    let tx = state.engine.create_transaction(cmd).await?;
    let item = state.engine.transaction_detail(user.id, tx.id).await?;

    Ok((StatusCode::CREATED, Json(view(item))))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let mut cmd = engine::UpdateTransactionCmd::new(user.id, id);
    if let Some(amount) = payload.amount {
        cmd = cmd.amount(amount);
    }
    if let Some(kind) = payload.transaction_type {
        cmd = cmd.transaction_type(map_type(kind));
    }
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category_id(category_id);
    }
    if let Some(method) = payload.payment_method {
        cmd = cmd.payment_method(map_method(method));
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(date) = payload.transaction_date {
        cmd = cmd.transaction_date(date);
    }

    let tx = state.engine.update_transaction(cmd).await?;
    let item = state.engine.transaction_detail(user.id, tx.id).await?;

    Ok(Json(view(item)))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
