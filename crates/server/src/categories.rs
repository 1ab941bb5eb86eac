//! Categories API endpoints

use api_types::category::{
    CategoryListQuery, CategoryListResponse, CategoryNew, CategoryUpdate, CategoryView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

fn view(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        description: category.description,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<CategoryListQuery>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let filter = engine::CategoryFilter {
        search_query: params.search_query.clone(),
    };
    let page = engine::Page::from_params(params.skip, params.limit);

    let result = state.engine.list_categories(&filter, page).await?;

    Ok(Json(CategoryListResponse {
        total: result.total,
        items: result.items.into_iter().map(view).collect(),
    }))
}

pub async fn get_detail(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.category_detail(id).await?;
    Ok(Json(view(category)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let cmd = engine::NewCategoryCmd::new(payload.name, payload.description);
    let category = state.engine.new_category(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(category))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let mut cmd = engine::UpdateCategoryCmd::new(id);
    if let Some(name) = payload.name {
        cmd = cmd.name(name);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let category = state.engine.update_category(cmd).await?;
    Ok(Json(view(category)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
