use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*, sea_query::Expr,
};

use crate::{
    Category, EngineError, NewCategoryCmd, ResultEngine, UpdateCategoryCmd, categories,
    util::{normalize_category_display, normalize_category_key},
};

use super::{Engine, Page, with_tx};

/// Optional criteria for listing categories.
#[derive(Clone, Debug, Default)]
pub struct CategoryFilter {
    /// Case-insensitive substring on the name; blank means unset.
    pub search_query: Option<String>,
}

/// One page of categories plus the unwindowed match count.
#[derive(Clone, Debug)]
pub struct CategoryPage {
    pub items: Vec<Category>,
    pub total: u64,
}

impl Engine {
    /// Lists categories ordered by id, optionally filtered by name.
    pub async fn list_categories(
        &self,
        filter: &CategoryFilter,
        page: Page,
    ) -> ResultEngine<CategoryPage> {
        with_tx!(self, |db_tx| {
            let mut query = categories::Entity::find();
            if let Some(search) = filter
                .search_query
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
            {
                query = query.filter(Expr::cust_with_values(
                    "LOWER(name) LIKE ?",
                    [format!("%{}%", search.to_lowercase())],
                ));
            }

            let total = query.clone().count(&db_tx).await?;
            let models = query
                .order_by_asc(categories::Column::Id)
                .offset(page.skip)
                .limit(page.limit)
                .all(&db_tx)
                .await?;

            Ok(CategoryPage {
                items: models.into_iter().map(Category::from).collect(),
                total,
            })
        })
    }

    pub async fn category_detail(&self, category_id: i32) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self.require_category_exists(&db_tx, category_id).await?;
            Ok(Category::from(model))
        })
    }

    /// Creates a category; names are unique under normalization.
    pub async fn new_category(&self, cmd: NewCategoryCmd) -> ResultEngine<Category> {
        let display = normalize_category_display(&cmd.name)?;
        let normalized = normalize_category_key(&display)?;
        with_tx!(self, |db_tx| {
            let existing = categories::Entity::find()
                .filter(categories::Column::NameNorm.eq(normalized.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(display));
            }

            let active = categories::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(display),
                name_norm: ActiveValue::Set(normalized),
                description: ActiveValue::Set(cmd.description),
            };
            let model = active.insert(&db_tx).await?;
            Ok(Category::from(model))
        })
    }

    /// Applies a partial update; renames re-check name uniqueness.
    pub async fn update_category(&self, cmd: UpdateCategoryCmd) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self.require_category_exists(&db_tx, cmd.category_id).await?;

            let (new_name, new_norm) = match cmd.name.as_deref() {
                Some(raw) => {
                    let display = normalize_category_display(raw)?;
                    let normalized = normalize_category_key(&display)?;
                    let clash = categories::Entity::find()
                        .filter(categories::Column::NameNorm.eq(normalized.clone()))
                        .filter(categories::Column::Id.ne(model.id))
                        .one(&db_tx)
                        .await?;
                    if clash.is_some() {
                        return Err(EngineError::ExistingKey(display));
                    }
                    (display, normalized)
                }
                None => (model.name.clone(), model.name_norm.clone()),
            };
            let new_description = cmd
                .description
                .clone()
                .unwrap_or_else(|| model.description.clone());

            let mut active: categories::ActiveModel = model.into();
            active.name = ActiveValue::Set(new_name);
            active.name_norm = ActiveValue::Set(new_norm);
            active.description = ActiveValue::Set(new_description);

            let model = active.update(&db_tx).await?;
            Ok(Category::from(model))
        })
    }

    /// Deletes a category by id. Referencing transactions are left as-is.
    pub async fn delete_category(&self, category_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_category_exists(&db_tx, category_id).await?;
            categories::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
