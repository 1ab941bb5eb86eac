use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, categories, transactions, users};

use super::Engine;

impl Engine {
    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<()> {
        let exists = users::Entity::find_by_id(user_id).one(db).await?.is_some();
        if !exists {
            return Err(EngineError::KeyNotFound("user not exists".to_string()));
        }
        Ok(())
    }

    pub(super) async fn require_category_exists(
        &self,
        db: &DatabaseTransaction,
        category_id: i32,
    ) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(category_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
    }

    /// Fetch a transaction by id and verify the caller owns it.
    ///
    /// Missing rows map to `KeyNotFound`, rows owned by another user to
    /// `Forbidden`. Every single-entity path (detail, update, delete) goes
    /// through here; list queries embed the owner in the predicate instead.
    pub(super) async fn require_transaction_owned(
        &self,
        db: &DatabaseTransaction,
        transaction_id: i32,
        user_id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        let model = transactions::Entity::find_by_id(transaction_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::Forbidden(
                "transaction belongs to another user".to_string(),
            ));
        }
        Ok(model)
    }
}
