use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    NewTransactionCmd, ResultEngine, Transaction, UpdateTransactionCmd, transactions,
};

use super::super::{Engine, normalize_optional_text, with_tx};
use super::helpers::{apply_optional_text_patch, validate_amount};

impl Engine {
    /// Records a new transaction for the owning user.
    ///
    /// `transaction_date` defaults to the creation instant; callers may back-
    /// or future-date it freely.
    pub async fn create_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<Transaction> {
        validate_amount(cmd.amount)?;
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, cmd.user_id).await?;
            self.require_category_exists(&db_tx, cmd.category_id)
                .await?;

            let now = Utc::now();
            let active = transactions::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(cmd.user_id),
                category_id: ActiveValue::Set(cmd.category_id),
                amount: ActiveValue::Set(cmd.amount),
                transaction_type: ActiveValue::Set(cmd.transaction_type.as_str().to_string()),
                payment_method: ActiveValue::Set(
                    cmd.payment_method.map(|method| method.as_str().to_string()),
                ),
                description: ActiveValue::Set(normalize_optional_text(cmd.description.as_deref())),
                transaction_date: ActiveValue::Set(cmd.transaction_date.unwrap_or(now)),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(None),
            };

            let model = active.insert(&db_tx).await?;
            Transaction::try_from(model)
        })
    }

    /// Applies a partial update to an owned transaction.
    ///
    /// Only supplied fields overwrite; a blank description clears the stored
    /// value. `user_id` is never mutated.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<Transaction> {
        if let Some(amount) = cmd.amount {
            validate_amount(amount)?;
        }
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction_owned(&db_tx, cmd.transaction_id, cmd.user_id)
                .await?;

            let new_category_id = match cmd.category_id {
                Some(category_id) => {
                    self.require_category_exists(&db_tx, category_id).await?;
                    category_id
                }
                None => model.category_id,
            };
            let new_amount = cmd.amount.unwrap_or(model.amount);
            let new_transaction_type = match cmd.transaction_type {
                Some(kind) => kind.as_str().to_string(),
                None => model.transaction_type.clone(),
            };
            let new_payment_method = match cmd.payment_method {
                Some(method) => Some(method.as_str().to_string()),
                None => model.payment_method.clone(),
            };
            let new_description =
                apply_optional_text_patch(model.description.clone(), cmd.description.as_deref());
            let new_transaction_date = cmd.transaction_date.unwrap_or(model.transaction_date);

            let mut active: transactions::ActiveModel = model.into();
            active.category_id = ActiveValue::Set(new_category_id);
            active.amount = ActiveValue::Set(new_amount);
            active.transaction_type = ActiveValue::Set(new_transaction_type);
            active.payment_method = ActiveValue::Set(new_payment_method);
            active.description = ActiveValue::Set(new_description);
            active.transaction_date = ActiveValue::Set(new_transaction_date);
            active.updated_at = ActiveValue::Set(Some(Utc::now()));

            let model = active.update(&db_tx).await?;
            Transaction::try_from(model)
        })
    }

    /// Permanently deletes an owned transaction. There is no soft-delete.
    pub async fn delete_transaction(
        &self,
        user_id: Uuid,
        transaction_id: i32,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction_owned(&db_tx, transaction_id, user_id)
                .await?;
            transactions::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
