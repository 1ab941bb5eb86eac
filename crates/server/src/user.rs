//! User registration and account endpoints.
//!
//! The server owns credential storage; the engine only ever sees the
//! authenticated user id.

use api_types::user::{Message, UserRegister, UserView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn view(model: &Model) -> UserView {
    UserView {
        id: model.id,
        email: model.email.clone(),
        full_name: model.full_name.clone(),
        is_active: model.is_active,
        is_superuser: model.is_superuser,
    }
}

/// Register a new account. The only route outside the auth middleware.
pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<UserRegister>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ServerError::Generic(
            "email and password are required".to_string(),
        ));
    }

    let existing = Entity::find()
        .filter(Column::Email.eq(email.clone()))
        .one(&state.db)
        .await
        .map_err(|err| ServerError::Generic(err.to_string()))?;
    if existing.is_some() {
        return Err(ServerError::Conflict(format!(
            "user with email {email} already exists"
        )));
    }

    let hashed = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|err| ServerError::Generic(err.to_string()))?;

    let full_name = payload
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string);

    let user = ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        email: ActiveValue::Set(email),
        password: ActiveValue::Set(hashed),
        full_name: ActiveValue::Set(full_name),
        is_active: ActiveValue::Set(true),
        is_superuser: ActiveValue::Set(false),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(&state.db)
    .await
    .map_err(|err| ServerError::Generic(err.to_string()))?;

    Ok((StatusCode::CREATED, Json(view(&user))))
}

/// The authenticated account.
pub async fn me(Extension(user): Extension<Model>) -> Json<UserView> {
    Json(view(&user))
}

/// Delete the authenticated account. Superusers are refused.
pub async fn delete_me(
    Extension(user): Extension<Model>,
    State(state): State<ServerState>,
) -> Result<Json<Message>, ServerError> {
    if user.is_superuser {
        return Err(ServerError::Forbidden(
            "superusers are not allowed to delete themselves".to_string(),
        ));
    }

    Entity::delete_by_id(user.id)
        .exec(&state.db)
        .await
        .map_err(|err| ServerError::Generic(err.to_string()))?;

    Ok(Json(Message {
        message: "User deleted successfully".to_string(),
    }))
}
