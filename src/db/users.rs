//! Database operations for users.

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::user::User;

/// Find an active user by ID.
///
/// A `sub` claim that is not a UUID cannot match any row, so it is treated as
/// not-found rather than an error.
pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> AppResult<Option<User>> {
    let uuid = match Uuid::parse_str(id).ok() {
        Some(u) => u,
        None => return Ok(None),
    };

    let result = crate::entity::user::Entity::find_by_id(uuid)
        .filter(crate::entity::user::Column::DeletedAt.is_null())
        .one(db)
        .await?;

    Ok(result.map(model_to_user))
}

/// Find an active user by username, returning the stored password hash
/// alongside the domain user for credential verification.
pub async fn find_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> AppResult<Option<(User, String)>> {
    let result = crate::entity::user::Entity::find()
        .filter(crate::entity::user::Column::Username.eq(username))
        .filter(crate::entity::user::Column::DeletedAt.is_null())
        .one(db)
        .await?;

    Ok(result.map(|m| {
        let hash = m.password_hash.clone();
        (model_to_user(m), hash)
    }))
}

/// Create a new user.
pub async fn create(
    db: &DatabaseConnection,
    username: &str,
    password_hash: &str,
    email: Option<&str>,
    role: Option<&str>,
) -> AppResult<User> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let model = crate::entity::user::ActiveModel {
        id: Set(id),
        username: Set(username.to_string()),
        password_hash: Set(password_hash.to_string()),
        email: Set(email.map(|s| s.to_string())),
        role: Set(role.map(|s| s.to_string())),
        last_login_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    crate::entity::user::Entity::insert(model).exec(db).await?;

    // Fetch back the inserted user
    let inserted = crate::entity::user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::Database("Failed to fetch newly inserted user".to_string()))?;

    Ok(model_to_user(inserted))
}

/// Record a successful login.
pub async fn touch_last_login(db: &DatabaseConnection, id: &str) -> AppResult<()> {
    let uuid = match Uuid::parse_str(id).ok() {
        Some(u) => u,
        None => return Ok(()),
    };

    crate::entity::user::Entity::update_many()
        .col_expr(
            crate::entity::user::Column::LastLoginAt,
            sea_orm::prelude::Expr::value(Some(Utc::now())),
        )
        .filter(crate::entity::user::Column::Id.eq(uuid))
        .exec(db)
        .await?;

    Ok(())
}

fn model_to_user(m: crate::entity::user::Model) -> User {
    User {
        id: m.id.to_string(),
        username: m.username,
        email: m.email,
        role: m.role,
        last_login_at: m.last_login_at,
        created_at: m.created_at,
    }
}
