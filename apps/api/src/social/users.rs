use tracing::info;

use crate::errors::AppError;
use crate::models::user::User;
use crate::store::GraphStore;

/// Creates a user, or renames it if `user_id` already exists.
pub async fn create_user(store: &dyn GraphStore, user_id: &str, name: &str) -> Result<User, AppError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::Validation("user_id must not be empty".to_string()));
    }
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }

    let user = store.upsert_user(user_id, name).await?;
    info!("Successfully created/updated user: {}", user.user_id);
    Ok(user)
}

pub async fn list_users(store: &dyn GraphStore) -> Result<Vec<User>, AppError> {
    store.list_users().await
}
