use storage::{ResortStore, dto::user::CreateUserRequest, error::Result, models::User};

pub async fn create_user(store: &dyn ResortStore, req: &CreateUserRequest) -> Result<User> {
    let user = store.create_user(req).await?;

    tracing::info!(user_id = %user.user_id, "Registered user");

    Ok(user)
}
