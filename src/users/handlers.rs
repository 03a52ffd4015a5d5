use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::middleware::AuthenticatedUser,
    entities::User,
    errors::ServiceError,
    response::{DataResponse, ErrorResponse},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            created_at: u.created_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The signed-in user", body = DataResponse<UserResponse>),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    )
)]
pub async fn get_user_info(
    auth_user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<DataResponse<UserResponse>>, ServiceError> {
    match state.user_repo.find_by_id(auth_user.user_id).await {
        Ok(Some(user)) => Ok(Json(DataResponse::new(user.into()))),
        Ok(None) => Err(ServiceError::NotFound("user not found".to_string())),
        Err(e) => {
            error!(error = %e, user_id = %auth_user.user_id, "failed to load user");
            Err(ServiceError::server_error())
        }
    }
}
