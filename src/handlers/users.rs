use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use model::entities::{role, user};
use persistence::GenericDao;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use utoipa::{IntoParams, ToSchema};

use super::{HandlerError, dao_error, not_found};
use crate::schemas::{ApiResponse, AppState};

/// User response model; the password is never exposed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            user_name: model.user_name,
        }
    }
}

/// Role response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleResponse {
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub role_type: String,
}

impl From<role::Model> for RoleResponse {
    fn from(model: role::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            user_name: model.user_name,
            role_type: model.role_type,
        }
    }
}

/// Optional filters for listing users
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserQuery {
    /// Only return the user with this login name
    pub user_name: Option<String>,
}

/// List users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    params(UserQuery),
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    Query(query): Query<UserQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, HandlerError> {
    let users = GenericDao::<user::Entity>::new(state.db.clone());
    let result = match query.user_name {
        Some(user_name) => users.get_by_column_equal("userName", user_name).await,
        None => users.get_all().await,
    }
    .map_err(|e| dao_error(e, "Failed to retrieve users"))?;

    debug!("Retrieved {} users", result.len());
    Ok(Json(ApiResponse::ok(
        result.into_iter().map(UserResponse::from).collect(),
        "Users retrieved successfully",
    )))
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, HandlerError> {
    match GenericDao::<user::Entity>::new(state.db.clone())
        .get_by_id(user_id)
        .await
    {
        Ok(Some(model)) => Ok(Json(ApiResponse::ok(
            UserResponse::from(model),
            "User retrieved successfully",
        ))),
        Ok(None) => {
            warn!("User with ID {} not found", user_id);
            Err(not_found("User", user_id))
        }
        Err(e) => Err(dao_error(e, "Failed to retrieve user")),
    }
}

/// Get the roles granted to a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/roles",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Roles retrieved successfully", body = ApiResponse<Vec<RoleResponse>>),
        (status = 404, description = "User not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user_roles(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RoleResponse>>>, HandlerError> {
    let exists = GenericDao::<user::Entity>::new(state.db.clone())
        .get_by_id(user_id)
        .await
        .map_err(|e| dao_error(e, "Failed to look up user"))?
        .is_some();
    if !exists {
        warn!("User with ID {} not found", user_id);
        return Err(not_found("User", user_id));
    }

    let roles = GenericDao::<role::Entity>::new(state.db.clone())
        .get_by_column_equal("user", user_id)
        .await
        .map_err(|e| dao_error(e, "Failed to retrieve roles"))?;

    debug!("User {} has {} roles", user_id, roles.len());
    Ok(Json(ApiResponse::ok(
        roles.into_iter().map(RoleResponse::from).collect(),
        "Roles retrieved successfully",
    )))
}
