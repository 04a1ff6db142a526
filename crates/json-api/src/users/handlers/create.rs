//! Create User Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::users::{
    data::NewUser,
    records::{UserRole, UserUuid},
};

use crate::{
    extensions::*,
    state::State,
    users::{UserResponse, errors::into_status_error},
};

/// Create User Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateUserRequest {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub name: String,
    pub email: String,
    /// Defaults to `CUSTOMER`
    #[serde(default)]
    pub role: Option<String>,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = StatusError;

    fn try_from(request: CreateUserRequest) -> Result<Self, Self::Error> {
        let role = request
            .role
            .map(|role| role.parse::<UserRole>())
            .transpose()
            .or_400("unknown user role")?
            .unwrap_or_default();

        Ok(NewUser {
            uuid: request.uuid.map_or_else(UserUuid::new, Into::into),
            name: request.name,
            email: request.email,
            role,
        })
    }
}

/// Create User Handler
#[endpoint(
    tags("users"),
    summary = "Create User",
    responses(
        (status_code = StatusCode::CREATED, description = "User created"),
        (status_code = StatusCode::CONFLICT, description = "Email already in use"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateUserRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = NewUser::try_from(json.into_inner())?;

    let user = state
        .app
        .users
        .create_user(user)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/users/{}", user.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(user.into()))
}
