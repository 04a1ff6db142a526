//! User Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::users::records::UserRole;

use crate::{
    extensions::*,
    state::State,
    users::{UserResponse, errors::into_status_error},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UsersResponse {
    pub users: Vec<UserResponse>,
}

/// User Index Handler
///
/// Lists users, optionally only those with the given role.
#[endpoint(
    tags("users"),
    summary = "List Users",
    responses(
        (status_code = StatusCode::OK, description = "Users"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown role"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    role: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<UsersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let role = role
        .into_inner()
        .map(|role| role.parse::<UserRole>())
        .transpose()
        .or_400("could not parse \"role\" query parameter")?;

    let users = state
        .app
        .users
        .list_users(role)
        .await
        .map_err(into_status_error)?;

    Ok(Json(UsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::users::{MockUsersService, records::UserUuid};

    use crate::test_helpers::{TestApp, make_user, strict_users_mock};

    use super::*;

    fn make_service(users: MockUsersService) -> Service {
        TestApp::new()
            .users(users)
            .service(Router::with_path("users").get(handler))
    }

    #[tokio::test]
    async fn test_list_users_filters_by_role() -> TestResult {
        let shipper = UserUuid::new();

        let mut users = MockUsersService::new();

        users
            .expect_list_users()
            .once()
            .withf(|role| *role == Some(UserRole::Delivery))
            .return_once(move |_| Ok(vec![make_user(shipper, UserRole::Delivery)]));

        users.expect_get_user().never();
        users.expect_create_user().never();

        let mut res = TestClient::get("http://example.com/users?role=delivery")
            .send(&make_service(users))
            .await;

        let body: UsersResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.users.len(), 1);
        assert_eq!(body.users.first().map(|u| u.role.as_str()), Some("DELIVERY"));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_users_without_role_lists_everyone() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_list_users()
            .once()
            .withf(Option::is_none)
            .return_once(|_| Ok(Vec::new()));

        users.expect_get_user().never();
        users.expect_create_user().never();

        let res = TestClient::get("http://example.com/users")
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_users_unknown_role_returns_400() -> TestResult {
        let res = TestClient::get("http://example.com/users?role=shopkeeper")
            .send(&make_service(strict_users_mock()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
