//! Create Category Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::categories::{data::NewCategory, records::CategoryUuid};

use crate::{
    categories::{CategoryResponse, errors::into_status_error},
    extensions::*,
    state::State,
};

/// Create Category Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCategoryRequest {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub name: String,
}

impl From<CreateCategoryRequest> for NewCategory {
    fn from(request: CreateCategoryRequest) -> Self {
        NewCategory {
            uuid: request.uuid.map_or_else(CategoryUuid::new, Into::into),
            name: request.name,
        }
    }
}

/// Create Category Handler
#[endpoint(
    tags("categories"),
    summary = "Create Category",
    responses(
        (status_code = StatusCode::CREATED, description = "Category created"),
        (status_code = StatusCode::CONFLICT, description = "Category already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCategoryRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CategoryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let category = state
        .app
        .categories
        .create_category(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(category.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::categories::{CategoriesServiceError, MockCategoriesService};

    use crate::{categories::handlers::tests::make_category, test_helpers::TestApp};

    use super::*;

    fn make_service(categories: MockCategoriesService) -> Service {
        TestApp::new()
            .categories(categories)
            .service(Router::with_path("categories").post(handler))
    }

    #[tokio::test]
    async fn test_create_category_success() -> TestResult {
        let uuid = CategoryUuid::new();

        let mut categories = MockCategoriesService::new();

        categories
            .expect_create_category()
            .once()
            .withf(move |new| {
                *new == NewCategory {
                    uuid,
                    name: "Ao".to_string(),
                }
            })
            .return_once(move |_| Ok(make_category(uuid, "Ao")));

        categories.expect_list_categories().never();

        let mut res = TestClient::post("http://example.com/categories")
            .json(&json!({ "uuid": uuid.into_uuid(), "name": "Ao" }))
            .send(&make_service(categories))
            .await;

        let body: CategoryResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.name, "Ao");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_duplicate_name_returns_409() -> TestResult {
        let mut categories = MockCategoriesService::new();

        categories
            .expect_create_category()
            .once()
            .return_once(|_| Err(CategoriesServiceError::AlreadyExists));

        categories.expect_list_categories().never();

        let res = TestClient::post("http://example.com/categories")
            .json(&json!({ "name": "Ao" }))
            .send(&make_service(categories))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_blank_name_returns_400() -> TestResult {
        let mut categories = MockCategoriesService::new();

        categories
            .expect_create_category()
            .once()
            .return_once(|_| Err(CategoriesServiceError::MissingRequiredData));

        categories.expect_list_categories().never();

        let res = TestClient::post("http://example.com/categories")
            .json(&json!({ "name": "  " }))
            .send(&make_service(categories))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
