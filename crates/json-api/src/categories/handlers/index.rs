//! Category Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    categories::{CategoryResponse, errors::into_status_error},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoriesResponse {
    /// Categories ordered by name
    pub categories: Vec<CategoryResponse>,
}

/// Category Index Handler
#[endpoint(tags("categories"), summary = "List Categories")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CategoriesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let categories = state
        .app
        .categories
        .list_categories()
        .await
        .map_err(into_status_error)?;

    Ok(Json(CategoriesResponse {
        categories: categories.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::categories::{MockCategoriesService, records::CategoryUuid};

    use crate::{categories::handlers::tests::make_category, test_helpers::TestApp};

    use super::*;

    #[tokio::test]
    async fn test_list_categories() -> TestResult {
        let shirts = CategoryUuid::new();
        let shoes = CategoryUuid::new();

        let mut categories = MockCategoriesService::new();

        categories.expect_list_categories().once().return_once(move || {
            Ok(vec![
                make_category(shirts, "Ao"),
                make_category(shoes, "Giay"),
            ])
        });

        categories.expect_create_category().never();

        let mut res = TestClient::get("http://example.com/categories")
            .send(
                &TestApp::new()
                    .categories(categories)
                    .service(Router::with_path("categories").get(handler)),
            )
            .await;

        let body: CategoriesResponse = res.take_json().await?;

        let names: Vec<_> = body.categories.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(names, vec!["Ao", "Giay"]);

        Ok(())
    }
}
