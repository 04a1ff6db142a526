//! App Router

use salvo::Router;

use crate::{categories, orders, products, stats, users};

pub fn app_router() -> Router {
    Router::new()
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("user/{user}").get(orders::user::handler))
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("status").patch(orders::status::handler))
                        .push(Router::with_path("shipper").patch(orders::shipper::handler))
                        .push(
                            Router::with_path("payment")
                                .patch(orders::payment::handler)
                                .push(
                                    Router::with_path("countdown").get(orders::countdown::handler),
                                ),
                        ),
                ),
        )
        .push(
            Router::with_path("stats")
                .push(Router::with_path("dashboard").get(stats::dashboard::handler))
                .push(Router::with_path("sales").get(stats::sales::handler))
                .push(Router::with_path("top-customers").get(stats::top_customers::handler)),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .put(products::update::handler),
                ),
        )
        .push(
            Router::with_path("categories")
                .get(categories::index::handler)
                .post(categories::create::handler),
        )
        .push(
            Router::with_path("users")
                .get(users::index::handler)
                .post(users::create::handler)
                .push(Router::with_path("{user}").get(users::get::handler)),
        )
}
