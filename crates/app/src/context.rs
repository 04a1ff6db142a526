//! App Context

use std::{sync::Arc, time::Duration};

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        categories::{CategoriesService, PgCategoriesService},
        checkout::CheckoutSessions,
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        stats::{PgStatsService, StatsService},
        users::{PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub categories: Arc<dyn CategoriesService>,
    pub users: Arc<dyn UsersService>,
    pub orders: Arc<dyn OrdersService>,
    pub stats: Arc<dyn StatsService>,
    pub checkouts: Arc<CheckoutSessions>,
}

impl AppContext {
    /// Build application context over an existing database handle.
    #[must_use]
    pub fn new(db: Db, checkout_window: Duration) -> Self {
        Self {
            products: Arc::new(PgProductsService::new(db.clone())),
            categories: Arc::new(PgCategoriesService::new(db.clone())),
            users: Arc::new(PgUsersService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            stats: Arc::new(PgStatsService::new(db)),
            checkouts: Arc::new(CheckoutSessions::new(checkout_window)),
        }
    }

    /// Build application context from a database URL, applying pending
    /// migrations first.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating
    /// the schema fails.
    pub async fn from_database_url(
        url: &str,
        checkout_window: Duration,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrate)?;

        Ok(Self::new(Db::new(pool), checkout_window))
    }
}
