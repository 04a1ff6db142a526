//! Orders service.

use std::collections::BTreeMap;

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        orders::{
            data::{NewOrder, OrdersFilter, OrdersPage, PaymentUpdate},
            errors::OrdersServiceError,
            records::{OrderRecord, OrderStatus, OrderUuid, PaymentRecord, PaymentStatus},
            repositories::{
                OrderHeader, PgOrderItemsRepository, PgOrdersRepository, PgPaymentsRepository,
                assemble_orders,
            },
        },
        products::{records::ProductUuid, repository::PgProductsRepository},
        users::{
            records::{UserRole, UserUuid},
            repository::PgUsersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    items: PgOrderItemsRepository,
    payments: PgPaymentsRepository,
    products: PgProductsRepository,
    users: PgUsersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            items: PgOrderItemsRepository::new(),
            payments: PgPaymentsRepository::new(),
            products: PgProductsRepository::new(),
            users: PgUsersRepository::new(),
        }
    }

    async fn load_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let header = self.orders.get_order(tx, order).await?;
        let items = self.items.get_order_items(tx, &[order]).await?;
        let payments = self.payments.get_payments(tx, &[order]).await?;

        assemble_orders(vec![header], items, payments)?
            .pop()
            .ok_or(OrdersServiceError::NotFound)
    }

    async fn load_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        headers: Vec<OrderHeader>,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let uuids: Vec<OrderUuid> = headers.iter().map(|header| header.uuid).collect();

        let items = self.items.get_order_items(tx, &uuids).await?;
        let payments = self.payments.get_payments(tx, &uuids).await?;

        Ok(assemble_orders(headers, items, payments)?)
    }

    /// Lock every product in UUID order and check it can cover the request.
    async fn check_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        quantities: &BTreeMap<ProductUuid, u64>,
    ) -> Result<BTreeMap<ProductUuid, u32>, OrdersServiceError> {
        let mut available = BTreeMap::new();

        for (&product, &requested) in quantities {
            let locked = self
                .products
                .lock_product(tx, product)
                .await?
                .ok_or(OrdersServiceError::ProductNotFound(product))?;

            if u64::from(locked.stock) < requested {
                return Err(OrdersServiceError::InsufficientStock {
                    product,
                    available: locked.stock,
                    requested,
                });
            }

            available.insert(product, locked.stock);
        }

        Ok(available)
    }

    async fn reserve_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        quantities: &BTreeMap<ProductUuid, u64>,
        available: &BTreeMap<ProductUuid, u32>,
    ) -> Result<(), OrdersServiceError> {
        for (&product, &requested) in quantities {
            let stock = available.get(&product).copied().unwrap_or_default();

            let insufficient = OrdersServiceError::InsufficientStock {
                product,
                available: stock,
                requested,
            };

            let Ok(quantity) = u32::try_from(requested) else {
                return Err(insufficient);
            };

            if self.products.reserve_stock(tx, product, quantity).await? == 0 {
                return Err(insufficient);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(
            user_uuid = %order.user_uuid,
            payment_method = %order.payment_method,
            order_uuid = tracing::field::Empty,
            item_count = order.items.len()
        ),
        err
    )]
    async fn create_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError> {
        order.validate()?;

        let total_price = order.total_price()?;
        let quantities = order.quantities_by_product();
        let uuid = OrderUuid::new();

        Span::current().record("order_uuid", tracing::field::display(uuid));

        let mut tx = self.db.begin().await?;

        let available = self.check_stock(&mut tx, &quantities).await?;

        self.orders
            .create_order(&mut tx, uuid, &order, total_price)
            .await?;

        self.items
            .create_order_items(&mut tx, uuid, &order.items)
            .await?;

        self.payments
            .create_payment(&mut tx, uuid, order.payment_method, total_price)
            .await?;

        self.reserve_stock(&mut tx, &quantities, &available).await?;

        let created = self.load_order(&mut tx, uuid).await?;

        tx.commit().await?;

        info!(order_uuid = %created.uuid, total_price, "created order");

        Ok(created)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.load_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_user_orders(
        &self,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let headers = self.orders.list_user_orders(&mut tx, user).await?;
        let orders = self.load_orders(&mut tx, headers).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn list_orders(&self, filter: OrdersFilter) -> Result<OrdersPage, OrdersServiceError> {
        let filter = filter.normalized();

        let mut tx = self.db.begin().await?;

        let total = self.orders.count_orders(&mut tx, filter.status).await?;
        let headers = self.orders.list_orders(&mut tx, filter).await?;
        let orders = self.load_orders(&mut tx, headers).await?;

        tx.commit().await?;

        Ok(OrdersPage::new(orders, total, filter))
    }

    #[tracing::instrument(
        name = "orders.service.update_order_status",
        skip_all,
        fields(order_uuid = %order, status = %status),
        err
    )]
    async fn update_order_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders.lock_order_status(&mut tx, order).await?;

        if !current.can_transition_to(status) {
            return Err(OrdersServiceError::InvalidOrderTransition {
                from: current,
                to: status,
            });
        }

        if current != status {
            self.orders
                .update_order_status(&mut tx, order, status)
                .await?;
        }

        let updated = self.load_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "orders.service.update_payment_status",
        skip_all,
        fields(order_uuid = %order, status = %update.status),
        err
    )]
    async fn update_payment_status(
        &self,
        order: OrderUuid,
        update: PaymentUpdate,
    ) -> Result<PaymentRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.payments.lock_payment_status(&mut tx, order).await?;

        if !current.can_transition_to(update.status) {
            return Err(OrdersServiceError::InvalidPaymentTransition {
                from: current,
                to: update.status,
            });
        }

        let payment = self
            .payments
            .update_payment_status(&mut tx, order, update)
            .await?;

        tx.commit().await?;

        Ok(payment)
    }

    #[tracing::instrument(
        name = "orders.service.assign_shipper",
        skip_all,
        fields(order_uuid = %order, shipper_uuid = %shipper),
        err
    )]
    async fn assign_shipper(
        &self,
        order: OrderUuid,
        shipper: UserUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = match self.users.get_user(&mut tx, shipper).await {
            Ok(user) => user,
            Err(sqlx::Error::RowNotFound) => return Err(OrdersServiceError::InvalidShipper),
            Err(error) => return Err(error.into()),
        };

        if user.role != UserRole::Delivery {
            return Err(OrdersServiceError::InvalidShipper);
        }

        if self
            .orders
            .update_order_shipper(&mut tx, order, shipper)
            .await?
            == 0
        {
            return Err(OrdersServiceError::NotFound);
        }

        let updated = self.load_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "orders.service.expire_checkout",
        skip_all,
        fields(order_uuid = %order),
        err
    )]
    async fn expire_checkout(&self, order: OrderUuid) -> Result<bool, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let payment_status = self.payments.lock_payment_status(&mut tx, order).await?;

        if payment_status != PaymentStatus::Pending {
            tx.commit().await?;

            return Ok(false);
        }

        self.payments
            .update_payment_status(
                &mut tx,
                order,
                PaymentUpdate {
                    status: PaymentStatus::Failed,
                    transaction_id: None,
                },
            )
            .await?;

        if self.orders.lock_order_status(&mut tx, order).await? == OrderStatus::Pending {
            self.orders
                .update_order_status(&mut tx, order, OrderStatus::Cancelled)
                .await?;
        }

        tx.commit().await?;

        warn!(order_uuid = %order, "checkout payment window expired");

        Ok(true)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Validates and places an order.
    ///
    /// Stock is checked and decremented, and the order, its items and its
    /// pending payment are written, all in one transaction. Any failure
    /// leaves storage untouched.
    async fn create_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve a single order with its items, payment and customer.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// A user's orders, newest first.
    async fn list_user_orders(
        &self,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// One page of all orders, optionally filtered by status.
    async fn list_orders(&self, filter: OrdersFilter) -> Result<OrdersPage, OrdersServiceError>;

    /// Moves an order along its lifecycle.
    async fn update_order_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Settles or re-asserts an order's payment.
    async fn update_payment_status(
        &self,
        order: OrderUuid,
        update: PaymentUpdate,
    ) -> Result<PaymentRecord, OrdersServiceError>;

    /// Hands an order to a delivery user.
    async fn assign_shipper(
        &self,
        order: OrderUuid,
        shipper: UserUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Fails a still-pending payment and cancels its pending order.
    ///
    /// Returns whether anything changed.
    async fn expire_checkout(&self, order: OrderUuid) -> Result<bool, OrdersServiceError>;
}
