//! Test helpers.

use std::{sync::Arc, time::Duration};

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use storefront_app::{
    context::AppContext,
    domain::{
        categories::MockCategoriesService,
        checkout::CheckoutSessions,
        orders::{
            MockOrdersService,
            data::ShippingDetails,
            records::{
                CURRENCY, OrderCustomer, OrderItemRecord, OrderItemUuid, OrderRecord,
                OrderStatus, OrderUuid, PaymentMethod, PaymentRecord, PaymentStatus, PaymentUuid,
            },
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        stats::MockStatsService,
        users::{
            MockUsersService,
            records::{UserRecord, UserRole, UserUuid},
        },
    },
};

use crate::state::State;

pub(crate) const TEST_CHECKOUT_WINDOW: Duration = Duration::from_secs(900);

pub(crate) fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_create_product().never();
    products.expect_update_product().never();

    products
}

pub(crate) fn strict_categories_mock() -> MockCategoriesService {
    let mut categories = MockCategoriesService::new();

    categories.expect_list_categories().never();
    categories.expect_create_category().never();

    categories
}

pub(crate) fn strict_users_mock() -> MockUsersService {
    let mut users = MockUsersService::new();

    users.expect_list_users().never();
    users.expect_get_user().never();
    users.expect_create_user().never();

    users
}

pub(crate) fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_create_order().never();
    orders.expect_get_order().never();
    orders.expect_list_user_orders().never();
    orders.expect_list_orders().never();
    orders.expect_update_order_status().never();
    orders.expect_update_payment_status().never();
    orders.expect_assign_shipper().never();
    orders.expect_expire_checkout().never();

    orders
}

pub(crate) fn strict_stats_mock() -> MockStatsService {
    let mut stats = MockStatsService::new();

    stats.expect_dashboard().never();
    stats.expect_sales_by_date().never();
    stats.expect_top_customers().never();

    stats
}

/// Application context over mocked services.
///
/// Every service left unset fails the test if any of its methods is called.
pub(crate) struct TestApp {
    products: Option<MockProductsService>,
    categories: Option<MockCategoriesService>,
    users: Option<MockUsersService>,
    orders: Option<MockOrdersService>,
    stats: Option<MockStatsService>,
    checkouts: Arc<CheckoutSessions>,
}

impl TestApp {
    pub(crate) fn new() -> Self {
        Self {
            products: None,
            categories: None,
            users: None,
            orders: None,
            stats: None,
            checkouts: Arc::new(CheckoutSessions::new(TEST_CHECKOUT_WINDOW)),
        }
    }

    pub(crate) fn products(mut self, products: MockProductsService) -> Self {
        self.products = Some(products);
        self
    }

    pub(crate) fn categories(mut self, categories: MockCategoriesService) -> Self {
        self.categories = Some(categories);
        self
    }

    pub(crate) fn users(mut self, users: MockUsersService) -> Self {
        self.users = Some(users);
        self
    }

    pub(crate) fn orders(mut self, orders: MockOrdersService) -> Self {
        self.orders = Some(orders);
        self
    }

    pub(crate) fn stats(mut self, stats: MockStatsService) -> Self {
        self.stats = Some(stats);
        self
    }

    pub(crate) fn checkouts(mut self, checkouts: Arc<CheckoutSessions>) -> Self {
        self.checkouts = checkouts;
        self
    }

    pub(crate) fn into_context(self) -> AppContext {
        AppContext {
            products: Arc::new(self.products.unwrap_or_else(strict_products_mock)),
            categories: Arc::new(self.categories.unwrap_or_else(strict_categories_mock)),
            users: Arc::new(self.users.unwrap_or_else(strict_users_mock)),
            orders: Arc::new(self.orders.unwrap_or_else(strict_orders_mock)),
            stats: Arc::new(self.stats.unwrap_or_else(strict_stats_mock)),
            checkouts: self.checkouts,
        }
    }

    pub(crate) fn service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(State::from_app_context(self.into_context())))
                .push(route),
        )
    }
}

pub(crate) fn make_user(uuid: UserUuid, role: UserRole) -> UserRecord {
    UserRecord {
        uuid,
        name: "Nguyen Van A".to_string(),
        email: "a@example.com".to_string(),
        role,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Ao thun".to_string(),
        price: 150_000,
        stock: 10,
        sold_count: 0,
        category_uuid: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_payment(order: OrderUuid, method: PaymentMethod, amount: u64) -> PaymentRecord {
    PaymentRecord {
        uuid: PaymentUuid::new(),
        order_uuid: order,
        method,
        status: PaymentStatus::Pending,
        amount,
        currency: CURRENCY.to_string(),
        transaction_id: None,
        payment_date: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A pending order of two units of one product at 150 000 each.
pub(crate) fn make_order(uuid: OrderUuid, method: PaymentMethod) -> OrderRecord {
    let product = ProductUuid::new();

    OrderRecord {
        uuid,
        customer: OrderCustomer {
            uuid: UserUuid::new(),
            name: "Nguyen Van A".to_string(),
            email: "a@example.com".to_string(),
        },
        shipper_uuid: None,
        total_price: 300_000,
        status: OrderStatus::Pending,
        shipping: ShippingDetails {
            address: "1 Le Loi, District 1".to_string(),
            phone: "0900000000".to_string(),
            name: "Nguyen Van A".to_string(),
        },
        note: None,
        items: vec![OrderItemRecord {
            uuid: OrderItemUuid::new(),
            product_uuid: product,
            product_name: "Ao thun".to_string(),
            quantity: 2,
            price: 150_000,
        }],
        payment: make_payment(uuid, method, 300_000),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
