//! Test Helpers

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;

use crate::{
    domain::{
        categories::records::CategoryUuid,
        orders::{
            data::{NewOrder, NewOrderItem, ShippingDetails},
            records::{OrderUuid, PaymentMethod},
        },
        products::{ProductsService, data::NewProduct, records::ProductRecord},
        users::{
            UsersService,
            data::NewUser,
            records::{UserRecord, UserRole, UserUuid},
        },
    },
    test::TestContext,
};

pub(crate) async fn create_user(ctx: &TestContext, email: &str, role: UserRole) -> UserRecord {
    ctx.users
        .create_user(NewUser {
            uuid: UserUuid::new(),
            name: format!("User {email}"),
            email: email.to_string(),
            role,
        })
        .await
        .expect("create_user should succeed")
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    name: &str,
    price: u64,
    stock: u32,
    category: Option<CategoryUuid>,
) -> ProductRecord {
    ctx.products
        .create_product(NewProduct {
            uuid: Default::default(),
            name: name.to_string(),
            price,
            stock,
            category_uuid: category,
        })
        .await
        .expect("create_product should succeed")
}

pub(crate) fn shipping() -> ShippingDetails {
    ShippingDetails {
        address: "12 Ly Thuong Kiet, Ha Noi".to_string(),
        phone: "0901234567".to_string(),
        name: "Tran Thi B".to_string(),
    }
}

pub(crate) fn new_order(
    user: UserUuid,
    items: &[(&ProductRecord, u32, u64)],
    payment_method: PaymentMethod,
) -> NewOrder {
    NewOrder {
        user_uuid: user,
        items: items
            .iter()
            .map(|(product, quantity, price)| NewOrderItem {
                product_uuid: product.uuid,
                quantity: *quantity,
                price: *price,
            })
            .collect(),
        shipping: shipping(),
        note: None,
        payment_method,
    }
}

/// Backdate an order so date-based aggregations can be exercised.
pub(crate) async fn set_order_created_at(ctx: &TestContext, order: OrderUuid, at: Timestamp) {
    sqlx::query("UPDATE orders SET created_at = $2 WHERE uuid = $1")
        .bind(order.into_uuid())
        .bind(SqlxTimestamp::from(at))
        .execute(ctx.db.pool())
        .await
        .expect("backdating order should succeed");
}

/// Overwrite a product's sold count without going through an order.
pub(crate) async fn set_sold_count(ctx: &TestContext, product: &ProductRecord, sold: i32) {
    sqlx::query("UPDATE products SET sold_count = $2 WHERE uuid = $1")
        .bind(product.uuid.into_uuid())
        .bind(sold)
        .execute(ctx.db.pool())
        .await
        .expect("updating sold count should succeed");
}
