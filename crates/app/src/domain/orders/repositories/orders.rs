//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{amount_to_i64, try_get_amount, try_get_parsed},
    domain::{
        orders::{
            data::{NewOrder, OrdersFilter, ShippingDetails},
            records::{
                OrderCustomer, OrderItemRecord, OrderRecord, OrderStatus, OrderUuid,
                PaymentRecord,
            },
        },
        users::records::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("../sql/list_user_orders.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("../sql/count_orders.sql");
const LOCK_ORDER_STATUS_SQL: &str = include_str!("../sql/lock_order_status.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");
const UPDATE_ORDER_SHIPPER_SQL: &str = include_str!("../sql/update_order_shipper.sql");

/// An order row with its customer, before items and payment are attached.
#[derive(Debug, Clone)]
pub(crate) struct OrderHeader {
    pub uuid: OrderUuid,
    pub customer: OrderCustomer,
    pub shipper_uuid: Option<UserUuid>,
    pub total_price: u64,
    pub status: OrderStatus,
    pub shipping: ShippingDetails,
    pub note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderHeader {
    pub(crate) fn into_record(
        self,
        items: Vec<OrderItemRecord>,
        payment: PaymentRecord,
    ) -> OrderRecord {
        OrderRecord {
            uuid: self.uuid,
            customer: self.customer,
            shipper_uuid: self.shipper_uuid,
            total_price: self.total_price,
            status: self.status,
            shipping: self.shipping,
            note: self.note,
            items,
            payment,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: OrderUuid,
        order: &NewOrder,
        total_price: u64,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_SQL)
            .bind(uuid.into_uuid())
            .bind(order.user_uuid.into_uuid())
            .bind(amount_to_i64(total_price, "total_price")?)
            .bind(OrderStatus::Pending.as_str())
            .bind(&order.shipping.address)
            .bind(&order.shipping.phone)
            .bind(&order.shipping.name)
            .bind(order.note.as_deref())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderHeader, sqlx::Error> {
        query_as::<Postgres, OrderHeader>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<OrderHeader>, sqlx::Error> {
        query_as::<Postgres, OrderHeader>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: OrdersFilter,
    ) -> Result<Vec<OrderHeader>, sqlx::Error> {
        query_as::<Postgres, OrderHeader>(LIST_ORDERS_SQL)
            .bind(filter.status.map(OrderStatus::as_str))
            .bind(i64::from(filter.limit))
            .bind(amount_to_i64(filter.offset(), "offset")?)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: Option<OrderStatus>,
    ) -> Result<u64, sqlx::Error> {
        let row = query(COUNT_ORDERS_SQL)
            .bind(status.map(OrderStatus::as_str))
            .fetch_one(&mut **tx)
            .await?;

        try_get_amount(&row, "total")
    }

    /// Read an order's status and hold its row lock until the transaction ends.
    pub(crate) async fn lock_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderStatus, sqlx::Error> {
        let row = query(LOCK_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        try_get_parsed(&row, "status")
    }

    pub(crate) async fn update_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn update_order_shipper(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        shipper: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_ORDER_SHIPPER_SQL)
            .bind(order.into_uuid())
            .bind(shipper.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for OrderHeader {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let shipper_uuid: Option<Uuid> = row.try_get("shipper_uuid")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer: OrderCustomer {
                uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
                name: row.try_get("user_name")?,
                email: row.try_get("user_email")?,
            },
            shipper_uuid: shipper_uuid.map(UserUuid::from_uuid),
            total_price: try_get_amount(row, "total_price")?,
            status: try_get_parsed(row, "status")?,
            shipping: ShippingDetails {
                address: row.try_get("shipping_address")?,
                phone: row.try_get("shipping_phone")?,
                name: row.try_get("shipping_name")?,
            },
            note: row.try_get("note")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
