//! Payments Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{amount_to_i64, try_get_amount, try_get_parsed},
    domain::orders::{
        data::PaymentUpdate,
        records::{
            CURRENCY, OrderUuid, PaymentMethod, PaymentRecord, PaymentStatus, PaymentUuid,
        },
    },
};

const CREATE_PAYMENT_SQL: &str = include_str!("../sql/create_payment.sql");
const GET_PAYMENTS_SQL: &str = include_str!("../sql/get_payments.sql");
const LOCK_PAYMENT_STATUS_SQL: &str = include_str!("../sql/lock_payment_status.sql");
const UPDATE_PAYMENT_STATUS_SQL: &str = include_str!("../sql/update_payment_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentsRepository;

impl PgPaymentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Record a pending payment for the full order amount.
    pub(crate) async fn create_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        method: PaymentMethod,
        amount: u64,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_PAYMENT_SQL)
            .bind(PaymentUuid::new().into_uuid())
            .bind(order.into_uuid())
            .bind(method.as_str())
            .bind(PaymentStatus::Pending.as_str())
            .bind(amount_to_i64(amount, "amount")?)
            .bind(CURRENCY)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_payments(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<PaymentRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().copied().map(OrderUuid::into_uuid).collect();

        query_as::<Postgres, PaymentRecord>(GET_PAYMENTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    /// Read a payment's status and hold its row lock until the transaction ends.
    pub(crate) async fn lock_payment_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<PaymentStatus, sqlx::Error> {
        let row = query(LOCK_PAYMENT_STATUS_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        try_get_parsed(&row, "status")
    }

    /// Apply a status change. Completing a payment stamps its payment date
    /// once; a missing transaction id leaves the stored one untouched.
    pub(crate) async fn update_payment_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        update: PaymentUpdate,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(UPDATE_PAYMENT_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(update.status.as_str())
            .bind(update.transaction_id)
            .bind(update.status == PaymentStatus::Completed)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PaymentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PaymentUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            method: try_get_parsed(row, "method")?,
            status: try_get_parsed(row, "status")?,
            amount: try_get_amount(row, "amount")?,
            currency: row.try_get("currency")?,
            transaction_id: row.try_get("transaction_id")?,
            payment_date: row
                .try_get::<Option<SqlxTimestamp>, _>("payment_date")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
