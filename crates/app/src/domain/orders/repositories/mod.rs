//! Order Repositories

mod items;
mod orders;
mod payments;

use rustc_hash::FxHashMap;

pub(crate) use items::{OrderItemRow, PgOrderItemsRepository};
pub(crate) use orders::{OrderHeader, PgOrdersRepository};
pub(crate) use payments::PgPaymentsRepository;

use crate::domain::orders::records::{OrderRecord, OrderUuid, PaymentRecord};

/// Join order headers with their items and payments, keeping header order.
pub(crate) fn assemble_orders(
    headers: Vec<OrderHeader>,
    items: Vec<OrderItemRow>,
    payments: Vec<PaymentRecord>,
) -> Result<Vec<OrderRecord>, sqlx::Error> {
    let mut items_by_order: FxHashMap<OrderUuid, Vec<_>> = FxHashMap::default();

    for row in items {
        items_by_order.entry(row.order_uuid).or_default().push(row.item);
    }

    let mut payments_by_order: FxHashMap<OrderUuid, PaymentRecord> = payments
        .into_iter()
        .map(|payment| (payment.order_uuid, payment))
        .collect();

    headers
        .into_iter()
        .map(|header| -> Result<OrderRecord, sqlx::Error> {
            let payment = payments_by_order.remove(&header.uuid).ok_or_else(|| {
                sqlx::Error::Protocol(format!("order {} has no payment", header.uuid))
            })?;

            let items = items_by_order.remove(&header.uuid).unwrap_or_default();

            Ok(header.into_record(items, payment))
        })
        .collect()
}
