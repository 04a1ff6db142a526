//! Order Handlers

pub(crate) mod countdown;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod payment;
pub(crate) mod shipper;
pub(crate) mod status;
pub(crate) mod user;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::records::{
    OrderCustomer, OrderItemRecord, OrderRecord, PaymentRecord,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    /// Who placed the order
    pub customer: CustomerResponse,

    /// The delivery user handling the order
    pub shipper_uuid: Option<Uuid>,

    /// Sum of item price times quantity, in VND
    pub total_price: u64,

    pub status: String,

    pub shipping_address: String,
    pub shipping_phone: String,
    pub shipping_name: String,
    pub note: Option<String>,

    pub items: Vec<OrderItemResponse>,

    pub payment: PaymentResponse,

    /// The date and time the order was placed
    pub created_at: String,

    /// The date and time the order was last updated
    pub updated_at: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomerResponse {
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub product_name: String,
    pub quantity: u32,

    /// Unit price captured when the order was placed
    pub price: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentResponse {
    pub uuid: Uuid,
    pub order_uuid: Uuid,

    /// `COD`, `VNPAY` or `BANK_TRANSFER`
    pub method: String,

    /// `PENDING`, `COMPLETED` or `FAILED`
    pub status: String,

    pub amount: u64,
    pub currency: String,
    pub transaction_id: Option<String>,

    /// When the payment completed
    pub payment_date: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderCustomer> for CustomerResponse {
    fn from(customer: OrderCustomer) -> Self {
        CustomerResponse {
            uuid: customer.uuid.into(),
            name: customer.name,
            email: customer.email,
        }
    }
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        OrderItemResponse {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            product_name: item.product_name,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

impl From<PaymentRecord> for PaymentResponse {
    fn from(payment: PaymentRecord) -> Self {
        PaymentResponse {
            uuid: payment.uuid.into(),
            order_uuid: payment.order_uuid.into(),
            method: payment.method.to_string(),
            status: payment.status.to_string(),
            amount: payment.amount,
            currency: payment.currency,
            transaction_id: payment.transaction_id,
            payment_date: payment.payment_date.as_ref().map(ToString::to_string),
            created_at: payment.created_at.to_string(),
            updated_at: payment.updated_at.to_string(),
        }
    }
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            uuid: order.uuid.into(),
            customer: order.customer.into(),
            shipper_uuid: order.shipper_uuid.map(Into::into),
            total_price: order.total_price,
            status: order.status.to_string(),
            shipping_address: order.shipping.address,
            shipping_phone: order.shipping.phone,
            shipping_name: order.shipping.name,
            note: order.note,
            items: order.items.into_iter().map(Into::into).collect(),
            payment: order.payment.into(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}
