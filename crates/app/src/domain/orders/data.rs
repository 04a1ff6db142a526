//! Order Data

use std::collections::BTreeMap;

use crate::domain::{
    orders::{
        errors::OrderValidationError,
        records::{OrderRecord, OrderStatus, PaymentMethod, PaymentStatus},
    },
    products::records::ProductUuid,
    users::records::UserUuid,
};

/// Page size used when none is requested.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Largest page size a listing will return.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Largest price or total a `BIGINT` money column can hold.
pub const MAX_AMOUNT: u64 = i64::MAX.unsigned_abs();

/// Where and to whom an order is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingDetails {
    pub address: String,
    pub phone: String,
    pub name: String,
}

/// An order as submitted by a client, before validation.
///
/// Every field a client may omit is optional here so each omission can be
/// reported as its own validation error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderRequest {
    pub user_uuid: Option<UserUuid>,
    pub items: Vec<OrderLineRequest>,
    pub shipping_address: Option<String>,
    pub shipping_phone: Option<String>,
    pub shipping_name: Option<String>,
    pub note: Option<String>,
    pub payment_method: Option<String>,
}

/// One unvalidated order line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderLineRequest {
    pub product_uuid: Option<ProductUuid>,
    pub quantity: Option<i64>,
    pub price: Option<u64>,
}

/// New Order Item Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    /// Unit price captured at order time.
    pub price: u64,
}

/// New Order Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_uuid: UserUuid,
    pub items: Vec<NewOrderItem>,
    pub shipping: ShippingDetails,
    pub note: Option<String>,
    pub payment_method: PaymentMethod,
}

impl NewOrder {
    /// Σ(price × quantity) over every line.
    ///
    /// # Errors
    ///
    /// Returns [`OrderValidationError::PriceTooLarge`] for a unit price above
    /// [`MAX_AMOUNT`], and [`OrderValidationError::TotalOverflow`] if the sum
    /// does not fit in [`MAX_AMOUNT`].
    pub fn total_price(&self) -> Result<u64, OrderValidationError> {
        self.items
            .iter()
            .enumerate()
            .try_fold(0_u64, |total, (index, item)| {
                if item.price > MAX_AMOUNT {
                    return Err(OrderValidationError::PriceTooLarge { index });
                }

                item.price
                    .checked_mul(u64::from(item.quantity))
                    .and_then(|line| total.checked_add(line))
                    .filter(|total| *total <= MAX_AMOUNT)
                    .ok_or(OrderValidationError::TotalOverflow)
            })
    }

    /// Requested quantity per product, with repeated lines summed.
    #[must_use]
    pub fn quantities_by_product(&self) -> BTreeMap<ProductUuid, u64> {
        let mut quantities = BTreeMap::new();

        for item in &self.items {
            *quantities.entry(item.product_uuid).or_insert(0) += u64::from(item.quantity);
        }

        quantities
    }
}

/// Filter for the paginated admin listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdersFilter {
    pub status: Option<OrderStatus>,
    pub page: u32,
    pub limit: u32,
}

impl Default for OrdersFilter {
    fn default() -> Self {
        Self {
            status: None,
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl OrdersFilter {
    /// Clamp page to at least 1 and limit to `1..=MAX_PAGE_LIMIT`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            status: self.status,
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of orders.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdersPage {
    pub orders: Vec<OrderRecord>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl OrdersPage {
    #[must_use]
    pub fn new(orders: Vec<OrderRecord>, total: u64, filter: OrdersFilter) -> Self {
        Self {
            orders,
            total,
            page: filter.page,
            limit: filter.limit,
            total_pages: total.div_ceil(u64::from(filter.limit.max(1))),
        }
    }
}

/// A payment status change, from an admin or a gateway callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentUpdate {
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product: ProductUuid, quantity: u32, price: u64) -> NewOrderItem {
        NewOrderItem {
            product_uuid: product,
            quantity,
            price,
        }
    }

    fn order(items: Vec<NewOrderItem>) -> NewOrder {
        NewOrder {
            user_uuid: UserUuid::new(),
            items,
            shipping: ShippingDetails {
                address: "1 Trang Tien".to_string(),
                phone: "0900000000".to_string(),
                name: "Le Van C".to_string(),
            },
            note: None,
            payment_method: PaymentMethod::Cod,
        }
    }

    #[test]
    fn total_price_sums_price_times_quantity() {
        let order = order(vec![
            line(ProductUuid::new(), 2, 150_000),
            line(ProductUuid::new(), 3, 20_000),
        ]);

        assert_eq!(order.total_price(), Ok(360_000));
    }

    #[test]
    fn total_price_reports_overflow() {
        let order = order(vec![
            line(ProductUuid::new(), 2, MAX_AMOUNT / 2),
            line(ProductUuid::new(), 1, 2),
        ]);

        assert_eq!(order.total_price(), Err(OrderValidationError::TotalOverflow));
    }

    #[test]
    fn total_price_must_fit_a_bigint_column() {
        let too_large = order(vec![line(ProductUuid::new(), 2, MAX_AMOUNT / 2 + 1)]);
        let at_limit = order(vec![line(ProductUuid::new(), 1, MAX_AMOUNT)]);

        assert_eq!(
            too_large.total_price(),
            Err(OrderValidationError::TotalOverflow)
        );
        assert_eq!(at_limit.total_price(), Ok(MAX_AMOUNT));
    }

    #[test]
    fn unit_price_above_bigint_range_is_rejected() {
        let order = order(vec![
            line(ProductUuid::new(), 1, 10),
            line(ProductUuid::new(), 1, 10_000_000_000_000_000_000),
        ]);

        assert_eq!(
            order.total_price(),
            Err(OrderValidationError::PriceTooLarge { index: 1 })
        );
    }

    #[test]
    fn quantities_are_aggregated_per_product() {
        let keyboard = ProductUuid::new();
        let mouse = ProductUuid::new();

        let order = order(vec![
            line(keyboard, 2, 10),
            line(mouse, 1, 10),
            line(keyboard, 3, 12),
        ]);

        let quantities = order.quantities_by_product();

        assert_eq!(quantities.len(), 2);
        assert_eq!(quantities.get(&keyboard), Some(&5));
        assert_eq!(quantities.get(&mouse), Some(&1));
    }

    #[test]
    fn filter_is_clamped() {
        let filter = OrdersFilter {
            status: None,
            page: 0,
            limit: 1_000,
        }
        .normalized();

        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, MAX_PAGE_LIMIT);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let filter = OrdersFilter {
            status: Some(OrderStatus::Pending),
            page: 3,
            limit: 10,
        };

        assert_eq!(filter.offset(), 20);
    }

    #[test]
    fn total_pages_rounds_up() {
        let filter = OrdersFilter::default();

        assert_eq!(OrdersPage::new(Vec::new(), 0, filter).total_pages, 0);
        assert_eq!(OrdersPage::new(Vec::new(), 10, filter).total_pages, 1);
        assert_eq!(OrdersPage::new(Vec::new(), 11, filter).total_pages, 2);
    }
}
