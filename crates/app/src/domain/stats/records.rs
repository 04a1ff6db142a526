//! Stats Records

use jiff::{Timestamp, civil::Date};

use crate::domain::{
    categories::records::CategoryUuid,
    orders::records::{OrderStatus, OrderUuid},
    products::records::ProductUuid,
    users::records::UserUuid,
};

/// How many customers a ranking returns when the caller does not say.
pub const DEFAULT_TOP_CUSTOMERS: usize = 10;

/// Everything the admin dashboard shows on its landing page.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub product_count: u64,
    pub order_count: u64,
    pub user_count: u64,
    /// Σ total price over revenue-bearing orders.
    pub revenue: u64,
    pub recent_orders: Vec<RecentOrder>,
    pub top_products: Vec<TopProduct>,
    pub category_sales: Vec<CategorySales>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentOrder {
    pub uuid: OrderUuid,
    pub customer_name: String,
    pub customer_email: String,
    pub total_price: u64,
    pub status: OrderStatus,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub sold_count: u32,
}

/// Σ price × sold count across a category's products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySales {
    pub uuid: CategoryUuid,
    pub name: String,
    pub total_sales: u64,
}

/// Inclusive range of UTC calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A customer's spend over their revenue-bearing orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSpend {
    pub user_uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub total_spent: u64,
    pub order_count: u64,
}
