//! Product Records

use jiff::Timestamp;

use crate::{domain::categories::records::CategoryUuid, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub stock: u32,
    pub sold_count: u32,
    pub category_uuid: Option<CategoryUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A product row held under `FOR UPDATE` while an order is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LockedStock {
    pub uuid: ProductUuid,
    pub stock: u32,
}
