//! Order request validation.

use crate::domain::orders::{
    data::{NewOrder, NewOrderItem, OrderLineRequest, OrderRequest, ShippingDetails},
    errors::OrderValidationError,
    records::PaymentMethod,
};

impl TryFrom<OrderRequest> for NewOrder {
    type Error = OrderValidationError;

    fn try_from(request: OrderRequest) -> Result<Self, Self::Error> {
        let user_uuid = request.user_uuid.ok_or(OrderValidationError::MissingUser)?;

        if request.items.is_empty() {
            return Err(OrderValidationError::EmptyItems);
        }

        let items = request
            .items
            .into_iter()
            .enumerate()
            .map(|(index, line)| validate_line(index, line))
            .collect::<Result<Vec<_>, _>>()?;

        let shipping = ShippingDetails {
            address: required(
                request.shipping_address,
                OrderValidationError::MissingShippingAddress,
            )?,
            phone: required(
                request.shipping_phone,
                OrderValidationError::MissingShippingPhone,
            )?,
            name: required(
                request.shipping_name,
                OrderValidationError::MissingShippingName,
            )?,
        };

        let payment_method = request
            .payment_method
            .ok_or(OrderValidationError::MissingPaymentMethod)?
            .parse::<PaymentMethod>()
            .map_err(|e| OrderValidationError::UnknownPaymentMethod(e.0))?;

        let note = request
            .note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty());

        let order = Self {
            user_uuid,
            items,
            shipping,
            note,
            payment_method,
        };

        order.total_price()?;

        Ok(order)
    }
}

impl NewOrder {
    /// Re-check the invariants of an already constructed order.
    ///
    /// # Errors
    ///
    /// Returns the first [`OrderValidationError`] found.
    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.items.is_empty() {
            return Err(OrderValidationError::EmptyItems);
        }

        if let Some(index) = self.items.iter().position(|item| item.quantity == 0) {
            return Err(OrderValidationError::InvalidQuantity { index });
        }

        if self.shipping.address.trim().is_empty() {
            return Err(OrderValidationError::MissingShippingAddress);
        }

        if self.shipping.phone.trim().is_empty() {
            return Err(OrderValidationError::MissingShippingPhone);
        }

        if self.shipping.name.trim().is_empty() {
            return Err(OrderValidationError::MissingShippingName);
        }

        self.total_price()?;

        Ok(())
    }
}

fn validate_line(index: usize, line: OrderLineRequest) -> Result<NewOrderItem, OrderValidationError> {
    let product_uuid = line
        .product_uuid
        .ok_or(OrderValidationError::MissingProduct { index })?;

    let quantity = line
        .quantity
        .and_then(|quantity| u32::try_from(quantity).ok())
        .filter(|quantity| *quantity > 0)
        .ok_or(OrderValidationError::InvalidQuantity { index })?;

    let price = line.price.ok_or(OrderValidationError::MissingPrice { index })?;

    Ok(NewOrderItem {
        product_uuid,
        quantity,
        price,
    })
}

fn required(value: Option<String>, missing: OrderValidationError) -> Result<String, OrderValidationError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(missing),
    }
}
