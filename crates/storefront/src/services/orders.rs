//! Order placement and the admin status workflow.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use thiserror::Error;

use crown_shop_core::api::CreateOrderRequest;
use crown_shop_core::checkout::ShippingDetails;
use crown_shop_core::{
    Order, OrderId, OrderLineSnapshot, OrderStatus, Price, ProductId, StatusParseError,
    TextError, TransitionError,
};

use crate::db::{NewOrder, RepositoryError, Store};

/// Most units of one product a single order may contain.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Largest order total the `orders.total_amount NUMERIC(10,2)` column holds,
/// in fen.
const MAX_TOTAL_CENTS: i64 = 9_999_999_999;

/// Errors from placing or updating an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A shipping field is missing or too long.
    #[error(transparent)]
    Shipping(#[from] TextError),

    /// The request body is structurally wrong.
    #[error("{0}")]
    Invalid(String),

    /// An ordered product is not in the catalog.
    #[error("unknown product {0}")]
    UnknownProduct(ProductId),

    /// The client's total disagrees with catalog prices.
    #[error("total_amount {submitted} does not match catalog total {computed}")]
    TotalMismatch { submitted: Price, computed: Price },

    /// The requested status is not one of the four known values.
    #[error(transparent)]
    UnknownStatus(#[from] StatusParseError),

    /// No order with this ID.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// The requested status is not the single forward step.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Another writer changed the status between read and update.
    #[error("order {0} was modified concurrently, reload and retry")]
    Concurrent(OrderId),

    /// Storage failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Order service.
pub struct OrderService<'a> {
    store: &'a dyn Store,
}

impl<'a> OrderService<'a> {
    /// Create a new order service over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Validate a checkout submission and store it as a `pending` order.
    ///
    /// Line prices come from the catalog, never from the client. The stored
    /// total is the recomputed one.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Shipping` or `OrderError::Invalid` for malformed
    /// input, `OrderError::UnknownProduct` for IDs not in the catalog and
    /// `OrderError::TotalMismatch` when the submitted total is wrong.
    pub async fn place_order(&self, request: &CreateOrderRequest) -> Result<Order, OrderError> {
        let details = ShippingDetails::parse(&request.name, &request.phone, &request.address)?;
        let ids = validate_lines(request)?;

        let catalog: HashMap<ProductId, _> = self
            .store
            .get_products(&ids)
            .await?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        let items = request
            .items
            .iter()
            .map(|line| -> Result<OrderLineSnapshot, OrderError> {
                let product = catalog
                    .get(&line.id)
                    .ok_or(OrderError::UnknownProduct(line.id))?;
                Ok(OrderLineSnapshot {
                    id: product.id,
                    title: product.title.clone(),
                    unit_price: product.price,
                    quantity: line.quantity,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let computed: Price = items.iter().map(OrderLineSnapshot::line_total).sum();
        if computed.rounded().amount() > Decimal::new(MAX_TOTAL_CENTS, Price::SCALE) {
            return Err(OrderError::Invalid(format!(
                "order total {computed} exceeds the maximum order amount"
            )));
        }
        if !computed.same_amount(request.total_amount) {
            tracing::warn!(
                submitted = %request.total_amount,
                %computed,
                "Order rejected: total mismatch"
            );
            return Err(OrderError::TotalMismatch {
                submitted: request.total_amount,
                computed: computed.rounded(),
            });
        }

        let order = self
            .store
            .create_order(NewOrder {
                customer_name: details.name.into_inner(),
                phone: details.phone.into_inner(),
                address: details.address.into_inner(),
                total_amount: computed.rounded(),
                items,
            })
            .await?;

        tracing::info!(
            order_id = %order.id,
            total = %order.total_amount,
            lines = order.items.len(),
            "Order created"
        );
        Ok(order)
    }

    /// Move an order to `requested`, which must be its single next status.
    ///
    /// # Errors
    ///
    /// - `OrderError::UnknownStatus` if `requested` is not a known status
    /// - `OrderError::NotFound` if the order does not exist
    /// - `OrderError::Transition` if `requested` is not the next status
    /// - `OrderError::Concurrent` if the order changed under us
    pub async fn update_status(&self, id: OrderId, requested: &str) -> Result<Order, OrderError> {
        let target: OrderStatus = requested.parse()?;
        let current = self
            .store
            .get_order(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        current.status.transition_to(target)?;

        let updated = self
            .store
            .compare_and_set_status(id, current.status, target)
            .await?
            .ok_or(OrderError::Concurrent(id))?;

        tracing::info!(
            order_id = %id,
            from = %current.status,
            to = %updated.status,
            "Order status updated"
        );
        Ok(updated)
    }
}

/// Check line structure and return the distinct product IDs.
fn validate_lines(request: &CreateOrderRequest) -> Result<Vec<ProductId>, OrderError> {
    if request.items.is_empty() {
        return Err(OrderError::Invalid("items must not be empty".to_string()));
    }

    let mut seen = BTreeSet::new();
    for line in &request.items {
        if line.quantity == 0 {
            return Err(OrderError::Invalid(format!(
                "quantity for product {} must be at least 1",
                line.id
            )));
        }
        if line.quantity > MAX_LINE_QUANTITY {
            return Err(OrderError::Invalid(format!(
                "quantity for product {} must be at most {MAX_LINE_QUANTITY}",
                line.id
            )));
        }
        if !seen.insert(line.id) {
            return Err(OrderError::Invalid(format!(
                "product {} appears more than once",
                line.id
            )));
        }
    }

    Ok(seen.into_iter().collect())
}
