//! Purchase-order service.
//!
//! Creates orders with computed costing and settles distributor debt. No
//! account movements attach to order operations: the engine distributes
//! sales only, and operational accounts are independent pools.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use reparto_shared::types::OrderId;
use reparto_shared::types::money::{clamp_non_negative, round_amount};

use crate::order::error::OrderError;
use crate::order::types::{CreateOrderInput, OrderStatus, PurchaseOrder};
use crate::store::Store;

/// Creates purchase orders and settles distributor debt.
pub struct OrderService {
    store: Arc<dyn Store>,
}

impl OrderService {
    /// Creates a service over a storage port.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates a purchase order with computed costing and its full stock.
    ///
    /// # Errors
    ///
    /// Returns an error if the terms fail validation or storage fails.
    pub async fn create(&self, input: CreateOrderInput) -> Result<PurchaseOrder, OrderError> {
        let costing = input.terms().cost()?;

        let now = chrono::Utc::now();
        let order = PurchaseOrder {
            id: OrderId::new(),
            quantity: input.quantity,
            stock_remaining: input.quantity,
            unit_cost: costing.unit_cost,
            total_cost: costing.total,
            debt: costing.debt,
            status: costing.status,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };

        self.store.insert_order(order.clone()).await?;

        info!(
            order_id = %order.id,
            total_cost = %order.total_cost,
            debt = %order.debt,
            "Purchase order created"
        );

        Ok(order)
    }

    /// Registers a payment to the distributor against the order's debt.
    ///
    /// The debt clamps at zero: paying more than is owed settles the order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is not positive
    /// - The order does not exist
    /// - Another writer changed the debt since it was read (`Conflict`)
    pub async fn register_distributor_payment(
        &self,
        order_id: OrderId,
        amount: Decimal,
    ) -> Result<PurchaseOrder, OrderError> {
        if amount <= Decimal::ZERO {
            return Err(OrderError::NonPositivePayment(amount));
        }

        let order = self.store.fetch_order(order_id).await?;
        let debt = clamp_non_negative(round_amount(order.debt - amount));
        let status = OrderStatus::from_amounts(order.total_cost, debt);

        self.store
            .update_order_debt(order_id, order.debt, debt, status)
            .await?;

        info!(
            order_id = %order_id,
            debt = %debt,
            status = ?status,
            "Distributor payment registered"
        );

        Ok(self.store.fetch_order(order_id).await?)
    }

    /// Fetches an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist.
    pub async fn fetch(&self, order_id: OrderId) -> Result<PurchaseOrder, OrderError> {
        Ok(self.store.fetch_order(order_id).await?)
    }
}
