//! The storage port.
//!
//! Every mutation of financial state goes through this trait; the engine
//! never touches ambient global storage. Adapters must make each method
//! atomic on its own:
//!
//! - `apply_account_delta` is an atomic add relative to the **stored**
//!   value, so concurrent credits to one account cannot lose updates
//! - the guarded sale and order writes compare a stored field against the
//!   value the caller computed from before mutating, failing with
//!   [`StoreError::Conflict`] when another writer got there first

use async_trait::async_trait;
use rust_decimal::Decimal;

use reparto_shared::types::{AccountId, ClientId, MovementId, OrderId, SaleId};

use crate::ledger::types::{Account, BalanceDelta, Client, Movement};
use crate::order::types::{OrderStatus, PurchaseOrder};
use crate::sale::types::{PaymentStatus, Sale};

use super::error::StoreError;

/// Client counter deltas actually applied by an adjustment.
///
/// Both counters clamp at zero, so the applied deltas can be smaller in
/// magnitude than the requested ones. Compensation logic needs the applied
/// values to undo exactly what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientAdjustment {
    /// Delta applied to the outstanding balance after clamping.
    pub outstanding_applied: Decimal,
    /// Delta applied to lifetime purchases after clamping.
    pub purchases_applied: Decimal,
}

/// Storage port the engine mutates financial state through.
#[async_trait]
pub trait Store: Send + Sync {
    // ========== Sales ==========

    /// Inserts a new sale. Fails with `Conflict` if the ID already exists.
    async fn insert_sale(&self, sale: Sale) -> Result<(), StoreError>;

    /// Fetches a sale by ID.
    async fn fetch_sale(&self, id: SaleId) -> Result<Sale, StoreError>;

    /// Guarded payment update: fails with `Conflict` if the stored paid
    /// amount no longer equals `expected_paid`.
    async fn update_sale_payment(
        &self,
        id: SaleId,
        expected_paid: Decimal,
        paid: Decimal,
        remaining: Decimal,
        status: PaymentStatus,
    ) -> Result<(), StoreError>;

    /// Guarded delete: fails with `Conflict` if the stored paid amount no
    /// longer equals `expected_paid`. Returns the removed sale.
    async fn delete_sale(&self, id: SaleId, expected_paid: Decimal) -> Result<Sale, StoreError>;

    // ========== Accounts ==========

    /// Inserts a new account. Fails with `Conflict` if the ID already exists.
    async fn insert_account(&self, account: Account) -> Result<(), StoreError>;

    /// Fetches an account by ID.
    async fn fetch_account(&self, id: AccountId) -> Result<Account, StoreError>;

    /// Atomic add of a delta to the stored balance and counters.
    async fn apply_account_delta(
        &self,
        id: AccountId,
        delta: BalanceDelta,
    ) -> Result<(), StoreError>;

    // ========== Clients ==========

    /// Inserts a new client. Fails with `Conflict` if the ID already exists.
    async fn insert_client(&self, client: Client) -> Result<(), StoreError>;

    /// Fetches a client by ID.
    async fn fetch_client(&self, id: ClientId) -> Result<Client, StoreError>;

    /// Atomic adjustment of the client counters, both clamping at zero.
    /// Returns the deltas actually applied after clamping.
    async fn adjust_client(
        &self,
        id: ClientId,
        outstanding_delta: Decimal,
        purchases_delta: Decimal,
    ) -> Result<ClientAdjustment, StoreError>;

    // ========== Purchase orders ==========

    /// Inserts a new order. Fails with `Conflict` if the ID already exists.
    async fn insert_order(&self, order: PurchaseOrder) -> Result<(), StoreError>;

    /// Fetches an order by ID.
    async fn fetch_order(&self, id: OrderId) -> Result<PurchaseOrder, StoreError>;

    /// Atomic stock adjustment. A negative delta that would overdraw the
    /// remaining stock fails with `StockDepleted` and changes nothing.
    async fn adjust_order_stock(&self, id: OrderId, delta: i64) -> Result<(), StoreError>;

    /// Guarded debt update: fails with `Conflict` if the stored debt no
    /// longer equals `expected_debt`.
    async fn update_order_debt(
        &self,
        id: OrderId,
        expected_debt: Decimal,
        debt: Decimal,
        status: OrderStatus,
    ) -> Result<(), StoreError>;

    // ========== Movements ==========

    /// Records an account movement.
    async fn record_movement(&self, movement: Movement) -> Result<(), StoreError>;

    /// Removes a single movement, returning it.
    async fn delete_movement(&self, id: MovementId) -> Result<Movement, StoreError>;

    /// All movements referencing a sale, in recording order.
    async fn movements_for_sale(&self, sale_id: SaleId) -> Result<Vec<Movement>, StoreError>;

    /// Removes every movement referencing a sale, returning them in
    /// recording order.
    async fn purge_movements(&self, sale_id: SaleId) -> Result<Vec<Movement>, StoreError>;
}
