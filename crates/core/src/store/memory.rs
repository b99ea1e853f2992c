//! In-memory storage adapter.
//!
//! Backs the engine in tests and embedded use. A single `RwLock` over the
//! whole state makes every port method atomic on its own, which is exactly
//! the contract the port asks adapters for.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use reparto_shared::types::money::clamp_non_negative;
use reparto_shared::types::{AccountId, ClientId, MovementId, OrderId, SaleId};

use crate::ledger::types::{Account, BalanceDelta, Client, Movement};
use crate::order::types::{OrderStatus, PurchaseOrder};
use crate::sale::types::{PaymentStatus, Sale};

use super::error::{Entity, StoreError};
use super::port::{ClientAdjustment, Store};

#[derive(Debug, Default)]
struct State {
    sales: HashMap<SaleId, Sale>,
    accounts: HashMap<AccountId, Account>,
    clients: HashMap<ClientId, Client>,
    orders: HashMap<OrderId, PurchaseOrder>,
    movements: Vec<Movement>,
}

/// In-memory [`Store`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_sale(&self, sale: Sale) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.sales.contains_key(&sale.id) {
            return Err(StoreError::conflict(Entity::Sale, sale.id));
        }
        state.sales.insert(sale.id, sale);
        Ok(())
    }

    async fn fetch_sale(&self, id: SaleId) -> Result<Sale, StoreError> {
        let state = self.state.read().await;
        state
            .sales
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::Sale, id))
    }

    async fn update_sale_payment(
        &self,
        id: SaleId,
        expected_paid: Decimal,
        paid: Decimal,
        remaining: Decimal,
        status: PaymentStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let sale = state
            .sales
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(Entity::Sale, id))?;
        if sale.paid != expected_paid {
            return Err(StoreError::conflict(Entity::Sale, id));
        }
        sale.paid = paid;
        sale.remaining = remaining;
        sale.status = status;
        sale.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_sale(&self, id: SaleId, expected_paid: Decimal) -> Result<Sale, StoreError> {
        let mut state = self.state.write().await;
        let sale = state
            .sales
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(Entity::Sale, id))?;
        if sale.paid != expected_paid {
            state.sales.insert(id, sale);
            return Err(StoreError::conflict(Entity::Sale, id));
        }
        Ok(sale)
    }

    async fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.accounts.contains_key(&account.id) {
            return Err(StoreError::conflict(Entity::Account, account.id));
        }
        state.accounts.insert(account.id, account);
        Ok(())
    }

    async fn fetch_account(&self, id: AccountId) -> Result<Account, StoreError> {
        let state = self.state.read().await;
        state
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::Account, id))
    }

    async fn apply_account_delta(
        &self,
        id: AccountId,
        delta: BalanceDelta,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(Entity::Account, id))?;
        account.apply(&delta);
        Ok(())
    }

    async fn insert_client(&self, client: Client) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.clients.contains_key(&client.id) {
            return Err(StoreError::conflict(Entity::Client, client.id));
        }
        state.clients.insert(client.id, client);
        Ok(())
    }

    async fn fetch_client(&self, id: ClientId) -> Result<Client, StoreError> {
        let state = self.state.read().await;
        state
            .clients
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::Client, id))
    }

    async fn adjust_client(
        &self,
        id: ClientId,
        outstanding_delta: Decimal,
        purchases_delta: Decimal,
    ) -> Result<ClientAdjustment, StoreError> {
        let mut state = self.state.write().await;
        let client = state
            .clients
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(Entity::Client, id))?;

        let new_outstanding = clamp_non_negative(client.outstanding_balance + outstanding_delta);
        let new_purchases = clamp_non_negative(client.lifetime_purchases + purchases_delta);
        let adjustment = ClientAdjustment {
            outstanding_applied: new_outstanding - client.outstanding_balance,
            purchases_applied: new_purchases - client.lifetime_purchases,
        };
        client.outstanding_balance = new_outstanding;
        client.lifetime_purchases = new_purchases;
        Ok(adjustment)
    }

    async fn insert_order(&self, order: PurchaseOrder) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.orders.contains_key(&order.id) {
            return Err(StoreError::conflict(Entity::Order, order.id));
        }
        state.orders.insert(order.id, order);
        Ok(())
    }

    async fn fetch_order(&self, id: OrderId) -> Result<PurchaseOrder, StoreError> {
        let state = self.state.read().await;
        state
            .orders
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::Order, id))
    }

    async fn adjust_order_stock(&self, id: OrderId, delta: i64) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(Entity::Order, id))?;

        let new_stock = order.stock_remaining + delta;
        if new_stock < 0 {
            return Err(StoreError::StockDepleted {
                order_id: id,
                requested: -delta,
                remaining: order.stock_remaining,
            });
        }
        order.stock_remaining = new_stock;
        order.updated_at = Utc::now();
        Ok(())
    }

    async fn update_order_debt(
        &self,
        id: OrderId,
        expected_debt: Decimal,
        debt: Decimal,
        status: OrderStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(Entity::Order, id))?;
        if order.debt != expected_debt {
            return Err(StoreError::conflict(Entity::Order, id));
        }
        order.debt = debt;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(())
    }

    async fn record_movement(&self, movement: Movement) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.movements.push(movement);
        Ok(())
    }

    async fn delete_movement(&self, id: MovementId) -> Result<Movement, StoreError> {
        let mut state = self.state.write().await;
        let position = state
            .movements
            .iter()
            .position(|movement| movement.id == id)
            .ok_or_else(|| StoreError::not_found(Entity::Movement, id))?;
        Ok(state.movements.remove(position))
    }

    async fn movements_for_sale(&self, sale_id: SaleId) -> Result<Vec<Movement>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .movements
            .iter()
            .filter(|movement| movement.sale_id == sale_id)
            .cloned()
            .collect())
    }

    async fn purge_movements(&self, sale_id: SaleId) -> Result<Vec<Movement>, StoreError> {
        let mut state = self.state.write().await;
        let (purged, kept): (Vec<Movement>, Vec<Movement>) = state
            .movements
            .drain(..)
            .partition(|movement| movement.sale_id == sale_id);
        state.movements = kept;
        Ok(purged)
    }
}
