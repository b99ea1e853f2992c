//! Unit of work with compensating rollback.
//!
//! The storage port has no multi-entity transactions, so the ledger gets
//! its atomicity the saga way: every forward operation reports the exact
//! operations that undo it, and a failure partway through a commit replays
//! those inverses in reverse order. Inverses are built from what actually
//! happened at the store, not from what was requested, so a clamped client
//! adjustment rolls back by the applied amount only.

use rust_decimal::Decimal;
use tracing::error;

use reparto_shared::types::{AccountId, ClientId, MovementId, OrderId, SaleId};

use crate::ledger::types::{BalanceDelta, Movement};
use crate::store::{Store, StoreError};

/// One forward step against the store.
#[derive(Debug, Clone)]
pub enum LedgerOp {
    /// Atomic balance-and-counter delta on an account.
    AccountDelta {
        /// The target account.
        account_id: AccountId,
        /// The coherent delta to add.
        delta: BalanceDelta,
    },
    /// Atomic adjustment of a client's counters, clamping at zero.
    ClientDelta {
        /// The target client.
        client_id: ClientId,
        /// Requested change to the outstanding balance.
        outstanding_delta: Decimal,
        /// Requested change to lifetime purchases.
        purchases_delta: Decimal,
    },
    /// Atomic stock adjustment on a purchase order.
    StockDelta {
        /// The target order.
        order_id: OrderId,
        /// Units to add (negative consumes stock).
        delta: i64,
    },
    /// Record an audit movement.
    RecordMovement(Movement),
    /// Remove a single movement.
    DeleteMovement(MovementId),
    /// Remove every movement referencing a sale.
    PurgeMovements(SaleId),
}

impl LedgerOp {
    /// Executes the operation, returning the operations that undo it.
    async fn execute(&self, store: &dyn Store) -> Result<Vec<LedgerOp>, StoreError> {
        match self {
            Self::AccountDelta { account_id, delta } => {
                store.apply_account_delta(*account_id, *delta).await?;
                Ok(vec![Self::AccountDelta {
                    account_id: *account_id,
                    delta: delta.negate(),
                }])
            }
            Self::ClientDelta {
                client_id,
                outstanding_delta,
                purchases_delta,
            } => {
                let applied = store
                    .adjust_client(*client_id, *outstanding_delta, *purchases_delta)
                    .await?;
                Ok(vec![Self::ClientDelta {
                    client_id: *client_id,
                    outstanding_delta: -applied.outstanding_applied,
                    purchases_delta: -applied.purchases_applied,
                }])
            }
            Self::StockDelta { order_id, delta } => {
                store.adjust_order_stock(*order_id, *delta).await?;
                Ok(vec![Self::StockDelta {
                    order_id: *order_id,
                    delta: -delta,
                }])
            }
            Self::RecordMovement(movement) => {
                store.record_movement(movement.clone()).await?;
                Ok(vec![Self::DeleteMovement(movement.id)])
            }
            Self::DeleteMovement(id) => {
                let removed = store.delete_movement(*id).await?;
                Ok(vec![Self::RecordMovement(removed)])
            }
            Self::PurgeMovements(sale_id) => {
                let removed = store.purge_movements(*sale_id).await?;
                Ok(removed.into_iter().map(Self::RecordMovement).collect())
            }
        }
    }
}

/// An ordered list of ledger operations committed as one logical unit.
///
/// Partial application is never an acceptable end state: after `commit`
/// returns, either every operation happened or none of them did.
#[derive(Debug, Default)]
pub struct UnitOfWork {
    ops: Vec<LedgerOp>,
}

impl UnitOfWork {
    /// Creates an empty unit of work.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operation.
    pub fn push(&mut self, op: LedgerOp) {
        self.ops.push(op);
    }

    /// Returns true if no operations were queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of queued operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Runs every operation in order against the store.
    ///
    /// On the first failure the already-completed operations are undone in
    /// reverse order and the original error is returned.
    ///
    /// # Errors
    ///
    /// Returns the `StoreError` of the failing operation.
    pub async fn commit(self, store: &dyn Store) -> Result<(), StoreError> {
        let mut undo_stack: Vec<Vec<LedgerOp>> = Vec::with_capacity(self.ops.len());

        for op in &self.ops {
            match op.execute(store).await {
                Ok(inverse) => undo_stack.push(inverse),
                Err(err) => {
                    Self::unwind(store, undo_stack).await;
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    async fn unwind(store: &dyn Store, undo_stack: Vec<Vec<LedgerOp>>) {
        for inverses in undo_stack.into_iter().rev() {
            for inverse in inverses {
                if let Err(err) = inverse.execute(store).await {
                    // The store refused the inverse of something it already
                    // accepted; state needs manual reconciliation.
                    error!(error = %err, op = ?inverse, "rollback step failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::ledger::types::{Account, AccountRole, Client, MovementDirection, MovementKind};
    use crate::store::{Entity, MemoryStore};

    use super::*;

    async fn seeded_account(store: &MemoryStore, name: &str) -> AccountId {
        let account = Account::new(AccountId::new(), name, AccountRole::Profit);
        let id = account.id;
        store.insert_account(account).await.unwrap();
        id
    }

    #[tokio::test]
    async fn test_commit_applies_all_ops_in_order() {
        let store = MemoryStore::new();
        let account_id = seeded_account(&store, "Profit").await;
        let sale_id = SaleId::new();

        let mut uow = UnitOfWork::new();
        uow.push(LedgerOp::AccountDelta {
            account_id,
            delta: BalanceDelta::inflow(dec!(32000)),
        });
        uow.push(LedgerOp::RecordMovement(Movement::new(
            account_id,
            sale_id,
            MovementDirection::Inflow,
            dec!(32000),
            MovementKind::Distribution,
        )));
        assert_eq!(uow.len(), 2);

        uow.commit(&store).await.unwrap();

        let account = store.fetch_account(account_id).await.unwrap();
        assert_eq!(account.balance, dec!(32000));
        assert_eq!(store.movements_for_sale(sale_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_rolls_back_completed_ops() {
        let store = MemoryStore::new();
        let account_id = seeded_account(&store, "Cost recovery").await;
        let missing = AccountId::new();
        let sale_id = SaleId::new();

        let mut uow = UnitOfWork::new();
        uow.push(LedgerOp::AccountDelta {
            account_id,
            delta: BalanceDelta::inflow(dec!(63000)),
        });
        uow.push(LedgerOp::RecordMovement(Movement::new(
            account_id,
            sale_id,
            MovementDirection::Inflow,
            dec!(63000),
            MovementKind::Distribution,
        )));
        uow.push(LedgerOp::AccountDelta {
            account_id: missing,
            delta: BalanceDelta::inflow(dec!(5000)),
        });

        let err = uow.commit(&store).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity: Entity::Account,
                ..
            }
        ));

        // The completed inflow and its movement are gone again.
        let account = store.fetch_account(account_id).await.unwrap();
        assert_eq!(account.balance, dec!(0));
        assert_eq!(account.historical_inflows, dec!(0));
        assert!(account.is_coherent());
        assert!(store.movements_for_sale(sale_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clamped_client_delta_rolls_back_applied_amount_only() {
        let store = MemoryStore::new();
        let mut client = Client::new(ClientId::new(), "Dona Rosa");
        client.outstanding_balance = dec!(30000);
        let client_id = client.id;
        store.insert_client(client).await.unwrap();

        let mut uow = UnitOfWork::new();
        // Requests -50000 but only -30000 can apply before the clamp.
        uow.push(LedgerOp::ClientDelta {
            client_id,
            outstanding_delta: dec!(-50000),
            purchases_delta: Decimal::ZERO,
        });
        uow.push(LedgerOp::AccountDelta {
            account_id: AccountId::new(),
            delta: BalanceDelta::inflow(dec!(1)),
        });

        uow.commit(&store).await.unwrap_err();

        // A naive inverse of the request would have restored 50000.
        let client = store.fetch_client(client_id).await.unwrap();
        assert_eq!(client.outstanding_balance, dec!(30000));
    }

    #[tokio::test]
    async fn test_purge_rollback_restores_every_movement() {
        let store = MemoryStore::new();
        let account_id = seeded_account(&store, "Freight").await;
        let sale_id = SaleId::new();

        for amount in [dec!(5000), dec!(2500)] {
            store
                .record_movement(Movement::new(
                    account_id,
                    sale_id,
                    MovementDirection::Inflow,
                    amount,
                    MovementKind::Distribution,
                ))
                .await
                .unwrap();
        }

        let mut uow = UnitOfWork::new();
        uow.push(LedgerOp::PurgeMovements(sale_id));
        uow.push(LedgerOp::AccountDelta {
            account_id: AccountId::new(),
            delta: BalanceDelta::inflow(dec!(1)),
        });

        uow.commit(&store).await.unwrap_err();

        let restored = store.movements_for_sale(sale_id).await.unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].amount, dec!(5000));
        assert_eq!(restored[1].amount, dec!(2500));
    }

    #[tokio::test]
    async fn test_stock_overdraw_fails_and_leaves_stock_alone() {
        let store = MemoryStore::new();
        let order = crate::order::types::PurchaseOrder {
            id: OrderId::new(),
            quantity: 5,
            stock_remaining: 5,
            unit_cost: dec!(6300),
            total_cost: dec!(31500),
            debt: dec!(31500),
            status: crate::order::types::OrderStatus::Pending,
            notes: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let order_id = order.id;
        store.insert_order(order).await.unwrap();
        let account_id = seeded_account(&store, "Cost recovery").await;

        let mut uow = UnitOfWork::new();
        uow.push(LedgerOp::AccountDelta {
            account_id,
            delta: BalanceDelta::inflow(dec!(63000)),
        });
        uow.push(LedgerOp::StockDelta {
            order_id,
            delta: -10,
        });

        let err = uow.commit(&store).await.unwrap_err();
        assert!(matches!(err, StoreError::StockDepleted { .. }));

        let order = store.fetch_order(order_id).await.unwrap();
        assert_eq!(order.stock_remaining, 5);
        let account = store.fetch_account(account_id).await.unwrap();
        assert_eq!(account.balance, dec!(0));
    }

    #[tokio::test]
    async fn test_empty_unit_commits_trivially() {
        let store = MemoryStore::new();
        let uow = UnitOfWork::new();
        assert!(uow.is_empty());
        uow.commit(&store).await.unwrap();
    }
}
