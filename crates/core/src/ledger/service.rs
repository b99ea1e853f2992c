//! Ledger application service.
//!
//! Applies computed distributions to the capital accounts, registers
//! proportional payment inflows, and reverses everything when a sale is
//! deleted. Every operation is committed through a [`UnitOfWork`], so a
//! failure partway through leaves no partial ledger state behind.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use reparto_shared::config::StockPolicy;
use reparto_shared::types::{AccountId, OrderId};

use crate::distribution::PaidPortion;
use crate::sale::types::Sale;
use crate::store::Store;

use super::error::LedgerError;
use super::types::{
    BalanceDelta, DistributionAccounts, Movement, MovementDirection, MovementKind,
};
use super::unit_of_work::{LedgerOp, UnitOfWork};

/// Applies sale distributions to the ledger as atomic units of work.
///
/// The service is stateless: it holds the fixed account map and the stock
/// policy, and every method runs against a caller-supplied store.
#[derive(Debug, Clone, Copy)]
pub struct LedgerService {
    accounts: DistributionAccounts,
    stock_policy: StockPolicy,
}

impl LedgerService {
    /// Creates a service over the given account map and stock policy.
    #[must_use]
    pub const fn new(accounts: DistributionAccounts, stock_policy: StockPolicy) -> Self {
        Self {
            accounts,
            stock_policy,
        }
    }

    /// The accounts sale distributions flow into.
    #[must_use]
    pub const fn accounts(&self) -> &DistributionAccounts {
        &self.accounts
    }

    /// Applies a newly created sale to the ledger as one unit of work:
    ///
    /// 1. the client's outstanding balance rises by the unpaid remainder
    ///    and lifetime purchases by the sale total
    /// 2. linked order stock falls by the sale quantity, subject to the
    ///    stock policy
    /// 3. if anything was paid, the paid portion of the distribution flows
    ///    into the three accounts, one audit movement each
    ///
    /// A sale created with zero payment moves no account.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if any referenced entity is missing, the
    /// linked order cannot cover the quantity under the reject policy, or
    /// the store fails. Nothing stays applied on error.
    pub async fn apply(&self, store: &dyn Store, sale: &Sale) -> Result<(), LedgerError> {
        let mut uow = UnitOfWork::new();

        uow.push(LedgerOp::ClientDelta {
            client_id: sale.client_id,
            outstanding_delta: sale.remaining,
            purchases_delta: sale.distribution.total,
        });

        if let Some(order_id) = sale.order_id {
            self.push_stock_op(store, &mut uow, order_id, sale.quantity)
                .await?;
        }

        if sale.paid > Decimal::ZERO {
            let portion = sale.distribution.portion(sale.paid);
            debug!(
                sale_id = %sale.id,
                paid = %sale.paid,
                proportion = %portion.proportion,
                "applying paid portion of distribution"
            );
            Self::push_distribution_ops(
                &mut uow,
                self.portion_entries(&portion),
                sale,
                MovementKind::Distribution,
            );
        }

        uow.commit(store).await?;
        Ok(())
    }

    /// Registers an additional payment of `delta` against an existing
    /// sale: the delta's proportional share of each distribution amount
    /// flows into its account, and the client's outstanding balance falls
    /// by the delta, clamping at zero.
    ///
    /// Callers guarantee `delta > 0`; the sale record's paid, remaining,
    /// and status fields are the orchestrator's to update.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if a referenced entity is missing or the
    /// store fails. Nothing stays applied on error.
    pub async fn register_payment(
        &self,
        store: &dyn Store,
        sale: &Sale,
        delta: Decimal,
    ) -> Result<(), LedgerError> {
        let portion = sale.distribution.portion(delta);
        debug!(
            sale_id = %sale.id,
            delta = %delta,
            proportion = %portion.proportion,
            "registering proportional payment"
        );

        let mut uow = UnitOfWork::new();
        uow.push(LedgerOp::ClientDelta {
            client_id: sale.client_id,
            outstanding_delta: -delta,
            purchases_delta: Decimal::ZERO,
        });
        Self::push_distribution_ops(
            &mut uow,
            self.portion_entries(&portion),
            sale,
            MovementKind::Payment,
        );

        uow.commit(store).await?;
        Ok(())
    }

    /// Reverses a sale's ledger effects on deletion.
    ///
    /// The paid portion leaves the three accounts as recorded outflows:
    /// balances and net history return exactly to their pre-sale values
    /// while the inflow history stays monotonic. The client gives back the
    /// outstanding remainder and the lifetime-purchase credit (both
    /// clamping at zero), and every movement the sale produced is purged.
    /// Stock is not restored; deleting the record does not un-ship goods.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if a referenced entity is missing or the
    /// store fails. Nothing stays applied on error.
    pub async fn reverse(&self, store: &dyn Store, sale: &Sale) -> Result<(), LedgerError> {
        let mut uow = UnitOfWork::new();

        if sale.paid > Decimal::ZERO {
            let portion = sale.distribution.portion(sale.paid);
            debug!(
                sale_id = %sale.id,
                paid = %sale.paid,
                proportion = %portion.proportion,
                "reversing paid portion of distribution"
            );
            for (account_id, amount) in self.portion_entries(&portion) {
                if amount == Decimal::ZERO {
                    continue;
                }
                uow.push(LedgerOp::AccountDelta {
                    account_id,
                    delta: BalanceDelta::signed(-amount),
                });
            }
        }

        uow.push(LedgerOp::ClientDelta {
            client_id: sale.client_id,
            outstanding_delta: -sale.remaining,
            purchases_delta: -sale.distribution.total,
        });
        uow.push(LedgerOp::PurgeMovements(sale.id));

        uow.commit(store).await?;
        Ok(())
    }

    /// The three (account, amount) pairs of a paid portion.
    fn portion_entries(&self, portion: &PaidPortion) -> [(AccountId, Decimal); 3] {
        [
            (self.accounts.cost, portion.cost),
            (self.accounts.freight, portion.freight),
            (self.accounts.profit, portion.profit),
        ]
    }

    /// Queues an account delta plus its audit movement for each non-zero
    /// entry. Negative amounts (the profit share of a loss sale) become
    /// outflows, keeping both historical counters non-decreasing.
    fn push_distribution_ops(
        uow: &mut UnitOfWork,
        entries: [(AccountId, Decimal); 3],
        sale: &Sale,
        kind: MovementKind,
    ) {
        for (account_id, amount) in entries {
            if amount == Decimal::ZERO {
                continue;
            }
            let direction = if amount > Decimal::ZERO {
                MovementDirection::Inflow
            } else {
                MovementDirection::Outflow
            };
            uow.push(LedgerOp::AccountDelta {
                account_id,
                delta: BalanceDelta::signed(amount),
            });
            uow.push(LedgerOp::RecordMovement(Movement::new(
                account_id,
                sale.id,
                direction,
                amount.abs(),
                kind,
            )));
        }
    }

    async fn push_stock_op(
        &self,
        store: &dyn Store,
        uow: &mut UnitOfWork,
        order_id: OrderId,
        quantity: i64,
    ) -> Result<(), LedgerError> {
        match self.stock_policy {
            StockPolicy::Reject => {
                // The store's guarded decrement turns an overdraw into a
                // StockDepleted failure, aborting the whole unit.
                uow.push(LedgerOp::StockDelta {
                    order_id,
                    delta: -quantity,
                });
            }
            StockPolicy::Skip => {
                let order = store.fetch_order(order_id).await?;
                if order.stock_remaining >= quantity {
                    uow.push(LedgerOp::StockDelta {
                        order_id,
                        delta: -quantity,
                    });
                } else {
                    warn!(
                        order_id = %order_id,
                        requested = quantity,
                        remaining = order.stock_remaining,
                        "order cannot cover the sale, stock decrement skipped"
                    );
                }
            }
        }
        Ok(())
    }
}
