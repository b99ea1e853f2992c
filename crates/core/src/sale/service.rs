//! Sale lifecycle orchestration.
//!
//! `SaleService` drives the three operations of the engine: create a sale,
//! register an additional payment, and delete a sale with full reversal.
//! Each operation computes through the distribution calculator, claims the
//! sale record with a guarded write, and hands the ledger effect to
//! [`LedgerService`] as one unit of work. A failure on either side leaves
//! no partial state behind.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info};

use reparto_shared::config::{EngineConfig, StockPolicy};
use reparto_shared::types::SaleId;
use reparto_shared::types::money::{clamp_non_negative, round_amount};

use crate::ledger::service::LedgerService;
use crate::ledger::types::DistributionAccounts;
use crate::sale::error::SaleError;
use crate::sale::types::{CreateSaleInput, CreateSaleOutput, PaymentOutput, PaymentStatus, Sale};
use crate::store::Store;

/// Orchestrates the create, payment and delete lifecycle of sales.
pub struct SaleService {
    store: Arc<dyn Store>,
    ledger: LedgerService,
}

impl SaleService {
    /// Creates a service over a storage port and the distribution accounts.
    #[must_use]
    pub fn new(
        store: Arc<dyn Store>,
        accounts: DistributionAccounts,
        stock_policy: StockPolicy,
    ) -> Self {
        Self {
            store,
            ledger: LedgerService::new(accounts, stock_policy),
        }
    }

    /// Creates a service from the engine configuration.
    #[must_use]
    pub fn from_config(store: Arc<dyn Store>, config: &EngineConfig) -> Self {
        Self::new(
            store,
            DistributionAccounts::from_config(&config.ledger),
            config.stock_policy,
        )
    }

    /// Creates a sale: computes its distribution, persists the record, and
    /// applies the ledger effect as one unit.
    ///
    /// The initial payment is rounded and clamped into `[0, total]`. Loss
    /// sales and rounding gaps are surfaced as flags on the output, never
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The terms fail validation or the initial payment is negative
    /// - The client or the linked purchase order does not exist
    /// - The linked order cannot cover the quantity under the reject policy
    /// - Storage fails mid-operation (nothing stays applied)
    pub async fn create(&self, input: CreateSaleInput) -> Result<CreateSaleOutput, SaleError> {
        if input.initial_payment < Decimal::ZERO {
            return Err(SaleError::NegativeAmount {
                field: "initial payment",
            });
        }
        let distribution = input.terms().distribute()?;

        // Referenced entities must exist before anything is written.
        self.store.fetch_client(input.client_id).await?;
        if let Some(order_id) = input.order_id {
            self.store.fetch_order(order_id).await?;
        }

        let paid = round_amount(input.initial_payment).min(distribution.total);
        let now = chrono::Utc::now();
        let sale = Sale {
            id: SaleId::new(),
            client_id: input.client_id,
            order_id: input.order_id,
            quantity: input.quantity,
            unit_price: input.unit_price,
            unit_cost: input.unit_cost,
            unit_freight: input.unit_freight,
            apply_freight: input.apply_freight,
            distribution,
            paid,
            remaining: clamp_non_negative(distribution.total - paid),
            status: PaymentStatus::from_amounts(distribution.total, paid),
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };
        let sale_id = sale.id;

        self.store.insert_sale(sale.clone()).await?;
        if let Err(err) = self.ledger.apply(self.store.as_ref(), &sale).await {
            // The ledger rolled itself back; take the bare record with it.
            if let Err(cleanup) = self.store.delete_sale(sale_id, paid).await {
                error!(
                    error = %cleanup,
                    sale_id = %sale_id,
                    "Failed to remove sale after ledger abort"
                );
            }
            return Err(err.into());
        }

        info!(
            sale_id = %sale_id,
            client_id = %sale.client_id,
            total = %distribution.total,
            status = ?sale.status,
            "Sale created"
        );

        Ok(CreateSaleOutput {
            sale_id,
            distribution,
            status: sale.status,
            flags: distribution.flags(),
        })
    }

    /// Registers an additional payment against a sale.
    ///
    /// `new_paid_total` is the cumulative paid amount, not a delta. When it
    /// does not exceed what is already paid the call is a no-op and returns
    /// the current state: payments only move forward through this path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The sale does not exist
    /// - Another writer changed the sale since it was read (`Conflict`)
    /// - A distribution account is missing or storage fails
    pub async fn register_payment(
        &self,
        sale_id: SaleId,
        new_paid_total: Decimal,
    ) -> Result<PaymentOutput, SaleError> {
        let sale = self.store.fetch_sale(sale_id).await?;
        let delta = round_amount(new_paid_total) - sale.paid;
        if delta <= Decimal::ZERO {
            return Ok(PaymentOutput {
                sale_id,
                paid: sale.paid,
                remaining: sale.remaining,
                status: sale.status,
            });
        }

        let mut updated = sale.clone();
        updated.settle(sale.paid + delta);

        // Claim the record first: a racing payment or delete computed
        // against the same stored state fails this guard.
        self.store
            .update_sale_payment(
                sale_id,
                sale.paid,
                updated.paid,
                updated.remaining,
                updated.status,
            )
            .await?;

        if let Err(err) = self
            .ledger
            .register_payment(self.store.as_ref(), &sale, delta)
            .await
        {
            // Put the record back the way the delta was computed against.
            let revert = self
                .store
                .update_sale_payment(sale_id, updated.paid, sale.paid, sale.remaining, sale.status)
                .await;
            if let Err(revert) = revert {
                error!(
                    error = %revert,
                    sale_id = %sale_id,
                    "Failed to revert sale record after ledger abort"
                );
            }
            return Err(err.into());
        }

        info!(
            sale_id = %sale_id,
            paid = %updated.paid,
            remaining = %updated.remaining,
            status = ?updated.status,
            "Payment registered"
        );

        Ok(PaymentOutput {
            sale_id,
            paid: updated.paid,
            remaining: updated.remaining,
            status: updated.status,
        })
    }

    /// Deletes a sale, reversing its full ledger effect.
    ///
    /// Paid amounts flow back out of the distribution accounts as outflows,
    /// the client's counters are corrected, and every movement referencing
    /// the sale is purged. Stock consumed from a linked order is not
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The sale does not exist
    /// - Another writer changed the sale since it was read (`Conflict`)
    /// - A distribution account is missing or storage fails
    pub async fn delete(&self, sale_id: SaleId) -> Result<(), SaleError> {
        let sale = self.store.fetch_sale(sale_id).await?;

        // Claim the record first so a racing payment cannot land between
        // the reversal and the delete.
        let removed = self.store.delete_sale(sale_id, sale.paid).await?;

        if let Err(err) = self.ledger.reverse(self.store.as_ref(), &removed).await {
            if let Err(restore) = self.store.insert_sale(removed).await {
                error!(
                    error = %restore,
                    sale_id = %sale_id,
                    "Failed to restore sale record after reversal abort"
                );
            }
            return Err(err.into());
        }

        info!(sale_id = %sale_id, "Sale deleted");

        Ok(())
    }

    /// Fetches a sale by ID.
    ///
    /// # Errors
    ///
    /// Returns `SaleNotFound` if the sale does not exist.
    pub async fn fetch(&self, sale_id: SaleId) -> Result<Sale, SaleError> {
        Ok(self.store.fetch_sale(sale_id).await?)
    }
}
