//! Property tests for the ledger application service.
//!
//! Each case runs against a fresh in-memory store on a current-thread
//! runtime. Strategies mirror the distribution calculator's: cent-precision
//! unit amounts, commercial quantities, payment fractions in basis points.

use std::future::Future;

use proptest::prelude::*;
use rust_decimal::Decimal;

use reparto_shared::config::StockPolicy;
use reparto_shared::types::money::{CENT_TOLERANCE, clamp_non_negative, round_amount};
use reparto_shared::types::{AccountId, ClientId, SaleId};

use crate::distribution::SaleTerms;
use crate::ledger::service::LedgerService;
use crate::ledger::types::{Account, AccountRole, Client, DistributionAccounts};
use crate::sale::types::{PaymentStatus, Sale};
use crate::store::{MemoryStore, Store};

fn run<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

/// Cent-precision per-unit amount up to 10 000.00.
fn unit_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Sale quantity in a commercial range.
fn quantity() -> impl Strategy<Value = i64> {
    1i64..500
}

/// Payment as a fraction of the sale total, in basis points up to 100%.
fn payment_fraction() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000).prop_map(|basis_points| Decimal::new(basis_points, 4))
}

fn sale_terms() -> impl Strategy<Value = SaleTerms> {
    (quantity(), unit_amount(), unit_amount(), unit_amount(), any::<bool>()).prop_map(
        |(quantity, unit_price, unit_cost, unit_freight, apply_freight)| SaleTerms {
            quantity,
            unit_price,
            unit_cost,
            unit_freight,
            apply_freight,
        },
    )
}

async fn seed(store: &MemoryStore) -> (DistributionAccounts, ClientId) {
    let accounts =
        DistributionAccounts::new(AccountId::new(), AccountId::new(), AccountId::new());
    for (id, name, role) in [
        (accounts.cost, "Cost recovery", AccountRole::CostRecovery),
        (accounts.freight, "Freight", AccountRole::Freight),
        (accounts.profit, "Profit", AccountRole::Profit),
    ] {
        store
            .insert_account(Account::new(id, name, role))
            .await
            .unwrap();
    }
    let client = Client::new(ClientId::new(), "Property client");
    let client_id = client.id;
    store.insert_client(client).await.unwrap();
    (accounts, client_id)
}

fn build_sale(client_id: ClientId, terms: SaleTerms, paid: Decimal) -> Sale {
    let distribution = terms.distribute().unwrap();
    let paid = round_amount(paid);
    Sale {
        id: SaleId::new(),
        client_id,
        order_id: None,
        quantity: terms.quantity,
        unit_price: terms.unit_price,
        unit_cost: terms.unit_cost,
        unit_freight: terms.unit_freight,
        apply_freight: terms.apply_freight,
        distribution,
        paid,
        remaining: clamp_non_negative(distribution.total - paid),
        status: PaymentStatus::from_amounts(distribution.total, paid),
        notes: None,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 1: historical inflows never decrease under any sequence of
    /// create and payment operations, and accounts stay coherent.
    #[test]
    fn prop_inflows_are_monotonic(
        terms in sale_terms(),
        fractions in prop::collection::vec(payment_fraction(), 1..6),
    ) {
        run(async move {
            let store = MemoryStore::new();
            let (accounts, client_id) = seed(&store).await;
            let service = LedgerService::new(accounts, StockPolicy::Reject);
            let mut sale = build_sale(client_id, terms, Decimal::ZERO);
            service.apply(&store, &sale).await.unwrap();

            let ids = [accounts.cost, accounts.freight, accounts.profit];
            let mut previous = [Decimal::ZERO; 3];
            for fraction in fractions {
                let delta = round_amount(sale.distribution.total * fraction);
                if delta <= Decimal::ZERO {
                    continue;
                }
                service.register_payment(&store, &sale, delta).await.unwrap();
                let new_total = sale.paid + delta;
                sale.settle(new_total);

                for (idx, id) in ids.into_iter().enumerate() {
                    let account = store.fetch_account(id).await.unwrap();
                    prop_assert!(account.historical_inflows >= previous[idx]);
                    prop_assert!(account.is_coherent());
                    previous[idx] = account.historical_inflows;
                }
            }
            Ok(())
        })?;
    }

    /// Property 2: applying a sale and reversing it returns every account
    /// balance and net history to zero exactly, at any paid fraction.
    #[test]
    fn prop_reversal_is_exact(terms in sale_terms(), fraction in payment_fraction()) {
        run(async move {
            let store = MemoryStore::new();
            let (accounts, client_id) = seed(&store).await;
            let service = LedgerService::new(accounts, StockPolicy::Reject);

            let distribution = terms.distribute().unwrap();
            let paid = round_amount(distribution.total * fraction);
            let sale = build_sale(client_id, terms, paid);

            service.apply(&store, &sale).await.unwrap();
            service.reverse(&store, &sale).await.unwrap();

            for id in [accounts.cost, accounts.freight, accounts.profit] {
                let account = store.fetch_account(id).await.unwrap();
                prop_assert_eq!(account.balance, Decimal::ZERO);
                prop_assert_eq!(account.net_history(), Decimal::ZERO);
                prop_assert!(account.is_coherent());
            }
            let client = store.fetch_client(client_id).await.unwrap();
            prop_assert_eq!(client.outstanding_balance, Decimal::ZERO);
            prop_assert_eq!(client.lifetime_purchases, Decimal::ZERO);
            prop_assert!(store.movements_for_sale(sale.id).await.unwrap().is_empty());
            Ok(())
        })?;
    }

    /// Property 3: after applying a paid sale, the account balances sum to
    /// the paid amount within one cent.
    #[test]
    fn prop_balances_account_for_every_cent(
        terms in sale_terms(),
        fraction in payment_fraction(),
    ) {
        run(async move {
            let store = MemoryStore::new();
            let (accounts, client_id) = seed(&store).await;
            let service = LedgerService::new(accounts, StockPolicy::Reject);

            let distribution = terms.distribute().unwrap();
            let paid = round_amount(distribution.total * fraction);
            let sale = build_sale(client_id, terms, paid);
            service.apply(&store, &sale).await.unwrap();

            let mut sum = Decimal::ZERO;
            for id in [accounts.cost, accounts.freight, accounts.profit] {
                sum += store.fetch_account(id).await.unwrap().balance;
            }
            prop_assert!((sum - sale.paid).abs() <= CENT_TOLERANCE);
            Ok(())
        })?;
    }

    /// Property 4: the client's outstanding balance tracks the unpaid
    /// remainder and never goes negative, however payments over-shoot.
    #[test]
    fn prop_outstanding_never_negative(
        terms in sale_terms(),
        fractions in prop::collection::vec(payment_fraction(), 1..6),
    ) {
        run(async move {
            let store = MemoryStore::new();
            let (accounts, client_id) = seed(&store).await;
            let service = LedgerService::new(accounts, StockPolicy::Reject);
            let mut sale = build_sale(client_id, terms, Decimal::ZERO);
            service.apply(&store, &sale).await.unwrap();

            for fraction in fractions {
                // Cumulative deltas can push well past the total.
                let delta = round_amount(sale.distribution.total * fraction);
                if delta <= Decimal::ZERO {
                    continue;
                }
                service.register_payment(&store, &sale, delta).await.unwrap();
                let new_total = sale.paid + delta;
                sale.settle(new_total);

                let client = store.fetch_client(client_id).await.unwrap();
                prop_assert!(client.outstanding_balance >= Decimal::ZERO);
                prop_assert_eq!(
                    client.outstanding_balance,
                    clamp_non_negative(sale.distribution.total - sale.paid)
                );
            }
            Ok(())
        })?;
    }
}
