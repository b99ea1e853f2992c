//! Property tests for purchase-order costing.
//!
//! Strategies generate cent-precision costs and order quantities in
//! commercial ranges; payment fractions above 1 exercise the over-payment
//! clamp.

use proptest::prelude::*;
use rust_decimal::Decimal;

use reparto_shared::types::money::round_amount;

use super::costing::OrderTerms;
use super::types::OrderStatus;

/// Cent-precision per-unit amount up to 100 000.00.
fn unit_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Order quantity in a commercial range.
fn quantity() -> impl Strategy<Value = i64> {
    1i64..10_000
}

/// Payment as a fraction of the order total, up to 150%.
fn payment_fraction() -> impl Strategy<Value = Decimal> {
    (0i64..=15_000).prop_map(|basis_points| Decimal::new(basis_points, 4))
}

/// Order terms with no initial payment.
fn order_terms() -> impl Strategy<Value = OrderTerms> {
    (quantity(), unit_amount(), unit_amount()).prop_map(
        |(quantity, distributor_cost, transport_cost)| OrderTerms {
            quantity,
            distributor_cost,
            transport_cost,
            initial_payment: Decimal::ZERO,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 1: debt never goes negative and never exceeds the total.
    #[test]
    fn prop_debt_stays_in_range(terms in order_terms(), fraction in payment_fraction()) {
        let base = terms.cost().unwrap();
        let costing = OrderTerms {
            initial_payment: round_amount(base.total * fraction),
            ..terms
        }
        .cost()
        .unwrap();

        prop_assert!(costing.debt >= Decimal::ZERO);
        prop_assert!(costing.debt <= costing.total);
    }

    /// Property 2: status always agrees with the computed debt.
    #[test]
    fn prop_status_matches_debt(terms in order_terms(), fraction in payment_fraction()) {
        let base = terms.cost().unwrap();
        let costing = OrderTerms {
            initial_payment: round_amount(base.total * fraction),
            ..terms
        }
        .cost()
        .unwrap();

        let expected = if costing.debt == Decimal::ZERO {
            OrderStatus::Paid
        } else if costing.debt < costing.total {
            OrderStatus::Partial
        } else {
            OrderStatus::Pending
        };
        prop_assert_eq!(costing.status, expected);
    }

    /// Property 3: every computed amount is cent-precision.
    #[test]
    fn prop_amounts_are_cent_precision(terms in order_terms()) {
        let costing = terms.cost().unwrap();

        prop_assert_eq!(round_amount(costing.unit_cost), costing.unit_cost);
        prop_assert_eq!(round_amount(costing.total), costing.total);
        prop_assert_eq!(round_amount(costing.debt), costing.debt);
    }

    /// Property 4: with no initial payment the whole total is owed.
    #[test]
    fn prop_unpaid_order_owes_total(terms in order_terms()) {
        let costing = terms.cost().unwrap();

        prop_assert_eq!(costing.debt, costing.total);
        prop_assert_eq!(
            costing.total,
            round_amount(costing.unit_cost * Decimal::from(terms.quantity))
        );
    }
}
