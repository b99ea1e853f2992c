//! Property-based tests for the distribution calculator.
//!
//! - Property 1: Distribution Sum Integrity
//! - Property 2: Freight Counted Exactly Once
//! - Property 3: Proportional Payment Consistency

use proptest::prelude::*;
use rust_decimal::Decimal;

use reparto_shared::types::money::{CENT_TOLERANCE, round_amount};

use super::calculator::SaleTerms;

/// Strategy to generate cent-precision unit prices (0.00 to 100,000.00).
fn unit_price() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive quantities.
fn quantity() -> impl Strategy<Value = i64> {
    1i64..10_000
}

/// Strategy to generate payment fractions from 0 to 1.2 of the total,
/// in basis points, so overpayment is also exercised.
fn payment_fraction() -> impl Strategy<Value = Decimal> {
    (0i64..=12_000i64).prop_map(|bp| Decimal::new(bp, 4))
}

/// Strategy to generate complete sale terms.
fn sale_terms() -> impl Strategy<Value = SaleTerms> {
    (quantity(), unit_price(), unit_price(), unit_price(), any::<bool>()).prop_map(
        |(quantity, unit_price, unit_cost, unit_freight, apply_freight)| SaleTerms {
            quantity,
            unit_price,
            unit_cost,
            unit_freight,
            apply_freight,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property 1: Distribution Sum Integrity
    // =========================================================================

    /// Property 1.1: The parts re-sum to the total within one cent.
    ///
    /// *For any* valid sale terms, cost + freight + profit SHALL differ
    /// from the total by at most 0.01.
    #[test]
    fn prop_parts_resum_within_tolerance(terms in sale_terms()) {
        let d = terms.distribute().unwrap();

        prop_assert!(
            d.rounding_gap().abs() <= CENT_TOLERANCE,
            "gap {} exceeds a cent for terms {:?}",
            d.rounding_gap(),
            terms
        );
        prop_assert!(!d.has_rounding_gap());
    }

    /// Property 1.2: Every distributed amount carries at most 2 decimals.
    #[test]
    fn prop_amounts_are_cent_precision(terms in sale_terms()) {
        let d = terms.distribute().unwrap();

        prop_assert_eq!(round_amount(d.total), d.total);
        prop_assert_eq!(round_amount(d.cost), d.cost);
        prop_assert_eq!(round_amount(d.freight), d.freight);
        prop_assert_eq!(round_amount(d.profit), d.profit);
    }

    /// Property 1.3: Margin never exceeds 100 percent.
    ///
    /// Profit is the total minus non-negative parts, so the margin is
    /// bounded above by 100.
    #[test]
    fn prop_margin_bounded(terms in sale_terms()) {
        let d = terms.distribute().unwrap();
        prop_assert!(d.margin_percent <= Decimal::ONE_HUNDRED);
    }

    // =========================================================================
    // Property 2: Freight Counted Exactly Once
    // =========================================================================

    /// Property 2.1: Disabling freight is equivalent to a zero freight price.
    #[test]
    fn prop_no_freight_equivalence(
        qty in quantity(),
        price in unit_price(),
        cost in unit_price(),
        freight in unit_price(),
    ) {
        let disabled = SaleTerms {
            quantity: qty,
            unit_price: price,
            unit_cost: cost,
            unit_freight: freight,
            apply_freight: false,
        };
        let zero_price = SaleTerms {
            unit_freight: Decimal::ZERO,
            apply_freight: true,
            ..disabled
        };

        prop_assert_eq!(disabled.distribute().unwrap(), zero_price.distribute().unwrap());
    }

    /// Property 2.2: With freight applied, profit equals total minus cost
    /// minus freight.
    ///
    /// Counting freight zero times or twice would break this identity.
    #[test]
    fn prop_freight_subtracted_once(
        qty in quantity(),
        price in unit_price(),
        cost in unit_price(),
        freight in unit_price(),
    ) {
        let d = SaleTerms {
            quantity: qty,
            unit_price: price,
            unit_cost: cost,
            unit_freight: freight,
            apply_freight: true,
        }
        .distribute()
        .unwrap();

        prop_assert_eq!(d.profit, d.total - d.cost - d.freight);
    }

    // =========================================================================
    // Property 3: Proportional Payment Consistency
    // =========================================================================

    /// Property 3.1: Portion amounts re-sum to the paid amount within one
    /// cent.
    ///
    /// *For any* payment fraction of the total, the independently rounded
    /// portion amounts SHALL differ from the rounded paid amount by at
    /// most 0.01.
    #[test]
    fn prop_portion_sum_matches_paid(terms in sale_terms(), fraction in payment_fraction()) {
        let d = terms.distribute().unwrap();
        // Only distributions whose parts re-sum exactly admit an exact
        // portion identity.
        prop_assume!(d.rounding_gap() == Decimal::ZERO);

        let paid = round_amount(d.total * fraction);
        let portion = d.portion(paid);

        prop_assert!(
            (portion.sum() - paid).abs() <= CENT_TOLERANCE,
            "portion sum {} vs paid {}",
            portion.sum(),
            paid
        );
    }

    /// Property 3.2: A full payment portion reproduces the distribution.
    #[test]
    fn prop_full_portion_is_distribution(terms in sale_terms()) {
        let d = terms.distribute().unwrap();
        prop_assume!(d.total > Decimal::ZERO);

        let portion = d.portion(d.total);

        prop_assert_eq!(portion.proportion, Decimal::ONE);
        prop_assert_eq!(portion.cost, d.cost);
        prop_assert_eq!(portion.freight, d.freight);
        prop_assert_eq!(portion.profit, d.profit);
    }

    /// Property 3.3: A zero payment yields a zero portion.
    #[test]
    fn prop_zero_portion(terms in sale_terms()) {
        let d = terms.distribute().unwrap();
        let portion = d.portion(Decimal::ZERO);

        prop_assert_eq!(portion.cost, Decimal::ZERO);
        prop_assert_eq!(portion.freight, Decimal::ZERO);
        prop_assert_eq!(portion.profit, Decimal::ZERO);
    }
}
