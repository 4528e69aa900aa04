mod utils;

use std::collections::BTreeSet;
use std::collections::HashMap;

use rust_decimal_macros::dec;

use market_site::domain::{
    calc_amount, total_discount, Condition, DiscountPolicy, Errors, PricedCart, PricedLine, Scope,
};
use market_site::money::Currency;
use utils::*;

// One gadget at 100 and one widget at 50, already priced
fn priced_cart() -> PricedCart {
    PricedCart::new(
        Currency::SEK,
        vec![
            PricedLine {
                product_id: gadget_id(),
                unit_price: sek(dec!(100)),
                quantity: 1,
            },
            PricedLine {
                product_id: widget_id(),
                unit_price: sek(dec!(50)),
                quantity: 1,
            },
        ],
    )
}

fn gadget_scope() -> Scope {
    Scope::Products {
        products: BTreeSet::from([gadget_id()]),
    }
}

fn gadget_in_cart() -> Condition {
    Condition::MinQuantity {
        product_id: gadget_id(),
        at_least: 1,
    }
}

fn cart_reaches(total: rust_decimal::Decimal) -> Condition {
    Condition::MinTotal { at_least: sek(total) }
}

#[test]
fn test_simple_discount_on_product_scope() {
    let policy = DiscountPolicy::simple(gadget_scope(), dec!(20)).unwrap();

    // 20% of the gadget line only
    assert!(policy.is_applicable(&priced_cart()));
    assert_eq!(policy.apply(&priced_cart()), sek(dec!(20)));
}

#[test]
fn test_simple_discount_on_store_scope() {
    let policy = DiscountPolicy::simple(Scope::Store, dec!(10)).unwrap();

    // 10% of the whole 150 subtotal
    assert_eq!(policy.apply(&priced_cart()), sek(dec!(15)));
}

#[test]
fn test_conditional_discount_is_gated() {
    let two_gadgets = Condition::MinQuantity {
        product_id: gadget_id(),
        at_least: 2,
    };
    let policy = DiscountPolicy::conditional(gadget_scope(), two_gadgets, dec!(20)).unwrap();

    // Only one gadget in the cart, so nothing comes off
    assert!(!policy.is_applicable(&priced_cart()));
    assert_eq!(policy.apply(&priced_cart()), sek(dec!(0)));

    let one_gadget = DiscountPolicy::conditional(gadget_scope(), gadget_in_cart(), dec!(20)).unwrap();
    assert_eq!(one_gadget.apply(&priced_cart()), sek(dec!(20)));
}

#[test]
fn test_min_total_threshold_is_inclusive() {
    let at_subtotal =
        DiscountPolicy::conditional(Scope::Store, cart_reaches(dec!(150)), dec!(10)).unwrap();
    assert!(at_subtotal.is_applicable(&priced_cart()));

    let above_subtotal =
        DiscountPolicy::conditional(Scope::Store, cart_reaches(dec!(151)), dec!(10)).unwrap();
    assert!(!above_subtotal.is_applicable(&priced_cart()));
}

#[test]
fn test_and_combinator_needs_both_legs() {
    let left = DiscountPolicy::conditional(gadget_scope(), gadget_in_cart(), dec!(20)).unwrap();
    let right = DiscountPolicy::conditional(Scope::Store, cart_reaches(dec!(100)), dec!(10)).unwrap();
    let both = DiscountPolicy::all_of(left, right);

    // Both conditions hold: both legs' amounts are summed
    assert!(both.is_applicable(&priced_cart()));
    assert_eq!(both.apply(&priced_cart()), sek(dec!(35)));

    let left = DiscountPolicy::conditional(gadget_scope(), gadget_in_cart(), dec!(20)).unwrap();
    let right =
        DiscountPolicy::conditional(Scope::Store, cart_reaches(dec!(1000)), dec!(10)).unwrap();
    let gated = DiscountPolicy::all_of(left, right);

    // One failing condition zeroes the whole node
    assert!(!gated.is_applicable(&priced_cart()));
    assert_eq!(gated.apply(&priced_cart()), sek(dec!(0)));
}

#[test]
fn test_or_combinator_sums_applicable_legs() {
    let cheap = DiscountPolicy::conditional(gadget_scope(), gadget_in_cart(), dec!(20)).unwrap();
    let big_cart =
        DiscountPolicy::conditional(Scope::Store, cart_reaches(dec!(100)), dec!(10)).unwrap();
    let either = DiscountPolicy::any_of(cheap, big_cart);

    // Both legs hold, so both discount independently
    assert_eq!(either.apply(&priced_cart()), sek(dec!(35)));

    let cheap = DiscountPolicy::conditional(gadget_scope(), gadget_in_cart(), dec!(20)).unwrap();
    let big_cart =
        DiscountPolicy::conditional(Scope::Store, cart_reaches(dec!(1000)), dec!(10)).unwrap();
    let either = DiscountPolicy::any_of(cheap, big_cart);

    // Only the holding leg contributes
    assert_eq!(either.apply(&priced_cart()), sek(dec!(20)));

    let five_gadgets = Condition::MinQuantity {
        product_id: gadget_id(),
        at_least: 5,
    };
    let cheap = DiscountPolicy::conditional(gadget_scope(), five_gadgets, dec!(20)).unwrap();
    let big_cart =
        DiscountPolicy::conditional(Scope::Store, cart_reaches(dec!(1000)), dec!(10)).unwrap();
    let neither = DiscountPolicy::any_of(cheap, big_cart);

    assert!(!neither.is_applicable(&priced_cart()));
    assert_eq!(neither.apply(&priced_cart()), sek(dec!(0)));
}

#[test]
fn test_xor_combinator_wants_exactly_one_leg() {
    let gadget_leg =
        DiscountPolicy::conditional(gadget_scope(), gadget_in_cart(), dec!(20)).unwrap();
    let total_leg =
        DiscountPolicy::conditional(Scope::Store, cart_reaches(dec!(1000)), dec!(10)).unwrap();
    let exactly_one = DiscountPolicy::one_of(gadget_leg, total_leg);

    // Exactly one leg holds: its amount applies
    assert!(exactly_one.is_applicable(&priced_cart()));
    assert_eq!(exactly_one.apply(&priced_cart()), sek(dec!(20)));

    // Both legs hold: the node yields nothing
    let gadget_leg =
        DiscountPolicy::conditional(gadget_scope(), gadget_in_cart(), dec!(20)).unwrap();
    let total_leg =
        DiscountPolicy::conditional(Scope::Store, cart_reaches(dec!(100)), dec!(10)).unwrap();
    let both_hold = DiscountPolicy::one_of(gadget_leg, total_leg);

    assert!(!both_hold.is_applicable(&priced_cart()));
    assert_eq!(both_hold.apply(&priced_cart()), sek(dec!(0)));
}

#[test]
fn test_stacking_is_cumulative_not_compounding() {
    // 20% off the gadget and 10% off the whole store, both against the
    // original prices: (100 - 20 - 10) + (50 - 5) = 115
    let policies = vec![
        DiscountPolicy::simple(gadget_scope(), dec!(20)).unwrap(),
        DiscountPolicy::simple(Scope::Store, dec!(10)).unwrap(),
    ];

    assert_eq!(total_discount(&policies, &priced_cart()), sek(dec!(35)));

    let store = sample_store();
    let lines = HashMap::from([(gadget_id(), 1), (widget_id(), 1)]);
    let charge = calc_amount(
        &store,
        &HashMap::new(),
        &policies,
        &"Buyer_1".to_string(),
        &lines,
    )
    .unwrap();

    assert_eq!(charge, sek(dec!(115.00)));
}

#[test]
fn test_full_discount_clamps_charge_at_zero() {
    let policies = vec![
        DiscountPolicy::simple(Scope::Store, dec!(100)).unwrap(),
        DiscountPolicy::simple(gadget_scope(), dec!(20)).unwrap(),
    ];

    let store = sample_store();
    let lines = HashMap::from([(gadget_id(), 1), (widget_id(), 1)]);
    let charge = calc_amount(
        &store,
        &HashMap::new(),
        &policies,
        &"Buyer_1".to_string(),
        &lines,
    )
    .unwrap();

    // 135% of discounts still charges exactly zero, never negative
    assert_eq!(charge, sek(dec!(0)));
}

#[test]
fn test_percentage_is_validated_at_creation() {
    assert_eq!(
        DiscountPolicy::simple(Scope::Store, dec!(101)),
        Err(Errors::InvalidPercentage)
    );
    assert_eq!(
        DiscountPolicy::simple(Scope::Store, dec!(-1)),
        Err(Errors::InvalidPercentage)
    );
    assert!(DiscountPolicy::simple(Scope::Store, dec!(0)).is_ok());
    assert!(DiscountPolicy::simple(Scope::Store, dec!(100)).is_ok());
}

#[test]
fn test_products_scope_must_not_be_empty() {
    let empty = Scope::Products {
        products: BTreeSet::new(),
    };
    assert_eq!(
        DiscountPolicy::simple(empty, dec!(20)),
        Err(Errors::EmptyProductScope)
    );
}

#[test]
fn test_every_node_gets_its_own_id() {
    let left = DiscountPolicy::simple(gadget_scope(), dec!(20)).unwrap();
    let right = DiscountPolicy::simple(Scope::Store, dec!(10)).unwrap();
    let left_id = left.policy_id;
    let right_id = right.policy_id;

    let combined = DiscountPolicy::all_of(left, right);

    assert_ne!(left_id, right_id);
    assert_ne!(combined.policy_id, left_id);
    assert_ne!(combined.policy_id, right_id);
}
