// src/domain/discounts.rs
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;
use crate::money::Amount;
use super::carts::PricedCart;
use super::conditions::Condition;
use super::core::{Errors, PolicyId, ProductId};

/// Discount percentage on the 0-100 scale, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percent(Decimal);

impl Percent {
    pub fn new(value: Decimal) -> Result<Self, Errors> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(Errors::InvalidPercentage);
        }
        Ok(Percent(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Percent {
    type Error = Errors;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Percent::new(value)
    }
}

impl From<Percent> for Decimal {
    fn from(percent: Percent) -> Decimal {
        percent.0
    }
}

/// What a discount's eligible amount ranges over: a fixed product set
/// captured at creation, or the whole of the store's cart portion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Scope {
    Store,
    Products { products: BTreeSet<ProductId> },
}

impl Scope {
    /// The subtotal the discount percentage is computed against.
    pub fn eligible_amount(&self, cart: &PricedCart) -> Amount {
        match self {
            Scope::Store => cart.subtotal(),
            Scope::Products { products } => cart.subtotal_of(products),
        }
    }

    fn validated(self) -> Result<Self, Errors> {
        if let Scope::Products { products } = &self {
            if products.is_empty() {
                return Err(Errors::EmptyProductScope);
            }
        }
        Ok(self)
    }
}

/// One discount rule. Combinators compose the *applicability* of their two
/// children; amounts compose as documented on [`DiscountPolicy::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Rule {
    Simple {
        scope: Scope,
        percent: Percent,
    },
    Conditional {
        scope: Scope,
        condition: Condition,
        percent: Percent,
    },
    And {
        left: Box<DiscountPolicy>,
        right: Box<DiscountPolicy>,
    },
    Or {
        left: Box<DiscountPolicy>,
        right: Box<DiscountPolicy>,
    },
    Xor {
        left: Box<DiscountPolicy>,
        right: Box<DiscountPolicy>,
    },
}

/// A node of the recursive discount tree. Every node gets its own id at
/// creation; removal by the root id drops the whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountPolicy {
    #[serde(rename = "id")]
    pub policy_id: PolicyId,
    pub rule: Rule,
}

impl DiscountPolicy {
    fn with_rule(rule: Rule) -> Self {
        DiscountPolicy {
            policy_id: Uuid::new_v4(),
            rule,
        }
    }

    pub fn simple(scope: Scope, percent: Decimal) -> Result<Self, Errors> {
        Ok(Self::with_rule(Rule::Simple {
            scope: scope.validated()?,
            percent: Percent::new(percent)?,
        }))
    }

    pub fn conditional(scope: Scope, condition: Condition, percent: Decimal) -> Result<Self, Errors> {
        Ok(Self::with_rule(Rule::Conditional {
            scope: scope.validated()?,
            condition,
            percent: Percent::new(percent)?,
        }))
    }

    pub fn all_of(left: DiscountPolicy, right: DiscountPolicy) -> Self {
        Self::with_rule(Rule::And {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn any_of(left: DiscountPolicy, right: DiscountPolicy) -> Self {
        Self::with_rule(Rule::Or {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn one_of(left: DiscountPolicy, right: DiscountPolicy) -> Self {
        Self::with_rule(Rule::Xor {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn is_applicable(&self, cart: &PricedCart) -> bool {
        match &self.rule {
            Rule::Simple { .. } => true,
            Rule::Conditional { condition, .. } => condition.holds(cart),
            Rule::And { left, right } => left.is_applicable(cart) && right.is_applicable(cart),
            Rule::Or { left, right } => left.is_applicable(cart) || right.is_applicable(cart),
            Rule::Xor { left, right } => left.is_applicable(cart) ^ right.is_applicable(cart),
        }
    }

    /// The discount amount this node takes off the cart.
    ///
    /// An inapplicable node yields zero. An applicable leaf yields its
    /// percentage of the eligible amount. An applicable combinator sums its
    /// children, where an inapplicable child contributes zero: And sums both
    /// legs, Or sums the applicable legs, Xor takes exactly the one
    /// applicable leg.
    pub fn apply(&self, cart: &PricedCart) -> Amount {
        if !self.is_applicable(cart) {
            return Amount::zero(cart.currency());
        }
        match &self.rule {
            Rule::Simple { scope, percent }
            | Rule::Conditional { scope, percent, .. } => {
                scope.eligible_amount(cart).percent_of(percent.value())
            },
            Rule::And { left, right }
            | Rule::Or { left, right }
            | Rule::Xor { left, right } => {
                let combined = left.apply(cart).value() + right.apply(cart).value();
                Amount::new(cart.currency(), combined)
            },
        }
    }
}

/// Sum of every top-level policy's amount, each computed independently
/// against the original priced cart: stacking is cumulative, never
/// compounding.
pub fn total_discount(policies: &[DiscountPolicy], cart: &PricedCart) -> Amount {
    let total: Decimal = policies.iter().map(|policy| policy.apply(cart).value()).sum();
    Amount::new(cart.currency(), total)
}
