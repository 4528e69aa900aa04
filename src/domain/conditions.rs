// src/domain/conditions.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::money::Amount;
use super::carts::PricedCart;
use super::core::ProductId;

/// Gating predicate for a conditional discount. Conditions hold no state and
/// are evaluated fresh against the priced cart on every pricing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The cart holds at least `at_least` units of the product.
    MinQuantity {
        product_id: ProductId,
        at_least: u32,
    },
    /// The store's cart subtotal reaches `at_least`.
    MinTotal {
        at_least: Amount,
    },
}

impl Condition {
    pub fn holds(&self, cart: &PricedCart) -> bool {
        match self {
            Condition::MinQuantity { product_id, at_least } => {
                cart.quantity_of(*product_id) >= *at_least
            },
            Condition::MinTotal { at_least } => {
                let subtotal = cart.subtotal();
                subtotal.currency() == at_least.currency()
                    && subtotal.value() >= at_least.value()
            },
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::MinQuantity { product_id, at_least } => {
                write!(f, "MinQuantity|{}|{}", product_id, at_least)
            },
            Condition::MinTotal { at_least } => {
                write!(f, "MinTotal|{}", at_least)
            },
        }
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('|').collect();

        match parts.as_slice() {
            ["MinQuantity", product_id, at_least] => {
                let product_id = product_id.parse::<ProductId>()
                    .map_err(|_| format!("Invalid product id: {}", product_id))?;
                let at_least = at_least.parse::<u32>()
                    .map_err(|_| format!("Invalid quantity: {}", at_least))?;
                Ok(Condition::MinQuantity { product_id, at_least })
            },
            ["MinTotal", at_least] => {
                let at_least = at_least.parse::<Amount>()?;
                Ok(Condition::MinTotal { at_least })
            },
            _ => Err(format!("Unknown condition: {}", s)),
        }
    }
}

impl Serialize for Condition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer {
        serializer.serialize_str(&self.to_string())
    }
}
impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Condition::from_str(&text).map_err(serde::de::Error::custom)
    }
}
