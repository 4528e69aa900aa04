// src/domain/core.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use crate::money::{Amount, Currency};

pub type UserId = String;
pub type StoreId = i64;
pub type ProductId = i64;
pub type PolicyId = uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum User {
    Member {
        user_id: UserId,
        name: String,
    },
    Support {
        user_id: UserId,
    },
}

impl User {
    pub fn user_id(&self) -> &UserId {
        match self {
            User::Member { user_id, .. } => user_id,
            User::Support { user_id } => user_id,
        }
    }
}
impl<'de> Deserialize<'de> for User {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let parts: Vec<&str> = text.split('|').collect();

        match parts.as_slice() {
            ["Member", user_id, name] => {
                Ok(User::Member {
                    user_id: user_id.to_string(),
                    name: name.to_string(),
                })
            },
            ["Support", user_id] => {
                Ok(User::Support {
                    user_id: user_id.to_string(),
                })
            },
            _ => {
                Err(serde::de::Error::custom(
                    format!("parsing User failed, could not interpret values: {:?}", parts)
                ))
            }
        }
    }
}
impl Serialize for User {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer {
        serializer.serialize_str(&self.to_string())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            User::Member { user_id, name } => write!(f, "Member|{}|{}", user_id, name),
            User::Support { user_id } => write!(f, "Support|{}", user_id),
        }
    }
}

/// Every failure in this crate is deterministic given the same state:
/// validation errors are rejected synchronously and state errors are
/// surfaced to the caller, neither is ever retried internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Errors {
    // Validation errors
    #[error("Discount percentage must be between 0 and 100")]
    InvalidPercentage,

    #[error("A products-scoped discount needs at least one product")]
    EmptyProductScope,

    #[error("Store owners cannot bid on their own auctions: {0:?}")]
    SelfBid((UserId, ProductId)),

    #[error("Bid must exceed the current level of {0}")]
    BidTooLow(Amount),

    #[error("Amount is in the wrong currency, expected {0}")]
    CurrencyMismatch(Currency),

    #[error("Invalid user data: {0}")]
    InvalidUserData(String),

    // State errors
    #[error("Auction has already closed: {0}")]
    AuctionClosed(ProductId),

    #[error("Auction deadline has passed: {0}")]
    AuctionExpired(ProductId),

    #[error("Unknown store: {0}")]
    UnknownStore(StoreId),

    #[error("Store already exists: {0}")]
    StoreAlreadyExists(StoreId),

    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    #[error("Product already listed: {0}")]
    ProductAlreadyListed(ProductId),

    #[error("No auction running for product: {0}")]
    UnknownAuction(ProductId),

    #[error("Auction already running for product: {0}")]
    AuctionAlreadyExists(ProductId),

    #[error("Unknown discount policy: {0}")]
    UnknownPolicy(PolicyId),

    #[error("Not enough stock of product {0}")]
    InsufficientStock(ProductId),
}
