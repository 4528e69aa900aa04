// src/domain/mod.rs
pub mod auctions;
pub mod bids;
pub mod carts;
pub mod commands;
pub mod conditions;
pub mod core;
pub mod discounts;
pub mod items;
pub mod notices;
pub mod stores;

pub use self::auctions::*;
pub use self::bids::*;
pub use self::carts::*;
pub use self::commands::*;
pub use self::conditions::*;
pub use self::core::*;
pub use self::discounts::*;
pub use self::items::*;
pub use self::notices::*;
pub use self::stores::*;
