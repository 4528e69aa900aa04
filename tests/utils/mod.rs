#![allow(dead_code)]
// Shared sample data for the integration tests.
// See https://users.rust-lang.org/t/sharing-code-and-macros-in-tests-directory/3098/7

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use market_site::domain::{open_auction, AuctionState, Bid, Listing, Store, User};
use market_site::engine::Marketplace;
use market_site::money::{Amount, Currency};

pub fn sample_store_id() -> i64 {
    1
}

pub fn gadget_id() -> i64 {
    42
}

pub fn widget_id() -> i64 {
    43
}

pub fn sample_opened_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 1, 1, 8, 28, 0).unwrap()
}

pub fn sample_ends_at() -> DateTime<Utc> {
    sample_opened_at() + Duration::days(30)
}

pub fn sample_bid_time() -> DateTime<Utc> {
    sample_opened_at() + Duration::days(1)
}

pub fn sample_founder() -> User {
    User::Member {
        user_id: "Sample_Founder".to_string(),
        name: "Founder".to_string(),
    }
}

pub fn buyer_1() -> User {
    User::Member {
        user_id: "Buyer_1".to_string(),
        name: "Buyer 1".to_string(),
    }
}

pub fn buyer_2() -> User {
    User::Member {
        user_id: "Buyer_2".to_string(),
        name: "Buyer 2".to_string(),
    }
}

pub fn buyer_3() -> User {
    User::Member {
        user_id: "Buyer_3".to_string(),
        name: "Buyer 3".to_string(),
    }
}

pub fn sek(value: Decimal) -> Amount {
    Amount::new(Currency::SEK, value)
}

/// Listing used by the auction tests: base price 50.
pub fn auction_listing() -> Listing {
    Listing {
        product_id: gadget_id(),
        title: "gadget".to_string(),
        base_price: sek(dec!(50)),
        quantity: 10,
    }
}

/// Listings used by the pricing tests: gadget at 100, widget at 50.
pub fn gadget_listing() -> Listing {
    Listing {
        product_id: gadget_id(),
        title: "gadget".to_string(),
        base_price: sek(dec!(100)),
        quantity: 10,
    }
}

pub fn widget_listing() -> Listing {
    Listing {
        product_id: widget_id(),
        title: "widget".to_string(),
        base_price: sek(dec!(50)),
        quantity: 5,
    }
}

pub fn sample_store() -> Store {
    let mut store = Store::new(
        sample_store_id(),
        "general store".to_string(),
        sample_founder(),
        Currency::SEK,
    );
    store.listings.insert(gadget_id(), gadget_listing());
    store.listings.insert(widget_id(), widget_listing());
    store
}

/// An open auction on the gadget, running for 30 days from the opening time.
pub fn sample_auction() -> AuctionState {
    open_auction(&auction_listing(), sample_opened_at(), 30)
}

pub fn bid_at(bidder: User, amount: Amount, at: DateTime<Utc>) -> Bid {
    Bid {
        for_product: gadget_id(),
        bidder,
        at,
        amount,
    }
}

pub fn bid(bidder: User, amount: Amount) -> Bid {
    bid_at(bidder, amount, sample_bid_time())
}

/// A marketplace with the sample store and its two listings already in place.
pub fn sample_marketplace() -> Marketplace {
    let marketplace = Marketplace::new();
    marketplace
        .open_store(Store::new(
            sample_store_id(),
            "general store".to_string(),
            sample_founder(),
            Currency::SEK,
        ))
        .unwrap();
    marketplace
        .stock_product(sample_store_id(), gadget_listing())
        .unwrap();
    marketplace
        .stock_product(sample_store_id(), widget_listing())
        .unwrap();
    marketplace
}
