// src/domain/auctions.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use crate::money::{Amount, Currency};
use super::bids::Bid;
use super::core::{Errors, ProductId, UserId};
use super::items::Listing;
use super::notices::{Event, Notice};

/// Auction record for one product. Transitions only forward: `Open` until a
/// single close, then read-only history. `bids` is kept newest first, so the
/// highest bid is always the head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum AuctionState {
    Open {
        #[serde(rename = "productId")]
        product_id: ProductId,
        #[serde(rename = "basePrice")]
        base_price: Amount,
        #[serde(rename = "endsAt")]
        ends_at: DateTime<Utc>,
        bids: Vec<Bid>,
    },
    EndedSold {
        #[serde(rename = "productId")]
        product_id: ProductId,
        #[serde(rename = "basePrice")]
        base_price: Amount,
        #[serde(rename = "endsAt")]
        ends_at: DateTime<Utc>,
        bids: Vec<Bid>,
        winner: UserId,
        #[serde(rename = "salePrice")]
        sale_price: Amount,
    },
    EndedNoBids {
        #[serde(rename = "productId")]
        product_id: ProductId,
        #[serde(rename = "basePrice")]
        base_price: Amount,
        #[serde(rename = "endsAt")]
        ends_at: DateTime<Utc>,
    },
}

/// The recorded result of closing an auction. A second close returns the
/// same outcome without repeating any side effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum CloseOutcome {
    Sold { winner: UserId, amount: Amount },
    NoBids,
}

pub fn open_auction(listing: &Listing, now: DateTime<Utc>, duration_days: i64) -> AuctionState {
    AuctionState::Open {
        product_id: listing.product_id,
        base_price: listing.base_price,
        ends_at: now + Duration::days(duration_days),
        bids: Vec::new(),
    }
}

/// Checks that do not depend on auction state: a store owner may not bid on
/// the store's own auctions, and the bid must be in the store currency.
pub fn validate_bid(bid: &Bid, store_currency: Currency, owners: &[UserId]) -> Result<(), Errors> {
    if owners.contains(bid.bidder.user_id()) {
        return Err(Errors::SelfBid((
            bid.bidder.user_id().clone(),
            bid.for_product,
        )));
    }

    if bid.amount.currency() != store_currency {
        return Err(Errors::CurrencyMismatch(store_currency));
    }

    Ok(())
}

impl AuctionState {
    pub fn product_id(&self) -> ProductId {
        match self {
            AuctionState::Open { product_id, .. }
            | AuctionState::EndedSold { product_id, .. }
            | AuctionState::EndedNoBids { product_id, .. } => *product_id,
        }
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        match self {
            AuctionState::Open { ends_at, .. }
            | AuctionState::EndedSold { ends_at, .. }
            | AuctionState::EndedNoBids { ends_at, .. } => *ends_at,
        }
    }

    pub fn bids(&self) -> &[Bid] {
        match self {
            AuctionState::Open { bids, .. } | AuctionState::EndedSold { bids, .. } => bids,
            AuctionState::EndedNoBids { .. } => &[],
        }
    }

    /// The amount the next bid has to beat: the highest bid so far, or the
    /// base price while no bid exists.
    pub fn current_level(&self) -> Amount {
        match self {
            AuctionState::Open { base_price, bids, .. } => bids
                .first()
                .map(|bid| bid.amount)
                .unwrap_or(*base_price),
            AuctionState::EndedSold { sale_price, .. } => *sale_price,
            AuctionState::EndedNoBids { base_price, .. } => *base_price,
        }
    }

    pub fn has_ended(&self) -> bool {
        !matches!(self, AuctionState::Open { .. })
    }

    /// The sale price if this auction ended sold to the given user.
    pub fn won_by(&self, user: &UserId) -> Option<Amount> {
        match self {
            AuctionState::EndedSold { winner, sale_price, .. } if winner == user => {
                Some(*sale_price)
            },
            _ => None,
        }
    }

    /// Arbitrate one bid. Checked in order: the auction must still be open,
    /// the deadline must not have passed (expiry wins over everything else,
    /// including a bid arriving in the same instant), and the amount must
    /// strictly exceed the current level.
    ///
    /// On acceptance the returned notices carry exactly one `Outbid` for the
    /// previous highest bidder, if one existed.
    pub fn add_bid(&self, bid: Bid) -> (Self, Result<Vec<Notice>, Errors>) {
        match self {
            AuctionState::EndedSold { .. } | AuctionState::EndedNoBids { .. } => {
                (self.clone(), Err(Errors::AuctionClosed(self.product_id())))
            },
            AuctionState::Open { product_id, base_price, ends_at, bids } => {
                if bid.at >= *ends_at {
                    return (self.clone(), Err(Errors::AuctionExpired(*product_id)));
                }

                let level = self.current_level();
                if bid.amount.value() <= level.value() {
                    return (self.clone(), Err(Errors::BidTooLow(level)));
                }

                let notices: Vec<Notice> = bids
                    .first()
                    .map(|previous| Notice {
                        recipient: previous.bidder.user_id().clone(),
                        event: Event::Outbid {
                            product_id: *product_id,
                            amount: bid.amount,
                        },
                    })
                    .into_iter()
                    .collect();

                let mut new_bids = bids.clone();
                new_bids.insert(0, bid);

                (
                    AuctionState::Open {
                        product_id: *product_id,
                        base_price: *base_price,
                        ends_at: *ends_at,
                        bids: new_bids,
                    },
                    Ok(notices),
                )
            },
        }
    }

    /// Close the auction, once. The first close of an open auction produces
    /// the outcome and its notices: `AuctionWon` to the winner plus one
    /// `AuctionEnded` per owner, or one `AuctionFailed` per owner when no
    /// bids came in. On an already-ended auction this returns the recorded
    /// outcome with no notices, so racing close attempts cannot double-fire.
    pub fn close(&self, owners: &[UserId]) -> (Self, CloseOutcome, Vec<Notice>) {
        match self {
            AuctionState::Open { product_id, base_price, ends_at, bids } => {
                match bids.first() {
                    Some(top) => {
                        let winner = top.bidder.user_id().clone();
                        let sale_price = top.amount;

                        let mut notices = vec![Notice {
                            recipient: winner.clone(),
                            event: Event::AuctionWon {
                                product_id: *product_id,
                                amount: sale_price,
                            },
                        }];
                        notices.extend(owners.iter().map(|owner| Notice {
                            recipient: owner.clone(),
                            event: Event::AuctionEnded {
                                product_id: *product_id,
                                winner: winner.clone(),
                                amount: sale_price,
                            },
                        }));

                        (
                            AuctionState::EndedSold {
                                product_id: *product_id,
                                base_price: *base_price,
                                ends_at: *ends_at,
                                bids: bids.clone(),
                                winner: winner.clone(),
                                sale_price,
                            },
                            CloseOutcome::Sold { winner, amount: sale_price },
                            notices,
                        )
                    },
                    None => {
                        let notices = owners
                            .iter()
                            .map(|owner| Notice {
                                recipient: owner.clone(),
                                event: Event::AuctionFailed {
                                    product_id: *product_id,
                                    base_price: *base_price,
                                },
                            })
                            .collect();

                        (
                            AuctionState::EndedNoBids {
                                product_id: *product_id,
                                base_price: *base_price,
                                ends_at: *ends_at,
                            },
                            CloseOutcome::NoBids,
                            notices,
                        )
                    },
                }
            },
            AuctionState::EndedSold { winner, sale_price, .. } => (
                self.clone(),
                CloseOutcome::Sold {
                    winner: winner.clone(),
                    amount: *sale_price,
                },
                Vec::new(),
            ),
            AuctionState::EndedNoBids { .. } => (self.clone(), CloseOutcome::NoBids, Vec::new()),
        }
    }

    /// Push the deadline out. Only an open auction can be extended.
    pub fn extend(&self, extra_days: i64) -> Result<Self, Errors> {
        match self {
            AuctionState::Open { product_id, base_price, ends_at, bids } => {
                Ok(AuctionState::Open {
                    product_id: *product_id,
                    base_price: *base_price,
                    ends_at: *ends_at + Duration::days(extra_days),
                    bids: bids.clone(),
                })
            },
            _ => Err(Errors::AuctionClosed(self.product_id())),
        }
    }
}
