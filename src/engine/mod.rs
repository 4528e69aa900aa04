// src/engine/mod.rs
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{info, warn};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{
    calc_amount, open_auction, validate_bid, AuctionState, Bid, CartLines, CloseOutcome, Command,
    CommandSuccess, DiscountPolicy, Errors, Listing, Notice, PolicyId, ProductId, Store, StoreId,
    UserId,
};
use crate::money::Amount;

/// Per-store engine record. Lock granularity follows the access patterns:
/// listings and owners sit under one read/write lock, the policy set is a
/// copy-on-write snapshot so pricing never observes a mutation mid-pass,
/// and every auction has its own mutex so bids on one product serialize
/// without blocking bids on any other.
struct StoreRecord {
    store: RwLock<Store>,
    policies: RwLock<Arc<Vec<DiscountPolicy>>>,
    auctions: DashMap<ProductId, Mutex<AuctionState>>,
}

impl StoreRecord {
    fn new(store: Store) -> Self {
        StoreRecord {
            store: RwLock::new(store),
            policies: RwLock::new(Arc::new(Vec::new())),
            auctions: DashMap::new(),
        }
    }
}

/// Read-only view of one store for callers outside the engine.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSnapshot {
    pub store: Store,
    pub auctions: Vec<AuctionState>,
    pub policies: Vec<DiscountPolicy>,
}

/// The marketplace: every store with its listings, discount policies and
/// auctions, behind per-key locks. There is deliberately no lock spanning
/// two stores or two auctions.
pub struct Marketplace {
    stores: DashMap<StoreId, StoreRecord>,
}

impl Default for Marketplace {
    fn default() -> Self {
        Self::new()
    }
}

impl Marketplace {
    pub fn new() -> Self {
        Marketplace {
            stores: DashMap::new(),
        }
    }

    /// Rebuild a marketplace from a command journal. Commands that no longer
    /// apply are logged and skipped rather than aborting the replay.
    pub fn replay<I>(commands: I) -> Self
    where
        I: IntoIterator<Item = Command>,
    {
        let marketplace = Marketplace::new();
        for command in commands {
            if let Err(err) = marketplace.handle(command) {
                warn!("Skipping journaled command on replay: {}", err);
            }
        }
        marketplace
    }

    /// Single entry point shared by the web layer and journal replay.
    pub fn handle(&self, command: Command) -> Result<(CommandSuccess, Vec<Notice>), Errors> {
        match command {
            Command::OpenStore { timestamp, store } => {
                let store = self.open_store(store)?;
                Ok((CommandSuccess::StoreOpened { timestamp, store }, Vec::new()))
            }

            Command::StockProduct { timestamp, store_id, listing } => {
                let listing = self.stock_product(store_id, listing)?;
                Ok((
                    CommandSuccess::ProductStocked { timestamp, store_id, listing },
                    Vec::new(),
                ))
            }

            Command::StartAuction { timestamp, store_id, product_id, duration_days } => {
                let auction = self.start_auction(store_id, product_id, timestamp, duration_days)?;
                Ok((
                    CommandSuccess::AuctionStarted { timestamp, store_id, auction },
                    Vec::new(),
                ))
            }

            Command::PlaceBid { timestamp, store_id, bid } => {
                let notices = self.place_bid(store_id, bid.clone())?;
                Ok((CommandSuccess::BidAccepted { timestamp, store_id, bid }, notices))
            }

            Command::EndAuction { timestamp, store_id, product_id } => {
                let (outcome, notices) = self.end_auction(store_id, product_id)?;
                Ok((
                    CommandSuccess::AuctionEnded { timestamp, store_id, product_id, outcome },
                    notices,
                ))
            }

            Command::ExtendAuction { timestamp, store_id, product_id, extra_days } => {
                let ends_at = self.extend_auction(store_id, product_id, extra_days)?;
                Ok((
                    CommandSuccess::AuctionExtended { timestamp, store_id, product_id, ends_at },
                    Vec::new(),
                ))
            }

            Command::AddDiscount { timestamp, store_id, policy } => {
                let policy_id = self.add_discount(store_id, policy)?;
                Ok((
                    CommandSuccess::DiscountAdded { timestamp, store_id, policy_id },
                    Vec::new(),
                ))
            }

            Command::RemoveDiscount { timestamp, store_id, policy_id } => {
                self.remove_discount(store_id, policy_id)?;
                Ok((
                    CommandSuccess::DiscountRemoved { timestamp, store_id, policy_id },
                    Vec::new(),
                ))
            }
        }
    }

    pub fn open_store(&self, store: Store) -> Result<Store, Errors> {
        match self.stores.entry(store.store_id) {
            Entry::Occupied(_) => Err(Errors::StoreAlreadyExists(store.store_id)),
            Entry::Vacant(vacant) => {
                vacant.insert(StoreRecord::new(store.clone()));
                Ok(store)
            }
        }
    }

    /// List a new product. Listings are immutable after creation except for
    /// stock adjustments, which live outside this core.
    pub fn stock_product(&self, store_id: StoreId, listing: Listing) -> Result<Listing, Errors> {
        self.with_record(store_id, |record| {
            let mut store = record.store.write();
            if store.listings.contains_key(&listing.product_id) {
                return Err(Errors::ProductAlreadyListed(listing.product_id));
            }
            store.listings.insert(listing.product_id, listing.clone());
            Ok(listing)
        })
    }

    pub fn start_auction(
        &self,
        store_id: StoreId,
        product_id: ProductId,
        now: DateTime<Utc>,
        duration_days: i64,
    ) -> Result<AuctionState, Errors> {
        self.with_record(store_id, |record| {
            let store = record.store.read();
            let listing = store
                .listings
                .get(&product_id)
                .ok_or(Errors::UnknownProduct(product_id))?;

            match record.auctions.entry(product_id) {
                Entry::Occupied(_) => Err(Errors::AuctionAlreadyExists(product_id)),
                Entry::Vacant(vacant) => {
                    let auction = open_auction(listing, now, duration_days);
                    vacant.insert(Mutex::new(auction.clone()));
                    Ok(auction)
                }
            }
        })
    }

    /// Place a bid. Bids on the same auction queue on that auction's mutex
    /// and are arbitrated one at a time in arrival order; bids on different
    /// auctions do not contend.
    pub fn place_bid(&self, store_id: StoreId, bid: Bid) -> Result<Vec<Notice>, Errors> {
        self.with_record(store_id, |record| {
            let (currency, owners) = {
                let store = record.store.read();
                (store.store_currency, store.owners.clone())
            };
            validate_bid(&bid, currency, &owners)?;

            let entry = record
                .auctions
                .get(&bid.for_product)
                .ok_or(Errors::UnknownAuction(bid.for_product))?;

            let mut auction = entry.lock();
            let (next, result) = auction.add_bid(bid);
            let notices = result?;
            *auction = next;
            Ok(notices)
        })
    }

    /// Explicit close trigger. Safe to race with the deadline sweep: the
    /// state machine records the outcome once and every later close returns
    /// it without side effects.
    pub fn end_auction(
        &self,
        store_id: StoreId,
        product_id: ProductId,
    ) -> Result<(CloseOutcome, Vec<Notice>), Errors> {
        self.with_record(store_id, |record| {
            let owners = record.store.read().owners.clone();

            let entry = record
                .auctions
                .get(&product_id)
                .ok_or(Errors::UnknownAuction(product_id))?;

            let mut auction = entry.lock();
            let (next, outcome, notices) = auction.close(&owners);
            *auction = next;
            Ok((outcome, notices))
        })
    }

    pub fn extend_auction(
        &self,
        store_id: StoreId,
        product_id: ProductId,
        extra_days: i64,
    ) -> Result<DateTime<Utc>, Errors> {
        self.with_record(store_id, |record| {
            let entry = record
                .auctions
                .get(&product_id)
                .ok_or(Errors::UnknownAuction(product_id))?;

            let mut auction = entry.lock();
            let next = auction.extend(extra_days)?;
            let ends_at = next.ends_at();
            *auction = next;
            Ok(ends_at)
        })
    }

    /// Deadline sweep: close every open auction whose deadline has passed.
    /// Any reader may act on expiry, so this is just `close` applied to the
    /// auctions a comparison against `now` selects.
    pub fn close_due_auctions(
        &self,
        now: DateTime<Utc>,
    ) -> Vec<(StoreId, ProductId, CloseOutcome, Vec<Notice>)> {
        let mut closed = Vec::new();

        for record in self.stores.iter() {
            let store_id = *record.key();
            let owners = record.store.read().owners.clone();

            for entry in record.auctions.iter() {
                let mut auction = entry.lock();
                if auction.has_ended() || auction.ends_at() > now {
                    continue;
                }

                let (next, outcome, notices) = auction.close(&owners);
                *auction = next;
                info!("Auction {} in store {} closed by sweep", entry.key(), store_id);
                closed.push((store_id, *entry.key(), outcome, notices));
            }
        }

        closed
    }

    /// Install a policy tree and return its root id. The policy set is
    /// replaced as a whole so in-flight pricing passes keep reading the
    /// snapshot they started with.
    pub fn add_discount(
        &self,
        store_id: StoreId,
        policy: DiscountPolicy,
    ) -> Result<PolicyId, Errors> {
        self.with_record(store_id, |record| {
            let policy_id = policy.policy_id;
            let mut policies = record.policies.write();
            let mut next = policies.as_ref().clone();
            next.push(policy);
            *policies = Arc::new(next);
            Ok(policy_id)
        })
    }

    /// Remove the policy tree rooted at `policy_id`. A combinator is one
    /// rule: removing it drops both children with it.
    pub fn remove_discount(&self, store_id: StoreId, policy_id: PolicyId) -> Result<(), Errors> {
        self.with_record(store_id, |record| {
            let mut policies = record.policies.write();
            let mut next = policies.as_ref().clone();

            let position = next
                .iter()
                .position(|policy| policy.policy_id == policy_id)
                .ok_or(Errors::UnknownPolicy(policy_id))?;
            next.remove(position);

            *policies = Arc::new(next);
            Ok(())
        })
    }

    /// The charge for one store's portion of a cart.
    pub fn quote(
        &self,
        store_id: StoreId,
        buyer: &UserId,
        lines: &CartLines,
    ) -> Result<Amount, Errors> {
        self.with_record(store_id, |record| {
            let policies = record.policies.read().clone();
            let store = record.store.read();

            let mut auction_states = HashMap::new();
            for product_id in lines.keys() {
                if let Some(entry) = record.auctions.get(product_id) {
                    auction_states.insert(*product_id, entry.lock().clone());
                }
            }

            calc_amount(&store, &auction_states, &policies, buyer, lines)
        })
    }

    pub fn is_owner(&self, store_id: StoreId, user_id: &UserId) -> Result<bool, Errors> {
        self.with_record(store_id, |record| Ok(record.store.read().is_owner(user_id)))
    }

    pub fn stores(&self) -> Vec<Store> {
        self.stores
            .iter()
            .map(|record| record.store.read().clone())
            .collect()
    }

    pub fn snapshot(&self, store_id: StoreId) -> Result<StoreSnapshot, Errors> {
        self.with_record(store_id, |record| {
            let store = record.store.read().clone();
            let policies = record.policies.read().as_ref().clone();
            let auctions = record
                .auctions
                .iter()
                .map(|entry| entry.lock().clone())
                .collect();

            Ok(StoreSnapshot { store, auctions, policies })
        })
    }

    fn with_record<R, F>(&self, store_id: StoreId, f: F) -> Result<R, Errors>
    where
        F: FnOnce(&StoreRecord) -> Result<R, Errors>,
    {
        match self.stores.get(&store_id) {
            Some(record) => f(&record),
            None => Err(Errors::UnknownStore(store_id)),
        }
    }
}
