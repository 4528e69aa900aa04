use actix_web::{web, HttpRequest, HttpResponse, Result};
use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use log::{info, warn};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Bid, Command, ProductId, StoreId, User};
use crate::engine::Marketplace;
use crate::persistence::json_file::append_command;
use super::types::{
    ApiError, AppState, BidRequest, CommandOutcome, DiscountRequest, ExtendAuctionRequest,
    OpenStoreRequest, QuoteRequest, QuoteResponse, StartAuctionRequest, StockProductRequest,
    StoreDetail, StoreItem,
};

pub const JOURNAL_PATH: &str = "marketplace-commands.jsonl";

// Initialize application state
pub fn init_app_state() -> AppState {
    Arc::new(Marketplace::new())
}

// Read x-jwt-payload header and extract user information
fn get_auth_user(req: &HttpRequest) -> Option<User> {
    let auth_header = req.headers().get("x-jwt-payload")?;
    let auth_str = auth_header.to_str().ok()?;

    // Decode base64
    let decoded = general_purpose::STANDARD.decode(auth_str).ok()?;
    let json_str = String::from_utf8(decoded).ok()?;

    // Parse JSON
    let json: Value = serde_json::from_str(&json_str).ok()?;

    // Extract user fields
    let sub = json.get("sub")?.as_str()?;
    let u_typ = json.get("u_typ")?.as_str()?;

    if u_typ == "0" {
        let name = json.get("name")?.as_str()?;
        Some(User::Member {
            user_id: sub.to_string(),
            name: name.to_string(),
        })
    } else if u_typ == "1" {
        Some(User::Support {
            user_id: sub.to_string(),
        })
    } else {
        None
    }
}

// Middleware to require authentication
async fn with_auth<F>(req: HttpRequest, f: F) -> Result<HttpResponse>
where
    F: FnOnce(User) -> Result<HttpResponse>
{
    match get_auth_user(&req) {
        Some(user) => {
            let result = f(user)?;
            Ok(result)
        },
        None => {
            Ok(HttpResponse::Unauthorized().body("Unauthorized"))
        }
    }
}

// Handle a command: apply it to the marketplace and append it to the journal
fn submit(data: &web::Data<Marketplace>, command: Command) -> HttpResponse {
    match data.handle(command.clone()) {
        Ok((result, notices)) => {
            if let Err(err) = append_command(JOURNAL_PATH, &command) {
                warn!("Failed to journal command: {}", err);
            }
            HttpResponse::Ok().json(CommandOutcome { result, notices })
        },
        Err(err) => {
            HttpResponse::BadRequest().json(ApiError { message: format!("{}", err) })
        }
    }
}

// Store management operations require ownership
fn owner_guard(data: &web::Data<Marketplace>, store_id: StoreId, user: &User) -> Option<HttpResponse> {
    match data.is_owner(store_id, user.user_id()) {
        Ok(true) => None,
        Ok(false) => Some(HttpResponse::Forbidden().json(ApiError {
            message: "Only store owners may do that".to_string(),
        })),
        Err(err) => Some(HttpResponse::BadRequest().json(ApiError {
            message: format!("{}", err),
        })),
    }
}

// Get all stores
async fn get_stores(data: web::Data<Marketplace>) -> Result<HttpResponse> {
    let store_list: Vec<StoreItem> = data.stores().iter().map(StoreItem::from).collect();

    Ok(HttpResponse::Ok().json(store_list))
}

// Get store by ID
async fn get_store(
    path: web::Path<StoreId>,
    data: web::Data<Marketplace>
) -> Result<HttpResponse> {
    let store_id = path.into_inner();

    match data.snapshot(store_id) {
        Ok(snapshot) => Ok(HttpResponse::Ok().json(StoreDetail::from(snapshot))),
        Err(_) => {
            let error = ApiError {
                message: "Store not found".to_string(),
            };
            Ok(HttpResponse::NotFound().json(error))
        }
    }
}

// Open a new store
async fn create_store(
    req: HttpRequest,
    store_req: web::Json<OpenStoreRequest>,
    data: web::Data<Marketplace>
) -> Result<HttpResponse> {
    with_auth(req, |user| {
        let store = store_req.to_store(user);
        let command = Command::OpenStore {
            timestamp: Utc::now(),
            store,
        };

        Ok(submit(&data, command))
    }).await
}

// List a product in a store
async fn stock_product(
    req: HttpRequest,
    path: web::Path<StoreId>,
    product_req: web::Json<StockProductRequest>,
    data: web::Data<Marketplace>
) -> Result<HttpResponse> {
    let store_id = path.into_inner();

    with_auth(req, |user| {
        if let Some(denied) = owner_guard(&data, store_id, &user) {
            return Ok(denied);
        }

        let command = Command::StockProduct {
            timestamp: Utc::now(),
            store_id,
            listing: product_req.to_listing(),
        };

        Ok(submit(&data, command))
    }).await
}

// Put a product up for auction
async fn start_auction(
    req: HttpRequest,
    path: web::Path<StoreId>,
    auction_req: web::Json<StartAuctionRequest>,
    data: web::Data<Marketplace>
) -> Result<HttpResponse> {
    let store_id = path.into_inner();

    with_auth(req, |user| {
        if let Some(denied) = owner_guard(&data, store_id, &user) {
            return Ok(denied);
        }

        let command = Command::StartAuction {
            timestamp: Utc::now(),
            store_id,
            product_id: auction_req.product_id,
            duration_days: auction_req.duration_days,
        };

        Ok(submit(&data, command))
    }).await
}

// Place a bid on a product's auction
async fn place_bid(
    req: HttpRequest,
    path: web::Path<(StoreId, ProductId)>,
    bid_req: web::Json<BidRequest>,
    data: web::Data<Marketplace>
) -> Result<HttpResponse> {
    let (store_id, product_id) = path.into_inner();

    with_auth(req, |user| {
        let now = Utc::now();

        let bid = Bid {
            for_product: product_id,
            bidder: user,
            at: now,
            amount: bid_req.amount,
        };

        let command = Command::PlaceBid {
            timestamp: now,
            store_id,
            bid,
        };

        Ok(submit(&data, command))
    }).await
}

// End an auction before its deadline
async fn end_auction(
    req: HttpRequest,
    path: web::Path<(StoreId, ProductId)>,
    data: web::Data<Marketplace>
) -> Result<HttpResponse> {
    let (store_id, product_id) = path.into_inner();

    with_auth(req, |user| {
        if let Some(denied) = owner_guard(&data, store_id, &user) {
            return Ok(denied);
        }

        let command = Command::EndAuction {
            timestamp: Utc::now(),
            store_id,
            product_id,
        };

        Ok(submit(&data, command))
    }).await
}

// Push an auction's deadline out
async fn extend_auction(
    req: HttpRequest,
    path: web::Path<(StoreId, ProductId)>,
    extend_req: web::Json<ExtendAuctionRequest>,
    data: web::Data<Marketplace>
) -> Result<HttpResponse> {
    let (store_id, product_id) = path.into_inner();

    with_auth(req, |user| {
        if let Some(denied) = owner_guard(&data, store_id, &user) {
            return Ok(denied);
        }

        let command = Command::ExtendAuction {
            timestamp: Utc::now(),
            store_id,
            product_id,
            extra_days: extend_req.extra_days,
        };

        Ok(submit(&data, command))
    }).await
}

// Install a discount policy
async fn add_discount(
    req: HttpRequest,
    path: web::Path<StoreId>,
    discount_req: web::Json<DiscountRequest>,
    data: web::Data<Marketplace>
) -> Result<HttpResponse> {
    let store_id = path.into_inner();

    with_auth(req, |user| {
        if let Some(denied) = owner_guard(&data, store_id, &user) {
            return Ok(denied);
        }

        let policy = match discount_req.to_policy() {
            Ok(policy) => policy,
            Err(err) => {
                return Ok(HttpResponse::BadRequest().json(ApiError {
                    message: format!("{}", err),
                }));
            }
        };

        let command = Command::AddDiscount {
            timestamp: Utc::now(),
            store_id,
            policy,
        };

        Ok(submit(&data, command))
    }).await
}

// Remove a discount policy by its id
async fn remove_discount(
    req: HttpRequest,
    path: web::Path<(StoreId, Uuid)>,
    data: web::Data<Marketplace>
) -> Result<HttpResponse> {
    let (store_id, policy_id) = path.into_inner();

    with_auth(req, |user| {
        if let Some(denied) = owner_guard(&data, store_id, &user) {
            return Ok(denied);
        }

        let command = Command::RemoveDiscount {
            timestamp: Utc::now(),
            store_id,
            policy_id,
        };

        Ok(submit(&data, command))
    }).await
}

// Price a cart's store portion for the calling user
async fn quote(
    req: HttpRequest,
    path: web::Path<StoreId>,
    quote_req: web::Json<QuoteRequest>,
    data: web::Data<Marketplace>
) -> Result<HttpResponse> {
    let store_id = path.into_inner();

    with_auth(req, |user| {
        match data.quote(store_id, user.user_id(), &quote_req.lines) {
            Ok(amount) => Ok(HttpResponse::Ok().json(QuoteResponse { amount })),
            Err(err) => Ok(HttpResponse::BadRequest().json(ApiError {
                message: format!("{}", err),
            })),
        }
    }).await
}

/// Close every auction whose deadline has passed and journal the closes so
/// a replay ends the same auctions.
pub fn sweep_due_auctions(marketplace: &Marketplace) {
    let now = Utc::now();

    for (store_id, product_id, outcome, notices) in marketplace.close_due_auctions(now) {
        let command = Command::EndAuction {
            timestamp: now,
            store_id,
            product_id,
        };
        if let Err(err) = append_command(JOURNAL_PATH, &command) {
            warn!("Failed to journal sweep close: {}", err);
        }

        info!(
            "Auction {} in store {} ended: {:?} ({} notices to deliver)",
            product_id,
            store_id,
            outcome,
            notices.len()
        );
    }
}

// Configure routes
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .route("/stores", web::get().to(get_stores))
            .route("/stores", web::post().to(create_store))
            .route("/stores/{id}", web::get().to(get_store))
            .route("/stores/{id}/products", web::post().to(stock_product))
            .route("/stores/{id}/auctions", web::post().to(start_auction))
            .route("/stores/{id}/auctions/{product_id}/bids", web::post().to(place_bid))
            .route("/stores/{id}/auctions/{product_id}/close", web::post().to(end_auction))
            .route("/stores/{id}/auctions/{product_id}/extension", web::post().to(extend_auction))
            .route("/stores/{id}/discounts", web::post().to(add_discount))
            .route("/stores/{id}/discounts/{policy_id}", web::delete().to(remove_discount))
            .route("/stores/{id}/quote", web::post().to(quote))
    );
}
