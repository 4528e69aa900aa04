use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::info;
use market_site::engine::Marketplace;
use market_site::persistence::json_file::read_commands;
use market_site::web::app::{configure_app, init_app_state, sweep_due_auctions, JOURNAL_PATH};
use std::sync::Arc;
use std::time::Duration;

// Main application
pub async fn run_app(port: u16) -> std::io::Result<()> {
    std::env::set_var("RUST_LOG", "actix_web=info");
    env_logger::init();

    let marketplace = match read_commands(JOURNAL_PATH) {
        Ok(commands) => {
            info!("Replaying {} journaled commands", commands.len());
            Arc::new(Marketplace::replay(commands))
        },
        Err(_) => init_app_state(),
    };

    info!("Starting server on port {}", port);

    let sweeper = marketplace.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            sweep_due_auctions(&sweeper);
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(marketplace.clone()))
            .wrap(Logger::default())
            .configure(configure_app)
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    run_app(8080).await
}
