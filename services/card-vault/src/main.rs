use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use card_vault::config::Config;
use card_vault::database::Database;
use card_vault::handlers::configure_routes;
use card_vault::services::VaultService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false)
        .init();

    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Invalid configuration");

    info!(
        "Starting Card Vault on {}:{}",
        config.server.host, config.server.port
    );

    let database = Arc::new(
        Database::new(&config.database.url, config.database.max_connections)
            .await
            .expect("Failed to connect to database"),
    );

    let service = Arc::new(VaultService::new(database.clone()));

    let bind_addr = (config.server.host.clone(), config.server.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(web::Data::new(service.clone()))
            .configure(configure_routes)
    })
    .workers(config.server.workers)
    .bind(bind_addr)?
    .run()
    .await
}
