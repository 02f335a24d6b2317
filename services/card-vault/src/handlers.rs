use crate::errors::Result;
use crate::metrics::metrics_handler;
use crate::models::{CardRequest, CustomerRequest, VerifyCardRequest};
use crate::services::VaultService;
use actix_web::{web, HttpResponse};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "card-vault",
        "version": "1.0.0"
    }))
}

pub async fn create_customer(
    service: web::Data<Arc<VaultService>>,
    request: web::Json<CustomerRequest>,
) -> Result<HttpResponse> {
    let customer = service.create_customer(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(customer))
}

pub async fn get_customer(
    service: web::Data<Arc<VaultService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let customer = service.get_customer(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(customer))
}

pub async fn list_customers(service: web::Data<Arc<VaultService>>) -> Result<HttpResponse> {
    let customers = service.list_customers().await?;
    Ok(HttpResponse::Ok().json(customers))
}

pub async fn update_customer(
    service: web::Data<Arc<VaultService>>,
    path: web::Path<Uuid>,
    request: web::Json<CustomerRequest>,
) -> Result<HttpResponse> {
    service
        .update_customer(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn delete_customer(
    service: web::Data<Arc<VaultService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let customer = service.delete_customer(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(customer))
}

pub async fn create_card(
    service: web::Data<Arc<VaultService>>,
    request: web::Json<CardRequest>,
) -> Result<HttpResponse> {
    let card = service.create_card(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(card))
}

pub async fn get_card(
    service: web::Data<Arc<VaultService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let card = service.get_card(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(card))
}

pub async fn get_customer_cards(
    service: web::Data<Arc<VaultService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let customer_id = path.into_inner();
    let cards = service.get_customer_cards(customer_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "customer_id": customer_id,
        "cards": cards
    })))
}

pub async fn update_card(
    service: web::Data<Arc<VaultService>>,
    path: web::Path<Uuid>,
    request: web::Json<CardRequest>,
) -> Result<HttpResponse> {
    service
        .update_card(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn delete_card(
    service: web::Data<Arc<VaultService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let card = service.delete_card(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(card))
}

pub async fn verify_card(
    service: web::Data<Arc<VaultService>>,
    request: web::Json<VerifyCardRequest>,
) -> Result<HttpResponse> {
    service.verify_card(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "verified": true })))
}

pub async fn metrics_endpoint() -> HttpResponse {
    match metrics_handler() {
        Ok(metrics) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(metrics),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/customers", web::post().to(create_customer))
            .route("/customers", web::get().to(list_customers))
            .route("/customers/{id}", web::get().to(get_customer))
            .route("/customers/{id}", web::put().to(update_customer))
            .route("/customers/{id}", web::delete().to(delete_customer))
            .route("/cards", web::post().to(create_card))
            .route("/cards/verify", web::post().to(verify_card))
            .route(
                "/cards/customer/{customer_id}",
                web::get().to(get_customer_cards),
            )
            .route("/cards/{id}", web::get().to(get_card))
            .route("/cards/{id}", web::put().to(update_card))
            .route("/cards/{id}", web::delete().to(delete_card)),
    )
    .route("/metrics", web::get().to(metrics_endpoint))
    .route("/health", web::get().to(health_check));
}
