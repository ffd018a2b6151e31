use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::gateways::models::CompletionBody;
use crate::modules::gateways::services::gateway_service::GatewayService;
use crate::modules::transactions::{GatewayFields, TransactionRecord};

#[derive(Debug, Deserialize)]
pub struct CreatePaymentBody {
    pub transaction: TransactionRecord,
    pub gateway_fields: GatewayFields,
    #[serde(default)]
    pub prefer_async: bool,
}

#[derive(Debug, Deserialize)]
pub struct RejectPaymentBody {
    pub transaction: TransactionRecord,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct TransactionBody {
    pub transaction: TransactionRecord,
}

/// List all available payment gateways
/// GET /gateways
/// Returns gateways with the payment processes they implement
pub async fn list_gateways(
    service: web::Data<Arc<GatewayService>>,
) -> Result<HttpResponse, AppError> {
    let gateways = service.list_gateways();
    Ok(HttpResponse::Ok().json(gateways))
}

/// Start a payment for a transaction
/// POST /payments
pub async fn create_payment(
    service: web::Data<Arc<GatewayService>>,
    body: web::Json<CreatePaymentBody>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let completion = service
        .create_payment(&body.transaction, &body.gateway_fields, body.prefer_async)
        .await?;

    Ok(HttpResponse::Ok().json(CompletionBody::from(completion)))
}

/// Void a preauthorized payment
/// POST /payments/reject
pub async fn reject_payment(
    service: web::Data<Arc<GatewayService>>,
    body: web::Json<RejectPaymentBody>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let completion = service
        .reject_payment(&body.transaction, &body.reason)
        .await?;

    Ok(HttpResponse::Ok().json(CompletionBody::from(completion)))
}

/// Capture a preauthorized payment
/// POST /payments/complete
pub async fn complete_preauthorization(
    service: web::Data<Arc<GatewayService>>,
    body: web::Json<TransactionBody>,
) -> Result<HttpResponse, AppError> {
    let completion = service
        .complete_preauthorization(&body.transaction)
        .await?;

    Ok(HttpResponse::Ok().json(CompletionBody::from(completion)))
}

/// Payment figures for a transaction
/// POST /payments/details
pub async fn get_payment_details(
    service: web::Data<Arc<GatewayService>>,
    body: web::Json<TransactionBody>,
) -> Result<HttpResponse, AppError> {
    let details = service.get_payment_details(&body.transaction).await?;
    Ok(HttpResponse::Ok().json(details))
}

/// Configure gateway routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/gateways").route("", web::get().to(list_gateways)))
        .service(
            web::scope("/payments")
                .route("", web::post().to(create_payment))
                .route("/reject", web::post().to(reject_payment))
                .route("/complete", web::post().to(complete_preauthorization))
                .route("/details", web::post().to(get_payment_details)),
        );
}
