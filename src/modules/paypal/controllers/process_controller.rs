use std::sync::Arc;

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::core::error::AppError;
use crate::modules::paypal::services::{PaypalApi, ProcessRegistry};

/// Poll a background checkout request
/// GET /paypal/processes/{token}
pub async fn get_process(
    registry: web::Data<ProcessRegistry>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let status = registry.status(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(status))
}

/// Confirm a buyer-approved order by reserving its funds
/// POST /paypal/communities/{community_id}/transactions/{transaction_id}/authorize
pub async fn authorize_payment(
    api: web::Data<Arc<dyn PaypalApi>>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (community_id, transaction_id) = path.into_inner();
    let payment = api.authorize(community_id, transaction_id).await?;
    Ok(HttpResponse::Ok().json(payment))
}

/// Configure PayPal routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/paypal")
            .route("/processes/{token}", web::get().to(get_process))
            .route(
                "/communities/{community_id}/transactions/{transaction_id}/authorize",
                web::post().to(authorize_payment),
            ),
    );
}
