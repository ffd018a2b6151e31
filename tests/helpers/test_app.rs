// Test Application Builder
//
// Assembles the same routes as src/main.rs around a FakePaypal.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, Error};

use paybridge::gateways::{FreeAdapter, GatewayService, PaypalAdapter};
use paybridge::middleware::RequestId;
use paybridge::paypal::PaypalApi;

use super::fake_paypal::FakePaypal;

/// Gateway service with the PayPal and free adapters registered
pub fn gateway_service(paypal: Arc<dyn PaypalApi>) -> Arc<GatewayService> {
    let mut service = GatewayService::new();
    service.register_adapter(Arc::new(PaypalAdapter::new(paypal)));
    service.register_adapter(Arc::new(FreeAdapter::new()));
    Arc::new(service)
}

/// Application with all API routes mounted under /api/v1
pub fn build_app(
    paypal: Arc<FakePaypal>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let api: Arc<dyn PaypalApi> = paypal.clone();

    App::new()
        .wrap(RequestId)
        .app_data(web::Data::new(gateway_service(Arc::clone(&api))))
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(paypal.processes().clone()))
        .service(
            web::scope("/api/v1")
                .configure(paybridge::gateways::configure)
                .configure(paybridge::paypal::configure),
        )
}
