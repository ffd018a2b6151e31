use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer};
use paybridge::config::{AppConfig, Config};
use paybridge::gateways::{FreeAdapter, GatewayService, PaypalAdapter};
use paybridge::middleware::RequestId;
use paybridge::paypal::{PaymentStore, PaypalApi, PaypalClient, ProcessRegistry};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    init_tracing(&config.app);

    tracing::info!("Starting PayBridge payment gateway adapter");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("PayPal API: {}", config.paypal.base_url);

    let processes = ProcessRegistry::new();
    let paypal: Arc<dyn PaypalApi> = Arc::new(PaypalClient::new(
        config.paypal.clone(),
        PaymentStore::new(),
        processes.clone(),
    )?);

    let mut gateways = GatewayService::new();
    gateways.register_adapter(Arc::new(PaypalAdapter::new(Arc::clone(&paypal))));
    gateways.register_adapter(Arc::new(FreeAdapter::new()));
    let gateways = Arc::new(gateways);

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(gateways.clone()))
            .app_data(web::Data::new(paypal.clone()))
            .app_data(web::Data::new(processes.clone()))
            .route("/health", web::get().to(health_check))
            .route("/", web::get().to(index))
            .service(
                web::scope("/api/v1")
                    .configure(paybridge::gateways::configure)
                    .configure(paybridge::paypal::configure),
            )
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}

fn init_tracing(app: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("paybridge={},actix_web=info", app.log_level).into());
    let json = app.is_production();

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "paybridge"
    }))
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "PayBridge payment gateway adapter",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}
