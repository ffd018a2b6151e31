use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::api::PaypalApi;
use super::payment_store::PaymentStore;
use super::process_registry::ProcessRegistry;
use crate::config::PaypalConfig;
use crate::core::{AppError, Money, Result};
use crate::modules::paypal::models::{
    CreatePaymentRequest, Payment, PaymentInfo, PaymentState, RequestOutcome, VoidInfo,
};

/// Tokens are refreshed this long before PayPal says they expire
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// PayPal REST client (Orders v2 and Payments v2)
///
/// Checkouts are created with intent `AUTHORIZE`, so funds are only
/// collected by an explicit capture.
/// API Documentation: https://developer.paypal.com/docs/api/orders/v2/
#[derive(Clone)]
pub struct PaypalClient {
    http: Client,
    config: Arc<PaypalConfig>,
    token: Arc<RwLock<Option<AccessToken>>>,
    store: PaymentStore,
    processes: ProcessRegistry,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl PaypalClient {
    /// Create a new PayPal client
    ///
    /// # Arguments
    /// * `config` - REST app credentials, base URL and timeout
    /// * `store` - local payment records
    /// * `processes` - registry for checkouts requested asynchronously
    pub fn new(config: PaypalConfig, store: PaymentStore, processes: ProcessRegistry) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                AppError::Configuration(format!("Failed to build PayPal HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            config: Arc::new(config),
            token: Arc::new(RwLock::new(None)),
            store,
            processes,
        })
    }

    pub fn store(&self) -> &PaymentStore {
        &self.store
    }

    pub fn processes(&self) -> &ProcessRegistry {
        &self.processes
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Client-credentials access token, cached until shortly before expiry
    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.value.clone());
            }
        }

        let response = self
            .http
            .post(self.url("/v1/oauth2/token"))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .header("Accept", "application/json")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| request_error("token", e))?;

        let token: TokenResponse = parse_json("token", response).await?;
        let lifetime = token.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS).max(0);

        *self.token.write().await = Some(AccessToken {
            value: token.access_token.clone(),
            expires_at: Utc::now() + Duration::seconds(lifetime),
        });

        debug!(expires_in = token.expires_in, "Fetched PayPal access token");
        Ok(token.access_token)
    }

    /// Send an authorized request and return the raw body of a 2xx response
    async fn execute(&self, operation: &str, request: RequestBuilder) -> Result<String> {
        let token = self.access_token().await?;
        let response = request
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| request_error(operation, e))?;

        read_body(operation, response).await
    }

    async fn send<T: DeserializeOwned>(&self, operation: &str, request: RequestBuilder) -> Result<T> {
        let body = self.execute(operation, request).await?;
        serde_json::from_str(&body).map_err(|e| {
            AppError::gateway(format!("Failed to parse PayPal {} response: {}", operation, e))
        })
    }

    /// Create the PayPal order and record it locally
    async fn create_order(&self, community_id: i64, info: CreatePaymentRequest) -> Result<RequestOutcome> {
        let currency = info.order_total.currency.code();
        let mut application_context = json!({
            "return_url": info.success,
            "cancel_url": info.cancel,
            "user_action": "CONTINUE",
            "shipping_preference": "NO_SHIPPING",
        });
        if let Some(brand_name) = &self.config.brand_name {
            application_context["brand_name"] = json!(brand_name);
        }

        let body = json!({
            "intent": "AUTHORIZE",
            "purchase_units": [{
                "reference_id": info.transaction_id.to_string(),
                "custom_id": info.merchant_id,
                "amount": {
                    "currency_code": currency,
                    "value": info.order_total.to_gateway_value(),
                    "breakdown": {
                        "item_total": {
                            "currency_code": currency,
                            "value": info.order_total.to_gateway_value(),
                        }
                    }
                },
                "items": [{
                    "name": info.item_name,
                    "quantity": info.item_quantity.to_string(),
                    "unit_amount": {
                        "currency_code": currency,
                        "value": info.item_price.to_gateway_value(),
                    }
                }]
            }],
            "application_context": application_context,
        });

        let order: OrderResponse = self
            .send(
                "create order",
                self.http.post(self.url("/v2/checkout/orders")).json(&body),
            )
            .await?;

        let redirect_url = order
            .links
            .iter()
            .find(|link| link.rel == "approve" || link.rel == "payer-action")
            .map(|link| link.href.clone())
            .ok_or_else(|| {
                AppError::gateway(format!("PayPal order {} has no approval link", order.id))
            })?;

        let now = Utc::now();
        self.store
            .insert(Payment {
                community_id,
                transaction_id: info.transaction_id,
                merchant_id: info.merchant_id,
                order_id: order.id.clone(),
                authorization_id: None,
                capture_id: None,
                state: PaymentState::Pending,
                order_total: info.order_total,
                authorization_total: None,
                payment_total: None,
                fee_total: None,
                commission_total: None,
                merchant_brand_logo_url: info.merchant_brand_logo_url,
                note: None,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(
            community_id,
            transaction_id = info.transaction_id,
            order_id = %order.id,
            "PayPal order created"
        );

        Ok(RequestOutcome::Redirect {
            token: order.id,
            redirect_url,
        })
    }

    /// Project a fetched order onto the stored payment
    async fn record_order(&self, payment: &Payment, order: &OrderResponse) -> Result<Payment> {
        let projection = OrderProjection::from_order(order)?;
        self.store
            .update(payment.community_id, payment.transaction_id, |p| {
                projection.apply(p)
            })
            .await
    }
}

#[async_trait]
impl PaypalApi for PaypalClient {
    async fn request(
        &self,
        community_id: i64,
        info: CreatePaymentRequest,
        prefer_async: bool,
    ) -> Result<RequestOutcome> {
        info.validate()?;
        self.store
            .ensure_replaceable(community_id, info.transaction_id)
            .await?;

        if prefer_async {
            let client = self.clone();
            let process_token = self
                .processes
                .start("create_payment", async move {
                    client.create_order(community_id, info).await
                })
                .await;
            return Ok(RequestOutcome::Process { process_token });
        }

        self.create_order(community_id, info).await
    }

    async fn void(&self, community_id: i64, transaction_id: i64, info: VoidInfo) -> Result<Payment> {
        let payment = self.store.get(community_id, transaction_id).await?;
        if payment.state == PaymentState::Voided {
            debug!(community_id, transaction_id, "PayPal payment already voided");
            return Ok(payment);
        }
        if payment.state == PaymentState::Captured {
            return Err(AppError::validation(format!(
                "PayPal payment for transaction {} is already captured",
                transaction_id
            )));
        }

        // Without an authorization there is nothing to release remotely,
        // the unapproved order simply expires.
        if let Some(authorization_id) = &payment.authorization_id {
            self.execute(
                "void",
                self.http.post(self.url(&format!(
                    "/v2/payments/authorizations/{}/void",
                    authorization_id
                ))),
            )
            .await?;
        }

        let note = Some(info.note).filter(|note| !note.is_empty());
        let payment = self
            .store
            .update(community_id, transaction_id, |p| {
                p.state = PaymentState::Voided;
                p.note = note;
            })
            .await?;

        info!(community_id, transaction_id, "PayPal payment voided");
        Ok(payment)
    }

    async fn get_payment(&self, community_id: i64, transaction_id: i64) -> Result<Payment> {
        let payment = self.store.get(community_id, transaction_id).await?;
        let order: OrderResponse = self
            .send(
                "get order",
                self.http
                    .get(self.url(&format!("/v2/checkout/orders/{}", payment.order_id))),
            )
            .await?;

        self.record_order(&payment, &order).await
    }

    async fn full_capture(
        &self,
        community_id: i64,
        transaction_id: i64,
        info: PaymentInfo,
    ) -> Result<Payment> {
        let payment = self.store.get(community_id, transaction_id).await?;
        if payment.state == PaymentState::Voided {
            return Err(AppError::validation(format!(
                "PayPal payment for transaction {} is voided",
                transaction_id
            )));
        }

        let authorization_id = payment.authorization_id.as_ref().ok_or_else(|| {
            AppError::validation(format!(
                "PayPal payment for transaction {} has no authorization to capture",
                transaction_id
            ))
        })?;

        let body = json!({
            "amount": {
                "currency_code": info.payment_total.currency.code(),
                "value": info.payment_total.to_gateway_value(),
            },
            "invoice_id": transaction_id.to_string(),
            "final_capture": true,
        });

        let capture: CaptureResource = self
            .send(
                "capture",
                self.http
                    .post(self.url(&format!(
                        "/v2/payments/authorizations/{}/capture",
                        authorization_id
                    )))
                    .header("Prefer", "return=representation")
                    .json(&body),
            )
            .await?;

        let payment_total = capture.amount_money()?.unwrap_or(info.payment_total);
        let fee_total = capture.fee_money()?;
        let payment = self
            .store
            .update(community_id, transaction_id, |p| {
                p.capture_id = Some(capture.id.clone());
                p.payment_total = Some(payment_total);
                p.fee_total = fee_total;
                p.state = PaymentState::Captured;
            })
            .await?;

        info!(
            community_id,
            transaction_id,
            capture_id = %capture.id,
            payment_total = %payment_total,
            "PayPal payment captured"
        );
        Ok(payment)
    }

    async fn authorize(&self, community_id: i64, transaction_id: i64) -> Result<Payment> {
        let payment = self.store.get(community_id, transaction_id).await?;
        let order: OrderResponse = self
            .send(
                "authorize",
                self.http
                    .post(self.url(&format!(
                        "/v2/checkout/orders/{}/authorize",
                        payment.order_id
                    )))
                    .header("Prefer", "return=representation")
                    .json(&json!({})),
            )
            .await?;

        let payment = self.record_order(&payment, &order).await?;
        info!(
            community_id,
            transaction_id,
            order_id = %payment.order_id,
            "PayPal order authorized"
        );
        Ok(payment)
    }
}

fn request_error(operation: &str, e: reqwest::Error) -> AppError {
    if e.is_connect() || e.is_timeout() {
        AppError::gateway(format!(
            "PayPal gateway unavailable during {}: {} ({})",
            operation,
            if e.is_timeout() {
                "timeout"
            } else {
                "connection failed"
            },
            e
        ))
    } else {
        AppError::gateway(format!("PayPal {} request failed: {}", operation, e))
    }
}

async fn read_body(operation: &str, response: Response) -> Result<String> {
    let status_code = response.status();
    let body = response.text().await.map_err(|e| {
        AppError::gateway(format!("Failed to read PayPal {} response: {}", operation, e))
    })?;

    if !status_code.is_success() {
        return Err(AppError::gateway(format!(
            "PayPal {} failed - HTTP {} ({})",
            operation,
            status_code.as_u16(),
            body
        )));
    }

    Ok(body)
}

async fn parse_json<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T> {
    let body = read_body(operation, response).await?;
    serde_json::from_str(&body).map_err(|e| {
        AppError::gateway(format!("Failed to parse PayPal {} response: {}", operation, e))
    })
}

// PayPal API response structures

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct PaypalAmount {
    currency_code: String,
    value: String,
}

impl PaypalAmount {
    fn to_money(&self) -> Result<Money> {
        Money::from_gateway(&self.value, &self.currency_code)
            .map_err(|e| AppError::gateway(format!("PayPal returned an invalid amount: {}", e)))
    }
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
    rel: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    #[serde(default)]
    links: Vec<Link>,
    #[serde(default)]
    purchase_units: Vec<PurchaseUnit>,
}

#[derive(Debug, Deserialize)]
struct PurchaseUnit {
    #[serde(default)]
    payments: Option<PaymentCollection>,
}

#[derive(Debug, Default, Deserialize)]
struct PaymentCollection {
    #[serde(default)]
    authorizations: Vec<AuthorizationResource>,
    #[serde(default)]
    captures: Vec<CaptureResource>,
}

#[derive(Debug, Deserialize)]
struct AuthorizationResource {
    id: String,
    status: String,
    amount: Option<PaypalAmount>,
}

#[derive(Debug, Deserialize)]
struct CaptureResource {
    id: String,
    amount: Option<PaypalAmount>,
    seller_receivable_breakdown: Option<SellerReceivableBreakdown>,
}

impl CaptureResource {
    fn amount_money(&self) -> Result<Option<Money>> {
        self.amount.as_ref().map(PaypalAmount::to_money).transpose()
    }

    fn fee_money(&self) -> Result<Option<Money>> {
        self.seller_receivable_breakdown
            .as_ref()
            .and_then(|b| b.paypal_fee.as_ref())
            .map(PaypalAmount::to_money)
            .transpose()
    }
}

#[derive(Debug, Deserialize)]
struct SellerReceivableBreakdown {
    paypal_fee: Option<PaypalAmount>,
}

/// Payment facts extracted from an order's latest authorization and capture
#[derive(Debug, Default)]
struct OrderProjection {
    authorization: Option<(String, Option<Money>, bool)>,
    capture: Option<(String, Option<Money>, Option<Money>)>,
}

impl OrderProjection {
    fn from_order(order: &OrderResponse) -> Result<Self> {
        let Some(payments) = order.purchase_units.first().and_then(|u| u.payments.as_ref())
        else {
            return Ok(Self::default());
        };

        let authorization = payments
            .authorizations
            .last()
            .map(|a| -> Result<_> {
                let total = a.amount.as_ref().map(PaypalAmount::to_money).transpose()?;
                Ok((a.id.clone(), total, a.status == "VOIDED"))
            })
            .transpose()?;

        let capture = payments
            .captures
            .last()
            .map(|c| -> Result<_> { Ok((c.id.clone(), c.amount_money()?, c.fee_money()?)) })
            .transpose()?;

        Ok(Self {
            authorization,
            capture,
        })
    }

    fn apply(self, payment: &mut Payment) {
        if let Some((id, total, voided)) = self.authorization {
            payment.authorization_id = Some(id);
            payment.authorization_total = total.or(payment.authorization_total);
            payment.state = if voided {
                PaymentState::Voided
            } else {
                PaymentState::Authorized
            };
        }

        if let Some((id, total, fee)) = self.capture {
            payment.capture_id = Some(id);
            payment.payment_total = total.or(payment.payment_total);
            payment.fee_total = fee.or(payment.fee_total);
            payment.state = PaymentState::Captured;
        }
    }
}
