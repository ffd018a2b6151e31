// In-process PayPal stand-in
//
// Implements PaypalApi on top of the crate's own PaymentStore and
// ProcessRegistry, so adapter and HTTP tests run without network access.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use paybridge::core::{AppError, Money, Result};
use paybridge::paypal::{
    CreatePaymentRequest, Payment, PaymentInfo, PaymentState, PaymentStore, PaypalApi,
    ProcessRegistry, RequestOutcome, VoidInfo,
};

/// Fake PayPal account with a 2.9% + 0.30 capture fee
#[derive(Default)]
pub struct FakePaypal {
    store: PaymentStore,
    processes: ProcessRegistry,
    requests: Mutex<Vec<CreatePaymentRequest>>,
    fail_next: Mutex<Option<String>>,
}

impl FakePaypal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn processes(&self) -> &ProcessRegistry {
        &self.processes
    }

    pub fn store(&self) -> &PaymentStore {
        &self.store
    }

    /// Every create-payment request received, in order
    pub fn requests(&self) -> Vec<CreatePaymentRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Make the next mutating call fail with a gateway error
    pub fn fail_next(&self, msg: &str) {
        *self.fail_next.lock().unwrap() = Some(msg.to_string());
    }

    fn take_failure(&self) -> Result<()> {
        match self.fail_next.lock().unwrap().take() {
            Some(msg) => Err(AppError::gateway(msg)),
            None => Ok(()),
        }
    }

    pub fn capture_fee(total: Money) -> Money {
        let fee = total.amount * Decimal::new(29, 3) + Decimal::new(30, 2);
        Money::new(total.currency.round(fee), total.currency)
    }
}

async fn create_order(
    store: PaymentStore,
    community_id: i64,
    info: CreatePaymentRequest,
) -> Result<RequestOutcome> {
    let order_id = format!("ORDER-{}", info.transaction_id);
    let now = Utc::now();

    store
        .insert(Payment {
            community_id,
            transaction_id: info.transaction_id,
            merchant_id: info.merchant_id,
            order_id: order_id.clone(),
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

    Ok(RequestOutcome::Redirect {
        redirect_url: format!("https://paypal.test/checkoutnow?token={}", order_id),
        token: order_id,
    })
}

#[async_trait]
impl PaypalApi for FakePaypal {
    async fn request(
        &self,
        community_id: i64,
        info: CreatePaymentRequest,
        prefer_async: bool,
    ) -> Result<RequestOutcome> {
        self.requests.lock().unwrap().push(info.clone());
        self.take_failure()?;
        info.validate()?;

        if prefer_async {
            let store = self.store.clone();
            let process_token = self
                .processes
                .start("create_payment", create_order(store, community_id, info))
                .await;
            return Ok(RequestOutcome::Process { process_token });
        }

        create_order(self.store.clone(), community_id, info).await
    }

    async fn void(&self, community_id: i64, transaction_id: i64, info: VoidInfo) -> Result<Payment> {
        self.take_failure()?;
        self.store
            .update(community_id, transaction_id, |p| {
                p.state = PaymentState::Voided;
                p.note = Some(info.note).filter(|note| !note.is_empty());
            })
            .await
    }

    async fn get_payment(&self, community_id: i64, transaction_id: i64) -> Result<Payment> {
        self.store.get(community_id, transaction_id).await
    }

    async fn full_capture(
        &self,
        community_id: i64,
        transaction_id: i64,
        info: PaymentInfo,
    ) -> Result<Payment> {
        self.take_failure()?;
        let payment = self.store.get(community_id, transaction_id).await?;
        if payment.authorization_id.is_none() {
            return Err(AppError::validation("No authorization to capture"));
        }

        let fee = Self::capture_fee(info.payment_total);
        self.store
            .update(community_id, transaction_id, |p| {
                p.capture_id = Some(format!("CAPTURE-{}", transaction_id));
                p.payment_total = Some(info.payment_total);
                p.fee_total = Some(fee);
                p.state = PaymentState::Captured;
            })
            .await
    }

    async fn authorize(&self, community_id: i64, transaction_id: i64) -> Result<Payment> {
        self.take_failure()?;
        self.store
            .update(community_id, transaction_id, |p| {
                p.authorization_id = Some(format!("AUTH-{}", transaction_id));
                p.authorization_total = Some(p.order_total);
                p.state = PaymentState::Authorized;
            })
            .await
    }
}
