use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::gateway_trait::GatewayAdapter;
use crate::core::{AppError, Result};
use crate::modules::gateways::models::{
    Completion, GatewayPayment, PaymentDetails, PaymentInitiation, PaymentStatus,
};
use crate::modules::paypal::{
    CreatePaymentRequest, Payment, PaymentInfo, PaymentState, PaypalApi, RequestOutcome, VoidInfo,
};
use crate::modules::transactions::{GatewayFields, PaymentProcess, TransactionRecord};

/// PayPal checkout with optional preauthorization
pub struct PaypalAdapter {
    api: Arc<dyn PaypalApi>,
}

impl PaypalAdapter {
    pub fn new(api: Arc<dyn PaypalApi>) -> Self {
        Self { api }
    }

    fn create_payment_request(
        tx: &TransactionRecord,
        gateway_fields: &GatewayFields,
    ) -> Result<CreatePaymentRequest> {
        // A separate quantity reads confusingly on the PayPal checkout
        // page, so the order is sent as a single item priced at the total.
        let total = tx.total_price()?;

        Ok(CreatePaymentRequest {
            transaction_id: tx.id,
            item_name: tx.listing_title.clone(),
            item_quantity: 1,
            item_price: total,
            merchant_id: tx.listing_author_id.clone(),
            order_total: total,
            success: gateway_fields.success_url.clone(),
            cancel: gateway_fields.cancel_url.clone(),
            merchant_brand_logo_url: gateway_fields.merchant_brand_logo_url.clone(),
        })
    }

    async fn capture_authorized(&self, tx: &TransactionRecord) -> Result<Payment> {
        let payment = self.api.get_payment(tx.community_id, tx.id).await?;
        let payment_total = payment.authorization_total.ok_or_else(|| {
            AppError::gateway(format!(
                "PayPal payment for transaction {} has no authorized amount",
                tx.id
            ))
        })?;

        self.api
            .full_capture(tx.community_id, tx.id, PaymentInfo { payment_total })
            .await
    }
}

fn initiation(outcome: RequestOutcome, prefer_async: bool) -> Result<PaymentInitiation> {
    match (outcome, prefer_async) {
        (RequestOutcome::Process { process_token }, true) => {
            Ok(PaymentInitiation::process(process_token))
        }
        (RequestOutcome::Redirect { redirect_url, .. }, false) => {
            Ok(PaymentInitiation::redirect(redirect_url))
        }
        (outcome, _) => Err(AppError::gateway(format!(
            "PayPal returned {:?} for a request with prefer_async={}",
            outcome, prefer_async
        ))),
    }
}

impl From<Payment> for GatewayPayment {
    fn from(payment: Payment) -> Self {
        let status = match payment.state {
            PaymentState::Pending => PaymentStatus::Pending,
            PaymentState::Authorized => PaymentStatus::Authorized,
            PaymentState::Captured => PaymentStatus::Completed,
            PaymentState::Voided => PaymentStatus::Voided,
        };

        GatewayPayment {
            gateway_reference: payment.order_id,
            status,
            authorization_total: payment.authorization_total,
            payment_total: payment.payment_total,
            fee_total: payment.fee_total,
            commission_total: payment.commission_total,
        }
    }
}

#[async_trait]
impl GatewayAdapter for PaypalAdapter {
    fn name(&self) -> &str {
        "paypal"
    }

    fn implements_process(&self, process: PaymentProcess) -> bool {
        matches!(process, PaymentProcess::None | PaymentProcess::Preauthorize)
    }

    async fn create_payment(
        &self,
        tx: &TransactionRecord,
        gateway_fields: &GatewayFields,
        prefer_async: bool,
    ) -> Completion<PaymentInitiation> {
        let request = match Self::create_payment_request(tx, gateway_fields) {
            Ok(request) => request,
            Err(e) => return Completion::Sync(Err(e)),
        };

        match self.api.request(tx.community_id, request, prefer_async).await {
            Ok(outcome) => match initiation(outcome, prefer_async) {
                Ok(initiation) => Completion::Async(Ok(initiation)),
                Err(e) => Completion::Sync(Err(e)),
            },
            Err(e) => Completion::Sync(Err(e)),
        }
    }

    async fn reject_payment(
        &self,
        tx: &TransactionRecord,
        reason: &str,
    ) -> Completion<Option<GatewayPayment>> {
        let info = VoidInfo {
            note: reason.to_string(),
        };
        let result = self.api.void(tx.community_id, tx.id, info).await;

        Completion::Async(result.map(|payment| Some(payment.into())))
    }

    async fn complete_preauthorization(
        &self,
        tx: &TransactionRecord,
    ) -> Completion<Option<GatewayPayment>> {
        let result = self.capture_authorized(tx).await;
        Completion::Async(result.map(|payment| Some(payment.into())))
    }

    async fn get_payment_details(&self, tx: &TransactionRecord) -> Result<PaymentDetails> {
        let payment = match self.api.get_payment(tx.community_id, tx.id).await {
            Ok(payment) => Some(payment),
            Err(e) => {
                debug!(transaction_id = tx.id, error = %e, "No PayPal payment for details");
                None
            }
        };

        let payment_total = payment.as_ref().and_then(|p| p.payment_total);
        let total_price = payment_total
            .or_else(|| payment.as_ref().and_then(|p| p.authorization_total))
            .unwrap_or(tx.unit_price);

        Ok(PaymentDetails {
            payment_total,
            total_price,
            charged_commission: payment.as_ref().and_then(|p| p.commission_total),
            payment_gateway_fee: payment.as_ref().and_then(|p| p.fee_total),
        })
    }
}
