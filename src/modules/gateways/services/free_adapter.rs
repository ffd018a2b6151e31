use async_trait::async_trait;

use super::gateway_trait::GatewayAdapter;
use crate::core::Result;
use crate::modules::gateways::models::{
    Completion, GatewayPayment, PaymentDetails, PaymentInitiation,
};
use crate::modules::transactions::{GatewayFields, PaymentProcess, TransactionRecord};

/// Marketplaces that settle payments outside the platform
#[derive(Debug, Default)]
pub struct FreeAdapter;

impl FreeAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GatewayAdapter for FreeAdapter {
    fn name(&self) -> &str {
        "none"
    }

    fn implements_process(&self, process: PaymentProcess) -> bool {
        matches!(process, PaymentProcess::None | PaymentProcess::Postpay)
    }

    async fn create_payment(
        &self,
        _tx: &TransactionRecord,
        _gateway_fields: &GatewayFields,
        _prefer_async: bool,
    ) -> Completion<PaymentInitiation> {
        Completion::Sync(Ok(PaymentInitiation::empty()))
    }

    async fn reject_payment(
        &self,
        _tx: &TransactionRecord,
        _reason: &str,
    ) -> Completion<Option<GatewayPayment>> {
        Completion::Sync(Ok(None))
    }

    async fn complete_preauthorization(
        &self,
        _tx: &TransactionRecord,
    ) -> Completion<Option<GatewayPayment>> {
        Completion::Sync(Ok(None))
    }

    async fn get_payment_details(&self, tx: &TransactionRecord) -> Result<PaymentDetails> {
        Ok(PaymentDetails {
            payment_total: None,
            total_price: tx.total_price()?,
            charged_commission: None,
            payment_gateway_fee: None,
        })
    }
}
