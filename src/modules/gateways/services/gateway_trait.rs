use async_trait::async_trait;

use crate::core::Result;
use crate::modules::gateways::models::{
    Completion, GatewayPayment, PaymentDetails, PaymentInitiation,
};
use crate::modules::transactions::{GatewayFields, PaymentProcess, TransactionRecord};

/// Translates transaction operations into calls against one payment gateway
///
/// Gateway failures are never returned as `Err` from the payment methods;
/// they travel inside the `Completion` so the caller learns both the outcome
/// and whether it is final.
#[async_trait]
pub trait GatewayAdapter: Send + Sync {
    /// Gateway name, as stored on transactions
    fn name(&self) -> &str;

    /// Whether this gateway can run transactions with the given process
    fn implements_process(&self, process: PaymentProcess) -> bool;

    /// Start collecting money for a transaction
    async fn create_payment(
        &self,
        tx: &TransactionRecord,
        gateway_fields: &GatewayFields,
        prefer_async: bool,
    ) -> Completion<PaymentInitiation>;

    /// Release the reserved funds, e.g. when the seller declines
    async fn reject_payment(
        &self,
        tx: &TransactionRecord,
        reason: &str,
    ) -> Completion<Option<GatewayPayment>>;

    /// Collect funds reserved during checkout
    async fn complete_preauthorization(
        &self,
        tx: &TransactionRecord,
    ) -> Completion<Option<GatewayPayment>>;

    /// Money figures for display
    ///
    /// A missing gateway record falls back to transaction prices; only an
    /// unrepresentable transaction total is an error.
    async fn get_payment_details(&self, tx: &TransactionRecord) -> Result<PaymentDetails>;

    /// Processes this gateway implements
    fn processes(&self) -> Vec<PaymentProcess> {
        PaymentProcess::ALL
            .into_iter()
            .filter(|process| self.implements_process(*process))
            .collect()
    }
}
