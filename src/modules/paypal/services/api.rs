use async_trait::async_trait;

use crate::core::Result;
use crate::modules::paypal::models::{
    CreatePaymentRequest, Payment, PaymentInfo, RequestOutcome, VoidInfo,
};

/// Payment operations the marketplace performs against PayPal
///
/// Payments are addressed by community and marketplace transaction id,
/// never by PayPal's own identifiers.
#[async_trait]
pub trait PaypalApi: Send + Sync {
    /// Create a checkout for the transaction
    ///
    /// With `prefer_async` the remote call runs in the background and the
    /// returned outcome carries a process token to poll. Otherwise the call
    /// completes inline and the outcome carries the buyer redirect URL.
    async fn request(
        &self,
        community_id: i64,
        info: CreatePaymentRequest,
        prefer_async: bool,
    ) -> Result<RequestOutcome>;

    /// Release an authorization without collecting funds
    async fn void(&self, community_id: i64, transaction_id: i64, info: VoidInfo)
        -> Result<Payment>;

    /// Current payment state, refreshed from PayPal
    async fn get_payment(&self, community_id: i64, transaction_id: i64) -> Result<Payment>;

    /// Capture the full authorized amount
    async fn full_capture(
        &self,
        community_id: i64,
        transaction_id: i64,
        info: PaymentInfo,
    ) -> Result<Payment>;

    /// Reserve funds on an order the buyer has approved
    async fn authorize(&self, community_id: i64, transaction_id: i64) -> Result<Payment>;
}
