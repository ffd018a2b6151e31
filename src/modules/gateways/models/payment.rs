use crate::core::Money;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the buyer or caller needs to continue a checkout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInitiation {
    /// Token for polling a checkout requested in the background
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_token: Option<Uuid>,

    /// Gateway page where the buyer approves the payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl PaymentInitiation {
    pub fn process(token: Uuid) -> Self {
        Self {
            process_token: Some(token),
            redirect_url: None,
        }
    }

    pub fn redirect(url: impl Into<String>) -> Self {
        Self {
            process_token: None,
            redirect_url: Some(url.into()),
        }
    }

    /// Nothing to follow up on
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Payment status as reported to the transaction layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Authorized,
    Completed,
    Voided,
}

/// Gateway neutral view of a payment after void or capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayPayment {
    pub gateway_reference: String,
    pub status: PaymentStatus,
    pub authorization_total: Option<Money>,
    pub payment_total: Option<Money>,
    pub fee_total: Option<Money>,
    pub commission_total: Option<Money>,
}

/// Money figures shown for a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// Amount actually collected, if any
    pub payment_total: Option<Money>,

    /// Best known price of the transaction
    pub total_price: Money,

    pub charged_commission: Option<Money>,

    pub payment_gateway_fee: Option<Money>,
}
