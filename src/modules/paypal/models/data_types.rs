use crate::core::{AppError, Money, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Checkout request sent to PayPal for a single transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub transaction_id: i64,
    pub item_name: String,
    pub item_quantity: u32,
    pub item_price: Money,
    pub merchant_id: String,
    pub order_total: Money,
    /// Return URL after buyer approval
    pub success: String,
    /// Return URL after buyer cancellation
    pub cancel: String,
    pub merchant_brand_logo_url: Option<String>,
}

impl CreatePaymentRequest {
    pub fn validate(&self) -> Result<()> {
        if self.item_quantity == 0 {
            return Err(AppError::validation("Item quantity must be at least 1"));
        }

        if self.item_price.currency != self.order_total.currency {
            return Err(AppError::validation(format!(
                "Item price currency {} does not match order total currency {}",
                self.item_price.currency, self.order_total.currency
            )));
        }

        if self.item_price.times(self.item_quantity) != Some(self.order_total) {
            return Err(AppError::validation(format!(
                "Order total {} does not equal {} x {}",
                self.order_total, self.item_quantity, self.item_price
            )));
        }

        if self.success.trim().is_empty() || self.cancel.trim().is_empty() {
            return Err(AppError::validation(
                "Success and cancel URLs are required",
            ));
        }

        Ok(())
    }
}

/// Amount to settle when capturing an authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub payment_total: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoidInfo {
    pub note: String,
}

/// Lifecycle of a PayPal payment as seen by the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    /// Order created, buyer has not approved yet
    Pending,
    Authorized,
    Captured,
    Voided,
}

/// Local record of a PayPal order and its authorization/capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub community_id: i64,
    pub transaction_id: i64,
    pub merchant_id: String,

    /// PayPal order id, also the checkout token
    pub order_id: String,
    pub authorization_id: Option<String>,
    pub capture_id: Option<String>,
    pub state: PaymentState,

    pub order_total: Money,
    pub authorization_total: Option<Money>,
    pub payment_total: Option<Money>,
    pub fee_total: Option<Money>,
    pub commission_total: Option<Money>,

    pub merchant_brand_logo_url: Option<String>,
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What `request` hands back: a redirect right away, or a token to poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestOutcome {
    Redirect { token: String, redirect_url: String },
    Process { process_token: Uuid },
}

/// State of a background gateway operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProcessStatus {
    Pending,
    Completed { result: serde_json::Value },
    Failed { error_msg: String },
}

impl ProcessStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, ProcessStatus::Pending)
    }
}
