use crate::core::{AppError, Money, Result};
use serde::{Deserialize, Serialize};

/// How a transaction collects money
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProcess {
    /// Paid at checkout, no preauthorization step
    None,

    /// Funds reserved at checkout, captured once the seller accepts
    Preauthorize,

    /// Paid after the fact, outside of the online checkout
    Postpay,
}

impl PaymentProcess {
    pub const ALL: [PaymentProcess; 3] = [
        PaymentProcess::None,
        PaymentProcess::Preauthorize,
        PaymentProcess::Postpay,
    ];
}

impl std::fmt::Display for PaymentProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentProcess::None => write!(f, "none"),
            PaymentProcess::Preauthorize => write!(f, "preauthorize"),
            PaymentProcess::Postpay => write!(f, "postpay"),
        }
    }
}

impl std::str::FromStr for PaymentProcess {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(PaymentProcess::None),
            "preauthorize" => Ok(PaymentProcess::Preauthorize),
            "postpay" => Ok(PaymentProcess::Postpay),
            _ => Err(format!("Invalid payment process: {}", s)),
        }
    }
}

/// Snapshot of a marketplace transaction handed to a gateway adapter
///
/// The record is owned by the transaction store; adapters only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,

    pub community_id: i64,

    /// Price of a single listing unit
    pub unit_price: Money,

    pub listing_quantity: u32,

    pub listing_title: String,

    /// Seller of the listing, the merchant of record
    pub listing_author_id: String,

    /// Name of the gateway adapter handling this transaction
    pub payment_gateway: String,

    pub payment_process: PaymentProcess,
}

impl TransactionRecord {
    /// Unit price times quantity
    pub fn total_price(&self) -> Result<Money> {
        self.unit_price.times(self.listing_quantity).ok_or_else(|| {
            AppError::validation(format!(
                "Total price of {} x {} is out of range",
                self.listing_quantity, self.unit_price
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.listing_quantity == 0 {
            return Err(AppError::validation("Listing quantity must be at least 1"));
        }

        if self.listing_title.trim().is_empty() {
            return Err(AppError::validation("Listing title is required"));
        }

        self.unit_price
            .currency
            .validate_amount(self.unit_price.amount)
            .map_err(AppError::Validation)?;

        self.total_price()?;

        Ok(())
    }
}

/// Gateway specific input collected during checkout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayFields {
    /// Where the buyer lands after approving the payment
    pub success_url: String,

    /// Where the buyer lands after cancelling
    pub cancel_url: String,

    #[serde(default)]
    pub merchant_brand_logo_url: Option<String>,
}
