use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::currency::Currency;

/// A decimal amount in a specific currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Amount multiplied by a quantity, same currency
    ///
    /// `None` when the product does not fit in a `Decimal`.
    pub fn times(&self, quantity: u32) -> Option<Self> {
        self.amount
            .checked_mul(Decimal::from(quantity))
            .map(|amount| Self::new(amount, self.currency))
    }

    /// Amount as the gateway expects it: a string fixed at the currency's scale
    pub fn to_gateway_value(&self) -> String {
        let scale = self.currency.scale();
        format!(
            "{:.width$}",
            self.currency.round(self.amount),
            width = scale as usize
        )
    }

    /// Parses a gateway `{currency_code, value}` pair
    pub fn from_gateway(value: &str, currency_code: &str) -> Result<Self, String> {
        let currency: Currency = currency_code.parse()?;
        let amount: Decimal = value
            .parse()
            .map_err(|e| format!("Invalid amount '{}': {}", value, e))?;
        Ok(Self::new(amount, currency))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.currency.format_amount(self.amount))
    }
}
