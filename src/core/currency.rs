use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies accepted by the PayPal checkout, with their decimal precision rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar (2 decimal places)
    USD,
    /// Euro (2 decimal places)
    EUR,
    /// Pound Sterling (2 decimal places)
    GBP,
    /// Japanese Yen (no decimal places)
    JPY,
    /// Australian Dollar (2 decimal places)
    AUD,
    /// Canadian Dollar (2 decimal places)
    CAD,
    /// Swiss Franc (2 decimal places)
    CHF,
}

impl Currency {
    /// Returns the decimal scale for this currency
    /// - JPY: 0 (no decimals)
    /// - everything else: 2
    pub fn scale(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Rounds a decimal value to the appropriate scale for this currency
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp(self.scale())
    }

    /// Validates that a decimal value has the correct scale for this currency
    pub fn validate_amount(&self, amount: Decimal) -> Result<(), String> {
        let scale = amount.normalize().scale();
        let expected_scale = self.scale();

        if scale > expected_scale {
            return Err(format!(
                "{} amounts must have at most {} decimal places, got {}",
                self, expected_scale, scale
            ));
        }

        if amount < Decimal::ZERO {
            return Err(format!("{} amount cannot be negative", self));
        }

        Ok(())
    }

    /// Formats an amount for display with the correct decimal places
    pub fn format_amount(&self, amount: Decimal) -> String {
        let scale = self.scale();
        if scale == 0 {
            format!("{} {}", self, amount.round_dp(0))
        } else {
            format!("{} {:.width$}", self, amount, width = scale as usize)
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::CHF => "CHF",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "JPY" => Ok(Currency::JPY),
            "AUD" => Ok(Currency::AUD),
            "CAD" => Ok(Currency::CAD),
            "CHF" => Ok(Currency::CHF),
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}
