#[path = "../helpers/mod.rs"]
mod helpers;

use proptest::prelude::*;
use rust_decimal::Decimal;

use helpers::{FakePaypal, TestDataFactory};
use paybridge::core::{Currency, Money};
use paybridge::gateways::{GatewayAdapter, PaypalAdapter};

// Property-based test for the PayPal checkout request mapping
//
// Validates, for any unit price and quantity:
// - the order is sent as one item
// - item_price == order_total == unit_price x quantity
// - the currency is preserved

proptest! {
    #[test]
    fn test_checkout_total_is_unit_price_times_quantity(
        unit_cents in 1i64..10_000_000i64,
        quantity in 1u32..1_000u32,
        currency_index in 0usize..3usize,
    ) {
        let currency = [Currency::USD, Currency::EUR, Currency::GBP][currency_index];
        let mut tx = TestDataFactory::paypal_transaction(1);
        tx.unit_price = Money::new(Decimal::new(unit_cents, 2), currency);
        tx.listing_quantity = quantity;

        let paypal = FakePaypal::new();
        let adapter = PaypalAdapter::new(paypal.clone());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let completion = runtime.block_on(adapter.create_payment(
            &tx,
            &TestDataFactory::gateway_fields(),
            false,
        ));
        prop_assert!(completion.is_success());

        let requests = paypal.requests();
        prop_assert_eq!(requests.len(), 1);

        let expected = Money::new(Decimal::new(unit_cents, 2) * Decimal::from(quantity), currency);
        prop_assert_eq!(requests[0].item_quantity, 1);
        prop_assert_eq!(requests[0].order_total, expected);
        prop_assert_eq!(requests[0].item_price, expected);
    }
}

#[test]
fn test_jpy_totals_have_no_minor_units() {
    let mut tx = TestDataFactory::paypal_transaction(2);
    tx.unit_price = Money::new(Decimal::new(1500, 0), Currency::JPY);
    tx.listing_quantity = 2;

    let paypal = FakePaypal::new();
    let adapter = PaypalAdapter::new(paypal.clone());
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(adapter.create_payment(&tx, &TestDataFactory::gateway_fields(), false));

    let request = &paypal.requests()[0];
    assert_eq!(request.order_total.to_gateway_value(), "3000");
}

#[test]
fn test_capture_fee_rounding() {
    let fee = FakePaypal::capture_fee(Money::new(Decimal::new(1000, 2), Currency::USD));
    assert_eq!(fee, Money::new(Decimal::new(59, 2), Currency::USD));
}
