// Integration tests for the PayPal payment lifecycle over HTTP
//
// 1. Create payment (redirect or background process)
// 2. Buyer approval is simulated through the authorize endpoint
// 3. Capture or void
// 4. Payment details reflect each step

#[path = "../helpers/mod.rs"]
mod helpers;

use std::time::Duration;

use actix_web::test;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use helpers::{build_app, FakePaypal, TestDataFactory};
use paybridge::core::{Currency, Money};

fn usd(cents: i64) -> Value {
    json!(Money::new(Decimal::new(cents, 2), Currency::USD))
}

#[actix_web::test]
async fn test_preauthorized_payment_flow() {
    let paypal = FakePaypal::new();
    let app = test::init_service(build_app(paypal.clone())).await;
    let tx = TestDataFactory::paypal_transaction(1001);

    // Step 1: create payment, buyer gets a redirect
    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .set_json(TestDataFactory::create_payment_payload(&tx, false))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["sync"], false);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"]["redirect_url"],
        "https://paypal.test/checkoutnow?token=ORDER-1001"
    );

    // Quantity is folded into a single item priced at the total
    let requests = paypal.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].item_quantity, 1);
    assert_eq!(
        requests[0].order_total,
        Money::new(Decimal::new(6000, 2), Currency::USD)
    );
    assert_eq!(requests[0].item_price, requests[0].order_total);
    assert_eq!(requests[0].merchant_id, "author-abc");

    // Before approval, details fall back to the unit price
    let req = test::TestRequest::post()
        .uri("/api/v1/payments/details")
        .set_json(TestDataFactory::transaction_payload(&tx))
        .to_request();
    let details: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(details["payment_total"], Value::Null);
    assert_eq!(details["total_price"], usd(2000));

    // Step 2: buyer approved, funds reserved
    let req = test::TestRequest::post()
        .uri("/api/v1/paypal/communities/11/transactions/1001/authorize")
        .to_request();
    let payment: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(payment["state"], "authorized");

    let req = test::TestRequest::post()
        .uri("/api/v1/payments/details")
        .set_json(TestDataFactory::transaction_payload(&tx))
        .to_request();
    let details: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(details["payment_total"], Value::Null);
    assert_eq!(details["total_price"], usd(6000));

    // Step 3: seller accepts, capture the authorized total
    let req = test::TestRequest::post()
        .uri("/api/v1/payments/complete")
        .set_json(TestDataFactory::transaction_payload(&tx))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["sync"], false);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["payment_total"], usd(6000));

    // Step 4: details show the collected amount and the gateway fee
    let req = test::TestRequest::post()
        .uri("/api/v1/payments/details")
        .set_json(TestDataFactory::transaction_payload(&tx))
        .to_request();
    let details: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(details["payment_total"], usd(6000));
    assert_eq!(details["total_price"], usd(6000));
    assert_eq!(details["payment_gateway_fee"], usd(204));
    assert_eq!(details["charged_commission"], Value::Null);
}

#[actix_web::test]
async fn test_async_payment_creation_can_be_polled() {
    let paypal = FakePaypal::new();
    let app = test::init_service(build_app(paypal.clone())).await;
    let tx = TestDataFactory::paypal_transaction(1002);

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .set_json(TestDataFactory::create_payment_payload(&tx, true))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["sync"], false);
    assert_eq!(body["success"], true);
    assert!(body["data"]["redirect_url"].is_null());
    let token = body["data"]["process_token"].as_str().unwrap().to_string();

    let mut status = Value::Null;
    for _ in 0..100 {
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/paypal/processes/{}", token))
            .to_request();
        status = test::call_and_read_body_json(&app, req).await;
        if status["status"] != "pending" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(status["status"], "completed");
    assert_eq!(
        status["result"]["redirect_url"],
        "https://paypal.test/checkoutnow?token=ORDER-1002"
    );
}

#[actix_web::test]
async fn test_gateway_failure_on_create_is_sync_error() {
    let paypal = FakePaypal::new();
    paypal.fail_next("PayPal create order failed - HTTP 500 (INTERNAL_SERVER_ERROR)");
    let app = test::init_service(build_app(paypal.clone())).await;
    let tx = TestDataFactory::paypal_transaction(1003);

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .set_json(TestDataFactory::create_payment_payload(&tx, false))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({
            "sync": true,
            "success": false,
            "error_msg": "PayPal create order failed - HTTP 500 (INTERNAL_SERVER_ERROR)"
        })
    );
}

#[actix_web::test]
async fn test_rejected_payment_is_voided() {
    let paypal = FakePaypal::new();
    let app = test::init_service(build_app(paypal.clone())).await;
    let tx = TestDataFactory::paypal_transaction(1004);

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .set_json(TestDataFactory::create_payment_payload(&tx, false))
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/paypal/communities/11/transactions/1004/authorize")
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/payments/reject")
        .set_json(json!({ "transaction": tx, "reason": "Fully booked" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["sync"], false);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "voided");

    let payment = paypal.store().get(11, 1004).await.unwrap();
    assert_eq!(payment.note.as_deref(), Some("Fully booked"));
}

#[actix_web::test]
async fn test_complete_without_payment_reports_error() {
    let paypal = FakePaypal::new();
    let app = test::init_service(build_app(paypal)).await;
    let tx = TestDataFactory::paypal_transaction(1005);

    let req = test::TestRequest::post()
        .uri("/api/v1/payments/complete")
        .set_json(TestDataFactory::transaction_payload(&tx))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["sync"], false);
    assert_eq!(body["success"], false);
    assert!(body["error_msg"]
        .as_str()
        .unwrap()
        .contains("transaction 1005"));
}
