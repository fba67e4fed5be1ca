mod common;

use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn create_unpaid_transaction_is_pending() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/create-unpaid-transaction",
            json!({"merchantId": "M1", "referenceNumber": "R1", "amount": 500, "name": "Alice"}),
        )
        .await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["paid"], false);
    assert_eq!(body["amount"], 500.0);
    assert_eq!(body["description"], "E-WALLET PAYMENT");

    let stored = app.transactions().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["referenceNumber"], "R1");
    assert_eq!(stored[0]["paid"], false);
}

#[tokio::test]
async fn capture_payment_converts_cents_and_marks_paid() {
    let app = TestApp::spawn().await;

    app.post_json(
        "/create-unpaid-transaction",
        json!({"merchantId": "M1", "referenceNumber": "R1", "amount": 500, "name": "Alice"}),
    )
    .await;

    let response = app
        .post_json(
            "/capture-payment",
            json!({
                "merchant_id": "M1",
                "order_id": "R1",
                "amount": "50000",
                "currency": "PHP",
                "status": "success",
                "customer_name": "Alice"
            }),
        )
        .await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["id"].as_i64().is_some());

    let stored = app.transactions().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["amount"], 500.0);
    assert_eq!(stored[0]["paid"], true);
    assert_eq!(stored[0]["status"], "success");
    assert_eq!(stored[0]["id"], body["id"]);
}

#[tokio::test]
async fn capture_payment_is_idempotent() {
    let app = TestApp::spawn().await;
    let payload = json!({
        "merchant_id": "M1",
        "order_id": "R7",
        "amount": 1250,
        "status": "completed",
        "customer_name": "Bob"
    });

    app.post_json("/capture-payment", payload.clone()).await;
    app.post_json("/capture-payment", payload).await;

    let stored = app.transactions().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["amount"], 12.5);
    assert_eq!(stored[0]["paid"], true);
    assert_eq!(stored[0]["name"], "Bob");
}

#[tokio::test]
async fn capture_payment_defaults() {
    let app = TestApp::spawn().await;

    app.post_json("/capture-payment", json!({"order_id": "R2"}))
        .await;

    let stored = app.transactions().await;
    assert_eq!(stored[0]["status"], "pending");
    assert_eq!(stored[0]["amount"], 0.0);
    assert_eq!(stored[0]["paid"], false);
}

#[tokio::test]
async fn update_payment_status_on_unknown_reference() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/update-payment-status",
            json!({"order_id": "R1", "status": "failed"}),
        )
        .await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["changes"], 0);
}

#[tokio::test]
async fn update_payment_status_marks_paid() {
    let app = TestApp::spawn().await;

    app.post_json(
        "/store-payment-details",
        json!({"order_id": "R3", "customer_name": "Carol", "amount": 9900, "merchant_id": "M1"}),
    )
    .await;

    let body: serde_json::Value = app
        .post_json(
            "/update-payment-status",
            json!({"order_id": "R3", "status": "success"}),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["changes"], 1);

    let stored = app.transactions().await;
    assert_eq!(stored[0]["status"], "success");
    assert_eq!(stored[0]["paid"], true);
    assert_eq!(stored[0]["amount"], 99.0);
}

#[tokio::test]
async fn update_payment_status_without_status_completes() {
    let app = TestApp::spawn().await;

    app.post_json(
        "/store-payment-details",
        json!({"order_id": "R4", "customer_name": "Dan", "amount": "100", "merchant_id": "M1"}),
    )
    .await;

    app.post_json("/update-payment-status", json!({"order_id": "R4"}))
        .await;

    let stored = app.transactions().await;
    assert_eq!(stored[0]["status"], "completed");
    assert_eq!(stored[0]["paid"], true);
}

#[tokio::test]
async fn store_payment_details_returns_id() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/store-payment-details",
            json!({"order_id": "R5", "customer_name": "Eve", "amount": "2500", "merchant_id": "M2"}),
        )
        .await;

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let stored = app.transactions().await;
    assert_eq!(stored[0]["id"], body["id"]);
    assert_eq!(stored[0]["merchantId"], "M2");
    assert_eq!(stored[0]["status"], "pending");
    assert_eq!(stored[0]["amount"], 25.0);
}

#[tokio::test]
async fn add_transaction_derives_paid_from_status() {
    let app = TestApp::spawn().await;

    let paid: serde_json::Value = app
        .post_json(
            "/add-transaction",
            json!({"merchantId": "M1", "referenceNumber": "A1", "status": "success", "amount": 10, "name": "Ann"}),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(paid["paid"], true);

    let flagged: serde_json::Value = app
        .post_json(
            "/add-transaction",
            json!({"merchantId": "M1", "referenceNumber": "A2", "status": "pending", "paid": true}),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(flagged["paid"], false);
    assert_eq!(flagged["description"], "E-WALLET PAYMENT");
}

#[tokio::test]
async fn missing_fields_pass_through_as_null() {
    let app = TestApp::spawn().await;

    let response = app.post_json("/add-transaction", json!({})).await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["merchantId"].is_null());
    assert!(body["referenceNumber"].is_null());
    assert!(body["amount"].is_null());
    assert_eq!(body["paid"], false);
}

#[tokio::test]
async fn form_encoded_bodies_are_accepted() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/create-unpaid-transaction", app.address))
        .form(&[
            ("merchantId", "M1"),
            ("referenceNumber", "F1"),
            ("amount", "750"),
            ("name", "Frank"),
        ])
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["amount"], 750.0);
    assert_eq!(body["name"], "Frank");
}

#[tokio::test]
async fn malformed_json_is_rejected_with_error_body() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/add-transaction", app.address))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Invalid JSON body"));
}

#[tokio::test]
async fn transactions_are_listed_newest_first() {
    let app = TestApp::spawn().await;

    for reference in ["L1", "L2", "L3"] {
        app.post_json(
            "/create-unpaid-transaction",
            json!({"merchantId": "M1", "referenceNumber": reference, "amount": 1}),
        )
        .await;
        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    }

    let stored = app.transactions().await;
    let references: Vec<&str> = stored
        .iter()
        .map(|tx| tx["referenceNumber"].as_str().unwrap())
        .collect();
    assert_eq!(references, vec!["L3", "L2", "L1"]);

    let checked_at: Vec<&str> = stored
        .iter()
        .map(|tx| tx["checkedAt"].as_str().unwrap())
        .collect();
    for pair in checked_at.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}
