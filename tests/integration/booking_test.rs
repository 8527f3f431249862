//! Integration tests for availability, booking, payment, and cancellation.

mod helpers;

use http::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;

use helpers::{PAYMENT_SECRET, TestApp, booking_date, decimal, hourly};
use venue_entity::user::UserRole;
use venue_service::HmacPaymentVerifier;

fn booking_body(space_id: &str, start: &str, end: &str, seats: i32) -> Value {
    serde_json::json!({
        "spaceId": space_id,
        "date": booking_date().to_string(),
        "startTime": start,
        "endTime": end,
        "seats": seats,
        "orderId": "order_001",
    })
}

async fn book(app: &TestApp, token: &str, space_id: &str, start: &str, end: &str, seats: i32) -> Value {
    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(space_id, start, end, seats)),
            Some(token),
        )
        .await;
    assert_eq!(
        response.status,
        StatusCode::CREATED,
        "Booking failed: {:?}",
        response.body
    );
    response.body["data"].clone()
}

#[tokio::test]
async fn test_booking_priced_and_pending() {
    let app = TestApp::new();
    let (_, owner) = app.user(UserRole::BrandOwner);
    let (user_id, attendee) = app.user(UserRole::Attendee);
    let space = app.create_space(&owner, 10, hourly(100)).await;

    let booking = book(&app, &attendee, &space, "10:00", "12:30", 4).await;

    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["userId"], user_id.to_string());
    assert_eq!(booking["startTime"], "10:00");
    assert_eq!(booking["endTime"], "12:30");
    // 2.5 hours bill as 3.
    assert_eq!(decimal(&booking["amount"]), Decimal::from(300));
    assert!(booking.get("paymentSignature").is_none());
}

#[tokio::test]
async fn test_capacity_enforced_across_overlaps() {
    let app = TestApp::new();
    let (_, owner) = app.user(UserRole::BrandOwner);
    let (_, attendee) = app.user(UserRole::Attendee);
    let space = app.create_space(&owner, 10, hourly(100)).await;
    let date = booking_date();

    book(&app, &attendee, &space, "10:00", "12:00", 6).await;

    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&space, "11:00", "13:00", 5)),
            Some(&attendee),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.body["error"],
        "Space is not available for the selected time and seats"
    );

    // Back-to-back windows do not overlap.
    book(&app, &attendee, &space, "12:00", "14:00", 10).await;

    let response = app
        .request(
            "GET",
            &format!(
                "/api/bookings/availability/{space}?date={date}&start_time=11:00&end_time=13:00&seats=4"
            ),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["available"], false);
    assert_eq!(data["bookedSeats"], 16);
    assert_eq!(data["remainingSeats"], 0);

    let response = app
        .request(
            "GET",
            &format!("/api/bookings/availability/{space}?date={date}&start_time=08:00&end_time=10:00&seats=10"),
            None,
            None,
        )
        .await;
    assert_eq!(response.body["data"]["available"], true);
}

#[tokio::test]
async fn test_rejects_bad_windows_and_unknown_spaces() {
    let app = TestApp::new();
    let (_, owner) = app.user(UserRole::BrandOwner);
    let (_, attendee) = app.user(UserRole::Attendee);
    let space = app.create_space(&owner, 10, hourly(100)).await;

    for (start, end) in [("12:00", "10:00"), ("10:00", "10:00"), ("25:00", "26:00")] {
        let response = app
            .request(
                "POST",
                "/api/bookings",
                Some(booking_body(&space, start, end, 1)),
                Some(&attendee),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{start}-{end}");
    }

    let missing = uuid::Uuid::new_v4().to_string();
    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&missing, "10:00", "11:00", 1)),
            Some(&attendee),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_payment_confirms_booking() {
    let app = TestApp::new();
    let (_, owner) = app.user(UserRole::BrandOwner);
    let (_, attendee) = app.user(UserRole::Attendee);
    let space = app.create_space(&owner, 10, hourly(100)).await;
    let booking = book(&app, &attendee, &space, "10:00", "11:00", 1).await;
    let path = format!("/api/bookings/{}/payment", booking["id"].as_str().unwrap());

    let forged = app
        .request(
            "POST",
            &path,
            Some(serde_json::json!({
                "orderId": "order_001",
                "paymentId": "pay_001",
                "signature": "00".repeat(32),
            })),
            Some(&attendee),
        )
        .await;
    assert_eq!(forged.status, StatusCode::BAD_REQUEST);

    let signature = HmacPaymentVerifier::new(PAYMENT_SECRET)
        .unwrap()
        .sign("order_001", "pay_001");
    let paid = app
        .request(
            "POST",
            &path,
            Some(serde_json::json!({
                "orderId": "order_001",
                "paymentId": "pay_001",
                "signature": signature,
            })),
            Some(&attendee),
        )
        .await;
    assert_eq!(paid.status, StatusCode::OK, "{:?}", paid.body);
    assert_eq!(paid.body["data"]["status"], "confirmed");
    assert_eq!(paid.body["data"]["paymentId"], "pay_001");
}

#[tokio::test]
async fn test_cancel_frees_seats_once() {
    let app = TestApp::new();
    let (_, owner) = app.user(UserRole::BrandOwner);
    let (_, attendee) = app.user(UserRole::Attendee);
    let (_, stranger) = app.user(UserRole::Attendee);
    let space = app.create_space(&owner, 5, hourly(100)).await;
    let booking = book(&app, &attendee, &space, "10:00", "12:00", 5).await;
    let path = format!("/api/bookings/{}/cancel", booking["id"].as_str().unwrap());

    let response = app.request("PUT", &path, None, Some(&stranger)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "PUT",
            &path,
            Some(serde_json::json!({ "reason": "Plans changed" })),
            Some(&attendee),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "cancelled");
    assert_eq!(response.body["data"]["cancellationReason"], "Plans changed");
    assert_eq!(decimal(&response.body["data"]["refundAmount"]), Decimal::from(200));

    let again = app.request("PUT", &path, None, Some(&attendee)).await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    // The released seats can be booked again.
    book(&app, &attendee, &space, "10:00", "12:00", 5).await;
}

#[tokio::test]
async fn test_status_updates_are_for_owners() {
    let app = TestApp::new();
    let (_, owner) = app.user(UserRole::BrandOwner);
    let (_, attendee) = app.user(UserRole::Attendee);
    let space = app.create_space(&owner, 5, hourly(100)).await;
    let booking = book(&app, &attendee, &space, "10:00", "11:00", 1).await;
    let path = format!("/api/bookings/{}/status", booking["id"].as_str().unwrap());
    let confirm = serde_json::json!({ "status": "confirmed" });

    let response = app
        .request("PUT", &path, Some(confirm.clone()), Some(&attendee))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.request("PUT", &path, Some(confirm), Some(&owner)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "confirmed");

    let response = app
        .request(
            "PUT",
            &path,
            Some(serde_json::json!({ "status": "pending" })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_listing_and_stats_are_scoped() {
    let app = TestApp::new();
    let (_, owner) = app.user(UserRole::BrandOwner);
    let (_, alice) = app.user(UserRole::Attendee);
    let (_, bob) = app.user(UserRole::Attendee);
    let (_, admin) = app.user(UserRole::Admin);
    let space = app.create_space(&owner, 20, hourly(100)).await;

    book(&app, &alice, &space, "10:00", "11:00", 2).await;
    book(&app, &alice, &space, "12:00", "13:00", 2).await;
    let bobs = book(&app, &bob, &space, "10:00", "12:00", 3).await;

    let mine = app.request("GET", "/api/bookings/mine", None, Some(&alice)).await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.body["data"]["total_items"], 2);

    let all = app.request("GET", "/api/bookings", None, Some(&admin)).await;
    assert_eq!(all.body["data"]["total_items"], 3);

    let own_only = app.request("GET", "/api/bookings", None, Some(&bob)).await;
    assert_eq!(own_only.body["data"]["total_items"], 1);

    let by_space = app
        .request(
            "GET",
            &format!("/api/bookings?spaceId={space}"),
            None,
            Some(&owner),
        )
        .await;
    assert_eq!(by_space.body["data"]["total_items"], 3);

    let hidden = app
        .request(
            "GET",
            &format!("/api/bookings/{}", bobs["id"].as_str().unwrap()),
            None,
            Some(&alice),
        )
        .await;
    assert_eq!(hidden.status, StatusCode::FORBIDDEN);

    app.request(
        "PUT",
        &format!("/api/bookings/{}/status", bobs["id"].as_str().unwrap()),
        Some(serde_json::json!({ "status": "confirmed" })),
        Some(&owner),
    )
    .await;

    let stats = app.request("GET", "/api/bookings/stats", None, Some(&admin)).await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(stats.body["data"]["total"], 3);
    assert_eq!(stats.body["data"]["pending"], 2);
    assert_eq!(stats.body["data"]["confirmed"], 1);
    assert_eq!(decimal(&stats.body["data"]["totalRevenue"]), Decimal::from(200));

    let alice_stats = app.request("GET", "/api/bookings/stats", None, Some(&alice)).await;
    assert_eq!(alice_stats.body["data"]["total"], 2);
}
