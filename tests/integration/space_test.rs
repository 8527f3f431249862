//! Integration tests for space listing, editing, and price quotes.

mod helpers;

use chrono::{Duration, Utc};
use http::StatusCode;
use rust_decimal::Decimal;

use helpers::{TestApp, booking_date, decimal, hourly};
use venue_entity::user::UserRole;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["database"], "memory");
}

#[tokio::test]
async fn test_create_space_requires_owner_role() {
    let app = TestApp::new();
    let body = serde_json::json!({
        "name": "Loft",
        "spaceType": "experience",
        "capacity": 8,
        "pricing": hourly(50),
    });

    let anonymous = app.request("POST", "/api/spaces", Some(body.clone()), None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["success"], false);

    let (_, attendee) = app.user(UserRole::Attendee);
    let response = app
        .request("POST", "/api/spaces", Some(body.clone()), Some(&attendee))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let (owner_id, owner) = app.user(UserRole::BrandOwner);
    let response = app.request("POST", "/api/spaces", Some(body), Some(&owner)).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["ownerId"], owner_id.to_string());
    assert_eq!(response.body["data"]["isActive"], true);
    assert_eq!(response.body["data"]["policy"]["cancellationPolicy"], "24h");
}

#[tokio::test]
async fn test_invalid_pricing_rejected() {
    let app = TestApp::new();
    let (_, owner) = app.user(UserRole::BrandOwner);

    let response = app
        .request(
            "POST",
            "/api/spaces",
            Some(serde_json::json!({
                "name": "Loft",
                "spaceType": "event",
                "capacity": 8,
                "pricing": {
                    "basePrice": 100,
                    "peakHours": [
                        { "dayOfWeek": 5, "startHour": 22, "endHour": 18, "multiplier": 1.5 }
                    ]
                },
            })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/api/spaces",
            Some(serde_json::json!({
                "name": "Loft",
                "spaceType": "event",
                "capacity": 0,
                "pricing": hourly(100),
            })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filters_by_type_and_hides_inactive() {
    let app = TestApp::new();
    let (_, owner) = app.user(UserRole::BrandOwner);
    let hall = app.create_space(&owner, 50, hourly(100)).await;
    app.request(
        "POST",
        "/api/spaces",
        Some(serde_json::json!({
            "name": "Pottery class",
            "spaceType": "experience",
            "capacity": 10,
            "pricing": hourly(40),
        })),
        Some(&owner),
    )
    .await;

    let response = app.request("GET", "/api/spaces?type=event", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total_items"], 1);

    let response = app
        .request("DELETE", &format!("/api/spaces/{hall}"), None, Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["message"], "Space deactivated");

    let public = app.request("GET", "/api/spaces", None, None).await;
    assert_eq!(public.body["data"]["total_items"], 1);

    let mine = app.request("GET", "/api/spaces/mine", None, Some(&owner)).await;
    assert_eq!(mine.body["data"]["total_items"], 2);
}

#[tokio::test]
async fn test_update_is_owner_only() {
    let app = TestApp::new();
    let (_, owner) = app.user(UserRole::BrandOwner);
    let (_, rival) = app.user(UserRole::BrandOwner);
    let (_, admin) = app.user(UserRole::Admin);
    let id = app.create_space(&owner, 20, hourly(100)).await;
    let path = format!("/api/spaces/{id}");

    let response = app
        .request("PUT", &path, Some(serde_json::json!({ "capacity": 40 })), Some(&rival))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("PUT", &path, Some(serde_json::json!({ "capacity": 40 })), Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["capacity"], 40);

    let response = app.request("DELETE", &path, None, Some(&admin)).await;
    assert_eq!(response.body["data"]["message"], "Space deleted");
    let response = app.request("GET", &path, None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quote_applies_time_block_and_promo() {
    let app = TestApp::new();
    let (_, owner) = app.user(UserRole::BrandOwner);
    let now = Utc::now();
    let id = app
        .create_space(
            &owner,
            20,
            serde_json::json!({
                "basePrice": 100,
                "timeBlocks": [
                    { "hours": 4, "price": 350, "description": "Half day" }
                ],
                "promoCodes": [{
                    "code": "SAVE10",
                    "discountPercentage": 10,
                    "validFrom": now - Duration::days(1),
                    "validUntil": now + Duration::days(30),
                    "maxUses": 5
                }]
            }),
        )
        .await;
    let path = format!("/api/spaces/{id}/quote");
    let date = booking_date().to_string();

    let response = app
        .request(
            "POST",
            &path,
            Some(serde_json::json!({
                "date": date,
                "startTime": "10:00",
                "endTime": "15:00",
                "promoCode": "SAVE10",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let data = &response.body["data"];
    assert_eq!(decimal(&data["basePrice"]), Decimal::from(500));
    assert_eq!(decimal(&data["timeBlockDiscount"]), Decimal::from(150));
    assert_eq!(decimal(&data["promoDiscount"]), Decimal::from(35));
    assert_eq!(decimal(&data["finalPrice"]), Decimal::from(315));

    let response = app
        .request(
            "POST",
            &path,
            Some(serde_json::json!({
                "date": date,
                "startTime": "15:00",
                "endTime": "10:00",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
