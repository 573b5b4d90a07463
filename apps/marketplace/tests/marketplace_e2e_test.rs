//! E2E Integration Tests for the marketplace HTTP API
//!
//! Drives the router end to end: HTTP → use cases → SQLite (in memory).

#![allow(clippy::unwrap_used)]

use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::ServiceExt;

use marketplace::config::Config;
use marketplace::infrastructure::auth::Argon2Credentials;
use marketplace::infrastructure::config::Container;
use marketplace::infrastructure::http::create_router;
use marketplace::infrastructure::persistence::SqliteStore;
use marketplace::{FixedClock, Timestamp};

const PASSWORD: &str = "correct-horse";

// =============================================================================
// Harness
// =============================================================================

struct TestApp {
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let now = Timestamp::parse("2026-03-01T09:00:00Z").unwrap();
        let container = Container::new(store, &Config::default())
            .with_credentials(Arc::new(Argon2Credentials::with_cost(8, 1)))
            .with_clock(Arc::new(FixedClock::new(now)));

        let created = container
            .session_use_case()
            .ensure_staff_account("admin", "admin-password")
            .await
            .unwrap();
        assert!(created);

        Self {
            router: create_router(container.app_state("e2e")),
        }
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Body>,
        content_type: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, content_type)
                .body(body)
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, token, None, "").await
    }

    async fn send_json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(
            method,
            uri,
            token,
            Some(Body::from(body.to_string())),
            "application/json",
        )
        .await
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send_json("POST", uri, token, body).await
    }

    async fn register(&self, username: &str, is_seller: bool) -> String {
        let (status, body) = self
            .post(
                "/api/v1/auth/register",
                None,
                json!({
                    "username": username,
                    "password1": PASSWORD,
                    "password2": PASSWORD,
                    "is_seller": is_seller,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/v1/auth/login",
                None,
                json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn create_shop(&self, token: &str, name: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/v1/shops",
                Some(token),
                json!({ "name": name, "tags": "tea, gifts" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    async fn import(&self, token: &str, shop: i64, csv: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            &format!("/api/v1/shops/{shop}/import"),
            Some(token),
            Some(Body::from(csv.to_string())),
            "text/csv",
        )
        .await
    }

    async fn item_id(&self, name: &str) -> i64 {
        let (_, home) = self.get("/api/v1/items", None).await;
        home["items"]
            .as_array()
            .unwrap()
            .iter()
            .find(|entry| entry["name"] == name)
            .and_then(|entry| entry["item_id"].as_i64())
            .unwrap()
    }

    async fn funds(&self, token: &str) -> Decimal {
        let (_, profile) = self.get("/api/v1/profile", Some(token)).await;
        money(&profile["funds"])
    }
}

fn money(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

const TEA_CSV: &str = "1001,Sencha,4.50,\"Green tea\\nfrom Shizuoka\",10\n\n1002,Matcha,12.00,Powder,1\n";

/// Seller with a shop holding Sencha (10 in stock) and Matcha (1 in stock).
async fn seeded() -> (TestApp, String, i64) {
    let app = TestApp::new().await;
    let seller = app.register("tea_seller", true).await;
    let shop = app.create_shop(&seller, "Tea House").await;
    let (status, body) = app.import(&seller, shop, TEA_CSV).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["created"], 2);
    (app, seller, shop)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_purchase_flow_end_to_end() {
    let (app, seller, shop) = seeded().await;

    // Home listing is sorted by name.
    let (status, home) = app.get("/api/v1/items", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(home["count"], 2);
    assert_eq!(home["items"][0]["name"], "Matcha");
    assert_eq!(home["items"][0]["shop_name"], "Tea House");

    let sencha = app.item_id("Sencha").await;
    let matcha = app.item_id("Matcha").await;

    // Buyer fills the cart; a repeated add leaves the line alone.
    let buyer = app.register("buyer", false).await;
    for item in [sencha, matcha] {
        let (status, body) = app
            .post("/api/v1/cart/items", Some(&buyer), json!({ "item_id": item }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["created"], true);
    }
    let (status, body) = app
        .post("/api/v1/cart/items", Some(&buyer), json!({ "item_id": sencha }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], false);

    let (_, cart) = app.get("/api/v1/cart", Some(&buyer)).await;
    assert_eq!(cart["lines"].as_array().unwrap().len(), 2);
    assert_eq!(money(&cart["total"]), dec!(16.50));

    // Checkout of two Sencha; Matcha stays in the cart.
    let (status, order) = app
        .post(
            "/api/v1/cart/checkout",
            Some(&buyer),
            json!({ "items": [{ "item_id": sencha, "quantity": 2 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    let code = order["order"]["code"].as_str().unwrap().to_string();
    assert!(code.ends_with("_20260301T090000"), "{code}");
    assert_eq!(order["order"]["status"], "PLACED");
    assert_eq!(money(&order["total"]), dec!(9.00));

    let (_, cart) = app.get("/api/v1/cart", Some(&buyer)).await;
    assert_eq!(cart["lines"].as_array().unwrap().len(), 1);
    assert_eq!(cart["lines"][0]["item_id"], matcha);

    // Paying with no funds fails and changes nothing.
    let pay_uri = format!("/api/v1/orders/{code}/pay");
    let (status, body) = app.post(&pay_uri, Some(&buyer), json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INSUFFICIENT_FUNDS");
    let (_, view) = app.get(&format!("/api/v1/orders/{code}"), Some(&buyer)).await;
    assert_eq!(view["order"]["status"], "PLACED");

    // Top up, then pay.
    let (status, funds) = app
        .post("/api/v1/profile/funds", Some(&buyer), json!({ "amount": "50.00" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&funds["balance"]), dec!(50));

    let (status, receipt) = app.post(&pay_uri, Some(&buyer), json!({})).await;
    assert_eq!(status, StatusCode::OK, "{receipt}");
    assert_eq!(money(&receipt["debited"]), dec!(9));
    assert_eq!(money(&receipt["balance"]), dec!(41));
    assert_eq!(receipt["purchases"], 1);
    assert_eq!(receipt["order"]["status"], "PAID");
    assert_eq!(app.funds(&buyer).await, dec!(41));

    // Paying twice is a conflict.
    let (status, body) = app.post(&pay_uri, Some(&buyer), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE_TRANSITION");

    // Stock went down; only sellers see it.
    let item_uri = format!("/api/v1/items/{sencha}");
    let (_, detail) = app.get(&item_uri, Some(&seller)).await;
    assert_eq!(detail["amount"], 8);
    assert_eq!(detail["description"], json!(["Green tea", "from Shizuoka"]));
    let (_, detail) = app.get(&item_uri, Some(&buyer)).await;
    assert!(detail.get("amount").is_none());

    // History and statistics.
    let (_, history) = app.get("/api/v1/orders", Some(&buyer)).await;
    assert_eq!(history["count"], 1);
    assert_eq!(history["items"][0]["code"], code.as_str());

    let (status, report) = app
        .get(
            &format!("/api/v1/shops/{shop}/statistics?date_from=2026-03-01&date_to=2026-03-01"),
            Some(&seller),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{report}");
    assert_eq!(report["rows"][0]["code"], 1001);
    assert_eq!(report["rows"][0]["quantity"], 2);
    assert_eq!(report["total_quantity"], 2);
}

#[tokio::test]
async fn test_orders_are_private() {
    let (app, _, _) = seeded().await;
    let sencha = app.item_id("Sencha").await;

    let owner = app.register("owner", false).await;
    app.post("/api/v1/cart/items", Some(&owner), json!({ "item_id": sencha }))
        .await;
    let (_, order) = app
        .post(
            "/api/v1/cart/checkout",
            Some(&owner),
            json!({ "items": [{ "item_id": sencha }] }),
        )
        .await;
    let code = order["order"]["code"].as_str().unwrap().to_string();
    assert_eq!(order["lines"][0]["quantity"], 1);

    let stranger = app.register("stranger", false).await;
    let (status, _) = app
        .get(&format!("/api/v1/orders/{code}"), Some(&stranger))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .post(&format!("/api/v1/orders/{code}/pay"), Some(&stranger), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_checkout_rejects_bad_selection() {
    let (app, _, _) = seeded().await;
    let sencha = app.item_id("Sencha").await;
    let buyer = app.register("picky", false).await;

    let (status, body) = app
        .post("/api/v1/cart/checkout", Some(&buyer), json!({ "items": [] }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_SELECTION");

    let (status, body) = app
        .post(
            "/api/v1/cart/checkout",
            Some(&buyer),
            json!({ "items": [{ "item_id": sencha }] }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_SELECTION");

    let (_, history) = app.get("/api/v1/orders", Some(&buyer)).await;
    assert_eq!(history["count"], 0);
}

#[tokio::test]
async fn test_short_stock_rolls_back_payment() {
    let (app, seller, _) = seeded().await;
    let matcha = app.item_id("Matcha").await;
    let buyer = app.register("hoarder", false).await;

    app.post("/api/v1/cart/items", Some(&buyer), json!({ "item_id": matcha }))
        .await;
    let (_, order) = app
        .post(
            "/api/v1/cart/checkout",
            Some(&buyer),
            json!({ "items": [{ "item_id": matcha, "quantity": 3 }] }),
        )
        .await;
    let code = order["order"]["code"].as_str().unwrap().to_string();
    app.post("/api/v1/profile/funds", Some(&buyer), json!({ "amount": "100" }))
        .await;

    let (status, body) = app
        .post(&format!("/api/v1/orders/{code}/pay"), Some(&buyer), json!({}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    assert_eq!(app.funds(&buyer).await, dec!(100));
    let (_, detail) = app
        .get(&format!("/api/v1/items/{matcha}"), Some(&seller))
        .await;
    assert_eq!(detail["amount"], 1);
    let (_, view) = app.get(&format!("/api/v1/orders/{code}"), Some(&buyer)).await;
    assert_eq!(view["order"]["status"], "PLACED");
}

#[tokio::test]
async fn test_import_is_all_or_nothing() {
    let app = TestApp::new().await;
    let seller = app.register("importer", true).await;
    let shop = app.create_shop(&seller, "Bulk").await;

    let (status, body) = app
        .import(&seller, shop, "1,Cup,3.00,Plain,5\n2,Bowl,not-a-price,Deep,2\n")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_IMPORT");
    assert_eq!(body["details"]["row"], "2");

    let (_, home) = app.get("/api/v1/items", None).await;
    assert_eq!(home["count"], 0);

    // Re-import updates by code.
    let (status, body) = app.import(&seller, shop, "1,Cup,3.00,Plain,5\n").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], 1);
    let (_, body) = app.import(&seller, shop, "1,Big cup,3.50,Plain,7\n").await;
    assert_eq!(body["updated"], 1);
    let (_, home) = app.get("/api/v1/items", None).await;
    assert_eq!(home["items"][0]["name"], "Big cup");
}

#[tokio::test]
async fn test_shop_edits_are_owner_only() {
    let (app, _, shop) = seeded().await;
    let rival = app.register("rival", true).await;

    let (status, _) = app
        .send_json(
            "PUT",
            &format!("/api/v1/shops/{shop}"),
            Some(&rival),
            json!({ "name": "Mine now" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .get(&format!("/api/v1/shops/{shop}/statistics?date_from=2026-03-01&date_to=2026-03-02"), Some(&rival))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let buyer = app.register("plain_buyer", false).await;
    let (status, body) = app
        .post("/api/v1/shops", Some(&buyer), json!({ "name": "Nope" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_showcase_listings_follow_catalog_writes() {
    let (app, seller, shop) = seeded().await;

    let (_, showcase) = app
        .get(&format!("/api/v1/shops/{shop}/showcase"), None)
        .await;
    assert_eq!(showcase["count"], 2);

    let (_, promotions) = app.get("/api/v1/promotions", None).await;
    assert_eq!(promotions["count"], 0);

    let sencha = app.item_id("Sencha").await;
    let (status, body) = app
        .send_json(
            "PUT",
            &format!("/api/v1/items/{sencha}"),
            Some(&seller),
            json!({
                "code": 1001,
                "name": "Sencha",
                "price": "4.50",
                "amount": 10,
                "is_promotion": true,
                "files": ["items/sencha.png"],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (_, promotions) = app.get("/api/v1/promotions", None).await;
    assert_eq!(promotions["count"], 1);
    assert_eq!(promotions["items"][0]["image"], "items/sencha.png");
}

#[tokio::test]
async fn test_back_office_for_staff() {
    let (app, _, _) = seeded().await;
    let sencha = app.item_id("Sencha").await;
    let buyer = app.register("regular", false).await;
    app.post("/api/v1/cart/items", Some(&buyer), json!({ "item_id": sencha }))
        .await;
    let (_, order) = app
        .post(
            "/api/v1/cart/checkout",
            Some(&buyer),
            json!({ "items": [{ "item_id": sencha }] }),
        )
        .await;
    let code = order["order"]["code"].as_str().unwrap().to_string();

    let admin = app.login("admin", "admin-password").await;
    let (status, models) = app.get("/api/v1/admin", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(models.as_array().unwrap().len(), 7);

    let (status, listing) = app.get("/api/v1/admin/orders", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["rows"]["count"], 1);
    assert_eq!(listing["rows"]["items"][0]["key"], code.as_str());

    let (status, _) = app
        .send_json(
            "PUT",
            &format!("/api/v1/admin/orders/{code}/status"),
            Some(&admin),
            json!({ "status": "PAID" }),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, view) = app.get(&format!("/api/v1/orders/{code}"), Some(&buyer)).await;
    assert_eq!(view["order"]["status"], "PAID");

    let (_, profile) = app.get("/api/v1/profile", Some(&buyer)).await;
    let user_id = profile["user_id"].as_i64().unwrap();
    let (status, _) = app
        .send_json(
            "PUT",
            &format!("/api/v1/admin/profiles/{user_id}/seller"),
            Some(&admin),
            json!({ "is_seller": true }),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, profile) = app.get("/api/v1/profile", Some(&buyer)).await;
    assert_eq!(profile["is_seller"], true);

    let (status, _) = app.get("/api/v1/admin/users", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
