//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to application use cases.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use crate::application::dto::{AdminModelDto, FundsDto, ProfileDto, SessionDto, ShopDetailDto};
use crate::application::ports::Repositories;
use crate::application::use_cases::{
    BackOfficeUseCase, CartUseCase, ItemsUseCase, PaymentUseCase, ProfileUseCase,
    SalesStatisticsUseCase, SessionUseCase, ShopsUseCase, ShowcaseUseCase,
};
use crate::domain::accounts::{ProfileUpdate, RegistrationForm};
use crate::domain::back_office::AdminListing;
use crate::domain::catalog::{
    HomeEntry, ImportSummary, ItemDetail, ItemDraft, Shop, ShopDraft, ShowcaseEntry,
};
use crate::domain::ordering::{CartSummary, Order, OrderDetail, PaymentReceipt};
use crate::domain::shared::{ItemId, Page, ShopId, UserId};
use crate::domain::statistics::SalesReport;
use crate::error::MarketplaceError;

use super::extract::{ApiPath, ApiQuery, AuthUser, JsonBody, MaybeUser};
use super::request::{
    AddToCartRequest, CheckoutRequest, LoginRequest, OrderStatusRequest, PageQuery,
    SellerFlagRequest, StatisticsQuery, TopUpRequest,
};
use super::response::{CartAddResponse, CartClearResponse, HealthResponse};

type ApiResult<T> = Result<Json<T>, MarketplaceError>;

/// Application state shared across handlers.
pub struct AppState<R>
where
    R: Repositories,
{
    /// Registration, login and token checks.
    pub session: Arc<SessionUseCase<R>>,
    /// Profile page and funds.
    pub profile: Arc<ProfileUseCase<R>>,
    /// Shop management.
    pub shops: Arc<ShopsUseCase<R>>,
    /// Item management, home listing and CSV import.
    pub items: Arc<ItemsUseCase<R>>,
    /// Cached showcase listings.
    pub showcase: Arc<ShowcaseUseCase<R>>,
    /// Cart and checkout.
    pub cart: Arc<CartUseCase<R>>,
    /// Order view, payment and history.
    pub payment: Arc<PaymentUseCase<R>>,
    /// Per-shop sales statistics.
    pub statistics: Arc<SalesStatisticsUseCase<R>>,
    /// Staff back office.
    pub back_office: Arc<BackOfficeUseCase<R>>,
    /// Application version.
    pub version: String,
}

impl<R> Clone for AppState<R>
where
    R: Repositories,
{
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            profile: Arc::clone(&self.profile),
            shops: Arc::clone(&self.shops),
            items: Arc::clone(&self.items),
            showcase: Arc::clone(&self.showcase),
            cart: Arc::clone(&self.cart),
            payment: Arc::clone(&self.payment),
            statistics: Arc::clone(&self.statistics),
            back_office: Arc::clone(&self.back_office),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<R>(state: AppState<R>) -> Router
where
    R: Repositories,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/profile", get(view_profile).patch(edit_profile))
        .route("/api/v1/profile/funds", post(replenish_funds))
        .route("/api/v1/items", get(home))
        .route("/api/v1/items/{id}", get(item_detail).put(edit_item))
        .route("/api/v1/shops", get(list_shops).post(create_shop))
        .route("/api/v1/shops/mine", get(my_shops))
        .route("/api/v1/shops/{id}", get(shop_detail).put(edit_shop))
        .route("/api/v1/shops/{id}/items", post(create_item))
        .route("/api/v1/shops/{id}/import", post(import_items))
        .route("/api/v1/shops/{id}/showcase", get(shop_showcase))
        .route("/api/v1/shops/{id}/statistics", get(sales_statistics))
        .route("/api/v1/promotions", get(promotions))
        .route("/api/v1/offers", get(offers))
        .route("/api/v1/cart", get(view_cart).delete(clear_cart))
        .route("/api/v1/cart/items", post(add_to_cart))
        .route("/api/v1/cart/checkout", post(checkout))
        .route("/api/v1/orders", get(order_history))
        .route("/api/v1/orders/{code}", get(view_order))
        .route("/api/v1/orders/{code}/pay", post(pay_order))
        .route("/api/v1/admin", get(admin_models))
        .route("/api/v1/admin/{model}", get(admin_list))
        .route("/api/v1/admin/orders/{code}/status", put(admin_order_status))
        .route("/api/v1/admin/profiles/{user_id}/seller", put(admin_seller_flag))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<R>(State(state): State<AppState<R>>) -> impl IntoResponse
where
    R: Repositories,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

// ============================================
// Accounts
// ============================================

async fn register<R>(
    State(state): State<AppState<R>>,
    JsonBody(form): JsonBody<RegistrationForm>,
) -> Result<(StatusCode, Json<SessionDto>), MarketplaceError>
where
    R: Repositories,
{
    let session = state.session.register(form).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn login<R>(
    State(state): State<AppState<R>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<SessionDto>
where
    R: Repositories,
{
    let session = state
        .session
        .login(&request.username, &request.password)
        .await?;
    Ok(Json(session))
}

async fn logout<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
) -> Result<StatusCode, MarketplaceError>
where
    R: Repositories,
{
    state.session.logout(&user.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn view_profile<R>(State(state): State<AppState<R>>, user: AuthUser) -> Json<ProfileDto>
where
    R: Repositories,
{
    Json(state.profile.view(&user.account))
}

async fn edit_profile<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    JsonBody(update): JsonBody<ProfileUpdate>,
) -> ApiResult<ProfileDto>
where
    R: Repositories,
{
    Ok(Json(state.profile.edit(&user.account, update).await?))
}

async fn replenish_funds<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    JsonBody(request): JsonBody<TopUpRequest>,
) -> ApiResult<FundsDto>
where
    R: Repositories,
{
    let funds = state
        .profile
        .replenish_funds(&user.account, request.amount)
        .await?;
    Ok(Json(funds))
}

// ============================================
// Shops
// ============================================

async fn list_shops<R>(
    State(state): State<AppState<R>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Page<Shop>>
where
    R: Repositories,
{
    Ok(Json(state.shops.list(query.page()).await?))
}

async fn my_shops<R>(State(state): State<AppState<R>>, user: AuthUser) -> ApiResult<Vec<Shop>>
where
    R: Repositories,
{
    Ok(Json(state.shops.mine(&user.account).await?))
}

async fn create_shop<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    JsonBody(draft): JsonBody<ShopDraft>,
) -> Result<(StatusCode, Json<Shop>), MarketplaceError>
where
    R: Repositories,
{
    let shop = state.shops.create(&user.account, draft).await?;
    Ok((StatusCode::CREATED, Json(shop)))
}

async fn shop_detail<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    ApiPath(id): ApiPath<ShopId>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<ShopDetailDto>
where
    R: Repositories,
{
    let detail = state
        .shops
        .detail(&user.account, id, query.page())
        .await?;
    Ok(Json(detail))
}

async fn edit_shop<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    ApiPath(id): ApiPath<ShopId>,
    JsonBody(draft): JsonBody<ShopDraft>,
) -> ApiResult<Shop>
where
    R: Repositories,
{
    Ok(Json(state.shops.edit(&user.account, id, draft).await?))
}

async fn sales_statistics<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    ApiPath(id): ApiPath<ShopId>,
    ApiQuery(query): ApiQuery<StatisticsQuery>,
) -> ApiResult<SalesReport>
where
    R: Repositories,
{
    let report = state
        .statistics
        .report(&user.account, id, &query.date_from, &query.date_to)
        .await?;
    Ok(Json(report))
}

// ============================================
// Catalog
// ============================================

async fn home<R>(
    State(state): State<AppState<R>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Page<HomeEntry>>
where
    R: Repositories,
{
    Ok(Json(state.items.home(query.page()).await?))
}

async fn create_item<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    ApiPath(shop): ApiPath<ShopId>,
    JsonBody(draft): JsonBody<ItemDraft>,
) -> Result<(StatusCode, Json<ItemDetail>), MarketplaceError>
where
    R: Repositories,
{
    let item = state.items.create(&user.account, shop, draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn item_detail<R>(
    State(state): State<AppState<R>>,
    MaybeUser(viewer): MaybeUser,
    ApiPath(id): ApiPath<ItemId>,
) -> ApiResult<ItemDetail>
where
    R: Repositories,
{
    Ok(Json(state.items.detail(viewer.as_ref(), id).await?))
}

async fn edit_item<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    ApiPath(id): ApiPath<ItemId>,
    JsonBody(draft): JsonBody<ItemDraft>,
) -> ApiResult<ItemDetail>
where
    R: Repositories,
{
    Ok(Json(state.items.edit(&user.account, id, draft).await?))
}

/// CSV body: `code,name,price,description,amount` per row.
async fn import_items<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    ApiPath(shop): ApiPath<ShopId>,
    body: String,
) -> ApiResult<ImportSummary>
where
    R: Repositories,
{
    let summary = state.items.import_csv(&user.account, shop, &body).await?;
    Ok(Json(summary))
}

async fn shop_showcase<R>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<ShopId>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Page<ShowcaseEntry>>
where
    R: Repositories,
{
    Ok(Json(state.showcase.shop(id, query.page()).await?))
}

async fn promotions<R>(
    State(state): State<AppState<R>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Page<ShowcaseEntry>>
where
    R: Repositories,
{
    Ok(Json(state.showcase.promotions(query.page()).await?))
}

async fn offers<R>(
    State(state): State<AppState<R>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Page<ShowcaseEntry>>
where
    R: Repositories,
{
    Ok(Json(state.showcase.offers(query.page()).await?))
}

// ============================================
// Cart and orders
// ============================================

async fn view_cart<R>(State(state): State<AppState<R>>, user: AuthUser) -> ApiResult<CartSummary>
where
    R: Repositories,
{
    Ok(Json(state.cart.view(&user.account).await?))
}

async fn add_to_cart<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    JsonBody(request): JsonBody<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartAddResponse>), MarketplaceError>
where
    R: Repositories,
{
    let created = state.cart.add(&user.account, request.item_id).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(CartAddResponse { created })))
}

async fn clear_cart<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
) -> ApiResult<CartClearResponse>
where
    R: Repositories,
{
    let removed = state.cart.clear(&user.account).await?;
    Ok(Json(CartClearResponse { removed }))
}

async fn checkout<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    JsonBody(request): JsonBody<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderDetail>), MarketplaceError>
where
    R: Repositories,
{
    let order = state.cart.checkout(&user.account, request.items).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn order_history<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Page<Order>>
where
    R: Repositories,
{
    Ok(Json(state.payment.history(&user.account, query.page()).await?))
}

async fn view_order<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    ApiPath(code): ApiPath<String>,
) -> ApiResult<OrderDetail>
where
    R: Repositories,
{
    Ok(Json(state.payment.view(&user.account, &code).await?))
}

async fn pay_order<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    ApiPath(code): ApiPath<String>,
) -> ApiResult<PaymentReceipt>
where
    R: Repositories,
{
    Ok(Json(state.payment.pay(&user.account, &code).await?))
}

// ============================================
// Back office
// ============================================

async fn admin_models<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
) -> ApiResult<Vec<AdminModelDto>>
where
    R: Repositories,
{
    Ok(Json(state.back_office.models(&user.account)?))
}

async fn admin_list<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    ApiPath(model): ApiPath<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<AdminListing>
where
    R: Repositories,
{
    let listing = state
        .back_office
        .list(&user.account, &model, query.page())
        .await?;
    Ok(Json(listing))
}

async fn admin_order_status<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    ApiPath(code): ApiPath<String>,
    JsonBody(request): JsonBody<OrderStatusRequest>,
) -> Result<StatusCode, MarketplaceError>
where
    R: Repositories,
{
    state
        .back_office
        .set_order_status(&user.account, &code, request.status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn admin_seller_flag<R>(
    State(state): State<AppState<R>>,
    user: AuthUser,
    ApiPath(user_id): ApiPath<UserId>,
    JsonBody(request): JsonBody<SellerFlagRequest>,
) -> Result<StatusCode, MarketplaceError>
where
    R: Repositories,
{
    state
        .back_office
        .set_seller(&user.account, user_id, request.is_seller)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::HttpErrorResponse;
    use crate::infrastructure::auth::Argon2Credentials;
    use crate::infrastructure::config::Container;
    use crate::infrastructure::persistence::SqliteStore;
    use axum::body::Body;
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn create_test_router() -> Router {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let container = Container::new(store, &Config::default())
            .with_credentials(Arc::new(Argon2Credentials::with_cost(8, 1)));
        create_router(container.app_state("test"))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
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

    async fn register(app: &Router, username: &str, is_seller: bool) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": username,
                "password1": "correct-horse",
                "password2": "correct-horse",
                "is_seller": is_seller,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_test_router().await;
        let (status, body) = send(&app, "GET", "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        let health: HealthResponse = serde_json::from_value(body).unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.version, "test");
    }

    #[tokio::test]
    async fn test_profile_requires_token() {
        let app = create_test_router().await;
        let (status, body) = send(&app, "GET", "/api/v1/profile", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let error: HttpErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(error.code, "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_register_then_view_profile() {
        let app = create_test_router().await;
        let token = register(&app, "alice", false).await;

        let (status, body) = send(&app, "GET", "/api/v1/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");
        assert_eq!(body["is_seller"], false);
        assert_eq!(body["is_staff"], false);
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let app = create_test_router().await;
        let token = register(&app, "bob", false).await;

        let (status, _) = send(&app, "POST", "/api/v1/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "GET", "/api/v1/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let app = create_test_router().await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "carol" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_bad_path_id_is_json_error() {
        let app = create_test_router().await;
        let (status, body) = send(&app, "GET", "/api/v1/shops/abc/showcase", None, None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: HttpErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(error.code, "INVALID_REQUEST");
        assert!(error.message.contains("abc"), "{}", error.message);
    }

    #[tokio::test]
    async fn test_missing_query_field_is_json_error() {
        let app = create_test_router().await;
        let token = register(&app, "erin", true).await;
        let (status, body) = send(
            &app,
            "GET",
            "/api/v1/shops/1/statistics?date_to=2026-03-01",
            Some(&token),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: HttpErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(error.code, "INVALID_REQUEST");
        assert!(error.message.contains("date_from"), "{}", error.message);
    }

    #[tokio::test]
    async fn test_back_office_is_staff_only() {
        let app = create_test_router().await;
        let token = register(&app, "dave", true).await;

        let (status, body) = send(&app, "GET", "/api/v1/admin", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn test_empty_listings_have_one_page() {
        let app = create_test_router().await;
        for uri in ["/api/v1/items", "/api/v1/shops", "/api/v1/promotions?page=9"] {
            let (status, body) = send(&app, "GET", uri, None, None).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body["number"], 1, "{uri}");
            assert_eq!(body["num_pages"], 1, "{uri}");
            assert_eq!(body["items"], json!([]), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_seller_creates_shop_and_item() {
        let app = create_test_router().await;
        let token = register(&app, "erin", true).await;

        let (status, shop) = send(
            &app,
            "POST",
            "/api/v1/shops",
            Some(&token),
            Some(json!({ "name": "Tea House", "tags": "tea" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{shop}");
        let shop_id = shop["id"].as_i64().unwrap();

        let (status, item) = send(
            &app,
            "POST",
            &format!("/api/v1/shops/{shop_id}/items"),
            Some(&token),
            Some(json!({
                "code": 1001,
                "name": "Sencha",
                "description": "Green\nJapanese",
                "price": "4.50",
                "amount": 12,
                "files": ["items/sencha.jpg"],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{item}");
        let item_id = item["id"].as_i64().unwrap();

        let (status, detail) =
            send(&app, "GET", &format!("/api/v1/items/{item_id}"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["description"], json!(["Green", "Japanese"]));
        assert!(detail.get("amount").is_none());

        let (status, showcase) = send(
            &app,
            "GET",
            &format!("/api/v1/shops/{shop_id}/showcase"),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(showcase["items"][0]["image"], "items/sencha.jpg");
    }
}
