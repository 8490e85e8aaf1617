// HTTP tests for the Food Table API
// Drives the full router against the in-memory backend; no server or database needed.

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use foodtable_api::{
    app,
    auth::{AuthConfig, Environment, JwtConfig},
    storage::StorageBackend,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt: JwtConfig {
            secret: "http-test-secret".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn test_app_with(config: AuthConfig) -> Router {
    app(Arc::new(StorageBackend::in_memory()), config, vec![])
}

fn test_app() -> Router {
    test_app_with(auth_config())
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }

    fn set_cookie(&self) -> String {
        self.headers
            .get(header::SET_COOKIE)
            .expect("No Set-Cookie header")
            .to_str()
            .unwrap()
            .to_string()
    }
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    TestResponse {
        status,
        headers,
        body,
    }
}

async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn post_empty(app: &Router, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Log in as `email` and return the `token=...` pair for a Cookie header
async fn login(app: &Router, email: &str) -> String {
    let response = post_json(app, "/jwt", json!({ "email": email })).await;
    assert_eq!(response.status, StatusCode::OK);
    let set_cookie = response.set_cookie();
    set_cookie
        .split(';')
        .next()
        .expect("Empty Set-Cookie")
        .to_string()
}

async fn create_food(app: &Router, food: Value) -> String {
    let response = post_json(app, "/myFoods", food).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["acknowledged"], true);
    body["insertedId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_liveness() {
    let app = test_app();
    let response = get(&app, "/", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "hello server");
}

#[tokio::test]
async fn test_jwt_sets_session_cookie() {
    let app = test_app();
    let response = post_json(&app, "/jwt", json!({"email": "a@x.com"})).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"success": true}));

    let cookie = response.set_cookie();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains(&format!("Max-Age={}", 365 * 24 * 60 * 60)));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn test_jwt_cookie_is_cross_site_in_production() {
    let app = test_app_with(AuthConfig {
        environment: Environment::Production,
        ..auth_config()
    });
    let response = post_json(&app, "/jwt", json!({"email": "a@x.com"})).await;

    let cookie = response.set_cookie();
    assert!(cookie.contains("Secure"));
    assert!(cookie.contains("SameSite=None"));
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let app = test_app();
    let response = post_empty(&app, "/logout").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"success": true}));

    let cookie = response.set_cookie();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_guarded_routes_require_session() {
    let app = test_app();

    for uri in [
        "/single-food/65f0c0ffee0000000000beef",
        "/my-added-food/a@x.com",
        "/my-ordered-food/a@x.com",
    ] {
        let response = get(&app, uri, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(response.json(), json!({"message": "unauthorized access"}));

        let response = get(&app, uri, Some("token=not-a-jwt")).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{}", uri);
    }
}

#[tokio::test]
async fn test_session_from_other_secret_rejected() {
    let issuer = test_app_with(AuthConfig {
        jwt: JwtConfig {
            secret: "another-secret".to_string(),
            ..Default::default()
        },
        ..Default::default()
    });
    let cookie = login(&issuer, "a@x.com").await;

    let app = test_app();
    let response = get(&app, "/my-added-food/a@x.com", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_my_added_food_requires_matching_email() {
    let app = test_app();
    create_food(&app, json!({"foodName": "Pizza", "userEmail": "a@x.com"})).await;
    create_food(&app, json!({"foodName": "Sushi", "userEmail": "b@x.com"})).await;

    let cookie = login(&app, "a@x.com").await;

    let response = get(&app, "/my-added-food/b@x.com", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.json(), json!({"message": "forbidden access"}));

    let response = get(&app, "/my-added-food/a@x.com", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    let foods = response.json();
    assert_eq!(foods.as_array().unwrap().len(), 1);
    assert_eq!(foods[0]["foodName"], "Pizza");
}

#[tokio::test]
async fn test_my_ordered_food_identity_check_is_configurable() {
    let relaxed = test_app();
    post_json(&relaxed, "/orderFood", json!({"foodId": "f1", "buyerEmail": "b@x.com"})).await;
    let cookie = login(&relaxed, "a@x.com").await;

    let response = get(&relaxed, "/my-ordered-food/b@x.com", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json().as_array().unwrap().len(), 1);

    let strict = test_app_with(AuthConfig {
        enforce_order_owner: true,
        ..auth_config()
    });
    let cookie = login(&strict, "a@x.com").await;

    let response = get(&strict, "/my-ordered-food/b@x.com", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = get(&strict, "/my-ordered-food/a@x.com", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!([]));
}

#[tokio::test]
async fn test_register_food_and_count_orders() {
    let app = test_app();

    let response = post_json(&app, "/users", json!({"email": "a@x.com"})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["acknowledged"], true);

    let id = create_food(
        &app,
        json!({"foodName": "Pizza", "userEmail": "a@x.com", "orderCount": 0}),
    )
    .await;

    for _ in 0..2 {
        let response = post_empty(&app, &format!("/increaseOrderCount/{}", id)).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.text(), "Order successfully increase!");
    }

    let cookie = login(&app, "a@x.com").await;
    let response = get(&app, &format!("/single-food/{}", id), Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);

    let food = response.json();
    assert_eq!(food["_id"], id.as_str());
    assert_eq!(food["foodName"], "Pizza");
    assert_eq!(food["userEmail"], "a@x.com");
    assert_eq!(food["orderCount"], 2);
}

#[tokio::test]
async fn test_increment_unknown_food_is_not_found() {
    let app = test_app();
    let id = create_food(&app, json!({"foodName": "Pizza", "orderCount": 3})).await;

    for uri in [
        "/increaseOrderCount/65f0c0ffee0000000000beef",
        "/increaseOrderCount/not-an-object-id",
    ] {
        let response = post_empty(&app, uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.json(), json!({"message": "Food item is not found!"}));
    }

    let response = get(&app, &format!("/findEmail/{}", id), None).await;
    assert_eq!(response.json()["orderCount"], 3);
}

#[tokio::test]
async fn test_increment_non_numeric_count_is_internal_error() {
    let app = test_app();
    let id = create_food(&app, json!({"foodName": "Pizza", "orderCount": "lots"})).await;

    let response = post_empty(&app, &format!("/increaseOrderCount/{}", id)).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json(), json!({"error": "Internal server error!"}));
}

#[tokio::test]
async fn test_missing_documents_read_as_null() {
    let app = test_app();
    let cookie = login(&app, "a@x.com").await;

    let response = get(&app, "/single-food/65f0c0ffee0000000000beef", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), Value::Null);

    let response = get(&app, "/findEmail/garbage", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), Value::Null);

    let response = get(&app, "/find-exist-order/nothing", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), Value::Null);
}

#[tokio::test]
async fn test_find_owner_is_unguarded() {
    let app = test_app();
    let id = create_food(&app, json!({"foodName": "Pizza", "userEmail": "a@x.com"})).await;

    let response = get(&app, &format!("/findEmail/{}", id), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["userEmail"], "a@x.com");
}

#[tokio::test]
async fn test_search_food_is_case_insensitive() {
    let app = test_app();
    create_food(&app, json!({"foodName": "Pizza"})).await;
    create_food(&app, json!({"foodName": "Pasta"})).await;

    let response = get(&app, "/search-food?foodName=pizza", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let found = response.json();
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["foodName"], "Pizza");

    let response = get(&app, "/search-food?foodName=zz", None).await;
    assert_eq!(response.json().as_array().unwrap().len(), 1);

    let response = get(&app, "/search-food", None).await;
    assert_eq!(response.json().as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_all_food_and_top_selling() {
    let app = test_app();
    for count in [5, 1, 9, 3, 7, 2, 8] {
        create_food(&app, json!({"foodName": format!("food-{}", count), "orderCount": count})).await;
    }

    let response = get(&app, "/allFood", None).await;
    assert_eq!(response.json().as_array().unwrap().len(), 7);

    let response = get(&app, "/top-selling", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let counts: Vec<i64> = response
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|food| food["orderCount"].as_i64().unwrap())
        .collect();
    assert_eq!(counts, vec![9, 8, 7, 5, 3, 2]);
}

#[tokio::test]
async fn test_order_lifecycle() {
    let app = test_app();
    let food_id = create_food(&app, json!({"foodName": "Pizza"})).await;

    let response = post_json(
        &app,
        "/orderFood",
        json!({"foodId": food_id, "buyerEmail": "a@x.com"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let order_id = response.json()["insertedId"].as_str().unwrap().to_string();

    let response = get(&app, &format!("/find-exist-order/{}", food_id), None).await;
    assert_eq!(response.json()["_id"], order_id.as_str());

    let delete = |uri: String| {
        let app = app.clone();
        async move {
            let request = Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            send(&app, request).await
        }
    };

    let response = delete(format!("/delete-order-food/{}", order_id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"acknowledged": true, "deletedCount": 1}));

    let response = delete(format!("/delete-order-food/{}", order_id)).await;
    assert_eq!(response.json()["deletedCount"], 0);

    let response = get(&app, &format!("/find-exist-order/{}", food_id), None).await;
    assert_eq!(response.json(), Value::Null);
}

#[tokio::test]
async fn test_gallery() {
    let app = test_app();

    let response = post_json(&app, "/gallery", json!({"image": "a.png", "caption": "Lunch"})).await;
    assert_eq!(response.status, StatusCode::OK);
    let id = response.json()["insertedId"].as_str().unwrap().to_string();

    let response = get(&app, "/gallery", None).await;
    let entries = response.json();
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["_id"], id.as_str());
    assert_eq!(entries[0]["caption"], "Lunch");
}

#[tokio::test]
async fn test_duplicate_registrations_are_kept() {
    let app = test_app();
    let first = post_json(&app, "/users", json!({"email": "a@x.com"})).await.json();
    let second = post_json(&app, "/users", json!({"email": "a@x.com"})).await.json();
    assert_ne!(first["insertedId"], second["insertedId"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_order_count_increments() {
    let app = test_app();
    let id = create_food(&app, json!({"foodName": "Pizza", "orderCount": 0})).await;

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let app = app.clone();
            let uri = format!("/increaseOrderCount/{}", id);
            tokio::spawn(async move { post_empty(&app, &uri).await.status })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    let response = get(&app, &format!("/findEmail/{}", id), None).await;
    assert_eq!(response.json()["orderCount"], 50);
}

#[tokio::test]
async fn test_session_with_audience_claim_is_accepted() {
    let app = test_app();
    let response = post_json(&app, "/jwt", json!({"email": "a@x.com", "aud": "web"})).await;
    assert_eq!(response.status, StatusCode::OK);
    let set_cookie = response.set_cookie();
    let cookie = set_cookie.split(';').next().unwrap();

    let response = get(&app, "/my-added-food/a@x.com", Some(cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_session_with_non_string_email() {
    let app = test_app();
    let response = post_json(&app, "/jwt", json!({"email": 5})).await;
    let set_cookie = response.set_cookie();
    let cookie = set_cookie.split(';').next().unwrap();

    let id = create_food(&app, json!({"foodName": "Pizza"})).await;
    let response = get(&app, &format!("/single-food/{}", id), Some(cookie)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = get(&app, "/my-added-food/5", Some(cookie)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
