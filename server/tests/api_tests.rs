// kedai_server/tests/api_tests.rs

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::*;
use kedai_server::state::AppState;
use kedai_server::web::configure_app_routes;
use rust_decimal::Decimal;
use serde_json::{json, Value};

macro_rules! init_app {
  ($state:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

fn scenario_body(customer_name: &str) -> Value {
  json!({
    "customer_name": customer_name,
    "items": [
      {"product_id": KOPI_SUSU, "quantity": 2, "price": 15000, "name": "Kopi Susu", "image": "kopi-susu.jpg"},
      {"product_id": CAPPUCCINO, "quantity": 1, "price": 20000, "name": "Cappuccino"}
    ],
    "total_price": 50000
  })
}

async fn state() -> AppState {
  test_state(Decimal::ZERO).await
}

#[actix_web::test]
async fn health_check_answers() {
  let state = state().await;
  let app = init_app!(state);
  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn products_are_listed_by_id() {
  let state = state().await;
  let app = init_app!(state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/products").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;

  assert_eq!(body["success"], true);
  let products = body["data"].as_array().unwrap();
  assert_eq!(products.len(), 5);
  let ids: Vec<i64> = products.iter().map(|p| p["id"].as_i64().unwrap()).collect();
  let mut sorted = ids.clone();
  sorted.sort_unstable();
  assert_eq!(ids, sorted);
  assert_eq!(products[0]["name"], "Kopi Susu");
  assert_eq!(products[0]["price"].as_f64(), Some(15000.0));
  assert!(products[0].get("image_url").is_none());
}

#[actix_web::test]
async fn product_image_url_uses_asset_base() {
  let base = state().await;
  let mut config = (*base.config).clone();
  config.asset_base_url = Some("http://cdn.kedai.test/images".to_string());
  let state = AppState::new(base.db_pool.clone(), std::sync::Arc::new(config));
  let app = init_app!(state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/products/1").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"]["image_url"], "http://cdn.kedai.test/images/kopi-susu.jpg");
}

#[actix_web::test]
async fn missing_product_is_404() {
  let state = state().await;
  let app = init_app!(state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/products/999").to_request()).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], false);
  assert!(body["error"].as_str().unwrap().contains("999"));
}

#[actix_web::test]
async fn malformed_product_id_is_400() {
  let state = state().await;
  let app = init_app!(state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/products/abc").to_request()).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn creating_a_user_twice_returns_201_then_200() {
  let state = state().await;
  let app = init_app!(state);

  let first = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/users")
      .set_json(json!({"name": "Andi"}))
      .to_request(),
  )
  .await;
  assert_eq!(first.status(), StatusCode::CREATED);
  let first_body: Value = test::read_body_json(first).await;
  assert_eq!(first_body["data"]["email"], "andi@example.com");
  assert!(first_body["data"].get("password").is_none());

  let second = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/users")
      .set_json(json!({"name": "Andi", "email": "other@kedai.id"}))
      .to_request(),
  )
  .await;
  assert_eq!(second.status(), StatusCode::OK);
  let second_body: Value = test::read_body_json(second).await;
  assert_eq!(second_body["data"]["id"], first_body["data"]["id"]);

  let list = test::call_service(&app, test::TestRequest::get().uri("/api/users").to_request()).await;
  let list_body: Value = test::read_body_json(list).await;
  assert_eq!(list_body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn user_validation_errors_are_400() {
  let state = state().await;
  let app = init_app!(state);

  for body in [json!({"name": "A"}), json!({"name": "Andi", "email": "not-an-email"})] {
    let resp = test::call_service(&app, test::TestRequest::post().uri("/api/users").set_json(body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }
}

#[actix_web::test]
async fn duplicate_email_is_409() {
  let state = state().await;
  let app = init_app!(state);

  let created = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/users")
      .set_json(json!({"name": "Andi", "email": "shared@kedai.id"}))
      .to_request(),
  )
  .await;
  assert_eq!(created.status(), StatusCode::CREATED);

  let clash = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/users")
      .set_json(json!({"name": "Budi", "email": "shared@kedai.id"}))
      .to_request(),
  )
  .await;
  assert_eq!(clash.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn order_is_created_and_listed() {
  let state = state().await;
  let app = init_app!(state);

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/orders")
      .set_json(scenario_body("Andi"))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], true);
  assert_eq!(body["data"]["total_price"].as_f64(), Some(50000.0));
  assert_eq!(body["data"]["status"], "pending");
  assert_eq!(body["data"]["customer_name"], "Andi");
  assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
  let order_id = body["data"]["id"].as_i64().unwrap();

  let list = test::call_service(&app, test::TestRequest::get().uri("/api/orders").to_request()).await;
  assert_eq!(list.status(), StatusCode::OK);
  let list_body: Value = test::read_body_json(list).await;
  assert_eq!(list_body["data"][0]["id"].as_i64(), Some(order_id));

  let single = test::call_service(
    &app,
    test::TestRequest::get().uri(&format!("/api/orders/{}", order_id)).to_request(),
  )
  .await;
  assert_eq!(single.status(), StatusCode::OK);
}

#[actix_web::test]
async fn order_rejections_map_to_400() {
  let state = state().await;
  let app = init_app!(state);

  let mut empty = scenario_body("Andi");
  empty["items"] = json!([]);
  let mut anonymous = scenario_body("Andi");
  anonymous.as_object_mut().unwrap().remove("customer_name");
  let mut wrong_total = scenario_body("Andi");
  wrong_total["total_price"] = json!(42000);
  let mut unknown_field = scenario_body("Andi");
  unknown_field["coupon"] = json!("FREE");
  let missing_items = json!({"customer_name": "Andi"});

  for body in [empty, anonymous, wrong_total, unknown_field, missing_items] {
    let resp = test::call_service(&app, test::TestRequest::post().uri("/api/orders").set_json(&body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    let resp_body: Value = test::read_body_json(resp).await;
    assert_eq!(resp_body["success"], false);
  }

  assert_eq!(count(&state.db_pool, "orders").await, 0);
}

#[actix_web::test]
async fn storage_failure_is_500_without_partial_order() {
  let state = state().await;
  break_order_items(&state.db_pool).await;
  let app = init_app!(state);

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/orders")
      .set_json(scenario_body("Andi"))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Database operation failed.");
  assert_eq!(count(&state.db_pool, "orders").await, 0);
}

#[actix_web::test]
async fn missing_order_is_404() {
  let state = state().await;
  let app = init_app!(state);
  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/orders/77").to_request()).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn oversized_amounts_are_rejected_with_400() {
  let state = state().await;
  let app = init_app!(state);

  let body = r#"{"customer_name":"Andi","items":[{"product_id":1,"quantity":9223372036854775807,"price":100000000000000000000,"name":"Kopi"}]}"#;
  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/orders")
      .insert_header(("content-type", "application/json"))
      .set_payload(body)
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let resp_body: Value = test::read_body_json(resp).await;
  assert_eq!(resp_body["success"], false);
  assert_eq!(count(&state.db_pool, "orders").await, 0);
}

#[actix_web::test]
async fn high_precision_prices_survive_the_round_trip() {
  let state = state().await;
  let app = init_app!(state);

  let body = r#"{"customer_name":"Andi","items":[{"product_id":1,"quantity":1,"price":123456789012345.67,"name":"Kopi Susu"}],"total_price":123456789012345.67}"#;
  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/orders")
      .insert_header(("content-type", "application/json"))
      .set_payload(body)
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created: Value = test::read_body_json(resp).await;
  assert_eq!(created["data"]["total_price"].to_string(), "123456789012345.67");
  assert_eq!(created["data"]["items"][0]["price"].to_string(), "123456789012345.67");
}
