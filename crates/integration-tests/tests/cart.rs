//! Integration tests for the cart: adding, grouping, removing, clearing.

#![allow(clippy::unwrap_used)]

use ethos_integration_tests::TestServer;
use reqwest::{Client, StatusCode};

const APEX: &str = "1";
const GRINDER: &str = "2";

async fn add(server: &TestServer, finish: &str, quantity: &str) -> reqwest::Response {
    server
        .client
        .post(server.url("/cart/add"))
        .form(&[
            ("product_id", APEX),
            ("finish", finish),
            ("quantity", quantity),
            ("return_to", "/collection"),
        ])
        .send()
        .await
        .unwrap()
}

async fn cart_count(server: &TestServer, client: &Client) -> String {
    client
        .get(server.url("/cart/count"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_add_redirects_back_with_drawer_open() {
    let server = TestServer::start().await;

    let resp = add(&server, "Matte Black", "2").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/collection");
    assert_eq!(resp.url().query(), Some("cart=open"));

    let body = resp.text().await.unwrap();
    assert!(body.contains("Subtotal"));
    assert!(body.contains("2 × $145.00"));
    assert!(body.contains("$290.00"));
    assert!(body.contains(">2</span>"));
}

#[tokio::test]
async fn test_htmx_add_returns_badge_and_triggers() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .post(server.url("/cart/add"))
        .header("HX-Request", "true")
        .form(&[("product_id", APEX), ("finish", "Copper"), ("quantity", "3")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let trigger = resp.headers()["hx-trigger"].to_str().unwrap().to_string();
    assert!(trigger.contains(r#""cart-updated":{"count":3}"#));
    assert!(trigger.contains(r#""open-cart":{"delayMs":0}"#));

    let body = resp.text().await.unwrap();
    assert!(body.contains(r#"id="cart-count""#));
    assert!(body.contains(">3</span>"));
}

#[tokio::test]
async fn test_quantity_is_clamped() {
    let server = TestServer::start().await;

    add(&server, "Matte Black", "25").await;
    assert!(cart_count(&server, &server.client).await.contains(">10</span>"));

    add(&server, "Copper", "0").await;
    assert!(cart_count(&server, &server.client).await.contains(">11</span>"));
}

#[tokio::test]
async fn test_same_variant_groups_into_one_row() {
    let server = TestServer::start().await;

    add(&server, "Matte Black", "1").await;
    add(&server, "Matte Black", "2").await;
    add(&server, "Copper", "1").await;

    let body = server
        .client
        .get(server.url("/cart"))
        .header("HX-Request", "true")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(body.matches(r#"name="key""#).count(), 2);
    assert!(body.contains("3 × $145.00"));
    assert!(body.contains("$580.00"));
    // Fragment only, no layout.
    assert!(!body.contains("<html"));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .post(server.url("/cart/add"))
        .form(&[("product_id", "99"), ("finish", "Matte Black")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_finish_is_bad_request() {
    let server = TestServer::start().await;

    let resp = add(&server, "Gold Leaf", "1").await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(cart_count(&server, &server.client).await.contains(">0</span>"));
}

#[tokio::test]
async fn test_display_only_product_cannot_be_added() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .post(server.url("/cart/add"))
        .form(&[("product_id", GRINDER), ("finish", "Matte Black")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_group_and_clear() {
    let server = TestServer::start().await;

    add(&server, "Matte Black", "2").await;
    add(&server, "Copper", "1").await;

    let resp = server
        .client
        .post(server.url("/cart/remove"))
        .form(&[("key", "The Apex Dripper v2-Matte Black")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.url().path(), "/cart");
    let body = resp.text().await.unwrap();
    assert!(!body.contains("Matte Black</p>"));
    assert!(body.contains("Copper"));
    assert!(cart_count(&server, &server.client).await.contains(">1</span>"));

    let resp = server
        .client
        .post(server.url("/cart/clear"))
        .header("HX-Request", "true")
        .send()
        .await
        .unwrap();
    assert!(
        resp.headers()["hx-trigger"]
            .to_str()
            .unwrap()
            .contains(r#""count":0"#)
    );
    assert!(resp.text().await.unwrap().contains("Your collection is empty."));
}

#[tokio::test]
async fn test_removing_unknown_group_is_harmless() {
    let server = TestServer::start().await;

    add(&server, "Copper", "1").await;
    let resp = server
        .client
        .post(server.url("/cart/remove"))
        .form(&[("key", "Nothing-Here")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(cart_count(&server, &server.client).await.contains(">1</span>"));
}

#[tokio::test]
async fn test_visitors_have_separate_carts() {
    let server = TestServer::start().await;
    let other = server.new_visitor();

    add(&server, "Copper", "4").await;

    assert!(cart_count(&server, &server.client).await.contains(">4</span>"));
    assert!(cart_count(&server, &other).await.contains(">0</span>"));
}

#[tokio::test]
async fn test_offsite_return_path_is_ignored() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .post(server.url("/cart/add"))
        .form(&[
            ("product_id", APEX),
            ("finish", "Copper"),
            ("return_to", "//evil.example/"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.url().host_str(), Some("127.0.0.1"));
    assert_eq!(resp.url().path(), "/");
}
