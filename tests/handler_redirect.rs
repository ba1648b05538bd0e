mod common;

use axum::http::{StatusCode, header};
use serde_json::{Value, json};
use sqlx::PgPool;

#[sqlx::test]
async fn test_redirect_success(pool: PgPool) {
    let server = common::test_server(pool.clone());
    common::create_test_link(&pool, "go", "https://example.com/target", None).await;

    let response = server.get("/s/go").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.header(header::LOCATION).to_str().unwrap(),
        "https://example.com/target"
    );
    assert_eq!(common::click_count(&pool, "go").await, 1);
}

#[sqlx::test]
async fn test_redirect_counts_every_click(pool: PgPool) {
    let server = common::test_server(pool.clone());
    common::create_test_link(&pool, "multi", "https://example.com", None).await;

    for _ in 0..3 {
        server.get("/s/multi").await.assert_status(StatusCode::FOUND);
    }

    assert_eq!(common::click_count(&pool, "multi").await, 3);
}

#[sqlx::test]
async fn test_redirect_not_found(pool: PgPool) {
    let server = common::test_server(pool);

    let response = server.get("/s/nothere").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"]["code"], "not_found");
}

#[sqlx::test]
async fn test_redirect_expired_link_is_gone(pool: PgPool) {
    let server = common::test_server(pool.clone());
    common::create_expired_link(&pool, "old", "https://example.com").await;

    let response = server.get("/s/old").await;

    response.assert_status(StatusCode::GONE);
    assert_eq!(response.json::<Value>()["error"]["code"], "gone");
    assert_eq!(common::click_count(&pool, "old").await, 0);
}

#[sqlx::test]
async fn test_shorten_then_redirect(pool: PgPool) {
    let server = common::test_server(pool.clone());

    let response = server
        .post("/shorten")
        .json(&json!({ "original_url": "https://example.com/roundtrip" }))
        .await;
    response.assert_status_ok();

    let short_url = response.json::<Value>()["short_url"]
        .as_str()
        .unwrap()
        .to_string();
    let path = short_url.trim_start_matches(common::TEST_BASE_URL);

    let redirect = server.get(path).await;

    redirect.assert_status(StatusCode::FOUND);
    assert_eq!(
        redirect.header(header::LOCATION).to_str().unwrap(),
        "https://example.com/roundtrip"
    );
}

#[sqlx::test]
async fn test_shorten_unicode_url_then_redirect(pool: PgPool) {
    let server = common::test_server(pool);

    let response = server
        .post("/shorten")
        .json(&json!({ "original_url": "https://münchen.de/straße" }))
        .await;
    response.assert_status_ok();

    let json = response.json::<Value>();
    let stored = json["original_url"].as_str().unwrap().to_string();
    assert_eq!(stored, "https://xn--mnchen-3ya.de/stra%C3%9Fe");

    let path = json["short_url"]
        .as_str()
        .unwrap()
        .trim_start_matches(common::TEST_BASE_URL)
        .to_string();

    let redirect = server.get(&path).await;

    redirect.assert_status(StatusCode::FOUND);
    assert_eq!(redirect.header(header::LOCATION).to_str().unwrap(), stored);
}
