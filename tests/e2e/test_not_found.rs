use crate::e2e::helpers;

use helpers::assertions::assert_error_response;
use helpers::{test_config, TestContext};
use hyper::StatusCode;
use log_monitor_backend::infrastructure::config::Environment;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_404_for_unknown_get_route(ctx: &TestContext) {
    let response = ctx.client.get("/nonexistent").await.unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("GET")
        .assert_error_message("/nonexistent");

    let body = response.json();
    assert_error_response(body, "NOT_FOUND");
    assert_eq!(body["error"]["message"], "Route not found: GET /nonexistent");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_404_for_unknown_post_route(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/invalid", &json!({ "level": "ERROR" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("POST")
        .assert_error_message("/api/invalid");
    assert_error_response(response.json(), "NOT_FOUND");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_treat_unsupported_methods_as_unknown_routes(ctx: &TestContext) {
    let response = ctx.client.delete("/health").await.unwrap();
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"]["message"], "Route not found: DELETE /health");

    let response = ctx.client.put("/", &json!({})).await.unwrap();
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"]["message"], "Route not found: PUT /");

    let response = ctx.client.patch("/health", &json!({})).await.unwrap();
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"]["message"], "Route not found: PATCH /health");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_leave_the_query_string_out_of_the_message(ctx: &TestContext) {
    let response = ctx.client.get("/logs?level=error").await.unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"]["message"], "Route not found: GET /logs");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_include_trace_in_development(ctx: &TestContext) {
    let response = ctx.client.get("/nonexistent").await.unwrap();

    let stack = response.json()["error"]["details"]["stack"]
        .as_str()
        .expect("development responses carry a stack");
    assert!(stack.contains("Route not found: GET /nonexistent"));
}

#[tokio::test]
async fn it_should_hide_trace_in_production() {
    let ctx = TestContext::with_config(test_config(Environment::Production)).await;

    let response = ctx.client.get("/nonexistent").await.unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
    let body = response.json();
    assert_error_response(body, "NOT_FOUND");
    assert!(body["error"].get("details").is_none());
}

#[tokio::test]
async fn it_should_hide_trace_in_test_mode() {
    let ctx = TestContext::with_config(test_config(Environment::Test)).await;

    let response = ctx.client.get("/nonexistent").await.unwrap();

    assert!(response.json()["error"].get("details").is_none());
}
