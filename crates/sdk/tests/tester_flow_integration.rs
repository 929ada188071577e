//! End-to-end flow of a tester page: load the schema for a resource, derive
//! a starting payload, send requests through the resource client, and keep
//! the bounded per-endpoint history.

use std::sync::Arc;

use chrono::Utc;
use reqnest_common::time::format_reset_countdown;
use reqnest_domain::{CallRecord, Endpoint};
use reqnest_sdk::{
    default_sample, CallLog, MemorySessionStore, ResourceCall, ResourceClient, SchemaLoader,
    SdkConfig,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ResourceClient {
    ResourceClient::builder()
        .config(SdkConfig::new(server.uri()))
        .build()
        .expect("resource client")
}

fn client_for_dead_port() -> ResourceClient {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    ResourceClient::builder()
        .config(SdkConfig::new(format!("http://{}", addr)))
        .build()
        .expect("resource client")
}

#[tokio::test]
async fn schema_to_first_send() {
    let server = MockServer::start().await;

    let schema_json = json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "total": { "type": "number" }
        },
        "required": ["name"]
    });
    Mock::given(method("GET"))
        .and(path("/apis/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"name": "orders", "schemaJson": serde_json::to_string(&schema_json).unwrap()}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/data/orders"))
        .and(body_json(json!({"name": "", "total": 0})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "ord_1"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = Arc::new(MemorySessionStore::new());
    let loader =
        SchemaLoader::new(SdkConfig::new(server.uri()), session.clone()).expect("loader");
    let client = client_for(&server);
    let mut log = CallLog::new();

    // Schema -> sample -> send, the pipeline behind every tester page.
    let schema = loader.load("orders").await.expect("schema");
    let sample = default_sample(&schema);

    let record = client
        .dispatch(ResourceCall::Create { resource: "orders", body: &sample })
        .await
        .expect("dispatch");
    log.record(Endpoint::Create, record);

    let latest = log.latest(Endpoint::Create).expect("record");
    assert_eq!(latest.status(), Some(201));
    assert_eq!(latest.request.url, format!("{}/data/orders", server.uri()));
}

#[tokio::test]
async fn http_errors_and_transport_failures_land_in_the_same_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/orders"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "exploded"})))
        .mount(&server)
        .await;

    let mut log = CallLog::new();

    // A 500 answer is an ordinary outcome with a status and no error.
    let record = client_for(&server)
        .dispatch(ResourceCall::List { resource: "orders" })
        .await
        .expect("dispatch");
    log.record(Endpoint::List, record);

    // A dropped connection is a transport outcome with an error and no status.
    let record = client_for_dead_port()
        .dispatch(ResourceCall::List { resource: "orders" })
        .await
        .expect("dispatch");
    log.record(Endpoint::List, record);

    let records: Vec<&CallRecord> = log.entries(Endpoint::List).collect();
    assert_eq!(records.len(), 2);

    // Newest first: the transport failure is index 0.
    assert_eq!(records[0].status(), None);
    assert!(records[0].error_message().is_some());
    assert_eq!(records[1].status(), Some(500));
    assert_eq!(records[1].error_message(), None);
}

#[tokio::test]
async fn update_sends_query_parameters_and_strips_the_match_field() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/data/orders"))
        .and(query_param("updateAll", "false"))
        .and(query_param("field", "id"))
        .and(body_json(json!({"name": "renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updated": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server)
        .dispatch(ResourceCall::Update {
            resource: "orders",
            data: &json!({"id": "ord_1", "name": "renamed"}),
            update_all: false,
            match_field: "id",
        })
        .await
        .expect("dispatch");

    assert_eq!(record.status(), Some(200));
    assert_eq!(record.request.params["updateAll"], "false");
    assert_eq!(record.request.params["field"], "id");
    assert_eq!(record.request.body, Some(json!({"name": "renamed"})));
}

#[tokio::test]
async fn rate_limit_exhaustion_surfaces_with_a_countdown() {
    let now = Utc::now().timestamp();
    let reset = now + 3661;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/orders"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-RateLimit-Remaining", "0")
                .insert_header("X-RateLimit-Limit", "60")
                .insert_header("X-RateLimit-Reset", reset.to_string().as_str())
                .set_body_json(json!([])),
        )
        .mount(&server)
        .await;

    let record = client_for(&server)
        .dispatch(ResourceCall::List { resource: "orders" })
        .await
        .expect("dispatch");

    let status = record.rate_limit().expect("rate limit signal");
    assert_eq!(status.remaining, 0);
    assert_eq!(status.limit, Some(60));
    assert_eq!(format_reset_countdown(status.reset, now), "1h 1m");
}

#[tokio::test]
async fn history_is_bounded_per_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut log = CallLog::new();

    for _ in 0..11 {
        let record = client
            .dispatch(ResourceCall::List { resource: "orders" })
            .await
            .expect("dispatch");
        log.record(Endpoint::List, record);
    }

    assert_eq!(log.len(Endpoint::List), 10);

    log.clear(Endpoint::List);
    assert_eq!(log.len(Endpoint::List), 0);
}
