use schoolportal_api::types::{AggregateRecord, UserInfo};
use schoolportal_api::{Client, Error, SyncClient};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetch_html_success_sends_cookie() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/portal/timetable.asp"))
        .and(query_param("id", "42"))
        .and(header("cookie", "ASPSESSION=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<table></table>"))
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri()).with_session_cookie("ASPSESSION=abc");
    let url = format!("{}/portal/timetable.asp?id=42", mock_server.uri());
    let html = client.fetch_html(&url).await.unwrap();
    assert_eq!(html, "<table></table>");
}

#[tokio::test]
async fn fetch_html_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/portal/grades.asp"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let client = Client::new(&mock_server.uri());
    let url = format!("{}/portal/grades.asp", mock_server.uri());
    match client.fetch_html(&url).await {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "Service Unavailable");
        }
        other => panic!("expected HttpStatus, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn fetch_html_connection_refused() {
    let client = Client::new("http://127.0.0.1:9");
    let result = client.fetch_html("http://127.0.0.1:9/portal").await;
    assert!(matches!(result, Err(Error::RequestFailed)));
}

#[tokio::test]
async fn sync_submit_returns_reply_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sync"))
        .and(header("authorization", "Bearer secret"))
        .and(body_partial_json(serde_json::json!({ "user": { "userId": 7 } })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "ok": true, "token": "one-time" })),
        )
        .mount(&mock_server)
        .await;

    let record = AggregateRecord::new(UserInfo {
        user_id: 7,
        name: None,
    });
    let sync = SyncClient::new(&format!("{}/api/sync", mock_server.uri()))
        .with_bearer_token("secret");
    let reply = sync.submit(&record).await.unwrap();
    assert_eq!(reply["token"], "one-time");
}

#[tokio::test]
async fn sync_submit_empty_reply_is_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sync"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let sync = SyncClient::new(&format!("{}/api/sync", mock_server.uri()));
    let reply = sync.submit(&serde_json::json!({})).await.unwrap();
    assert!(reply.is_null());
}

#[tokio::test]
async fn sync_submit_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sync"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&mock_server)
        .await;

    let sync = SyncClient::new(&format!("{}/api/sync", mock_server.uri()));
    let result = sync.submit(&serde_json::json!({})).await;
    assert!(matches!(result, Err(Error::HttpStatus { status: 401, .. })));
}
