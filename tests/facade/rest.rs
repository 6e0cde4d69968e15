use serde_json::{json, Value};
use tandem_sf_api::{ErrorKind, Protocol};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{authenticated, TOKEN};

#[tokio::test]
async fn test_query_returns_page_unchanged() {
    let server = MockServer::start().await;
    let page = json!({
        "done": true,
        "totalSize": 2,
        "records": [{"Id": "1"}, {"Id": "2"}]
    });

    Mock::given(method("GET"))
        .and(path("/services/data/v45/query/"))
        .and(query_param("q", "SELECT Id FROM Account"))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page))
        .expect(1)
        .mount(&server)
        .await;

    let sf = authenticated(&server, Protocol::Rest);
    let result = sf.query("SELECT Id FROM Account").await.unwrap();

    assert_eq!(serde_json::to_value(&result).unwrap(), page);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_query_all_merges_two_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/data/v45/queryAll/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "done": false,
            "totalSize": 2,
            "records": [{"Id": "A"}, {"Id": "B"}],
            "nextRecordsUrl": "/cursor1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services/data/v45/query/cursor1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "done": true,
            "totalSize": 1,
            "records": [{"Id": "C"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sf = authenticated(&server, Protocol::Rest);
    let result = sf.query_all("SELECT Id FROM Account").await.unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "done": true,
            "totalSize": 3,
            "records": [{"Id": "A"}, {"Id": "B"}, {"Id": "C"}]
        })
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].url.path(), "/services/data/v45/query/cursor1");
}

#[tokio::test]
async fn test_query_all_respects_max_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "done": false,
            "totalSize": 1,
            "records": [{"Id": "A"}],
            "nextRecordsUrl": "/services/data/v45/query/01g-next"
        })))
        .mount(&server)
        .await;

    let mut sf = authenticated(&server, Protocol::Rest);
    sf.set_max_pages(Some(2));

    let err = sf.query_all("SELECT Id FROM Account").await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PageLimitExceeded { limit: 2 }));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_object_handle_crud() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/data/v45/sobjects/Account"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "001NEW",
            "success": true,
            "errors": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/services/data/v45/sobjects/Account/001NEW"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/services/data/v45/sobjects/Account/001NEW"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let sf = authenticated(&server, Protocol::Rest);
    let account = sf.sobject("Account").unwrap();

    let created = account.create(&json!({"Name": "Acme"})).await.unwrap();
    let id = created["id"].as_str().unwrap();

    let updated = account.update(&json!([id, {"Name": "Renamed"}])).await.unwrap();
    assert_eq!(updated, Value::Null);

    account.delete(&json!(id)).await.unwrap();

    let err = account.delete(&json!([id])).await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch(_)));
}

#[tokio::test]
async fn test_request_failed_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            r#"[{"errorCode":"NOT_FOUND","message":"The requested resource does not exist"}]"#,
        ))
        .mount(&server)
        .await;

    let sf = authenticated(&server, Protocol::Rest);
    let err = sf.get("/sobjects/Nope/describe", None).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    match err.kind {
        ErrorKind::RequestFailed { ref body, .. } => assert!(body.contains("NOT_FOUND")),
        ref other => panic!("unexpected error kind: {other:?}"),
    }
}
