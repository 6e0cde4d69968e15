use serde_json::json;
use tandem_sf_api::{ErrorKind, Protocol};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{authenticated, soap_page, TOKEN};

#[tokio::test]
async fn test_query_all_merges_pages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/Soap/u/45"))
        .and(header("SOAPAction", "queryAll"))
        .and(body_string_contains(format!("<urn:sessionId>{TOKEN}</urn:sessionId>")))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(soap_page(false, Some("01g-500"), &["A", "B"], 2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/services/Soap/u/45"))
        .and(header("SOAPAction", "queryMore"))
        .and(body_string_contains("<urn:queryLocator>01g-500</urn:queryLocator>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(soap_page(true, None, &["C"], 1)))
        .expect(1)
        .mount(&server)
        .await;

    let sf = authenticated(&server, Protocol::Soap);
    let result = sf.query_all("SELECT Id, Name FROM Account").await.unwrap();

    assert!(result.done);
    assert_eq!(result.total_size, 3);
    assert_eq!(
        result.records[2],
        json!({"attributes": {"type": "Account"}, "Id": "C", "Name": "Account C"})
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_single_page_query_all() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(soap_page(true, None, &["A"], 1)))
        .expect(1)
        .mount(&server)
        .await;

    let sf = authenticated(&server, Protocol::Soap);
    let result = sf.query_all("SELECT Id FROM Account").await.unwrap();

    assert_eq!(result.total_size, 1);
    assert_eq!(result.records.len(), 1);
}

#[tokio::test]
async fn test_via_rest_and_soap_return_the_same_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/data/v45/query/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "done": true,
            "totalSize": 1,
            "records": [{"attributes": {"type": "Account"}, "Id": "A", "Name": "Account A"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(header("SOAPAction", "query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(soap_page(true, None, &["A"], 1)))
        .expect(1)
        .mount(&server)
        .await;

    let sf = authenticated(&server, Protocol::Rest);
    let rest = sf.query("SELECT Id, Name FROM Account").await.unwrap();
    let soap = sf
        .via(Protocol::Soap)
        .query("SELECT Id, Name FROM Account")
        .await
        .unwrap();

    assert_eq!(rest.records, soap.records);
    assert_eq!(sf.protocol(), Protocol::Rest);
}

#[tokio::test]
async fn test_object_handle_batch_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("SOAPAction", "create"))
        .and(body_string_contains(r#"<urn:sObjects xsi:type="urn1:Contact">"#))
        .and(body_string_contains("<LastName>O&apos;Brien</LastName>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<Envelope><Body><createResponse><result><id>003NEW</id><success>true</success></result></createResponse></Body></Envelope>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let sf = authenticated(&server, Protocol::Soap);
    let contact = sf.sobject("Contact").unwrap();

    let reply = contact
        .create(&json!([{"LastName": "O'Brien"}]))
        .await
        .unwrap();
    assert_eq!(reply["result"]["id"], "003NEW");

    let err = contact.create(&json!({"LastName": "x"})).await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch(_)));

    let err = contact.delete(&json!("003NEW")).await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch(_)));
}
