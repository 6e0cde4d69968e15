use serde_json::json;
use tandem_sf_api::{Credentials, Protocol, SalesForce};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{authenticated, unauthenticated};

const LOGIN_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="urn:partner.soap.sforce.com">
  <soapenv:Body>
    <loginResponse>
      <result>
        <serverUrl>https://na9.salesforce.com/services/Soap/u/45.0/00D</serverUrl>
        <sessionId>00Dsoap!session</sessionId>
      </result>
    </loginResponse>
  </soapenv:Body>
</soapenv:Envelope>"#;

async fn assert_every_operation_requires_auth(sf: &SalesForce) {
    let account = sf.sobject("Account").unwrap();

    let errors = vec![
        sf.query("SELECT Id FROM Account").await.unwrap_err(),
        sf.query_all("SELECT Id FROM Account").await.unwrap_err(),
        sf.query_more("01g-500").await.unwrap_err(),
        sf.search("FIND {Acme}").await.unwrap_err(),
        sf.quick_search("Acme").await.unwrap_err(),
        sf.get("/limits/", None).await.unwrap_err(),
        sf.post("query", &json!("SELECT Id FROM Account")).await.unwrap_err(),
        account.describe().await.unwrap_err(),
        account.get(None, None).await.unwrap_err(),
        account.post(&json!([]), None).await.unwrap_err(),
        account.delete(&json!(42)).await.unwrap_err(),
        sf.post("upsert", &json!("x")).await.unwrap_err(),
        sf.post("query", &json!(42)).await.unwrap_err(),
    ];

    for err in errors {
        assert!(err.is_auth_error(), "{err}");
        assert!(err.to_string().contains("You need to first authenticate!"));
    }
}

#[tokio::test]
async fn test_rest_operations_require_auth() {
    let server = MockServer::start().await;
    let sf = unauthenticated(&server, Protocol::Rest);

    assert_every_operation_requires_auth(&sf).await;

    let account = sf.sobject("Account").unwrap();
    assert!(account.create(&json!({"Name": "x"})).await.unwrap_err().is_auth_error());
    assert!(account.update(&json!(["001", {"Name": "x"}])).await.unwrap_err().is_auth_error());
    assert!(account.delete(&json!("001")).await.unwrap_err().is_auth_error());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_soap_operations_require_auth() {
    let server = MockServer::start().await;
    let sf = unauthenticated(&server, Protocol::Soap);

    assert_every_operation_requires_auth(&sf).await;

    let account = sf.sobject("Account").unwrap();
    assert!(account.create(&json!([{"Name": "x"}])).await.unwrap_err().is_auth_error());
    assert!(account.update(&json!([["001", {"Name": "x"}]])).await.unwrap_err().is_auth_error());
    assert!(account.delete(&json!(["001"])).await.unwrap_err().is_auth_error());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_soap_login_then_switch_to_rest() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/Soap/u/45"))
        .and(header("SOAPAction", "login"))
        .and(body_string_contains("<n1:username>user@example.com</n1:username>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_RESPONSE))
        .expect(1)
        .mount(&server)
        .await;

    let mut sf = unauthenticated(&server, Protocol::Soap);
    let auth = sf
        .authenticate(&Credentials::for_user("user@example.com", "pw"))
        .await
        .unwrap();

    assert_eq!(auth.instance_url(), "https://na9.salesforce.com");

    sf.set_protocol(Protocol::Rest);
    assert_eq!(sf.protocol(), Protocol::Rest);
    assert_eq!(sf.auth(), Some(&auth));
}

#[tokio::test]
async fn test_web_server_flow_with_soap_default() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "00Doauth!token",
            "instance_url": "https://na2.salesforce.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut sf = unauthenticated(&server, Protocol::Soap);
    let credentials = Credentials::new()
        .with_client_id("id")
        .with_client_secret("secret")
        .with_redirect_uri("https://localhost/callback")
        .with_response_type("code");

    let uri = sf.get_auth_uri(&credentials).unwrap();
    assert!(uri.starts_with(&format!("{}/services/oauth2/authorize?", server.uri())));

    let auth = sf
        .authenticate(&credentials.with_code("abc123"))
        .await
        .unwrap();

    assert_eq!(auth.access_token(), "00Doauth!token");
    assert_eq!(sf.protocol(), Protocol::Soap);
    assert_eq!(sf.auth(), Some(&auth));
}

#[tokio::test]
async fn test_replacing_the_session() {
    let server = MockServer::start().await;
    let mut sf = authenticated(&server, Protocol::Rest);

    assert!(sf.auth().is_some());
    sf.set_auth(None);
    assert!(sf.query("SELECT Id FROM Account").await.unwrap_err().is_auth_error());
}

#[tokio::test]
async fn test_failed_code_exchange_can_be_retried_with_soap_default() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .and(body_string_contains("code=bad"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "authentication failure"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .and(body_string_contains("code=good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "00Doauth!token",
            "instance_url": "https://na2.salesforce.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut sf = unauthenticated(&server, Protocol::Soap);
    sf.set_login_url(Some("https://unused.example.com".to_string()));

    let credentials = Credentials::new()
        .with_client_id("id")
        .with_client_secret("secret")
        .with_redirect_uri("https://localhost/callback")
        .with_response_type("code");
    sf.get_auth_uri(&credentials).unwrap();

    // The pending exchange follows the facade's login URL.
    sf.set_login_url(Some(server.uri()));

    let err = sf
        .authenticate(&credentials.clone().with_code("bad"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(sf.auth().is_none());

    let auth = sf
        .authenticate(&credentials.with_code("good"))
        .await
        .unwrap();
    assert_eq!(auth.instance_url(), "https://na2.salesforce.com");
    assert_eq!(sf.protocol(), Protocol::Soap);
    assert_eq!(sf.auth(), Some(&auth));
}
