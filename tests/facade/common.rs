use std::sync::Arc;

use tandem_sf_api::{Authentication, HttpTransport, Protocol, SalesForce, Settings};
use wiremock::MockServer;

pub const TOKEN: &str = "00Dtest!token";

/// A facade whose session points at the mock server.
pub fn authenticated(server: &MockServer, protocol: Protocol) -> SalesForce {
    let mut sf = unauthenticated(server, protocol);
    sf.set_auth(Some(Authentication::new(TOKEN, server.uri())));
    sf
}

/// A facade with version 45 that logs in against the mock server.
pub fn unauthenticated(server: &MockServer, protocol: Protocol) -> SalesForce {
    let transport = Arc::new(HttpTransport::default_transport().expect("transport"));
    let settings = Settings::new()
        .with_version(45.0)
        .with_protocol(protocol)
        .with_login_url(server.uri());
    SalesForce::new(transport, settings)
}

/// A partner API query reply.
pub fn soap_page(done: bool, locator: Option<&str>, ids: &[&str], size: u64) -> String {
    let locator = match locator {
        Some(locator) => format!("<queryLocator>{locator}</queryLocator>"),
        None => r#"<queryLocator xsi:nil="true"/>"#.to_string(),
    };
    let records: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<records xsi:type="sf:sObject"><sf:type>Account</sf:type><sf:Id>{id}</sf:Id><sf:Id>{id}</sf:Id><sf:Name>Account {id}</sf:Name></records>"#
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="urn:partner.soap.sforce.com" xmlns:sf="urn:sobject.partner.soap.sforce.com" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <soapenv:Body>
    <queryResponse>
      <result xsi:type="QueryResult">
        <done>{done}</done>
        {locator}
        {records}
        <size>{size}</size>
      </result>
    </queryResponse>
  </soapenv:Body>
</soapenv:Envelope>"#
    )
}
