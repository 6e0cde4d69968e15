//! SOAP (partner API) envelope construction.
//!
//! Envelopes are assembled from fixed templates. Every interpolated value
//! is XML-escaped, element names taken from record fields must be valid
//! identifiers.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::security::{names, xml};

const ENVELOPE_OPEN: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<soapenv:Envelope
    xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"
    xmlns:urn="urn:partner.soap.sforce.com"
    xmlns:urn1="urn:sobject.partner.soap.sforce.com"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#;

const ENVELOPE_CLOSE: &str = "</soapenv:Envelope>";

fn envelope(header: &str, body: &str) -> String {
    format!(
        "{}\n    {}\n    {}\n{}",
        ENVELOPE_OPEN, header, body, ENVELOPE_CLOSE
    )
}

fn session_header(access_token: &str) -> String {
    format!(
        "<soapenv:Header>\n    <urn:SessionHeader>\n        <urn:sessionId>{}</urn:sessionId>\n    </urn:SessionHeader>\n</soapenv:Header>",
        xml::escape(access_token)
    )
}

/// A full request envelope: session header plus `<urn:{method}>` body.
///
/// `request` is an already-built body fragment and is inserted verbatim.
pub fn request_envelope(access_token: &str, method: &str, request: &str) -> String {
    let body = format!(
        "<soapenv:Body>\n    <urn:{method}>\n        {request}\n    </urn:{method}>\n</soapenv:Body>"
    );
    envelope(&session_header(access_token), &body)
}

/// The `login` envelope. It carries no session header.
pub fn login_envelope(username: &str, password: &str) -> String {
    let body = format!(
        "<soapenv:Body>\n    <n1:login xmlns:n1=\"urn:partner.soap.sforce.com\">\n    <n1:username>{}</n1:username>\n    <n1:password>{}</n1:password>\n</n1:login>\n</soapenv:Body>",
        xml::escape(username),
        xml::escape(password)
    );
    envelope("", &body)
}

pub fn query_body(query: &str) -> String {
    format!("<urn:queryString>{}</urn:queryString>", xml::escape(query))
}

pub fn query_more_body(locator: &str) -> String {
    format!("<urn:queryLocator>{}</urn:queryLocator>", xml::escape(locator))
}

pub fn search_body(search: &str) -> String {
    format!("<urn:searchString>{}</urn:searchString>", xml::escape(search))
}

pub fn describe_body(sobject: &str) -> String {
    format!("<urn:sObjectType>{}</urn:sObjectType>", xml::escape(sobject))
}

/// One `<urn:sObjects>` block per record; fields become unprefixed elements.
pub fn create_body(sobject: &str, records: &[Value]) -> Result<String> {
    let mut body = String::new();

    for record in records {
        let fields = record.as_object().ok_or_else(|| {
            Error::type_mismatch("`create` requires a list of records (JSON objects)")
        })?;

        body.push_str(&sobjects_open(sobject));
        push_fields(&mut body, fields, "")?;
        body.push_str("</urn:sObjects> \n");
    }

    Ok(body)
}

/// Each item must be an `[id, {fields}]` pair.
pub fn update_body(sobject: &str, records: &[Value]) -> Result<String> {
    let mut body = String::new();

    for item in records {
        let (id, fields) = match item.as_array().map(Vec::as_slice) {
            Some([id, Value::Object(fields)]) => (id, fields),
            _ => {
                return Err(Error::type_mismatch(
                    "`update` require a parameter type `list of lists`",
                ))
            }
        };

        body.push_str(&sobjects_open(sobject));
        body.push_str(&format!("<urn:Id>{}</urn:Id>", scalar_text(id, "Id")?));
        push_fields(&mut body, fields, "urn:")?;
        body.push_str("</urn:sObjects> \n");
    }

    Ok(body)
}

/// One `<urn:Ids>` element per record id.
pub fn delete_body(ids: &[Value]) -> Result<String> {
    ids.iter()
        .map(|id| -> Result<String> {
            Ok(format!("<urn:Ids>{}</urn:Ids>", scalar_text(id, "Ids")?))
        })
        .collect()
}

fn sobjects_open(sobject: &str) -> String {
    format!("<urn:sObjects xsi:type=\"urn1:{}\"> \n", xml::escape(sobject))
}

fn push_fields(body: &mut String, fields: &Map<String, Value>, prefix: &str) -> Result<()> {
    for (key, value) in fields {
        if !names::is_valid_object_name(key) {
            return Err(Error::invalid_value(format!("Not a valid field name {}", key)));
        }
        if value.is_null() {
            body.push_str(&format!("<{prefix}{key} xsi:nil=\"true\"/> \n"));
        } else {
            let text = scalar_text(value, key)?;
            body.push_str(&format!("<{prefix}{key}>{text}</{prefix}{key}> \n"));
        }
    }
    Ok(())
}

fn scalar_text(value: &Value, field: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(xml::escape(s)),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(Error::type_mismatch(format!(
            "`{}` must be a string, number or boolean",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_request_envelope() {
        let env = request_envelope("00Dtoken", "query", &query_body("SELECT Id FROM Account"));

        assert!(env.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\" ?>"));
        assert!(env.contains("xmlns:urn=\"urn:partner.soap.sforce.com\""));
        assert!(env.contains("<urn:sessionId>00Dtoken</urn:sessionId>"));
        assert!(env.contains("<urn:query>"));
        assert!(env.contains("<urn:queryString>SELECT Id FROM Account</urn:queryString>"));
        assert!(env.trim_end().ends_with("</soapenv:Envelope>"));
    }

    #[test]
    fn test_login_envelope_escapes_credentials() {
        let env = login_envelope("user@example.com", "p<ss&word");

        assert!(env.contains("<n1:username>user@example.com</n1:username>"));
        assert!(env.contains("<n1:password>p&lt;ss&amp;word</n1:password>"));
        assert!(!env.contains("SessionHeader"));
    }

    #[test]
    fn test_leaf_bodies() {
        assert_eq!(
            query_more_body("01gD0000002HU6KIAW-2000"),
            "<urn:queryLocator>01gD0000002HU6KIAW-2000</urn:queryLocator>"
        );
        assert_eq!(
            search_body("FIND {Acme}"),
            "<urn:searchString>FIND {Acme}</urn:searchString>"
        );
        assert_eq!(describe_body("Account"), "<urn:sObjectType>Account</urn:sObjectType>");
        assert_eq!(
            query_body("SELECT Id FROM Account WHERE Name = 'A<B'"),
            "<urn:queryString>SELECT Id FROM Account WHERE Name = &apos;A&lt;B&apos;</urn:queryString>"
        );
    }

    #[test]
    fn test_create_body() {
        let body = create_body(
            "Account",
            &[json!({"Name": "Acme & Co", "NumberOfEmployees": 10}), json!({"Name": "Other"})],
        )
        .unwrap();

        assert_eq!(body.matches("<urn:sObjects xsi:type=\"urn1:Account\">").count(), 2);
        assert!(body.contains("<Name>Acme &amp; Co</Name>"));
        assert!(body.contains("<NumberOfEmployees>10</NumberOfEmployees>"));
        assert!(body.contains("<Name>Other</Name>"));
    }

    #[test]
    fn test_create_body_rejects_non_objects() {
        let err = create_body("Account", &[json!("Acme")]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::TypeMismatch(_)));

        let err = create_body("Account", &[json!({"Bad Field": 1})]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidValue(_)));
    }

    #[test]
    fn test_update_body() {
        let body = update_body(
            "Account",
            &[json!(["001000000000001", {"Name": "Renamed", "Phone": null}])],
        )
        .unwrap();

        assert!(body.contains("<urn:Id>001000000000001</urn:Id>"));
        assert!(body.contains("<urn:Name>Renamed</urn:Name>"));
        assert!(body.contains("<urn:Phone xsi:nil=\"true\"/>"));
    }

    #[test]
    fn test_update_body_requires_pairs() {
        for bad in [json!({"Name": "x"}), json!(["001"]), json!(["001", "x"])] {
            let err = update_body("Account", &[bad]).unwrap_err();
            assert!(matches!(err.kind, ErrorKind::TypeMismatch(ref m) if m.contains("list of lists")));
        }
    }

    #[test]
    fn test_delete_body() {
        let body = delete_body(&[json!("001A"), json!("001B")]).unwrap();
        assert_eq!(body, "<urn:Ids>001A</urn:Ids><urn:Ids>001B</urn:Ids>");

        let err = delete_body(&[json!({"Id": "001A"})]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::TypeMismatch(_)));
    }
}
