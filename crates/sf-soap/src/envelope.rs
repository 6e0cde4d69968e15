//! Reading partner API response envelopes.

use serde_json::{json, Map, Value};

use tandem_sf_client::{Error, ErrorKind, QueryResult, Result, XmlNode};

/// A verified SOAP response.
///
/// Keeps the raw XML. Elements are looked up by local name, first match
/// in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapEnvelope {
    text: String,
}

impl SoapEnvelope {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The raw XML text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Parse the whole document.
    pub fn document(&self) -> Result<XmlNode> {
        XmlNode::parse(&self.text)
    }

    /// Text of the first element named `name`, if any.
    pub fn element_text(&self, name: &str) -> Result<Option<String>> {
        Ok(self.document()?.text_of(name).map(str::to_string))
    }

    /// The operation's response element (the first child of `Body`) as JSON.
    pub fn to_value(&self) -> Result<Value> {
        let document = self.document()?;
        let response = document
            .find("Body")
            .and_then(|body| body.children.first())
            .ok_or_else(|| invalid("SOAP response has no body element"))?;
        Ok(response.to_value())
    }

    /// Decode a `query`, `queryAll` or `queryMore` response.
    pub fn query_result(&self) -> Result<QueryResult<Value>> {
        decode_query_result(&self.document()?)
    }
}

fn invalid(message: &str) -> Error {
    Error::new(ErrorKind::InvalidResponse(message.to_string()))
}

/// Decode the first `result` element of a query-family response.
///
/// `size` (partner API) and `totalSize` are both accepted. A nil or empty
/// `queryLocator` means there is no next page.
pub(crate) fn decode_query_result(document: &XmlNode) -> Result<QueryResult<Value>> {
    let result = document
        .find("result")
        .ok_or_else(|| invalid("query response has no result element"))?;

    let done = match child_text(result, "done") {
        Some("true") => true,
        Some("false") => false,
        _ => return Err(invalid("query result has no valid done flag")),
    };

    let total_size = child_text(result, "size")
        .or_else(|| child_text(result, "totalSize"))
        .and_then(|size| size.trim().parse::<u64>().ok())
        .ok_or_else(|| invalid("query result has no valid size"))?;

    let next_records_url = result
        .children_named("queryLocator")
        .next()
        .filter(|locator| !locator.nil && !locator.text.is_empty())
        .map(|locator| locator.text.clone());

    let records = result.children_named("records").map(record_value).collect();

    Ok(QueryResult {
        total_size,
        done,
        next_records_url,
        records,
    })
}

fn child_text<'a>(node: &'a XmlNode, name: &str) -> Option<&'a str> {
    node.children
        .iter()
        .find(|child| child.name == name)
        .map(|child| child.text.as_str())
}

/// One `sObject` as a JSON object shaped like a REST record.
///
/// `type` moves under `attributes`. The partner API repeats `Id`; the first
/// value wins. Nested relationship records are decoded the same way.
fn record_value(record: &XmlNode) -> Value {
    let mut fields = Map::new();

    for field in &record.children {
        if field.name == "type" {
            fields.insert("attributes".to_string(), json!({ "type": field.text }));
            continue;
        }
        if fields.contains_key(&field.name) {
            continue;
        }

        let value = if field.nil {
            Value::Null
        } else if field.children.is_empty() {
            Value::String(field.text.clone())
        } else if field.find("records").is_some() {
            decode_nested_query(field)
        } else {
            record_value(field)
        };
        fields.insert(field.name.clone(), value);
    }

    Value::Object(fields)
}

fn decode_nested_query(field: &XmlNode) -> Value {
    let records: Vec<Value> = field.children_named("records").map(record_value).collect();
    json!({
        "done": child_text(field, "done") == Some("true"),
        "totalSize": child_text(field, "size")
            .and_then(|size| size.trim().parse::<u64>().ok())
            .unwrap_or(records.len() as u64),
        "records": records,
    })
}
