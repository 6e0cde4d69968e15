//! Object-scoped SOAP operations.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::instrument;

use tandem_sf_auth::Authentication;
use tandem_sf_client::{soap, Error, Result, Transport};

use crate::client::SoapApi;
use crate::envelope::SoapEnvelope;

/// Calls accepted by [`SoapSObject::post`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SObjectAction {
    DescribeSObject,
    Create,
    Delete,
    Update,
}

impl SObjectAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SObjectAction::DescribeSObject => "describeSObject",
            SObjectAction::Create => "create",
            SObjectAction::Delete => "delete",
            SObjectAction::Update => "update",
        }
    }
}

impl FromStr for SObjectAction {
    type Err = Error;

    fn from_str(action: &str) -> Result<Self> {
        match action {
            "describeSObject" => Ok(SObjectAction::DescribeSObject),
            "create" => Ok(SObjectAction::Create),
            "delete" => Ok(SObjectAction::Delete),
            "update" => Ok(SObjectAction::Update),
            other => Err(Error::invalid_value(format!(
                "`action` {} is not supported!",
                other
            ))),
        }
    }
}

impl fmt::Display for SObjectAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations on one object type through the partner API.
///
/// `create`, `update` and `delete` are batch calls and take a JSON array.
#[derive(Debug)]
pub struct SoapSObject<'a, T: Transport> {
    api: &'a SoapApi<T>,
    name: String,
}

impl<'a, T: Transport> SoapSObject<'a, T> {
    pub(crate) fn new(api: &'a SoapApi<T>, name: String) -> Self {
        Self { api, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Session of the API this handle was taken from.
    pub fn auth(&self) -> Option<&'a Authentication> {
        self.api.auth()
    }

    #[instrument(skip(self), fields(sobject = %self.name))]
    pub async fn describe(&self) -> Result<SoapEnvelope> {
        self.post(&Value::Null, SObjectAction::DescribeSObject).await
    }

    /// Create records from an array of field maps.
    #[instrument(skip(self, data), fields(sobject = %self.name))]
    pub async fn create(&self, data: &Value) -> Result<SoapEnvelope> {
        self.post(data, SObjectAction::Create).await
    }

    /// Update records from an array of `[id, fields]` pairs.
    #[instrument(skip(self, data), fields(sobject = %self.name))]
    pub async fn update(&self, data: &Value) -> Result<SoapEnvelope> {
        self.post(data, SObjectAction::Update).await
    }

    /// Delete records from an array of ids.
    #[instrument(skip(self, ids), fields(sobject = %self.name))]
    pub async fn delete(&self, ids: &Value) -> Result<SoapEnvelope> {
        self.post(ids, SObjectAction::Delete).await
    }

    /// Build the body for `action` and send it.
    #[instrument(skip(self, data), fields(sobject = %self.name, action = %action))]
    pub async fn post(&self, data: &Value, action: SObjectAction) -> Result<SoapEnvelope> {
        let auth = self.api.session()?;

        let body = match action {
            SObjectAction::DescribeSObject => soap::describe_body(&self.name),
            SObjectAction::Create => soap::create_body(
                &self.name,
                require_list(data, "`create` require a parameter type `list`")?,
            )?,
            SObjectAction::Update => soap::update_body(
                &self.name,
                require_list(data, "`update` require a parameter type `list of lists`")?,
            )?,
            SObjectAction::Delete => {
                soap::delete_body(require_list(data, "`delete` require a parameter type `list`")?)?
            }
        };

        self.api.call(auth, action.as_str(), &body).await
    }

    /// Not available through the partner API; only checks the session.
    pub async fn get(&self, _suffix: Option<&str>, _params: Option<&[(&str, &str)]>) -> Result<Value> {
        self.api.session()?;
        Err(Error::invalid_value("`get` is not supported by the SOAP API"))
    }
}

fn require_list<'v>(data: &'v Value, message: &str) -> Result<&'v [Value]> {
    data.as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| Error::type_mismatch(message))
}
