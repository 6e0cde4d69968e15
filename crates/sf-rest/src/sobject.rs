//! Object-scoped REST operations.

use serde_json::Value;
use tracing::instrument;

use tandem_sf_auth::Authentication;
use tandem_sf_client::{Error, HttpRequest, RequestMethod, ResourceName, Result, Transport};

use crate::client::RestApi;

/// Operations on one object type through `/sobjects/{name}`.
///
/// Borrowed from a [`RestApi`] and built per access, so it always sees the
/// API's current session and version.
#[derive(Debug)]
pub struct RestSObject<'a, T: Transport> {
    api: &'a RestApi<T>,
    name: String,
}

impl<'a, T: Transport> RestSObject<'a, T> {
    pub(crate) fn new(api: &'a RestApi<T>, name: String) -> Self {
        Self { api, name }
    }

    /// The object type name, e.g. `Account`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Session of the API this handle was taken from.
    pub fn auth(&self) -> Option<&'a Authentication> {
        self.api.auth()
    }

    /// Full metadata of the object type.
    #[instrument(skip(self), fields(sobject = %self.name))]
    pub async fn describe(&self) -> Result<Value> {
        self.get(Some("/describe"), None).await
    }

    /// Create a record. The reply carries the new `id`.
    #[instrument(skip(self, data), fields(sobject = %self.name))]
    pub async fn create(&self, data: &Value) -> Result<Value> {
        self.post(data, None).await
    }

    /// Update one record from an `[id, fields]` pair.
    #[instrument(skip(self, data), fields(sobject = %self.name))]
    pub async fn update(&self, data: &Value) -> Result<Value> {
        let auth = self.api.session()?;
        let (id, fields) = match data.as_array().map(Vec::as_slice) {
            Some([Value::String(id), fields @ Value::Object(_)]) => (id, fields),
            _ => {
                return Err(Error::type_mismatch(
                    "`update` require a parameter type `list`",
                ))
            }
        };

        let url = self.record_url(auth.instance_url(), id);
        let request =
            HttpRequest::new(RequestMethod::Patch, self.api.request_url(auth, &url)).json(fields)?;
        self.api.send(auth, request).await
    }

    #[instrument(skip(self), fields(sobject = %self.name))]
    pub async fn delete(&self, id: &str) -> Result<Value> {
        let auth = self.api.session()?;
        let url = self.record_url(auth.instance_url(), id);
        let request = HttpRequest::new(RequestMethod::Delete, self.api.request_url(auth, &url));
        self.api.send(auth, request).await
    }

    /// POST a JSON body to the collection, or to `/{id}` when given.
    #[instrument(skip(self, data), fields(sobject = %self.name))]
    pub async fn post(&self, data: &Value, id: Option<&str>) -> Result<Value> {
        let auth = self.api.session()?;
        let url = match id {
            Some(id) => self.record_url(auth.instance_url(), id),
            None => self.collection_url(auth.instance_url()),
        };
        let request =
            HttpRequest::new(RequestMethod::Post, self.api.request_url(auth, &url)).json(data)?;
        self.api.send(auth, request).await
    }

    /// GET the collection, or `suffix` appended to it (e.g. `/{id}`).
    #[instrument(skip(self, params), fields(sobject = %self.name))]
    pub async fn get(&self, suffix: Option<&str>, params: Option<&[(&str, &str)]>) -> Result<Value> {
        let auth = self.api.session()?;
        let mut url = self.collection_url(auth.instance_url());
        if let Some(suffix) = suffix {
            url.push_str(suffix);
        }

        let mut request = HttpRequest::new(RequestMethod::Get, self.api.request_url(auth, &url));
        if let Some(params) = params {
            request = request.query(params)?;
        }
        self.api.send(auth, request).await
    }

    fn collection_url(&self, instance_url: &str) -> String {
        self.api
            .url_resources()
            .sobject_url(instance_url, ResourceName::SObject, &self.name)
    }

    fn record_url(&self, instance_url: &str, id: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url(instance_url),
            urlencoding::encode(id)
        )
    }
}
