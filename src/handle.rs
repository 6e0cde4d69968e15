//! Object-type handles over either protocol.

use serde_json::Value;

use tandem_sf_auth::{ensure_authenticated, Authentication};
use tandem_sf_client::{Error, Result, Transport};
use tandem_sf_rest::RestSObject;
use tandem_sf_soap::{SObjectAction, SoapSObject};

/// Operations on one object type, e.g. `Account`.
///
/// Argument shapes follow the active protocol: REST `create` takes one
/// record and `update` one `[id, fields]` pair, SOAP takes arrays of them.
/// SOAP replies are converted with `SoapEnvelope::to_value`.
#[derive(Debug)]
pub enum ObjectHandle<'a, T: Transport> {
    Rest(RestSObject<'a, T>),
    Soap(SoapSObject<'a, T>),
}

impl<T: Transport> ObjectHandle<'_, T> {
    pub fn name(&self) -> &str {
        match self {
            ObjectHandle::Rest(handle) => handle.name(),
            ObjectHandle::Soap(handle) => handle.name(),
        }
    }

    pub fn auth(&self) -> Option<&Authentication> {
        match self {
            ObjectHandle::Rest(handle) => handle.auth(),
            ObjectHandle::Soap(handle) => handle.auth(),
        }
    }

    pub async fn describe(&self) -> Result<Value> {
        match self {
            ObjectHandle::Rest(handle) => handle.describe().await,
            ObjectHandle::Soap(handle) => handle.describe().await?.to_value(),
        }
    }

    pub async fn create(&self, data: &Value) -> Result<Value> {
        match self {
            ObjectHandle::Rest(handle) => handle.create(data).await,
            ObjectHandle::Soap(handle) => handle.create(data).await?.to_value(),
        }
    }

    pub async fn update(&self, data: &Value) -> Result<Value> {
        match self {
            ObjectHandle::Rest(handle) => handle.update(data).await,
            ObjectHandle::Soap(handle) => handle.update(data).await?.to_value(),
        }
    }

    /// REST deletes one record and takes its id as a string; SOAP takes an
    /// array of ids.
    pub async fn delete(&self, ids: &Value) -> Result<Value> {
        match self {
            ObjectHandle::Rest(handle) => {
                ensure_authenticated(handle.auth())?;
                match ids {
                    Value::String(id) => handle.delete(id).await,
                    _ => Err(Error::type_mismatch(
                        "`delete` require a parameter type `string`",
                    )),
                }
            }
            ObjectHandle::Soap(handle) => handle.delete(ids).await?.to_value(),
        }
    }

    pub async fn get(&self, suffix: Option<&str>, params: Option<&[(&str, &str)]>) -> Result<Value> {
        match self {
            ObjectHandle::Rest(handle) => handle.get(suffix, params).await,
            ObjectHandle::Soap(handle) => handle.get(suffix, params).await,
        }
    }

    /// Generic POST.
    ///
    /// For REST `target` is an optional record id. For SOAP it must name an
    /// [`SObjectAction`].
    pub async fn post(&self, data: &Value, target: Option<&str>) -> Result<Value> {
        match self {
            ObjectHandle::Rest(handle) => handle.post(data, target).await,
            ObjectHandle::Soap(handle) => {
                ensure_authenticated(handle.auth())?;
                let action: SObjectAction = target
                    .ok_or_else(|| Error::invalid_value("`action` is required for SOAP"))?
                    .parse()?;
                handle.post(data, action).await?.to_value()
            }
        }
    }
}
