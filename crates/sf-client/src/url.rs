//! URL resolution for the REST and SOAP endpoints.
//!
//! Every resource address is built from three pieces: the instance URL
//! returned at login, a versioned base path (`/services/data/v{version}` or
//! `/services/Soap/u/{version}`), and a resource suffix.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Round an API version to one decimal digit.
pub fn round_version(version: f64) -> f64 {
    (version * 10.0).round() / 10.0
}

/// Login domain, API version and sandbox flag shared by both resolvers.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlResources {
    domain: String,
    sandbox: bool,
    version: f64,
    login_url: Option<String>,
}

impl UrlResources {
    /// Create resources for an explicit domain.
    pub fn new(domain: impl Into<String>, sandbox: bool, version: f64) -> Self {
        Self {
            domain: domain.into(),
            sandbox,
            version: round_version(version),
            login_url: None,
        }
    }

    /// Create resources for production (`login`) or sandbox (`test`).
    pub fn for_environment(sandbox: bool, version: f64) -> Self {
        Self::new(domain_for(sandbox), sandbox, version)
    }

    /// Override the authentication site, e.g. for My Domain logins.
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = Some(login_url.into());
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn sandbox(&self) -> bool {
        self.sandbox
    }

    pub fn version(&self) -> f64 {
        self.version
    }

    pub fn login_url(&self) -> Option<&str> {
        self.login_url.as_deref()
    }

    /// Set the API version, rounded to one decimal digit.
    pub fn set_version(&mut self, version: f64) {
        self.version = round_version(version);
    }

    /// Switch between production and sandbox; the domain follows.
    pub fn set_sandbox(&mut self, sandbox: bool) {
        self.sandbox = sandbox;
        self.domain = domain_for(sandbox).to_string();
    }

    pub fn set_login_url(&mut self, login_url: Option<String>) {
        self.login_url = login_url;
    }

    /// Base URL of the authentication endpoints.
    pub fn auth_site(&self) -> String {
        match &self.login_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.salesforce.com", self.domain),
        }
    }
}

fn domain_for(sandbox: bool) -> &'static str {
    if sandbox {
        "test"
    } else {
        "login"
    }
}

/// Named REST resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceName {
    Query,
    QueryAll,
    SObject,
    Search,
}

impl ResourceName {
    /// The path suffix for this resource, with leading and trailing slash.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceName::Query => "/query/",
            ResourceName::QueryAll => "/queryAll/",
            ResourceName::SObject => "/sobjects/",
            ResourceName::Search => "/search/",
        }
    }
}

impl FromStr for ResourceName {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "query" => Ok(ResourceName::Query),
            "queryAll" => Ok(ResourceName::QueryAll),
            "sobject" => Ok(ResourceName::SObject),
            "search" => Ok(ResourceName::Search),
            other => Err(Error::invalid_value(format!("Not a valid name {}", other))),
        }
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Resolver for `/services/data/v{version}` addresses.
#[derive(Debug, Clone, PartialEq)]
pub struct RestUrlResources {
    resources: UrlResources,
}

impl RestUrlResources {
    pub fn new(resources: UrlResources) -> Self {
        Self { resources }
    }

    pub fn resources(&self) -> &UrlResources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut UrlResources {
        &mut self.resources
    }

    /// Versioned base path, e.g. `/services/data/v45.2`.
    pub fn resource_url(&self) -> String {
        format!("/services/data/v{}", self.resources.version)
    }

    /// `instance_url` + base path + resource suffix.
    pub fn full_resource_url(&self, instance_url: &str, resource: ResourceName) -> String {
        format!("{}{}{}", instance_url, self.resource_url(), resource.path())
    }

    /// Full resource URL followed by the object type name.
    pub fn sobject_url(&self, instance_url: &str, resource: ResourceName, sobject: &str) -> String {
        format!("{}{}", self.full_resource_url(instance_url, resource), sobject)
    }
}

/// Resolver for the single `/services/Soap/u/{version}` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SoapUrlResources {
    resources: UrlResources,
}

impl SoapUrlResources {
    pub fn new(resources: UrlResources) -> Self {
        Self { resources }
    }

    pub fn resources(&self) -> &UrlResources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut UrlResources {
        &mut self.resources
    }

    pub fn resource_url(&self) -> String {
        format!("/services/Soap/u/{}", self.resources.version)
    }

    pub fn full_resource_url(&self, instance_url: &str) -> String {
        format!("{}{}", instance_url, self.resource_url())
    }
}

/// Normalize a caller-supplied URL against the instance and base path.
///
/// Fully qualified URLs pass through, server-relative URLs under the base
/// path get the instance prepended, and anything else is a bare suffix.
pub fn get_request_url(url: &str, instance_url: &str, resource_url: &str) -> String {
    let qualified = format!("{}{}", instance_url, resource_url);
    if url.starts_with(&qualified) {
        url.to_string()
    } else if url.starts_with(resource_url) {
        format!("{}{}", instance_url, url)
    } else {
        format!("{}{}", qualified, url)
    }
}
