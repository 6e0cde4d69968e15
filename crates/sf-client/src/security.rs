//! Escaping and validation helpers for values that end up on the wire.
//!
//! SOAP bodies are built by interpolation, so every caller-supplied value
//! must pass through [`xml::escape`]. Record ids placed in REST paths go
//! through [`url::encode_param`].
//!
//! ```rust
//! use tandem_sf_client::security::xml;
//!
//! let body = format!("<urn:queryString>{}</urn:queryString>", xml::escape("SELECT Id FROM Account WHERE Name = 'A&B'"));
//! assert!(body.contains("A&amp;B"));
//! ```

/// Identifier rules.
pub mod names {
    /// Object type names must start with an ASCII letter and contain only
    /// ASCII alphanumerics and underscores (`Custom__c`).
    #[must_use]
    pub fn is_valid_object_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }
}

/// URL encoding utilities.
pub mod url {
    /// URL-encode a value placed in a path segment.
    ///
    /// ```rust
    /// use tandem_sf_client::security::url;
    ///
    /// assert_eq!(url::encode_param("001/../x"), "001%2F..%2Fx");
    /// ```
    #[must_use]
    pub fn encode_param(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }
}

/// XML escaping.
pub mod xml {
    /// Escape a string for safe inclusion in XML content.
    ///
    /// This escapes the five predefined XML entities.
    ///
    /// ```rust
    /// use tandem_sf_client::security::xml;
    ///
    /// let safe = xml::escape("Hello <World> & 'Friends'");
    /// assert_eq!(safe, "Hello &lt;World&gt; &amp; &apos;Friends&apos;");
    /// ```
    #[must_use]
    pub fn escape(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 16);
        for ch in value.chars() {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }
}
