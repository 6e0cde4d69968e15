//! Run a SOQL query and print every record as JSON.
//!
//! Credentials come from `SF_CLIENT_ID`, `SF_CLIENT_SECRET`, `SF_USERNAME`
//! and `SF_PASSWORD`. `SF_PROTOCOL` (`rest` or `soap`), `SF_SANDBOX`,
//! `SF_API_VERSION` and `SF_LOGIN_URL` adjust the connection.
//!
//! ```sh
//! export SF_USERNAME=user@example.com SF_PASSWORD='password+token'
//! RUST_LOG=tandem_sf_client=debug cargo run --bin tandem-sf-query -- "SELECT Id, Name FROM Account"
//! ```

use std::sync::Arc;

use tandem_sf_api::{ClientConfig, Credentials, HttpTransport, Protocol, SalesForce, Settings};
use tracing_subscriber::EnvFilter;

fn settings_from_env() -> Result<Settings, String> {
    let mut settings = Settings::new();

    if let Ok(protocol) = std::env::var("SF_PROTOCOL") {
        let protocol: Protocol = protocol.parse().map_err(|e| format!("{e}"))?;
        settings = settings.with_protocol(protocol);
    }
    if let Ok(sandbox) = std::env::var("SF_SANDBOX") {
        settings = settings.with_sandbox(matches!(sandbox.as_str(), "1" | "true" | "yes"));
    }
    if let Ok(version) = std::env::var("SF_API_VERSION") {
        let version: f64 = version
            .parse()
            .map_err(|_| format!("SF_API_VERSION is not a number: {version}"))?;
        settings = settings.with_version(version);
    }
    if let Ok(login_url) = std::env::var("SF_LOGIN_URL") {
        settings = settings.with_login_url(login_url);
    }

    Ok(settings)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let soql = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: tandem-sf-query \"SELECT Id FROM Account\"");
        std::process::exit(2);
    });

    let settings = settings_from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(2);
    });

    let transport = HttpTransport::new(ClientConfig::default()).unwrap_or_else(|e| {
        eprintln!("Error: Failed to build HTTP client: {e}");
        std::process::exit(1);
    });

    let mut sf = SalesForce::connect(Arc::new(transport), settings)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: Failed to discover the API version: {e}");
            std::process::exit(1);
        });

    if let Err(e) = sf.authenticate(&Credentials::from_env()).await {
        eprintln!("Error: Failed to authenticate: {e}");
        std::process::exit(1);
    }

    match sf.query_all(&soql).await {
        Ok(result) => {
            eprintln!("{} records", result.total_size);
            for record in &result.records {
                println!("{record}");
            }
        }
        Err(e) => {
            eprintln!("Error: Query failed: {e}");
            std::process::exit(1);
        }
    }
}
