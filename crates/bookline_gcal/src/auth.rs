// File: crates/bookline_gcal/src/auth.rs
use bookline_common::{config_error, BooklineError};
use bookline_config::GcalConfig;
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator, ServiceAccountKey},
    CalendarHub,
};
use std::path::Path;

const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// Inline keys arrive through env vars with literal `\n` sequences.
pub(crate) fn unescape_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// Builds a service-account key from `client_email` + `private_key`.
pub(crate) fn inline_service_account_key(
    client_email: &str,
    private_key: &str,
) -> Result<ServiceAccountKey, BooklineError> {
    let value = serde_json::json!({
        "type": "service_account",
        "client_email": client_email,
        "private_key": unescape_private_key(private_key),
        "token_uri": GOOGLE_TOKEN_URI,
    });
    serde_json::from_value(value)
        .map_err(|e| config_error(format!("invalid inline service account key: {}", e)))
}

async fn load_service_account_key(config: &GcalConfig) -> Result<ServiceAccountKey, BooklineError> {
    if let Some(key_path) = config.key_path.as_deref() {
        return read_service_account_key(Path::new(key_path))
            .await
            .map_err(|e| config_error(format!("cannot read key file '{}': {}", key_path, e)));
    }

    match (config.client_email.as_deref(), config.private_key.as_deref()) {
        (Some(email), Some(key)) => inline_service_account_key(email, key),
        _ => Err(config_error(
            "gcal needs key_path or client_email + private_key",
        )),
    }
}

pub async fn create_calendar_hub(config: &GcalConfig) -> Result<HubType, BooklineError> {
    let sa_key = load_service_account_key(config).await?;

    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .build()
        .await
        .map_err(|e| config_error(format!("service account authenticator: {}", e)))?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|e| config_error(format!("native TLS roots: {}", e)))?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    Ok(CalendarHub::new(client, auth))
}
