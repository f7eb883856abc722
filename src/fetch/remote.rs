//! HTTP fetching

use std::time::Duration;

use ureq::tls::{RootCerts, TlsConfig, TlsProvider};
use ureq::Agent;

use crate::error::{Error, Result};
use crate::utils::encoding;

const FETCH_TIMEOUT_SECS: u64 = 30;
const MAX_BODY_BYTES: u64 = 50 * 1024 * 1024;

/// Body and Content-Type of a fetched URL.
#[derive(Debug)]
pub struct Fetched {
    pub text: String,
    pub content_type: Option<String>,
}

/// HTTP agent using the platform's TLS library and root certificates.
fn agent() -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(Duration::from_secs(FETCH_TIMEOUT_SECS)))
        .build()
        .into()
}

pub fn fetch(url: &str) -> Result<Fetched> {
    tracing::debug!("fetching {}", url);
    let fetch_error = |source: ureq::Error| Error::Fetch { url: url.to_string(), source: Box::new(source) };

    let mut response = agent().get(url).call().map_err(fetch_error)?;

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let bytes = response
        .body_mut()
        .with_config()
        .limit(MAX_BODY_BYTES)
        .read_to_vec()
        .map_err(fetch_error)?;

    tracing::debug!("fetched {} bytes ({:?})", bytes.len(), content_type);
    Ok(Fetched { text: encoding::decode(&bytes), content_type })
}
