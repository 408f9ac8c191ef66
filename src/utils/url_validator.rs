//! Validation of URLs submitted for shortening.
//!
//! A URL is accepted when it parses as an absolute `http`/`https` URL with a
//! host and, when DNS verification is enabled, its hostname resolves. The
//! submitted text itself is stored unchanged; no canonicalization happens
//! here.

use tracing::debug;
use url::{Host, Url};

use crate::error::AppError;

/// Schemes accepted for shortening.
const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Checks submitted URLs before they reach the allocator.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    verify_dns: bool,
}

impl UrlValidator {
    /// Creates a validator. With `verify_dns` set, the URL's hostname must
    /// resolve to at least one address.
    pub fn new(verify_dns: bool) -> Self {
        Self { verify_dns }
    }

    /// Validates `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] if the URL is malformed, uses a
    /// scheme other than `http`/`https`, has no host, or does not resolve.
    pub async fn validate(&self, raw: &str) -> Result<(), AppError> {
        let url = parse_http_url(raw)?;

        if self.verify_dns
            && let Some(Host::Domain(domain)) = url.host()
        {
            let port = url.port_or_known_default().unwrap_or(80);
            resolve_host(domain, port).await?;
        }

        Ok(())
    }
}

/// Parses `raw` as an absolute HTTP(S) URL with a host.
///
/// # Errors
///
/// Returns [`AppError::InvalidUrl`] describing the first failed check.
pub fn parse_http_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw).map_err(|e| AppError::InvalidUrl(e.to_string()))?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(AppError::InvalidUrl(format!(
            "unsupported scheme `{}`",
            url.scheme()
        )));
    }

    match url.host() {
        Some(Host::Domain(domain)) if domain.is_empty() => {
            Err(AppError::InvalidUrl("empty host".to_string()))
        }
        Some(_) => Ok(url),
        None => Err(AppError::InvalidUrl("missing host".to_string())),
    }
}

async fn resolve_host(domain: &str, port: u16) -> Result<(), AppError> {
    let mut addrs = tokio::net::lookup_host((domain, port))
        .await
        .map_err(|e| AppError::InvalidUrl(format!("lookup of `{}` failed: {}", domain, e)))?;

    match addrs.next() {
        Some(addr) => {
            debug!(%domain, %addr, "Hostname resolved");
            Ok(())
        }
        None => Err(AppError::InvalidUrl(format!(
            "`{}` resolved to no addresses",
            domain
        ))),
    }
}
