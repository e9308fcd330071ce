use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

/// Runtime configuration for bearer-token verification.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Identity provider domain, e.g. `tenant.us.auth0.com` (no scheme, no trailing slash).
    pub domain: String,
    /// Expected `aud` claim.
    pub audience: String,
    /// Signature algorithms accepted for access tokens.
    pub algorithms: Vec<Algorithm>,
    /// Where the signing-key set (JWKS) is published.
    pub jwks_url: Url,
    pub jwks_fetch_timeout: Duration,
    pub jwks_refresh_interval: Duration,
    /// Lower bound between two fetches triggered by an unknown `kid`.
    pub jwks_min_refetch: Duration,
    pub leeway_seconds: u64,
}

impl AuthConfig {
    pub fn new(domain: &str, audience: impl Into<String>) -> Result<Self, url::ParseError> {
        let domain = normalize_domain(domain);
        let jwks_url = Url::parse(&format!("https://{domain}/.well-known/jwks.json"))?;

        Ok(Self {
            domain,
            audience: audience.into(),
            algorithms: vec![Algorithm::RS256],
            jwks_url,
            jwks_fetch_timeout: Duration::from_secs(5),
            jwks_refresh_interval: Duration::from_secs(60 * 60),
            jwks_min_refetch: Duration::from_secs(30),
            leeway_seconds: 0,
        })
    }

    /// Issuer the identity provider stamps into every token: `https://<domain>/`.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }
}

fn normalize_domain(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);

    without_scheme.trim_end_matches('/').to_string()
}
