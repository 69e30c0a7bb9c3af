//! Request configuration builder
//!
//! Materializes a [`RequestConfig`] from a stored account: resolved proxy,
//! saved headers overlaid with the fixed protocol headers, and the minimal
//! authentication cookie pair. Only `auth_token` and `ct0` are copied from
//! the saved cookies — extra session cookies cause 404s on some endpoints.

use std::str::FromStr;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use roost_store::Account;
use tracing::warn;

use common::ProcessEnv;

use crate::constants::{
    AUTH_COOKIE, BEARER_TOKEN, CSRF_COOKIE, CSRF_HEADER, FINGERPRINT_HEADERS,
};

/// Everything a caller needs to issue requests as one account. Pure value;
/// constructing it performs no I/O.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Resolved proxy URL, if any.
    pub proxy: Option<String>,
    /// Full header set: saved account headers overlaid with protocol headers.
    pub headers: HeaderMap,
    /// Minimal authentication cookies, in insertion order.
    pub cookies: Vec<(String, String)>,
}

impl RequestConfig {
    /// The `cookie` header value for the config, or `None` when the account
    /// has no saved auth cookies.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Build a `reqwest::Client` applying the proxy, headers and cookies.
    pub fn into_client(self) -> reqwest::Result<reqwest::Client> {
        let cookie = self.cookie_header();
        let mut headers = self.headers;
        if let Some(cookie) = cookie {
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    headers.insert(reqwest::header::COOKIE, value);
                }
                Err(_) => {
                    warn!("skipping unencodable cookie header, client will be unauthenticated");
                }
            }
        }
        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(proxy) = self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(&proxy)?);
        }
        builder.build()
    }
}

/// Build a request configuration using the process-wide proxy setting.
pub fn build_request_config(account: &Account, proxy_override: Option<&str>) -> RequestConfig {
    build_request_config_with_proxy(
        account,
        proxy_override,
        ProcessEnv::global().proxy.as_deref(),
    )
}

/// Build a request configuration with an explicit process-level proxy value.
///
/// Proxy resolution, first non-empty wins: per-call override, process-wide
/// setting, account-level saved proxy, no proxy.
pub fn build_request_config_with_proxy(
    account: &Account,
    proxy_override: Option<&str>,
    env_proxy: Option<&str>,
) -> RequestConfig {
    let proxy = resolve_proxy(proxy_override, env_proxy, account.proxy.as_deref());

    let mut headers = HeaderMap::new();
    for (name, value) in &account.headers {
        insert_header(&mut headers, &account.username, name, value);
    }

    // Fixed protocol headers overwrite anything saved under the same name
    insert_header(
        &mut headers,
        &account.username,
        "user-agent",
        &account.user_agent,
    );
    insert_header(
        &mut headers,
        &account.username,
        "authorization",
        BEARER_TOKEN,
    );
    for (name, value) in FINGERPRINT_HEADERS {
        insert_header(&mut headers, &account.username, name, value);
    }

    let mut cookies = Vec::new();
    if let Some(token) = account.cookies.get(AUTH_COOKIE) {
        cookies.push((AUTH_COOKIE.to_string(), token.clone()));
    }
    if let Some(csrf) = account.cookies.get(CSRF_COOKIE) {
        cookies.push((CSRF_COOKIE.to_string(), csrf.clone()));
        insert_header(&mut headers, &account.username, CSRF_HEADER, csrf);
    }

    RequestConfig {
        proxy,
        headers,
        cookies,
    }
}

fn resolve_proxy(
    per_call: Option<&str>,
    process: Option<&str>,
    account: Option<&str>,
) -> Option<String> {
    [per_call, process, account]
        .into_iter()
        .flatten()
        .find(|p| !p.trim().is_empty())
        .map(str::to_string)
}

/// Insert a header, skipping (with a warning) names or values that are not
/// valid HTTP. Saved account headers come from crawls and are not trusted.
fn insert_header(headers: &mut HeaderMap, username: &str, name: &str, value: &str) {
    let Ok(name) = HeaderName::from_str(name) else {
        warn!(username, header = name, "skipping invalid header name");
        return;
    };
    let Ok(value) = HeaderValue::from_str(value) else {
        warn!(username, header = %name, "skipping invalid header value");
        return;
    };
    headers.insert(name, value);
}
