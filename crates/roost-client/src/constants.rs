//! Wire-level constants for the wrapped API
//!
//! These values identify the public web client, not any individual account.
//! The per-account secrets (passwords, session cookies) live in the account
//! store; everything here ships with every browser session.

/// Bearer token of the public web client. Sent on every request; the
/// per-account session cookie is what actually authenticates.
pub const BEARER_TOKEN: &str = "Bearer AAAAAAAAAAAAAAAAAAAAANRILgAAAAAAnNwIzUejRCOuH5E6I8xnZz4puTs%3D1Zv7ttfk8LF81IUq16cHjhLTvJu4FA33AGWWjCpTnA";

/// Session cookie carrying the account's authentication token.
pub const AUTH_COOKIE: &str = "auth_token";

/// CSRF session cookie. When present, its value must be mirrored into
/// [`CSRF_HEADER`] or write endpoints reject the request.
pub const CSRF_COOKIE: &str = "ct0";

/// Header that mirrors the CSRF cookie value.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Fixed protocol and browser-fingerprint headers. Several endpoints return
/// 404 when the fingerprint set is incomplete, so the whole set is applied
/// to every request.
pub const FINGERPRINT_HEADERS: &[(&str, &str)] = &[
    ("content-type", "application/json"),
    ("x-twitter-active-user", "yes"),
    ("x-twitter-auth-type", "OAuth2Session"),
    ("x-twitter-client-language", "en"),
    ("accept", "*/*"),
    ("accept-language", "en-US,en;q=0.9"),
    (
        "sec-ch-ua",
        "\"Google Chrome\";v=\"131\", \"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"macOS\""),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
    ("priority", "u=1, i"),
];
