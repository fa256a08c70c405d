//! Locally computed signatures for the media CDN protocol.
//!
//! The CDN platform trusts URLs and API requests signed with the account's
//! API secret; no network call is involved in producing a signature. The
//! bucket backend does not use this module, its signed URLs are delegated to
//! the provider's native presigning.

use std::time::Duration;

use chrono::Utc;
use sha1::{Digest, Sha1};

/// Absolute expiry timestamp for a URL generated now.
///
/// Expiry is always relative to the moment of URL generation, never to
/// upload time.
#[must_use]
pub fn expires_at(expiry: Duration) -> i64 {
    Utc::now().timestamp() + i64::try_from(expiry.as_secs()).unwrap_or(i64::MAX)
}

/// Signature for a time-limited authenticated delivery URL.
///
/// SHA-1 hex digest of the literal string
/// `expires_at=<unix>&public_id=<id><api_secret>`.
#[must_use]
pub fn delivery_signature(public_id: &str, expires_at: i64, api_secret: &str) -> String {
    let to_sign = format!("expires_at={expires_at}&public_id={public_id}{api_secret}");
    hex::encode(Sha1::digest(to_sign.as_bytes()))
}

/// URL path segment authorizing delivery of `public_id` until `expires_at`.
///
/// Rendered as `s--<digest>--/expires_<unix>/<id>` under the provider's
/// `authenticated` resource path.
#[must_use]
pub fn authenticated_path_segment(public_id: &str, expires_at: i64, api_secret: &str) -> String {
    let digest = delivery_signature(public_id, expires_at, api_secret);
    format!("s--{digest}--/expires_{expires_at}/{public_id}")
}

/// Signature for an upload/destroy API request.
///
/// SHA-1 hex digest of the `&`-joined, key-sorted `key=value` pairs with the
/// API secret appended.
#[must_use]
pub fn api_signature(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut pairs: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    pairs.sort();
    let to_sign = format!("{}{}", pairs.join("&"), api_secret);
    hex::encode(Sha1::digest(to_sign.as_bytes()))
}
