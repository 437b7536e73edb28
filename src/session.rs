//! Client-held session tokens.
//!
//! The whole session is one cookie whose value is `"{user_id}.{signature}"`,
//! the signature being HMAC-SHA256 over the id under `SECRET_KEY`. Nothing is
//! stored server-side; tampering with either half makes the token verify as
//! absent, which downgrades the request to anonymous.

use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use cookie::time::OffsetDateTime;
use cookie::{Cookie, SameSite};
use hmac::{Hmac, Mac};
use sha2::Sha256;

pub const SESSION_COOKIE: &str = "session";

/// Sign `user_id` into a session token value.
pub fn sign(secret: &[u8], user_id: i64) -> String {
    let payload = user_id.to_string();
    let mut mac = Hmac::<Sha256>::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    let tag = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    format!("{payload}.{tag}")
}

/// Verify a token value and recover the user id. Any malformed, forged, or
/// re-keyed token yields `None`.
pub fn verify(secret: &[u8], value: &str) -> Option<i64> {
    let (payload, tag) = value.split_once('.')?;
    let expected = URL_SAFE_NO_PAD.decode(tag).ok()?;
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret) else {
        return None;
    };
    mac.update(payload.as_bytes());
    // Constant-time comparison
    mac.verify_slice(&expected).ok()?;
    payload.parse().ok()
}

/// Cookie establishing a fresh session for `user_id`. Setting it atop an
/// existing session overwrites it, which is the clear-then-set login rule.
pub fn issue(secret: &[u8], user_id: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, sign(secret, user_id)))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Expired cookie that instructs the client to drop the session.
pub fn removal() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Pull the session's user id out of request headers, if a valid token is
/// present.
pub fn user_id_from_headers(headers: &HeaderMap, secret: &[u8]) -> Option<i64> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(|cookie| cookie.ok())
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .and_then(|cookie| verify(secret, cookie.value()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn sign_verify_round_trip() {
        let token = sign(SECRET, 42);
        assert_eq!(verify(SECRET, &token), Some(42));
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let token = sign(SECRET, 1);
        let tag = token.split_once('.').unwrap().1;
        assert_eq!(verify(SECRET, &format!("2.{tag}")), None);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = sign(SECRET, 7);
        assert_eq!(verify(b"other-secret", &token), None);
    }

    #[test]
    fn verify_rejects_malformed_values() {
        assert_eq!(verify(SECRET, ""), None);
        assert_eq!(verify(SECRET, "no-dot"), None);
        assert_eq!(verify(SECRET, "1.!!not-base64!!"), None);
    }

    #[test]
    fn issued_cookie_is_http_only_and_site_wide() {
        let cookie = issue(SECRET, 3);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn removal_cookie_expires_in_the_past() {
        let cookie = removal();
        assert_eq!(cookie.value(), "");
        assert!(cookie.expires_datetime().unwrap() < OffsetDateTime::now_utc());
    }

    #[test]
    fn user_id_from_headers_finds_the_session_cookie() {
        let mut headers = HeaderMap::new();
        let value = format!("theme=dark; {}={}", SESSION_COOKIE, sign(SECRET, 11));
        headers.insert(header::COOKIE, HeaderValue::from_str(&value).unwrap());
        assert_eq!(user_id_from_headers(&headers, SECRET), Some(11));
    }

    #[test]
    fn user_id_from_headers_ignores_forged_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session=99.Zm9yZ2Vk"),
        );
        assert_eq!(user_id_from_headers(&headers, SECRET), None);
    }
}
