//! Two-step admin login: an emailed verification code, then a bearer token.
//! The token format is `base64(adminId:unix_millis)`, carried over from the
//! original dashboard; the issue timestamp bounds its lifetime.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Malformed token")]
    Malformed,
    #[error("Token expired")]
    Expired,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Six decimal digits, zero-padded.
pub fn generate_verification_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", code)
}

pub fn issue_token(admin_id: &str) -> String {
    let raw = format!("{}:{}", admin_id, Utc::now().timestamp_millis());
    STANDARD.encode(raw)
}

/// Decode a bearer token and return the admin id it names. `ttl_secs` bounds
/// how long after issuance the token stays valid.
pub fn verify_token(token: &str, ttl_secs: i64) -> Result<String, AuthError> {
    let decoded = STANDARD.decode(token).map_err(|_| AuthError::Malformed)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::Malformed)?;

    let (admin_id, issued_millis) = decoded.rsplit_once(':').ok_or(AuthError::Malformed)?;
    if admin_id.is_empty() {
        return Err(AuthError::Malformed);
    }
    let issued_millis: i64 = issued_millis.parse().map_err(|_| AuthError::Malformed)?;

    let age_millis = Utc::now().timestamp_millis() - issued_millis;
    if age_millis < 0 || age_millis > ttl_secs * 1000 {
        return Err(AuthError::Expired);
    }

    Ok(admin_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK_SECS: i64 = 7 * 24 * 3600;

    #[test]
    fn token_round_trip() {
        let token = issue_token("admin-123");
        assert_eq!(verify_token(&token, WEEK_SECS).unwrap(), "admin-123");
    }

    #[test]
    fn expired_token_is_rejected() {
        let stale = STANDARD.encode(format!("admin-123:{}", 0));
        assert!(matches!(verify_token(&stale, WEEK_SECS), Err(AuthError::Expired)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(verify_token("not base64!!", WEEK_SECS), Err(AuthError::Malformed)));
        let no_colon = STANDARD.encode("just-an-id");
        assert!(matches!(verify_token(&no_colon, WEEK_SECS), Err(AuthError::Malformed)));
        let bad_ts = STANDARD.encode("admin-123:yesterday");
        assert!(matches!(verify_token(&bad_ts, WEEK_SECS), Err(AuthError::Malformed)));
    }

    #[test]
    fn future_dated_token_is_rejected() {
        let future = Utc::now().timestamp_millis() + 60_000;
        let token = STANDARD.encode(format!("admin-123:{}", future));
        assert!(verify_token(&token, WEEK_SECS).is_err());
    }

    #[test]
    fn verification_codes_are_six_digits() {
        for _ in 0..20 {
            let code = generate_verification_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("editor@votebd.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@@ats.com"));
    }
}
