//! Access token tests
//!
//! Structure:
//! - issue a token for an identity
//!   - verifies immediately with the same email
//!   - looks like a JWT (3 parts separated by dots)
//! - expired tokens are rejected
//! - tokens from another secret are rejected

use chrono::{Duration, Utc};
use serde_json::json;
use tourbook_core::{Error, TokenService};

/// Test: issue then verify yields the same email
#[test]
fn test_issued_token_verifies_with_same_email() {
    let service = TokenService::new("secret").unwrap();
    let token = service.issue(&json!({ "email": "guide@example.com" })).unwrap();

    let claims = service.verify(&token).unwrap();
    assert_eq!(claims.email, "guide@example.com");
}

/// Test: token has three JWT parts
#[test]
fn test_token_has_three_parts() {
    let service = TokenService::new("secret").unwrap();
    let token = service.issue(&json!({ "email": "guide@example.com" })).unwrap();

    assert_eq!(token.split('.').count(), 3);
}

/// Test: a token past its one hour window is rejected
#[test]
fn test_expired_token_rejected() {
    let service = TokenService::new("secret").unwrap();
    let issued_at = Utc::now() - Duration::hours(1) - Duration::seconds(5);
    let token = service
        .issue_at(&json!({ "email": "late@example.com" }), issued_at)
        .unwrap();

    assert!(matches!(service.verify(&token), Err(Error::TokenExpired)));
}

/// Test: a token just inside its window is still accepted
#[test]
fn test_token_valid_until_expiry() {
    let service = TokenService::new("secret").unwrap();
    let issued_at = Utc::now() - Duration::minutes(59);
    let token = service
        .issue_at(&json!({ "email": "early@example.com" }), issued_at)
        .unwrap();

    assert!(service.verify(&token).is_ok());
}

/// Test: custom lifetimes are honoured
#[test]
fn test_custom_lifetime() {
    let service = TokenService::with_lifetime("secret", Duration::seconds(30)).unwrap();
    let issued_at = Utc::now() - Duration::seconds(31);
    let token = service
        .issue_at(&json!({ "email": "short@example.com" }), issued_at)
        .unwrap();

    assert!(matches!(service.verify(&token), Err(Error::TokenExpired)));
}

/// Test: signature from a different secret fails
#[test]
fn test_wrong_secret_rejected() {
    let issuer = TokenService::new("one-secret").unwrap();
    let verifier = TokenService::new("other-secret").unwrap();
    let token = issuer.issue(&json!({ "email": "guide@example.com" })).unwrap();

    assert!(matches!(verifier.verify(&token), Err(Error::InvalidToken(_))));
}

/// Test: garbage and tampered tokens fail
#[test]
fn test_malformed_token_rejected() {
    let service = TokenService::new("secret").unwrap();
    assert!(service.verify("not-a-token").is_err());

    let token = service.issue(&json!({ "email": "guide@example.com" })).unwrap();
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    parts[1] = parts[1].chars().rev().collect();
    assert!(service.verify(&parts.join(".")).is_err());
}
