//! Signed access tokens
//!
//! A token carries the caller's identity claim (which must include an
//! email) plus issue and expiry times, signed with a server-held HS256
//! secret. Tokens are never stored: validity is decided by signature and
//! expiry alone, so logout is a client-side discard.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Default token lifetime
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 60 * 60;

/// Registered claims only the server may set. A client-chosen `aud` or
/// `nbf` would otherwise yield a token that never verifies.
const SERVER_CLAIMS: [&str; 7] = ["iat", "exp", "nbf", "aud", "iss", "sub", "jti"];

/// Claims embedded in an access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated email address
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Any other identity fields the client sent at sign-in
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Issues and verifies access tokens
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service with the default one hour lifetime
    pub fn new(secret: &str) -> Result<Self> {
        Self::with_lifetime(secret, Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS))
    }

    /// Create a token service with a custom lifetime
    pub fn with_lifetime(secret: &str, lifetime: Duration) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::MissingSecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        })
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Sign an identity claim, expiring one lifetime from now
    pub fn issue(&self, identity: &Value) -> Result<String> {
        self.issue_at(identity, Utc::now())
    }

    /// Sign an identity claim as if issued at `issued_at`
    pub fn issue_at(&self, identity: &Value, issued_at: DateTime<Utc>) -> Result<String> {
        let mut extra = identity.as_object().cloned().ok_or(Error::InvalidIdentity)?;

        let email = match extra.remove("email") {
            Some(Value::String(email)) if !email.trim().is_empty() => email,
            _ => return Err(Error::MissingEmail),
        };
        for claim in SERVER_CLAIMS {
            extra.remove(claim);
        }

        let claims = Claims {
            email,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.lifetime).timestamp(),
            extra,
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify a token's signature and expiry, returning its claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => Error::TokenExpired,
                _ => Error::InvalidToken(e.to_string()),
            })
    }
}
