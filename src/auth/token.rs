//! Signed, expiring bearer tokens that carry a user's identity.

use std::fmt::Debug;

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    auth::{Identity, UserID},
};

/// How long a token is valid for if not configured otherwise.
pub const DEFAULT_TOKEN_VALIDITY: Duration = Duration::hours(24);

/// The contents of a JSON Web Token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub id: UserID,
    /// The user's name at the time the token was issued.
    pub username: String,
    /// The user's email at the time the token was issued.
    pub email: String,
    /// The time the token was issued as a unix timestamp.
    pub iat: i64,
    /// The expiry time of the token as a unix timestamp.
    pub exp: i64,
}

impl Claims {
    /// The identity embedded in the token.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Issues and verifies tokens signed with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
}

impl TokenService {
    /// Create a token service that signs with `secret` and issues tokens valid for `validity`.
    pub fn new(secret: &str, validity: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validity,
        }
    }

    /// Create a signed token for `identity`.
    ///
    /// # Errors
    /// Returns [Error::TokenCreation] if the token could not be encoded.
    pub fn issue(&self, identity: &Identity) -> Result<String, Error> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            id: identity.id,
            username: identity.username.clone(),
            email: identity.email.clone(),
            iat: now.unix_timestamp(),
            exp: (now + self.validity).unix_timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|error| Error::TokenCreation(error.to_string()))
    }

    /// Check the signature and expiry of `token` and return its claims.
    ///
    /// # Errors
    /// Returns [Error::InvalidToken] if the token is malformed, was signed with
    /// another secret or has expired.
    pub fn verify(&self, token: &str) -> Result<Claims, Error> {
        let mut validation = Validation::default();
        // Expired means expired, no clock skew allowance.
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|error| {
                tracing::debug!("Rejected token: {error}");
                Error::InvalidToken
            })
    }
}

impl Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}
