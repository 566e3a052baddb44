//! Salted password hashes and the hashing service used by registration and log-in.

use std::fmt::{Debug, Display};

use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid password hash.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid hash
    /// is provided it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Turns plain text passwords into salted hashes and checks passwords against them.
pub trait CredentialHasher: Debug + Send + Sync {
    /// Hash `raw_password` with a fresh salt.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if the password could not be hashed.
    fn hash(&self, raw_password: &str) -> Result<PasswordHash, Error>;

    /// Check whether `raw_password` produces `password_hash`.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if the stored hash is malformed.
    fn verify(&self, raw_password: &str, password_hash: &PasswordHash) -> Result<bool, Error>;
}

/// A [CredentialHasher] backed by bcrypt.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a hasher with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to verify a password.
    /// A value of at least 10 is recommended for production, tests can use the minimum of 4.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(PasswordHash::DEFAULT_COST)
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, raw_password: &str) -> Result<PasswordHash, Error> {
        hash(raw_password, self.cost)
            .map(PasswordHash)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    fn verify(&self, raw_password: &str, password_hash: &PasswordHash) -> Result<bool, Error> {
        verify(raw_password, password_hash.as_ref())
            .map_err(|error| Error::HashingError(error.to_string()))
    }
}

#[cfg(test)]
mod password_hash_tests {
    use crate::Error;

    use super::{BcryptHasher, CredentialHasher, PasswordHash};

    #[test]
    fn verify_password_succeeds_for_valid_password() {
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );

        assert_eq!(BcryptHasher::new(4).verify("okon", &hash), Ok(true));
    }

    #[test]
    fn verify_password_fails_for_invalid_password() {
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );

        assert_eq!(
            BcryptHasher::new(4).verify("thewrongpassword", &hash),
            Ok(false)
        );
    }

    #[test]
    fn hash_password_produces_verifiable_hash() {
        let hasher = BcryptHasher::new(4);
        let hash = hasher.hash("roostersgocockledoodledoo").unwrap();

        assert_eq!(hasher.verify("roostersgocockledoodledoo", &hash), Ok(true));
        assert_eq!(hasher.verify("the_wrong_password", &hash), Ok(false));
    }

    #[test]
    fn hash_duplicate_password_produces_unique_hash() {
        let hasher = BcryptHasher::new(4);

        let hash = hasher.hash("turkeysgogobblegobble").unwrap();
        let dupe_hash = hasher.hash("turkeysgogobblegobble").unwrap();

        assert_ne!(hash, dupe_hash);
    }

    #[test]
    fn malformed_hash_is_a_hashing_error() {
        let hash = PasswordHash::new_unchecked("definitely not bcrypt");

        let result = BcryptHasher::new(4).verify("whatever", &hash);

        assert!(matches!(result, Err(Error::HashingError(_))));
    }
}
