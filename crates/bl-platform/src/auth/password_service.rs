//! Password Service
//!
//! Argon2id hashing for user credentials.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use tracing::{debug, warn};

use crate::shared::error::{PlatformError, Result};

/// Password policy applied at registration
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_length: 128,
        }
    }
}

impl PasswordPolicy {
    pub fn with_min_length(min_length: usize) -> Self {
        Self {
            min_length,
            ..Self::default()
        }
    }

    pub fn validate(&self, password: &str) -> Result<()> {
        let length = password.chars().count();
        if length < self.min_length {
            return Err(PlatformError::validation(format!(
                "password must be at least {} characters long",
                self.min_length
            )));
        }
        if length > self.max_length {
            return Err(PlatformError::validation(format!(
                "password must be at most {} characters long",
                self.max_length
            )));
        }
        Ok(())
    }
}

/// Argon2id configuration
#[derive(Debug, Clone)]
pub struct Argon2Config {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Iterations
    pub time_cost: u32,
    pub parallelism: u32,
    pub output_len: usize,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 19456, // 19 MiB
            time_cost: 2,
            parallelism: 1,
            output_len: 32,
        }
    }
}

impl Argon2Config {
    /// Low memory config for tests
    pub fn testing() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
            output_len: 32,
        }
    }

    fn to_params(&self) -> Result<Params> {
        Params::new(self.memory_cost, self.time_cost, self.parallelism, Some(self.output_len))
            .map_err(|e| PlatformError::internal(format!("Invalid Argon2 params: {}", e)))
    }
}

pub struct PasswordService {
    argon2: Argon2<'static>,
    policy: PasswordPolicy,
}

impl PasswordService {
    pub fn new(config: Argon2Config, policy: PasswordPolicy) -> Result<Self> {
        let params = config.to_params()?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        Ok(Self { argon2, policy })
    }

    /// Hash a password after checking it against the policy
    pub fn hash_password(&self, password: &str) -> Result<String> {
        self.policy.validate(password)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PlatformError::internal(format!("Failed to hash password: {}", e)))?;

        debug!("Password hashed");
        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PlatformError::internal(format!("Invalid password hash format: {}", e)))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                warn!("Password verification failed");
                Ok(false)
            }
            Err(e) => Err(PlatformError::internal(format!("Password verification error: {}", e))),
        }
    }

    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PasswordService {
        PasswordService::new(Argon2Config::testing(), PasswordPolicy::default()).unwrap()
    }

    #[test]
    fn test_policy_min_length() {
        let policy = PasswordPolicy::with_min_length(3);
        assert!(policy.validate("abc").is_ok());

        let err = policy.validate("ab").unwrap_err();
        assert_eq!(err.to_string(), "password must be at least 3 characters long");
    }

    #[test]
    fn test_hash_and_verify() {
        let service = service();
        let hash = service.hash_password("sekret").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify_password("sekret", &hash).unwrap());
        assert!(!service.verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let service = service();
        let a = service.hash_password("sekret").unwrap();
        let b = service.hash_password("sekret").unwrap();

        assert_ne!(a, b);
        assert!(service.verify_password("sekret", &b).unwrap());
    }

    #[test]
    fn test_short_password_is_not_hashed() {
        assert!(matches!(service().hash_password("pw"), Err(PlatformError::Validation { .. })));
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(service().verify_password("sekret", "not-a-phc-string").is_err());
    }
}
