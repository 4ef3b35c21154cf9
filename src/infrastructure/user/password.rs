//! One-way hashing of the write-only `password` field

use std::fmt::Debug;

use argon2::password_hash::{rand_core::OsRng, PasswordHasher as _, SaltString};
use argon2::Argon2;

use crate::domain::DomainError;

/// Turns a plaintext password into the PHC string stored with the user
pub trait PasswordHasher: Send + Sync + Debug {
    fn hash(&self, password: &str) -> Result<String, DomainError>;
}

/// Argon2id with a fresh random salt per password
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|phc| phc.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    #[test]
    fn test_hash_is_argon2id_phc_string() {
        let phc = Argon2Hasher::new().hash("testpass123").unwrap();

        let parsed = PasswordHash::new(&phc).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert!(!phc.contains("testpass123"));

        let argon2 = Argon2::default();
        assert!(argon2.verify_password(b"testpass123", &parsed).is_ok());
        assert!(argon2.verify_password(b"wrong_password", &parsed).is_err());
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = Argon2Hasher::new();

        assert_ne!(
            hasher.hash("testpass123").unwrap(),
            hasher.hash("testpass123").unwrap()
        );
    }
}
