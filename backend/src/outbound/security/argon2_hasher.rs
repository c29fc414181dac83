//! Argon2id adapter for the `PasswordHasher` port.
//!
//! Hashes are stored as PHC strings, so the algorithm parameters travel with
//! each hash and verification keeps working after the defaults change.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2id password hasher.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Argon2PasswordHasher {
    /// Hasher with explicit cost parameters.
    ///
    /// Tests use this with tiny costs; production uses [`Default`].
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::Hash`] when the parameters are rejected.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordHashError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        Ok(PasswordHash::new(phc.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let parsed = PhcString::new(hash.as_str())
            .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_params(8, 1, 1).expect("cheap params are valid")
    }

    #[rstest]
    fn hash_is_a_salted_phc_string(hasher: Argon2PasswordHasher) {
        let first = hasher.hash("hunter2!").expect("hash");
        let second = hasher.hash("hunter2!").expect("hash");

        assert!(first.as_str().starts_with("$argon2id$"));
        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    #[case("hunter2!", true)]
    #[case("hunter3!", false)]
    #[case("", false)]
    fn verify_matches_only_the_original_password(
        hasher: Argon2PasswordHasher,
        #[case] attempt: &str,
        #[case] expected: bool,
    ) {
        let hash = hasher.hash("hunter2!").expect("hash");
        assert_eq!(hasher.verify(attempt, &hash).expect("verify"), expected);
    }

    #[rstest]
    fn malformed_hash_is_reported(hasher: Argon2PasswordHasher) {
        let err = hasher
            .verify("anything", &PasswordHash::new("plaintext".to_owned()))
            .expect_err("malformed");
        assert!(matches!(err, PasswordHashError::MalformedHash { .. }));
    }

    #[rstest]
    fn zero_memory_is_rejected() {
        assert!(Argon2PasswordHasher::with_params(0, 1, 1).is_err());
    }
}
