// src/password.rs
//
// Argon2id password storage. Hashes are PHC strings, so salt and cost
// parameters travel with the hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use tracing::{debug, warn};

use crate::error::{DeskError, Result};

const MEMORY_COST_KIB: u32 = 64 * 1024; // 64 MiB
const TIME_COST: u32 = 3;
const PARALLELISM: u32 = 4;
const OUTPUT_LEN: usize = 32;

fn hashing_error(e: impl std::fmt::Display) -> DeskError {
    DeskError::Hashing(e.to_string())
}

fn hash_with(params: Params, password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map_err(hashing_error)?;
    Ok(hash.to_string())
}

/// CPU heavy; async callers go through [`hash_password_async`].
pub fn hash_password(password: &str) -> Result<String> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, Some(OUTPUT_LEN))
        .map_err(hashing_error)?;
    hash_with(params, password)
}

pub async fn hash_password_async(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(hashing_error)?
}

/// Checks `password` against a stored PHC string. The cost parameters come
/// from the hash itself. Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(e) => {
            warn!(error = %e, "stored password hash is malformed");
            return false;
        }
    };
    let ok = Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok();
    debug!(ok, "password verified");
    ok
}

pub async fn verify_password_async(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .unwrap_or(false)
}

/// Same format with minimal cost, so test fixtures stay fast.
#[cfg(test)]
pub fn hash_password_cheap(password: &str) -> String {
    let params = Params::new(Params::MIN_M_COST, 1, 1, None).unwrap();
    hash_with(params, password).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_argon2id_phc_with_configured_cost() {
        let hash = hash_password("secret1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        let a = hash_password_cheap("secret1");
        let b = hash_password_cheap("secret1");
        assert_ne!(a, b);
        assert!(verify_password("secret1", &a));
        assert!(verify_password("secret1", &b));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("secret1", ""));
        assert!(!verify_password("secret1", "5e884898da28047151d0e56f8dc6292773603d0d"));
    }

    #[tokio::test]
    async fn async_round_trip() {
        let hash = hash_password_async("secret1".to_string()).await.unwrap();
        assert!(verify_password_async("secret1".to_string(), hash.clone()).await);
        assert!(!verify_password_async("nope".to_string(), hash).await);
    }
}
