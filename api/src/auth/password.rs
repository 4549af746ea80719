use std::sync::LazyLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{AppError, AppResult};

/// Hash compared against when the account does not exist, so an unknown
/// email costs the same as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash("not-a-real-password").ok());

/// Hashes `plaintext` with Argon2id and a fresh random salt. The result is a
/// PHC string carrying algorithm, parameters and salt.
pub fn hash(plaintext: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    Ok(argon2.hash_password(plaintext.as_bytes(), &salt)?.to_string())
}

/// Returns `Ok(false)` on mismatch. Only a stored hash that does not parse
/// is an error.
pub fn verify(plaintext: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::PasswordHash(e)),
    }
}

/// Builds the dummy hash now so the first unknown-email login does not pay
/// for it.
pub fn prepare_dummy() {
    LazyLock::force(&DUMMY_HASH);
}

/// Burns one verification against [`DUMMY_HASH`]. Always `false`.
pub fn verify_dummy(plaintext: &str) -> bool {
    if let Some(dummy) = DUMMY_HASH.as_deref() {
        let _ = verify(plaintext, dummy);
    }
    false
}
