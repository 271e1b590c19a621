use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

use crate::error::AppError;

/// Hashes `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(hash(password, DEFAULT_COST)?)
}

/// Checks `password` against a stored bcrypt hash.
///
/// A stored hash that bcrypt cannot read is treated as a mismatch, so the caller
/// answers with the usual invalid-credentials error.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    match verify(password, hashed_password) {
        Ok(matches) => Ok(matches),
        Err(
            BcryptError::InvalidHash(_)
            | BcryptError::InvalidPrefix(_)
            | BcryptError::InvalidCost(_)
            | BcryptError::InvalidBase64(_),
        ) => {
            log::warn!("Stored password hash is unreadable");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
