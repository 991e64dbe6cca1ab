//! One-way password hashing.
//!
//! Standalone functions taking the plaintext and hash as explicit arguments;
//! credential comparison is not a capability of the user record.

use crate::errors::ServiceError;

/// Hash a plaintext password with the given bcrypt work factor. Applied
/// whenever a password is set, before persistence; plaintext is never
/// stored. A hashing failure is fatal to the enclosing operation.
pub fn hash_password(plain: &str, cost: u32) -> Result<String, ServiceError> {
    bcrypt::hash(plain, cost)
        .map_err(|e| ServiceError::Internal(format!("failed to hash password: {}", e)))
}

/// Check a plaintext candidate against a stored hash.
pub fn verify_password(plain: &str, hashed: &str) -> Result<bool, ServiceError> {
    bcrypt::verify(plain, hashed)
        .map_err(|e| ServiceError::Internal(format!("failed to verify password: {}", e)))
}
