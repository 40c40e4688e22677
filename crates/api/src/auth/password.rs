//! Argon2id password hashing and the account password policy.
//!
//! The laboratory's accounts are few and long-lived -- one admin
//! bootstrapped at startup plus a handful of per-role stage accounts
//! created through the admin endpoint -- so hashes are stored in PHC
//! string format (algorithm, parameters and salt embedded) and the
//! policy is a single shared minimum length.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Minimum password length for the admin bootstrap and admin-created
/// stage accounts.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Hash a plaintext password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// `Ok(false)` is a wrong password; `Err` means the stored hash itself
/// could not be parsed or verified.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Check a candidate password against the account policy.
///
/// Enforces [`MIN_PASSWORD_LENGTH`] and rejects blank passwords that are
/// long enough only because of whitespace padding.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    if password.trim().is_empty() {
        return Err("Password must not be blank".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "granulometrie-SC-01!";
        let hash = hash_password(password).expect("hashing should succeed");

        // PHC string carrying the argon2id identifier.
        assert!(
            hash.starts_with("$argon2id$"),
            "expected argon2id PHC prefix"
        );

        let verified = verify_password(password, &hash).expect("verify should succeed");
        assert!(verified, "correct password should verify as true");
    }

    #[test]
    fn wrong_password_verifies_false() {
        let hash = hash_password("bon-mot-de-passe").expect("hashing should succeed");
        let verified =
            verify_password("mauvais-mot-de-passe", &hash).expect("verify should succeed");
        assert!(!verified);
    }

    #[test]
    fn policy_rejects_short_passwords() {
        let result = validate_password_strength("court");
        assert!(result.is_err());
        let msg = result.unwrap_err();
        assert!(
            msg.contains("at least 12 characters"),
            "error message should state the minimum length"
        );
    }

    #[test]
    fn policy_rejects_whitespace_padding() {
        assert!(validate_password_strength("            ").is_err());
    }

    #[test]
    fn policy_accepts_at_and_above_the_minimum() {
        assert!(validate_password_strength("douze-caract").is_ok());
        assert!(validate_password_strength("MotDePasseSolide!2026").is_ok());
    }
}
