//! Password hashing

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::RngCore;

use crate::models::Password;

/// Hash a password with argon2id and a fresh random salt.
pub fn hash(password: &Password) -> Result<String, argon2::password_hash::Error> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)?;

    let phc = Argon2::default().hash_password(password.expose().as_bytes(), &salt)?;
    Ok(phc.to_string())
}

/// Check `plain` against a stored PHC string. A malformed hash never verifies.
pub fn verify(plain: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("stored password hash is malformed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let pw = Password::new("correct horse battery").unwrap();
        let phc = hash(&pw).unwrap();

        assert!(phc.starts_with("$argon2id$"));
        assert!(verify("correct horse battery", &phc));
        assert!(!verify("wrong horse battery", &phc));
    }

    #[test]
    fn salts_differ() {
        let pw = Password::new("same-password").unwrap();
        assert_ne!(hash(&pw).unwrap(), hash(&pw).unwrap());
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        assert!(!verify("anything", "not-a-phc-string"));
    }
}
