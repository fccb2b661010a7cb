// Password hashing, verification and strength policy

mod format;
mod legacy;

pub use format::HashFormat;

use bcrypt::DEFAULT_COST;
use tracing::warn;

/// Hash a plaintext password with the current (bcrypt) scheme.
///
/// Every call uses a fresh random salt, so hashing the same plaintext
/// twice yields two different stored strings.
pub fn hash_password(plain: &str) -> Result<String, String> {
    bcrypt::hash(plain, DEFAULT_COST).map_err(|e| format!("Failed to hash password: {}", e))
}

/// Verify a plaintext password against a stored hash.
///
/// The verification path is chosen by classifying the stored hash's
/// format prefix: bcrypt hashes take the current path, pre-migration
/// PBKDF2 hashes the legacy path. An empty, malformed or unrecognized
/// stored hash verifies as false; authentication failures never
/// propagate to the caller as errors.
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    match HashFormat::classify(stored_hash) {
        HashFormat::Current => match bcrypt::verify(plain, stored_hash) {
            Ok(matched) => matched,
            Err(e) => {
                warn!("Rejecting malformed bcrypt hash: {}", e);
                false
            }
        },
        HashFormat::Legacy => legacy::verify(plain, stored_hash),
        HashFormat::Unrecognized => false,
    }
}

/// True when the stored hash uses the legacy scheme and should be
/// replaced with a current-scheme hash on the next successful login.
pub fn needs_rehash(stored_hash: &str) -> bool {
    HashFormat::classify(stored_hash) == HashFormat::Legacy
}

/// Password strength gate: at least 8 characters, with at least one
/// uppercase letter, one lowercase letter, one digit and one character
/// outside those three classes. All four are required; there is no
/// scoring.
pub fn is_strong_password(password: &str) -> bool {
    if password.chars().count() < 8 {
        return false;
    }

    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());

    has_upper && has_lower && has_digit && has_special
}

#[cfg(test)]
mod tests {
    use super::*;

    // PBKDF2-HMAC-SHA256("Admin@123", "gx5fqGy0JnTZ", 260000)
    const LEGACY_FIXTURE: &str =
        "pbkdf2:sha256:260000$gx5fqGy0JnTZ$51e060b15b52d03c8ebca69337d5b2eeddf795346df28427bed45024688461fb";

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("Sup3r-Secret").unwrap();
        assert!(verify_password("Sup3r-Secret", &hash));
        assert!(!verify_password("Sup3r-Secre", &hash));
    }

    #[test]
    fn test_hashing_is_salted() {
        let first = hash_password("Sup3r-Secret").unwrap();
        let second = hash_password("Sup3r-Secret").unwrap();
        assert_ne!(first, second);

        // Both still verify despite differing salts
        assert!(verify_password("Sup3r-Secret", &first));
        assert!(verify_password("Sup3r-Secret", &second));
    }

    #[test]
    fn test_different_plaintexts_hash_differently() {
        let first = hash_password("Sup3r-Secret").unwrap();
        let second = hash_password("Other-Secr3t").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_new_hashes_are_current_format() {
        let hash = hash_password("Sup3r-Secret").unwrap();
        assert_eq!(HashFormat::classify(&hash), HashFormat::Current);
        assert!(!needs_rehash(&hash));
    }

    #[test]
    fn test_verify_legacy_hash() {
        assert!(verify_password("Admin@123", LEGACY_FIXTURE));
        assert!(!verify_password("Admin@124", LEGACY_FIXTURE));
        assert!(needs_rehash(LEGACY_FIXTURE));
    }

    #[test]
    fn test_verify_garbage_is_false_not_fatal() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "not-a-real-hash"));
        assert!(!verify_password("anything", "$2z$12$bogus"));
        assert!(!verify_password("anything", "pbkdf2:sha256:garbage"));
    }

    #[test]
    fn test_strong_password_accepted() {
        assert!(is_strong_password("Ab1!abcd"));
        assert!(is_strong_password("Admin@123"));
    }

    #[test]
    fn test_weak_passwords_rejected() {
        // No upper, digit or special
        assert!(!is_strong_password("abcdefgh"));
        // Too short
        assert!(!is_strong_password("Ab1!abc"));
        // Missing lowercase
        assert!(!is_strong_password("AB1!ABCD"));
        // Missing digit
        assert!(!is_strong_password("Ab!abcde"));
        // Missing special character
        assert!(!is_strong_password("Ab1abcde"));
        assert!(!is_strong_password(""));
    }
}
