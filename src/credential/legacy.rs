// Verification of pre-migration PBKDF2 password hashes
//
// Stored as `pbkdf2:sha256:<iterations>$<salt>$<hex digest>`. Hashes in
// this format are never written anymore; accounts created before the
// bcrypt migration keep verifying until their hash is rotated.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use tracing::warn;

use super::format::HashFormat;

/// Upper bound on accepted iteration counts. A corrupted row must not be
/// able to pin a request handler on key derivation.
const MAX_ITERATIONS: u32 = 10_000_000;

/// Check a plaintext against a legacy stored hash. Malformed input
/// verifies as false, never as an error.
pub(super) fn verify(plain: &str, stored_hash: &str) -> bool {
    let Some((iterations, salt, digest)) = parse(stored_hash) else {
        warn!("Rejecting malformed legacy password hash");
        return false;
    };

    let expected = match hex::decode(digest) {
        Ok(bytes) if !bytes.is_empty() => bytes,
        _ => {
            warn!("Rejecting legacy password hash with invalid digest");
            return false;
        }
    };

    let mut derived = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(plain.as_bytes(), salt.as_bytes(), iterations, &mut derived);
    derived == expected
}

/// Split `pbkdf2:sha256:<iterations>$<salt>$<digest>` into its parts.
fn parse(stored_hash: &str) -> Option<(u32, &str, &str)> {
    let rest = stored_hash.strip_prefix(HashFormat::LEGACY_PREFIX)?;
    let mut parts = rest.splitn(3, '$');

    let iterations: u32 = parts.next()?.parse().ok()?;
    let salt = parts.next()?;
    let digest = parts.next()?;

    if iterations == 0 || iterations > MAX_ITERATIONS || salt.is_empty() {
        return None;
    }

    Some((iterations, salt, digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    // PBKDF2-HMAC-SHA256("Correct-Horse1", "q9zKp2Lm", 150000)
    const FIXTURE: &str =
        "pbkdf2:sha256:150000$q9zKp2Lm$2be9171ba8887beab246b18114901cf973f4eff3ea665c97ff85d1125eb41716";

    #[test]
    fn test_verify_known_hash() {
        assert!(verify("Correct-Horse1", FIXTURE));
    }

    #[test]
    fn test_verify_wrong_password() {
        assert!(!verify("Correct-Horse2", FIXTURE));
        assert!(!verify("", FIXTURE));
    }

    #[test]
    fn test_verify_malformed_hashes() {
        for hash in [
            "pbkdf2:sha256:",
            "pbkdf2:sha256:abc$salt$00ff",
            "pbkdf2:sha256:0$salt$00ff",
            "pbkdf2:sha256:150000$$00ff",
            "pbkdf2:sha256:150000$salt$not-hex",
            "pbkdf2:sha256:150000$salt$",
            "pbkdf2:sha256:150000$salt",
        ] {
            assert!(!verify("Correct-Horse1", hash), "accepted {:?}", hash);
        }
    }

    #[test]
    fn test_verify_rejects_absurd_iteration_counts() {
        let hash = format!("pbkdf2:sha256:{}$salt$00ff", u32::MAX);
        assert!(!verify("anything", &hash));
    }
}
