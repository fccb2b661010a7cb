// Stored-hash format classification

/// Format of a stored password hash, determined purely from the string
/// itself, never from an external flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashFormat {
    /// Salted PBKDF2 hashes written before the bcrypt migration.
    Legacy,
    /// bcrypt hashes, the only format written today.
    Current,
    /// Anything else. Verification always fails for these.
    Unrecognized,
}

impl HashFormat {
    /// Fixed textual prefix of legacy PBKDF2 hashes.
    pub(crate) const LEGACY_PREFIX: &'static str = "pbkdf2:sha256:";

    /// bcrypt hashes are self-describing through their version prefix.
    const CURRENT_PREFIXES: [&'static str; 3] = ["$2a$", "$2b$", "$2y$"];

    /// Classify a stored hash by its prefix.
    pub fn classify(stored_hash: &str) -> Self {
        if stored_hash.starts_with(Self::LEGACY_PREFIX) {
            HashFormat::Legacy
        } else if Self::CURRENT_PREFIXES
            .iter()
            .any(|prefix| stored_hash.starts_with(prefix))
        {
            HashFormat::Current
        } else {
            HashFormat::Unrecognized
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bcrypt_variants() {
        for hash in [
            "$2a$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW",
            "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW",
            "$2y$10$abcdefghijklmnopqrstuv",
        ] {
            assert_eq!(HashFormat::classify(hash), HashFormat::Current);
        }
    }

    #[test]
    fn test_classify_legacy() {
        assert_eq!(
            HashFormat::classify("pbkdf2:sha256:260000$salt$00ff"),
            HashFormat::Legacy
        );
    }

    #[test]
    fn test_classify_unrecognized() {
        for hash in ["", "not-a-real-hash", "$1$md5crypt", "sha1$salt$digest"] {
            assert_eq!(HashFormat::classify(hash), HashFormat::Unrecognized);
        }
    }
}
