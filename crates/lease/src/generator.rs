//! Credential generation
//!
//! Both generators draw from `rand`'s thread-local generator: ChaCha12 seeded
//! from the operating system and periodically reseeded. Nothing here is
//! time-seeded or predictable. Usernames are treated as unique without a
//! lookup; callers that need a hard guarantee rely on the target's own
//! uniqueness constraint.

use std::fmt;

use rand::distr::{Alphanumeric, Distribution};
use secrecy::SecretString;

/// Length of every generated username.
pub const USERNAME_LENGTH: usize = 32;

/// Alphabet shared by usernames and passwords: `[A-Za-z0-9]`.
pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn alphanumeric(length: usize) -> String {
    Alphanumeric
        .sample_iter(rand::rng())
        .take(length)
        .map(char::from)
        .collect()
}

/// Fresh 32-character alphanumeric username.
pub fn generate_username() -> String {
    alphanumeric(USERNAME_LENGTH)
}

/// Fresh password of `length` characters drawn from [`ALPHABET`].
pub fn generate_password(length: usize) -> SecretString {
    SecretString::from(alphanumeric(length))
}

/// Username/password pair issued for one lease
pub struct GeneratedCredential {
    pub username: String,
    pub password: SecretString,
}

impl GeneratedCredential {
    pub fn generate(password_length: usize) -> Self {
        Self {
            username: generate_username(),
            password: generate_password(password_length),
        }
    }
}

impl fmt::Debug for GeneratedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedCredential")
            .field("username", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leasehold_config::DEFAULT_PASSWORD_LENGTH;
    use secrecy::ExposeSecret;
    use std::collections::HashSet;

    const SAMPLES: usize = 10_000;

    #[test]
    fn username_is_32_alphanumerics() {
        for _ in 0..100 {
            let username = generate_username();
            assert_eq!(username.len(), USERNAME_LENGTH);
            assert!(username.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn password_uses_alphabet_and_requested_length() {
        for _ in 0..100 {
            let password = generate_password(DEFAULT_PASSWORD_LENGTH);
            let password = password.expose_secret();
            assert_eq!(password.len(), 48);
            assert!(password.chars().all(|c| ALPHABET.contains(c)));
        }
        assert_eq!(generate_password(64).expose_secret().len(), 64);
    }

    #[test]
    fn no_username_collisions() {
        let seen: HashSet<String> = (0..SAMPLES).map(|_| generate_username()).collect();
        assert_eq!(seen.len(), SAMPLES);
    }

    #[test]
    fn no_password_collisions() {
        let seen: HashSet<String> = (0..SAMPLES)
            .map(|_| generate_password(DEFAULT_PASSWORD_LENGTH).expose_secret().to_owned())
            .collect();
        assert_eq!(seen.len(), SAMPLES);
    }

    #[test]
    fn alphabet_has_62_distinct_characters() {
        let distinct: HashSet<char> = ALPHABET.chars().collect();
        assert_eq!(distinct.len(), 62);
    }

    #[test]
    fn debug_redacts_both_fields() {
        let credential = GeneratedCredential::generate(DEFAULT_PASSWORD_LENGTH);
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains(&credential.username));
        assert!(!rendered.contains(credential.password.expose_secret()));
    }
}
