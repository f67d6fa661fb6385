//! CSRF tokens for the authorization `state` round trip.
//!
//! A fresh token is issued every time a user starts a flow. The redirect must
//! carry the same token back, otherwise the completion is rejected.

use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;

/// Length of every generated token, in characters.
pub const TOKEN_LEN: usize = 32;

/// Generates a new CSRF token.
///
/// The token is `TOKEN_LEN` characters drawn uniformly from `[A-Za-z0-9]`
/// using the operating system's CSPRNG.
#[must_use]
pub fn generate_token() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Compares two tokens without short-circuiting on the first differing byte.
#[must_use]
pub fn tokens_match(expected: &str, actual: &str) -> bool {
    let (expected, actual) = (expected.as_bytes(), actual.as_bytes());
    if expected.len() != actual.len() {
        return false;
    }
    expected
        .iter()
        .zip(actual)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
