//! Participant identifier utilities
//!
//! IDs are short random strings used both as participant IDs and as the
//! disambiguating suffix of upload filenames.

use rand::Rng;

/// 58 characters: digits and letters without `0`, `O`, `I` and `l`
pub const ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length of a generated identifier
pub const ID_LENGTH: usize = 10;

/// Longest participant ID accepted from a request path
pub const MAX_PARTICIPANT_ID_LENGTH: usize = 64;

/// Generate a new random identifier
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Check that a participant ID is safe to use as a file stem and directory name
///
/// Accepts ASCII letters, digits, `_` and `-`. Anything that could escape the
/// storage roots (`.`, `/`, `\`) is rejected.
pub fn is_valid_participant_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_PARTICIPANT_ID_LENGTH
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
