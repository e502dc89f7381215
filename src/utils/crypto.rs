//! Random code generation

use rand::Rng;

/// Characters used in join codes, without look-alikes such as `0/O` and `1/I`
const JOIN_CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a random join code of `length` characters
pub fn generate_join_code(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..JOIN_CODE_CHARSET.len());
            JOIN_CODE_CHARSET[idx] as char
        })
        .collect()
}

/// Canonical form of a user-typed join code
pub fn normalize_join_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
