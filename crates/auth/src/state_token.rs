//! Anti-forgery state tokens.

use rand::Rng;

/// Length of a state token.
pub const STATE_TOKEN_LEN: usize = 32;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a random state token of uppercase letters and digits.
pub fn generate_state_token() -> String {
    let mut rng = rand::rng();
    (0..STATE_TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
