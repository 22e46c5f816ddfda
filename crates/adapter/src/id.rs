//! Game identifiers: 9 lowercase base-36 characters.

use rand::Rng;

/// Length of every game identifier.
pub const GAME_ID_LEN: usize = 9;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Draw a fresh identifier.
pub fn generate_game_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..GAME_ID_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Identifiers are exactly 9 ASCII alphanumerics. Anything else never names a
/// stored game, which also keeps path separators out of store file names.
pub fn is_valid_game_id(id: &str) -> bool {
    id.len() == GAME_ID_LEN && id.bytes().all(|b| b.is_ascii_alphanumeric())
}
