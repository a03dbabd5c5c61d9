//! Access-code and upload-token generation.
//!
//! Codes are short enough for a student to type from an email and avoid the
//! visually ambiguous glyphs `0`, `O`, `1`, `I` and `L`. Generation is
//! stateless and free of side effects; uniqueness against stored requests is
//! the caller's job (see `request::service`, which retries on collision).

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Digits 2-9 plus uppercase letters, with `O`, `I` and `L` removed.
pub const CODE_ALPHABET: &[u8] = b"23456789ABCDEFGHJKMNPQRSTUVWXYZ";

pub const CODE_LENGTH: usize = 8;

/// Hard cap on generate-and-check rounds before code issuance gives up.
pub const MAX_CODE_ATTEMPTS: u32 = 10;

const UPLOAD_TOKEN_LENGTH: usize = 16;

/// Generate one candidate access code, 8 uniform draws from the alphabet.
pub fn generate_access_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Random 16-character token used as the on-disk name of an uploaded file.
pub fn generate_upload_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(UPLOAD_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
