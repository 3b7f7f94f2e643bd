// In crates/push/src/urlsafe.rs

use crate::error::Result;
use base64::Engine as _;
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};

// The enrollment flow decodes whatever the server serves, and deployed key
// strings are not always canonical in their trailing bits, so the decoder is
// as forgiving as a browser's `atob`.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Converts a URL-safe base64 string to raw bytes: swap in the standard
/// alphabet (`-` to `+`, `_` to `/`), pad with `=` to a multiple of four,
/// then decode.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    let mut standard: String = input
        .trim()
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    while standard.len() % 4 != 0 {
        standard.push('=');
    }
    Ok(STANDARD_LENIENT.decode(standard)?)
}

/// Encodes bytes as unpadded URL-safe base64, the inverse of [`decode`].
pub fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
