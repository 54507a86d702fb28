//! Secondary claim cookie codec.
//!
//! DESIGN
//! ======
//! The `tg_session` cookie carries `username:role:marker` as base64url with
//! optional padding. Decoding is best-effort: the missing `=` padding is
//! restored, standard-alphabet `+` and `/` are read as `-` and `_`, other
//! characters outside the alphabet are skipped, and bytes that are not valid
//! UTF-8 are dropped. Every failure (impossible length, premature padding,
//! wrong field count) collapses to `None`. Callers cannot tell an absent
//! cookie from a malformed one.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

/// Field separator inside the decoded claim.
pub const FIELD_SEPARATOR: char = ':';

/// URL-safe alphabet over pre-scanned, unpadded input; non-zero trailing bits allowed.
const CLAIM_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

const PAD: char = '=';

/// Decoded `username:role:marker` triple. Nothing here is verified yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimTriple {
    pub username: String,
    pub role: String,
    pub marker: String,
}

/// Number of `=` characters needed to bring `len` up to a multiple of four.
pub(crate) fn padding_for(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Decode bytes as UTF-8, skipping any invalid sequences instead of replacing them.
pub(crate) fn utf8_ignoring_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Reduce raw cookie text to unpadded URL-safe base64 data characters.
///
/// `+` and `/` map to `-` and `_`; anything else outside the alphabet is
/// skipped. Padding that completes a quad ends the data and the rest is
/// ignored; `=` arriving before two data characters of a quad is skipped.
/// Returns `None` when the data ends mid-quad without padding to finish it.
pub(crate) fn scan_alphabet(raw: &str) -> Option<String> {
    let mut data = String::with_capacity(raw.len());
    let mut quad_pos = 0usize;
    let mut pads = 0usize;

    for ch in raw.chars() {
        if ch == PAD {
            if quad_pos >= 2 {
                pads += 1;
                if quad_pos + pads >= 4 {
                    return Some(data);
                }
            }
            continue;
        }

        let ch = match ch {
            '+' => '-',
            '/' => '_',
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => c,
            _ => continue,
        };
        data.push(ch);
        quad_pos = (quad_pos + 1) % 4;
        pads = 0;
    }

    (quad_pos == 0).then_some(data)
}

/// Decode a padding-optional base64url string into text.
pub(crate) fn decode_text(raw: &str) -> Option<String> {
    let mut padded = String::with_capacity(raw.len() + 3);
    padded.push_str(raw);
    padded.extend(std::iter::repeat_n(PAD, padding_for(raw.len())));

    let Some(data) = scan_alphabet(&padded) else {
        tracing::debug!("claim cookie has incomplete base64 padding");
        return None;
    };

    match CLAIM_ENGINE.decode(data.as_bytes()) {
        Ok(bytes) => Some(utf8_ignoring_invalid(&bytes)),
        Err(e) => {
            tracing::debug!(error = %e, "claim cookie is not base64url");
            None
        }
    }
}

/// Decode a raw cookie value into a claim triple.
///
/// Returns `None` for anything that is not exactly three colon-delimited fields
/// after decoding. Never panics and never reports why.
#[must_use]
pub fn decode(cookie_value: &str) -> Option<ClaimTriple> {
    if cookie_value.is_empty() {
        return None;
    }

    let text = decode_text(cookie_value)?;
    let mut parts = text.split(FIELD_SEPARATOR);
    let (Some(username), Some(role), Some(marker), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        tracing::debug!("claim cookie does not have three fields");
        return None;
    };

    Some(ClaimTriple { username: username.to_owned(), role: role.to_owned(), marker: marker.to_owned() })
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
