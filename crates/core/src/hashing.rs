//! Hash utilities: SHA-256 digests and blind indexes.
//!
//! A blind index is a keyed HMAC of a normalized value. It lets the denylist
//! and the accounts table be matched by equality without keeping the plaintext
//! next to the hash.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Field kinds that can be blind-indexed. Each kind normalizes differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexedField {
    Plate,
    Email,
    Phone,
    Document,
}

impl IndexedField {
    /// Column value used in `denylist_entries.field`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plate => "plate",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Document => "document",
        }
    }

    /// Canonical form hashed into the index.
    pub fn normalize(self, value: &str) -> String {
        match self {
            Self::Plate | Self::Document => value
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_uppercase())
                .collect(),
            Self::Email => value.trim().to_lowercase(),
            Self::Phone => value.chars().filter(char::is_ascii_digit).collect(),
        }
    }
}

/// Compute the blind index of `value` under `key`.
///
/// The field kind is mixed into the MAC so equal strings in different fields
/// never collide.
pub fn blind_index(key: &[u8], field: IndexedField, value: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(field.as_str().as_bytes());
    mac.update(b":");
    mac.update(field.normalize(value).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Compare two byte strings in time independent of where they differ.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
