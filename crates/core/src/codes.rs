//! Booking confirmation codes.
//!
//! The code is shown to the guard at the gate, so it is drawn from
//! `rand::rng()`, a CSPRNG seeded from the operating system.

use rand::Rng;

/// Length of a booking confirmation code.
pub const CONFIRMATION_CODE_LENGTH: usize = 8;

/// Uppercase alphabet without look-alike characters (0/O, 1/I/L).
const CONFIRMATION_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Generate a booking confirmation code such as `K7QX2MHD`.
pub fn generate_confirmation_code() -> String {
    let mut rng = rand::rng();
    (0..CONFIRMATION_CODE_LENGTH)
        .map(|_| CONFIRMATION_ALPHABET[rng.random_range(0..CONFIRMATION_ALPHABET.len())] as char)
        .collect()
}
