//! PBKDF2-HMAC-SHA1 key derivation for password-mode envelopes.
//!
//! This module provides:
//! - [`key_for_password`] — derive a 256-bit key from a password + 8-byte salt
//! - [`KeyMaterial`] — fixed-size key wrapper, zeroized on drop
//!
//! The v3 format derives the encryption key and the HMAC key independently:
//! one password, two salts, two PBKDF2 runs of 10 000 iterations each. SHA-1
//! survives here only as the PBKDF2 PRF the format pins; it authenticates
//! nothing.

use std::fmt;
use std::num::NonZeroU32;

use ring::pbkdf2;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::format::{KEY_LEN, SALT_LEN};

/// PBKDF2 iteration count fixed by the v3 format.
pub const PBKDF2_ITERATIONS: u32 = 10_000;

const ITERATIONS: NonZeroU32 = match NonZeroU32::new(PBKDF2_ITERATIONS) {
    Some(n) => n,
    None => panic!("iteration count must be non-zero"),
};

// ---------------------------------------------------------------------------
// KeyMaterial
// ---------------------------------------------------------------------------

/// 256-bit key material, zeroized on drop.
///
/// Derived and caller-supplied keys live here for the short window between
/// construction and being handed to a cipher or MAC context. `Debug` and
/// `Display` output is masked.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    bytes: [u8; KEY_LEN],
}

impl KeyMaterial {
    /// Wrap a 32-byte key. The array is moved in, leaving the caller no
    /// copy to scrub.
    #[must_use]
    pub const fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Expose the key bytes for a cryptographic operation. Keep exposure
    /// short-lived — prefer passing the result straight into a context
    /// constructor.
    #[must_use]
    pub const fn expose(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl From<[u8; KEY_LEN]> for KeyMaterial {
    fn from(bytes: [u8; KEY_LEN]) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(***)")
    }
}

impl fmt::Display for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(***)")
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derive a 256-bit key from a password and an 8-byte salt.
///
/// PBKDF2-HMAC-SHA1, 10 000 iterations, per the v3 format. Derivation never
/// fails for well-formed inputs; password emptiness is enforced at the
/// encryptor/decryptor boundary, and password strength is the caller's
/// business.
#[must_use]
pub fn key_for_password(password: &[u8], salt: &[u8; SALT_LEN]) -> KeyMaterial {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::derive(pbkdf2::PBKDF2_HMAC_SHA1, ITERATIONS, salt, password, &mut key);
    let material = KeyMaterial::new(key);
    key.zeroize();
    material
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
