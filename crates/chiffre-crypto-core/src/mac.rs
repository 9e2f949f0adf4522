//! HMAC-SHA-256 engine and constant-time tag comparison.

use ring::{constant_time, hmac};

use crate::format::{HMAC_LEN, KEY_LEN};

/// Stateful HMAC-SHA-256 over `ring::hmac::Context`.
///
/// Both streaming engines feed it every envelope byte in emission order —
/// header first, then ciphertext — so the tag covers the whole envelope
/// prefix.
pub struct HmacEngine {
    ctx: hmac::Context,
}

impl HmacEngine {
    /// Create an engine keyed with a 256-bit HMAC key.
    #[must_use]
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        let key = hmac::Key::new(hmac::HMAC_SHA256, key);
        Self {
            ctx: hmac::Context::with_key(&key),
        }
    }

    /// Absorb `data`.
    pub fn update(&mut self, data: &[u8]) {
        self.ctx.update(data);
    }

    /// Finalize and return the 32-byte tag, consuming the engine.
    #[must_use]
    pub fn finish(self) -> [u8; HMAC_LEN] {
        let tag = self.ctx.sign();
        let mut out = [0u8; HMAC_LEN];
        out.copy_from_slice(tag.as_ref());
        out
    }
}

/// Constant-time byte comparison for MAC tags.
///
/// Returns `true` iff both slices have equal length and identical contents.
/// The early return on a length mismatch is acceptable here: the tag length
/// is fixed by the format and public, only the tag *value* needs timing
/// protection.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    constant_time::verify_slices_are_equal(a, b).is_ok()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
