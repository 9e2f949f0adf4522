//! `chiffre-crypto-core` — streaming RNCryptor v3 encryption core.
//!
//! Implements the v3 data format: a self-describing binary envelope of
//! AES-256-CBC ciphertext authenticated by HMAC-SHA-256, keyed either by a
//! caller-supplied pair of 256-bit keys or by passphrase-derived keys
//! (PBKDF2-HMAC-SHA1, 10 000 iterations). Envelopes interoperate
//! byte-for-byte with other v3 implementations.
//!
//! This crate is the audit target: zero network, zero async, no FFI.
//! Language bindings and command-line front ends belong in sibling crates.
//!
//! # Streaming
//!
//! Both directions are incremental: create, `update` zero or more times,
//! `finish` exactly once. `finish` consumes the value, so reuse after the
//! stream ends is a compile error rather than a runtime contract violation.
//! The decryptor never releases the trailing 32 bytes of the stream from
//! `update` — whatever the total length turns out to be, they are withheld
//! as the candidate MAC and verified in constant time at `finish`.
//!
//! # Errors
//!
//! Any authenticity failure — wrong password, tampering, truncation inside
//! the MAC region, malformed padding — surfaces as the single error
//! [`CryptorError::HmacMismatch`]. See [`error`] for the full taxonomy.
//!
//! # Example
//!
//! ```
//! use chiffre_crypto_core::{decrypt, encrypt};
//!
//! let envelope = encrypt(b"attack at dawn", "correct horse battery staple");
//! let plaintext = decrypt(&envelope, "correct horse battery staple")?;
//! assert_eq!(plaintext, b"attack at dawn");
//! # Ok::<(), chiffre_crypto_core::CryptorError>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)
)]

pub mod buffer;
pub mod cipher;
pub mod decryptor;
pub mod encryptor;
pub mod error;
pub mod format;
pub mod kdf;
pub mod mac;

pub use buffer::OverflowingBuffer;
pub use decryptor::{decrypt, decrypt_with_keys, Decryptor};
pub use encryptor::{encrypt, encrypt_with_keys, Encryptor};
pub use error::CryptorError;
pub use format::{
    Header, BLOCK_LEN, HMAC_LEN, IV_LEN, KEY_HEADER_LEN, KEY_LEN, MIN_ENVELOPE_LEN,
    PASSWORD_HEADER_LEN, SALT_LEN, VERSION,
};
pub use kdf::{key_for_password, KeyMaterial, PBKDF2_ITERATIONS};
pub use mac::{constant_time_eq, HmacEngine};
