//! Streaming v3 envelope encryption.
//!
//! This module provides:
//! - [`Encryptor`] — incremental encryption: `update` zero or more times,
//!   `finish` once
//! - [`encrypt`] / [`encrypt_with_keys`] — one-shot conveniences
//!
//! The encryptor holds the encoded header in a pending slot until the first
//! byte of output is produced; the header is then both prepended to the
//! output and absorbed by the MAC, exactly once. From that point every
//! emitted ciphertext byte is MAC'd in emission order, and `finish` appends
//! the final cipher block followed by the 32-byte tag.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::cipher::CipherEncryptor;
use crate::format::{Header, IV_LEN, KEY_LEN, SALT_LEN};
use crate::kdf::{key_for_password, KeyMaterial};
use crate::mac::HmacEngine;

/// Streaming encryptor for v3 envelopes.
///
/// Encryption cannot fail for valid inputs, so `update` and `finish` are
/// infallible; `finish` consumes the encryptor.
///
/// # Example
///
/// ```
/// use chiffre_crypto_core::{decrypt, Encryptor};
///
/// let mut encryptor = Encryptor::with_password("correct horse battery staple");
/// let mut envelope = encryptor.update(b"attack ");
/// envelope.extend(encryptor.update(b"at dawn"));
/// envelope.extend(encryptor.finish());
///
/// let plaintext = decrypt(&envelope, "correct horse battery staple")?;
/// assert_eq!(plaintext, b"attack at dawn");
/// # Ok::<(), chiffre_crypto_core::CryptorError>(())
/// ```
pub struct Encryptor {
    cipher: CipherEncryptor,
    mac: HmacEngine,
    pending_header: Option<Vec<u8>>,
}

impl Encryptor {
    /// Create a password-based encryptor with salts and IV drawn from the
    /// system CSPRNG.
    ///
    /// # Panics
    ///
    /// Panics if `password` is empty — rejecting empty passwords is part of
    /// the caller contract, not a recoverable runtime condition.
    #[must_use]
    pub fn with_password(password: &str) -> Self {
        Self::with_password_and_parameters(
            password,
            random_array::<SALT_LEN>(),
            random_array::<SALT_LEN>(),
            random_array::<IV_LEN>(),
        )
    }

    /// Create a key-based encryptor with an IV drawn from the system CSPRNG.
    #[must_use]
    pub fn with_keys(encryption_key: [u8; KEY_LEN], hmac_key: [u8; KEY_LEN]) -> Self {
        Self::with_keys_and_iv(encryption_key, hmac_key, random_array::<IV_LEN>())
    }

    /// Create a password-based encryptor with explicit salts and IV.
    ///
    /// This constructor exists to reproduce interoperability test vectors.
    /// **Never** encrypt production data with a fixed or reused IV — use
    /// [`Encryptor::with_password`], which draws fresh randomness per
    /// envelope.
    ///
    /// # Panics
    ///
    /// Panics if `password` is empty.
    #[must_use]
    pub fn with_password_and_parameters(
        password: &str,
        encryption_salt: [u8; SALT_LEN],
        hmac_salt: [u8; SALT_LEN],
        iv: [u8; IV_LEN],
    ) -> Self {
        assert!(!password.is_empty(), "password must not be empty");
        let encryption_key = key_for_password(password.as_bytes(), &encryption_salt);
        let hmac_key = key_for_password(password.as_bytes(), &hmac_salt);
        let header = Header::Password {
            encryption_salt,
            hmac_salt,
            iv,
        };
        Self::from_parts(&encryption_key, &hmac_key, &header)
    }

    /// Create a key-based encryptor with an explicit IV.
    ///
    /// Like [`Encryptor::with_password_and_parameters`], this is an
    /// interoperability-vector surface; production callers want
    /// [`Encryptor::with_keys`].
    #[must_use]
    pub fn with_keys_and_iv(
        encryption_key: [u8; KEY_LEN],
        hmac_key: [u8; KEY_LEN],
        iv: [u8; IV_LEN],
    ) -> Self {
        let encryption_key = KeyMaterial::from(encryption_key);
        let hmac_key = KeyMaterial::from(hmac_key);
        Self::from_parts(&encryption_key, &hmac_key, &Header::Keys { iv })
    }

    fn from_parts(encryption_key: &KeyMaterial, hmac_key: &KeyMaterial, header: &Header) -> Self {
        Self {
            cipher: CipherEncryptor::new(encryption_key.expose(), header.iv()),
            mac: HmacEngine::new(hmac_key.expose()),
            pending_header: Some(header.encode()),
        }
    }

    /// Encrypt more plaintext, returning whatever envelope bytes are ready.
    ///
    /// The first call that produces output is prefixed with the envelope
    /// header. Sub-block plaintext remainders stay inside the cipher until
    /// a later `update` or `finish` completes them.
    pub fn update(&mut self, data: &[u8]) -> Vec<u8> {
        let mut out = self.take_header();
        let ciphertext = self.cipher.update(data);
        self.mac.update(&ciphertext);
        out.extend_from_slice(&ciphertext);
        out
    }

    /// Emit the final padded block and the 32-byte MAC, consuming the
    /// encryptor.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        let mut out = self.take_header();
        let tail = self.cipher.finish();
        self.mac.update(&tail);
        out.extend_from_slice(&tail);
        out.extend_from_slice(&self.mac.finish());
        out
    }

    /// Pop the encoded header on first output, feeding it to the MAC.
    fn take_header(&mut self) -> Vec<u8> {
        match self.pending_header.take() {
            Some(header) => {
                self.mac.update(&header);
                header
            }
            None => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// One-shot conveniences
// ---------------------------------------------------------------------------

/// Encrypt `plaintext` into a password-based v3 envelope.
///
/// Equivalent to one `update` followed by `finish` on
/// [`Encryptor::with_password`].
///
/// # Panics
///
/// Panics if `password` is empty.
#[must_use]
pub fn encrypt(plaintext: &[u8], password: &str) -> Vec<u8> {
    let mut encryptor = Encryptor::with_password(password);
    let mut envelope = encryptor.update(plaintext);
    envelope.extend(encryptor.finish());
    envelope
}

/// Encrypt `plaintext` into a key-based v3 envelope.
#[must_use]
pub fn encrypt_with_keys(
    plaintext: &[u8],
    encryption_key: [u8; KEY_LEN],
    hmac_key: [u8; KEY_LEN],
) -> Vec<u8> {
    let mut encryptor = Encryptor::with_keys(encryption_key, hmac_key);
    let mut envelope = encryptor.update(plaintext);
    envelope.extend(encryptor.finish());
    envelope
}

fn random_array<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
