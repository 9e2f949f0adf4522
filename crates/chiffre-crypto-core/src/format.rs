//! v3 envelope format — constants, header layout, bit-exact codec.
//!
//! # Envelope Layout
//!
//! ```text
//! offset   size  field
//!   0       1    version = 0x03
//!   1       1    options: 0x00 = key-based, 0x01 = password-based
//!   2       8    encryption salt   (password mode only)
//!  10       8    HMAC salt         (password mode only)
//!  2|18    16    IV
//!   …       *    ciphertext (AES-256-CBC, PKCS#7, whole blocks)
//! end-32   32    HMAC-SHA-256 over header ‖ ciphertext
//! ```
//!
//! The header is 18 bytes in key mode and 34 bytes in password mode. The
//! MAC covers every envelope byte that precedes it, header included, so a
//! flipped options byte or salt fails authentication just like flipped
//! ciphertext.

use crate::error::CryptorError;

/// Format version produced and accepted by this crate.
pub const VERSION: u8 = 3;

/// Options byte for key-based envelopes.
pub const OPTIONS_KEY: u8 = 0x00;

/// Options byte for password-based envelopes.
pub const OPTIONS_PASSWORD: u8 = 0x01;

/// PBKDF2 salt length in bytes.
pub const SALT_LEN: usize = 8;

/// IV length in bytes (one AES block).
pub const IV_LEN: usize = 16;

/// AES block length in bytes.
pub const BLOCK_LEN: usize = 16;

/// HMAC-SHA-256 tag length in bytes.
pub const HMAC_LEN: usize = 32;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// Header length for key-based envelopes: version + options + IV.
pub const KEY_HEADER_LEN: usize = 2 + IV_LEN;

/// Header length for password-based envelopes: adds the two KDF salts.
pub const PASSWORD_HEADER_LEN: usize = 2 + 2 * SALT_LEN + IV_LEN;

/// Smallest well-formed envelope: key-mode header, one cipher block, the MAC.
pub const MIN_ENVELOPE_LEN: usize = KEY_HEADER_LEN + BLOCK_LEN + HMAC_LEN;

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// A parsed v3 envelope header.
///
/// The variant mirrors the options byte: password-mode headers carry the two
/// PBKDF2 salts in addition to the IV, key-mode headers carry the IV alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Header {
    /// Password-based envelope: independent salts for the encryption key
    /// and the HMAC key, plus the IV.
    Password {
        /// Salt for deriving the AES-256 key.
        encryption_salt: [u8; SALT_LEN],
        /// Salt for deriving the HMAC-SHA-256 key.
        hmac_salt: [u8; SALT_LEN],
        /// CBC initialization vector.
        iv: [u8; IV_LEN],
    },
    /// Key-based envelope: the caller supplies both keys out of band.
    Keys {
        /// CBC initialization vector.
        iv: [u8; IV_LEN],
    },
}

impl Header {
    /// Encoded length in bytes: [`KEY_HEADER_LEN`] or [`PASSWORD_HEADER_LEN`].
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        match self {
            Self::Password { .. } => PASSWORD_HEADER_LEN,
            Self::Keys { .. } => KEY_HEADER_LEN,
        }
    }

    /// The IV carried by either variant.
    #[must_use]
    pub const fn iv(&self) -> &[u8; IV_LEN] {
        match self {
            Self::Password { iv, .. } | Self::Keys { iv } => iv,
        }
    }

    /// Serialize to the wire layout.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.push(VERSION);
        match self {
            Self::Password {
                encryption_salt,
                hmac_salt,
                iv,
            } => {
                out.push(OPTIONS_PASSWORD);
                out.extend_from_slice(encryption_salt);
                out.extend_from_slice(hmac_salt);
                out.extend_from_slice(iv);
            }
            Self::Keys { iv } => {
                out.push(OPTIONS_KEY);
                out.extend_from_slice(iv);
            }
        }
        debug_assert_eq!(out.len(), self.encoded_len());
        out
    }

    /// Parse a complete header.
    ///
    /// `bytes` must be exactly the header for its options byte — the caller
    /// (the dispatching decryptor) buffers until the full header is present.
    ///
    /// # Errors
    ///
    /// - [`CryptorError::MessageTooShort`] if `bytes` is shorter than the
    ///   layout its options byte demands.
    /// - [`CryptorError::UnknownHeader`] if the version byte is not `0x03`
    ///   or the options byte names no known mode.
    pub fn parse(bytes: &[u8]) -> Result<Self, CryptorError> {
        if bytes.len() < 2 {
            return Err(CryptorError::MessageTooShort);
        }
        if bytes[0] != VERSION {
            return Err(CryptorError::UnknownHeader);
        }
        match bytes[1] {
            OPTIONS_KEY => {
                if bytes.len() != KEY_HEADER_LEN {
                    return Err(CryptorError::MessageTooShort);
                }
                let mut iv = [0u8; IV_LEN];
                iv.copy_from_slice(&bytes[2..KEY_HEADER_LEN]);
                Ok(Self::Keys { iv })
            }
            OPTIONS_PASSWORD => {
                if bytes.len() != PASSWORD_HEADER_LEN {
                    return Err(CryptorError::MessageTooShort);
                }
                let mut encryption_salt = [0u8; SALT_LEN];
                encryption_salt.copy_from_slice(&bytes[2..2 + SALT_LEN]);
                let mut hmac_salt = [0u8; SALT_LEN];
                hmac_salt.copy_from_slice(&bytes[2 + SALT_LEN..2 + 2 * SALT_LEN]);
                let mut iv = [0u8; IV_LEN];
                iv.copy_from_slice(&bytes[2 + 2 * SALT_LEN..PASSWORD_HEADER_LEN]);
                Ok(Self::Password {
                    encryption_salt,
                    hmac_salt,
                    iv,
                })
            }
            _ => Err(CryptorError::UnknownHeader),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
