//! Cryptor error types for `chiffre-crypto-core`.

use thiserror::Error;

/// Errors produced while decoding or authenticating an envelope.
///
/// Every authenticity or integrity problem inside a well-formed v3 envelope
/// surfaces as [`HmacMismatch`](Self::HmacMismatch): a wrong password,
/// flipped bits, truncation inside the MAC region, and malformed final-block
/// padding are deliberately indistinguishable. Surfacing padding failures
/// separately would reopen the classic CBC padding oracle.
///
/// Encryption never fails for valid inputs, so this enum only appears on the
/// decryption side of the API.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CryptorError {
    /// MAC verification failed — tampering, truncation, a wrong password,
    /// or malformed final-block padding.
    #[error("HMAC verification failed")]
    HmacMismatch,

    /// The leading bytes of the stream match no registered format version.
    #[error("unrecognized envelope header")]
    UnknownHeader,

    /// The stream ended before a complete header arrived, or before enough
    /// ciphertext accumulated to carry a MAC.
    #[error("message too short for a complete envelope")]
    MessageTooShort,

    /// The envelope's options byte calls for the other credential kind —
    /// a password-mode envelope opened with a key pair, or vice versa.
    #[error("credential kind does not match the envelope header")]
    InvalidCredentialType,

    /// Buffer allocation failed. Reported, but not expected to be
    /// recoverable.
    #[error("memory allocation failed")]
    MemoryFailure,
}
