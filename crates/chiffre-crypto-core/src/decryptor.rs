//! Streaming v3 envelope decryption — version dispatch and the v3 engine.
//!
//! This module provides:
//! - [`Decryptor`] — buffers just enough bytes to recognize the format,
//!   parses the header, then hands the stream to the version engine
//! - [`decrypt`] / [`decrypt_with_keys`] — one-shot conveniences
//!
//! The v3 engine binds a capacity-32 [`OverflowingBuffer`] to the cipher
//! and the MAC: every byte that overflows the buffer is fed to both, and
//! the last 32 bytes of the stream — whatever its length turns out to be —
//! are never decrypted. They are the candidate MAC, compared in constant
//! time at `finish` *before* any padding is examined, so wrong passwords,
//! tampering, and malformed padding are indistinguishable to an attacker.

use zeroize::Zeroizing;

use crate::buffer::OverflowingBuffer;
use crate::cipher::CipherDecryptor;
use crate::error::CryptorError;
use crate::format::{self, Header, HMAC_LEN, IV_LEN, KEY_HEADER_LEN, KEY_LEN, PASSWORD_HEADER_LEN};
use crate::kdf::{key_for_password, KeyMaterial};
use crate::mac::{constant_time_eq, HmacEngine};

// ---------------------------------------------------------------------------
// Format registry
// ---------------------------------------------------------------------------

/// A registered envelope format: how many leading bytes identify it, and
/// the predicate that does so.
struct FormatCandidate {
    preamble_len: usize,
    matches: fn(&[u8]) -> bool,
}

/// Formats probed by the dispatcher, in preference order. v3 is the only
/// format this crate accepts today; a future version appends a row here and
/// an engine arm in [`Credential::engine_for`].
const CANDIDATES: &[FormatCandidate] = &[FormatCandidate {
    preamble_len: 1,
    matches: |preamble| preamble[0] == format::VERSION,
}];

/// Probe the registry against the buffered prefix.
///
/// Returns `Ok(true)` when a candidate accepts its preamble, `Ok(false)`
/// when some candidate still needs more bytes to decide, and
/// [`CryptorError::UnknownHeader`] once every candidate has seen its full
/// preamble and rejected it.
fn probe(prefix: &[u8]) -> Result<bool, CryptorError> {
    let mut undecided = false;
    for candidate in CANDIDATES {
        if prefix.len() < candidate.preamble_len {
            undecided = true;
            continue;
        }
        if (candidate.matches)(&prefix[..candidate.preamble_len]) {
            return Ok(true);
        }
    }
    if undecided {
        Ok(false)
    } else {
        Err(CryptorError::UnknownHeader)
    }
}

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// What the caller supplied to open envelopes with.
enum Credential {
    /// UTF-8 password bytes, scrubbed on drop. Keys are derived once the
    /// header's salts arrive.
    Password(Zeroizing<Vec<u8>>),
    /// Caller-supplied key pair, scrubbed on drop.
    Keys {
        encryption_key: KeyMaterial,
        hmac_key: KeyMaterial,
    },
}

impl Credential {
    /// The options byte an envelope must carry to be opened with this
    /// credential.
    const fn options_byte(&self) -> u8 {
        match self {
            Self::Password(_) => format::OPTIONS_PASSWORD,
            Self::Keys { .. } => format::OPTIONS_KEY,
        }
    }

    /// The header length implied by this credential's mode.
    const fn header_len(&self) -> usize {
        match self {
            Self::Password(_) => PASSWORD_HEADER_LEN,
            Self::Keys { .. } => KEY_HEADER_LEN,
        }
    }

    /// Parse the complete header and build the v3 engine for it.
    fn engine_for(&self, raw_header: &[u8]) -> Result<EngineV3, CryptorError> {
        let header = Header::parse(raw_header)?;
        match (self, &header) {
            (Self::Password(password), Header::Password { encryption_salt, hmac_salt, iv }) => {
                let encryption_key = key_for_password(password, encryption_salt);
                let hmac_key = key_for_password(password, hmac_salt);
                Ok(EngineV3::new(
                    encryption_key.expose(),
                    hmac_key.expose(),
                    iv,
                    raw_header,
                ))
            }
            (
                Self::Keys {
                    encryption_key,
                    hmac_key,
                },
                Header::Keys { iv },
            ) => Ok(EngineV3::new(
                encryption_key.expose(),
                hmac_key.expose(),
                iv,
                raw_header,
            )),
            // The dispatcher matches the options byte against the
            // credential before parsing, so this arm is defensive only.
            _ => Err(CryptorError::InvalidCredentialType),
        }
    }
}

// ---------------------------------------------------------------------------
// v3 engine
// ---------------------------------------------------------------------------

/// Streaming v3 decryption behind a parsed header.
///
/// Invariant: every byte that entered the tail buffer and overflowed has
/// been fed to both the MAC and the cipher, in order; the retained tail is
/// the candidate MAC and is never decrypted.
struct EngineV3 {
    tail: OverflowingBuffer,
    cipher: CipherDecryptor,
    mac: HmacEngine,
}

impl EngineV3 {
    fn new(
        encryption_key: &[u8; KEY_LEN],
        hmac_key: &[u8; KEY_LEN],
        iv: &[u8; IV_LEN],
        raw_header: &[u8],
    ) -> Self {
        let mut mac = HmacEngine::new(hmac_key);
        // Mirror the encryptor's prepend-then-MAC discipline: the header
        // is absorbed before any ciphertext byte.
        mac.update(raw_header);
        Self {
            tail: OverflowingBuffer::new(HMAC_LEN),
            cipher: CipherDecryptor::new(encryption_key, iv),
            mac,
        }
    }

    fn update(&mut self, data: &[u8]) -> Vec<u8> {
        let overflow = self.tail.update(data);
        self.mac.update(&overflow);
        self.cipher.update(&overflow)
    }

    fn finish(self) -> Result<Vec<u8>, CryptorError> {
        let Self { tail, cipher, mac } = self;

        let received_mac = tail.finish();
        if received_mac.len() < HMAC_LEN {
            return Err(CryptorError::MessageTooShort);
        }
        let expected_mac = mac.finish();
        if !constant_time_eq(&expected_mac, &received_mac) {
            return Err(CryptorError::HmacMismatch);
        }
        // The MAC already verified, so a padding failure here means the
        // envelope was malformed at creation; it is still reported as a MAC
        // failure to keep the error surface single.
        cipher.finish().map_err(|_| CryptorError::HmacMismatch)
    }
}

// ---------------------------------------------------------------------------
// Dispatching decryptor
// ---------------------------------------------------------------------------

/// Streaming decryptor with format-version dispatch.
///
/// Bytes accumulate in a scratch buffer until the format is recognized and
/// a full header is present; the engine is then built and every remaining
/// and subsequent byte goes straight to it.
///
/// # Example
///
/// ```
/// use chiffre_crypto_core::{encrypt, Decryptor};
///
/// let envelope = encrypt(b"attack at dawn", "correct horse battery staple");
///
/// let mut decryptor = Decryptor::with_password("correct horse battery staple");
/// let mut plaintext = Vec::new();
/// for chunk in envelope.chunks(5) {
///     plaintext.extend(decryptor.update(chunk)?);
/// }
/// plaintext.extend(decryptor.finish()?);
/// assert_eq!(plaintext, b"attack at dawn");
/// # Ok::<(), chiffre_crypto_core::CryptorError>(())
/// ```
pub struct Decryptor {
    credential: Credential,
    scratch: Vec<u8>,
    engine: Option<EngineV3>,
}

impl Decryptor {
    /// Create a password-based decryptor.
    ///
    /// # Panics
    ///
    /// Panics if `password` is empty — rejecting empty passwords is part of
    /// the caller contract, not a recoverable runtime condition.
    #[must_use]
    pub fn with_password(password: &str) -> Self {
        assert!(!password.is_empty(), "password must not be empty");
        Self::new(Credential::Password(Zeroizing::new(
            password.as_bytes().to_vec(),
        )))
    }

    /// Create a key-based decryptor.
    #[must_use]
    pub fn with_keys(encryption_key: [u8; KEY_LEN], hmac_key: [u8; KEY_LEN]) -> Self {
        Self::new(Credential::Keys {
            encryption_key: KeyMaterial::from(encryption_key),
            hmac_key: KeyMaterial::from(hmac_key),
        })
    }

    fn new(credential: Credential) -> Self {
        Self {
            credential,
            scratch: Vec::new(),
            engine: None,
        }
    }

    /// Feed more envelope bytes, returning any plaintext that became
    /// available.
    ///
    /// # Errors
    ///
    /// - [`CryptorError::UnknownHeader`] if the leading bytes match no
    ///   registered format.
    /// - [`CryptorError::InvalidCredentialType`] if the envelope's options
    ///   byte calls for the other credential kind.
    /// - [`CryptorError::MemoryFailure`] if buffering the data fails.
    pub fn update(&mut self, data: &[u8]) -> Result<Vec<u8>, CryptorError> {
        if let Some(engine) = &mut self.engine {
            return Ok(engine.update(data));
        }
        self.scratch
            .try_reserve(data.len())
            .map_err(|_| CryptorError::MemoryFailure)?;
        self.scratch.extend_from_slice(data);
        self.try_start_engine()
    }

    /// Verify the MAC and release the final plaintext, consuming the
    /// decryptor.
    ///
    /// # Errors
    ///
    /// - [`CryptorError::HmacMismatch`] on any authenticity failure:
    ///   tampering, truncation inside the MAC region, a wrong password, or
    ///   malformed padding.
    /// - [`CryptorError::MessageTooShort`] if the stream ended before a
    ///   full header, or with fewer than 32 bytes after it.
    /// - [`CryptorError::UnknownHeader`] if the stream never matched a
    ///   registered format.
    pub fn finish(self) -> Result<Vec<u8>, CryptorError> {
        match self.engine {
            Some(engine) => engine.finish(),
            None => {
                // Re-probe so a prefix no format accepts still reports
                // UnknownHeader; anything else simply ended too early.
                probe(&self.scratch)?;
                Err(CryptorError::MessageTooShort)
            }
        }
    }

    /// Install the version engine once the preamble matches and the full
    /// header is buffered; returns plaintext recovered from any buffered
    /// post-header bytes.
    fn try_start_engine(&mut self) -> Result<Vec<u8>, CryptorError> {
        if !probe(&self.scratch)? {
            return Ok(Vec::new());
        }
        if self.scratch.len() < 2 {
            return Ok(Vec::new());
        }
        // The header length depends on the credential mode, so the options
        // byte is checked as soon as it arrives.
        if self.scratch[1] != self.credential.options_byte() {
            return Err(CryptorError::InvalidCredentialType);
        }
        let header_len = self.credential.header_len();
        if self.scratch.len() < header_len {
            return Ok(Vec::new());
        }

        let mut engine = self.credential.engine_for(&self.scratch[..header_len])?;
        let plaintext = engine.update(&self.scratch[header_len..]);
        self.engine = Some(engine);
        self.scratch = Vec::new();
        Ok(plaintext)
    }
}

// ---------------------------------------------------------------------------
// One-shot conveniences
// ---------------------------------------------------------------------------

/// Decrypt a password-based v3 envelope.
///
/// Equivalent to one `update` followed by `finish` on
/// [`Decryptor::with_password`].
///
/// # Errors
///
/// See [`Decryptor::update`] and [`Decryptor::finish`].
///
/// # Panics
///
/// Panics if `password` is empty.
pub fn decrypt(envelope: &[u8], password: &str) -> Result<Vec<u8>, CryptorError> {
    let mut decryptor = Decryptor::with_password(password);
    let mut plaintext = decryptor.update(envelope)?;
    plaintext.extend(decryptor.finish()?);
    Ok(plaintext)
}

/// Decrypt a key-based v3 envelope.
///
/// # Errors
///
/// See [`Decryptor::update`] and [`Decryptor::finish`].
pub fn decrypt_with_keys(
    envelope: &[u8],
    encryption_key: [u8; KEY_LEN],
    hmac_key: [u8; KEY_LEN],
) -> Result<Vec<u8>, CryptorError> {
    let mut decryptor = Decryptor::with_keys(encryption_key, hmac_key);
    let mut plaintext = decryptor.update(envelope)?;
    plaintext.extend(decryptor.finish()?);
    Ok(plaintext)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
