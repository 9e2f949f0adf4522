//! Incremental AES-256-CBC with PKCS#7 padding.
//!
//! This module provides:
//! - [`CipherEncryptor`] — streaming CBC encryption, padding emitted at `finish`
//! - [`CipherDecryptor`] — streaming CBC decryption that withholds the final
//!   block from `update` so the padding can be stripped at `finish`
//!
//! The wrappers localize the block-cipher library choice: `ring` covers the
//! MAC and KDF primitives elsewhere in this crate but has no CBC mode, so
//! the cipher layer sits on the `aes` and `cbc` crates.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::Aes256;
use thiserror::Error;

use crate::format::{BLOCK_LEN, IV_LEN, KEY_LEN};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Failure inside the block-cipher layer: the ciphertext was not a whole
/// positive number of blocks, or the final block's padding is malformed.
///
/// Never surfaced through the streaming API — the decryption engine
/// re-maps it to [`CryptorError::HmacMismatch`](crate::CryptorError) so a
/// padding failure is indistinguishable from a MAC failure.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("ciphertext is not block-aligned or its padding is malformed")]
pub struct BlockCipherError;

// ---------------------------------------------------------------------------
// Encryption
// ---------------------------------------------------------------------------

/// Stateful AES-256-CBC encryptor.
///
/// `update` emits every whole block it can; sub-block remainders wait in a
/// pending buffer. `finish` applies PKCS#7 — always at least one padding
/// byte, a full padding block when the plaintext is block-aligned — and
/// emits the final block. Consuming `finish` makes reuse unrepresentable.
pub struct CipherEncryptor {
    cipher: Aes256CbcEnc,
    pending: Vec<u8>,
}

impl CipherEncryptor {
    /// Start an encryption stream under `key` and `iv`.
    #[must_use]
    pub fn new(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN]) -> Self {
        Self {
            cipher: Aes256CbcEnc::new(key.into(), iv.into()),
            pending: Vec::with_capacity(BLOCK_LEN),
        }
    }

    /// Encrypt as many whole blocks as `data` completes, returning them.
    pub fn update(&mut self, data: &[u8]) -> Vec<u8> {
        self.pending.extend_from_slice(data);
        let whole = self.pending.len().saturating_sub(self.pending.len() % BLOCK_LEN);
        let mut out: Vec<u8> = self.pending.drain(..whole).collect();
        for block in out.chunks_exact_mut(BLOCK_LEN) {
            self.cipher.encrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        out
    }

    /// Pad the remainder and emit the final block.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        let used = self.pending.len();
        debug_assert!(used < BLOCK_LEN);
        let pad = BLOCK_LEN.saturating_sub(used) as u8;

        let mut block = [pad; BLOCK_LEN];
        block[..used].copy_from_slice(&self.pending);
        self.cipher
            .encrypt_block_mut(GenericArray::from_mut_slice(&mut block));
        block.to_vec()
    }
}

// ---------------------------------------------------------------------------
// Decryption
// ---------------------------------------------------------------------------

/// Stateful AES-256-CBC decryptor.
///
/// A block is only decrypted once at least one byte beyond it has arrived:
/// the last full block of the stream carries the padding and must be kept
/// for `finish`. For a valid block-aligned ciphertext exactly one block is
/// pending when `finish` runs.
pub struct CipherDecryptor {
    cipher: Aes256CbcDec,
    pending: Vec<u8>,
}

impl CipherDecryptor {
    /// Start a decryption stream under `key` and `iv`.
    #[must_use]
    pub fn new(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN]) -> Self {
        Self {
            cipher: Aes256CbcDec::new(key.into(), iv.into()),
            pending: Vec::with_capacity(2 * BLOCK_LEN),
        }
    }

    /// Decrypt every block that is provably not the final one.
    pub fn update(&mut self, data: &[u8]) -> Vec<u8> {
        self.pending.extend_from_slice(data);
        let safe_blocks = self.pending.len().saturating_sub(1) / BLOCK_LEN;
        let mut out: Vec<u8> = self.pending.drain(..safe_blocks * BLOCK_LEN).collect();
        for block in out.chunks_exact_mut(BLOCK_LEN) {
            self.cipher.decrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        out
    }

    /// Decrypt the withheld final block and strip its PKCS#7 padding.
    ///
    /// # Errors
    ///
    /// [`BlockCipherError`] when the stream was not a whole positive number
    /// of blocks, or the padding bytes are inconsistent. In the decryption
    /// engine MAC verification precedes this call, so the byte-by-byte
    /// padding check is not an oracle.
    pub fn finish(mut self) -> Result<Vec<u8>, BlockCipherError> {
        if self.pending.len() != BLOCK_LEN {
            return Err(BlockCipherError);
        }
        let mut block = [0u8; BLOCK_LEN];
        block.copy_from_slice(&self.pending);
        self.cipher
            .decrypt_block_mut(GenericArray::from_mut_slice(&mut block));

        let pad = usize::from(block[BLOCK_LEN - 1]);
        if pad == 0 || pad > BLOCK_LEN {
            return Err(BlockCipherError);
        }
        let content = BLOCK_LEN.saturating_sub(pad);
        if !block[content..].iter().all(|&b| usize::from(b) == pad) {
            return Err(BlockCipherError);
        }
        Ok(block[..content].to_vec())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
