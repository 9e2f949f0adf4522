//! Deterministic key-mode vector: all-zero keys, all-zero IV, one zero
//! block of plaintext.
//!
//! With a zero IV the first CBC input block equals the plaintext block, so
//! the first ciphertext block must be the published AES-256 single-block
//! zero vector. The trailing MAC is recomputed here with `ring` directly —
//! independently of the streaming engines — over the first 50 envelope
//! bytes (18-byte header + 32 bytes of ciphertext).

use chiffre_crypto_core::{
    decrypt_with_keys, CryptorError, Encryptor, BLOCK_LEN, HMAC_LEN, IV_LEN, KEY_HEADER_LEN,
    KEY_LEN,
};
use ring::hmac;

const ZERO_KEY: [u8; KEY_LEN] = [0x00; KEY_LEN];
const ZERO_IV: [u8; IV_LEN] = [0x00; IV_LEN];
const ZERO_BLOCK: [u8; BLOCK_LEN] = [0x00; BLOCK_LEN];

/// AES-256, all-zero key, all-zero input block (FIPS-197 derived,
/// independently published single-block vector).
const AES256_ZERO_BLOCK_CIPHERTEXT: [u8; BLOCK_LEN] = [
    0xdc, 0x95, 0xc0, 0x78, 0xa2, 0x40, 0x89, 0x89, 0xad, 0x48, 0xa2, 0x14, 0x92, 0x84, 0x20,
    0x87,
];

fn zero_vector_envelope() -> Vec<u8> {
    let mut encryptor = Encryptor::with_keys_and_iv(ZERO_KEY, ZERO_KEY, ZERO_IV);
    let mut envelope = encryptor.update(&ZERO_BLOCK);
    envelope.extend(encryptor.finish());
    envelope
}

#[test]
fn v3_header_bytes_are_exact() {
    let envelope = zero_vector_envelope();
    assert_eq!(envelope[0], 0x03);
    assert_eq!(envelope[1], 0x00);
    assert_eq!(&envelope[2..KEY_HEADER_LEN], &ZERO_IV);
}

#[test]
fn v3_envelope_is_header_two_blocks_and_mac() {
    let envelope = zero_vector_envelope();
    // One data block plus one full PKCS#7 padding block.
    assert_eq!(envelope.len(), KEY_HEADER_LEN + 2 * BLOCK_LEN + HMAC_LEN);
}

#[test]
fn v3_first_cipher_block_matches_published_aes256_vector() {
    let envelope = zero_vector_envelope();
    assert_eq!(
        &envelope[KEY_HEADER_LEN..KEY_HEADER_LEN + BLOCK_LEN],
        &AES256_ZERO_BLOCK_CIPHERTEXT
    );
}

#[test]
fn v3_trailing_mac_covers_the_first_fifty_bytes() {
    let envelope = zero_vector_envelope();
    let mac_offset = envelope.len() - HMAC_LEN;
    assert_eq!(mac_offset, 50);

    let key = hmac::Key::new(hmac::HMAC_SHA256, &ZERO_KEY);
    let expected = hmac::sign(&key, &envelope[..mac_offset]);
    assert_eq!(&envelope[mac_offset..], expected.as_ref());
}

#[test]
fn v3_round_trip_recovers_the_zero_block() {
    let envelope = zero_vector_envelope();
    assert_eq!(
        decrypt_with_keys(&envelope, ZERO_KEY, ZERO_KEY).expect("round-trip should succeed"),
        ZERO_BLOCK
    );
}

#[test]
fn v3_mac_is_position_dependent() {
    // Moving one ciphertext byte into the MAC region must not verify:
    // dropping the last byte shifts the candidate MAC window.
    let envelope = zero_vector_envelope();
    assert_eq!(
        decrypt_with_keys(&envelope[..envelope.len() - 1], ZERO_KEY, ZERO_KEY),
        Err(CryptorError::HmacMismatch)
    );
}
