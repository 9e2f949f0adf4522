//! Deterministic password-mode vectors.
//!
//! Shared parameters:
//!
//! ```text
//! password:  "thepassword"
//! enc salt:  00 01 02 03 04 05 06 07
//! hmac salt: 01 02 03 04 05 06 07 08
//! IV:        02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f 00 01
//! ```

use chiffre_crypto_core::{
    decrypt, CryptorError, Encryptor, HMAC_LEN, IV_LEN, PASSWORD_HEADER_LEN, SALT_LEN,
};

const PASSWORD: &str = "thepassword";
const ENC_SALT: [u8; SALT_LEN] = [0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
const HMAC_SALT: [u8; SALT_LEN] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
const IV: [u8; IV_LEN] = [
    0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x00,
    0x01,
];

/// The 34 header bytes every vector below must start with:
/// version ‖ options ‖ enc salt ‖ hmac salt ‖ IV.
const EXPECTED_HEADER: [u8; PASSWORD_HEADER_LEN] = [
    0x03, 0x01, // version, options
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, // enc salt
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, // hmac salt
    0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x00,
    0x01, // IV
];

fn vector_envelope(plaintext: &[u8]) -> Vec<u8> {
    let mut encryptor =
        Encryptor::with_password_and_parameters(PASSWORD, ENC_SALT, HMAC_SALT, IV);
    let mut envelope = encryptor.update(plaintext);
    envelope.extend(encryptor.finish());
    envelope
}

// -- Vector 1: empty plaintext --

#[test]
fn v1_empty_plaintext_envelope_shape() {
    let envelope = vector_envelope(b"");
    // One full padding block plus the MAC after the 34-byte header.
    assert_eq!(envelope.len(), PASSWORD_HEADER_LEN + 16 + HMAC_LEN);
    assert_eq!(&envelope[..PASSWORD_HEADER_LEN], &EXPECTED_HEADER);
    assert_eq!(decrypt(&envelope, PASSWORD), Ok(Vec::new()));
}

#[test]
fn v1_is_deterministic() {
    assert_eq!(vector_envelope(b""), vector_envelope(b""));
}

// -- Vector 2: "Hello, World!" (single block) --

#[test]
fn v2_hello_world_envelope_shape() {
    let envelope = vector_envelope(b"Hello, World!");
    // 13 plaintext bytes pad into a single 16-byte block.
    assert_eq!(envelope.len(), PASSWORD_HEADER_LEN + 16 + HMAC_LEN);
    assert_eq!(&envelope[..PASSWORD_HEADER_LEN], &EXPECTED_HEADER);
    assert_eq!(
        decrypt(&envelope, PASSWORD).expect("round-trip should succeed"),
        b"Hello, World!"
    );
}

#[test]
fn v2_empty_and_hello_share_everything_but_the_payload() {
    // Same credentials and IV: headers agree, ciphertext and MAC must not.
    let empty = vector_envelope(b"");
    let hello = vector_envelope(b"Hello, World!");
    assert_eq!(empty[..PASSWORD_HEADER_LEN], hello[..PASSWORD_HEADER_LEN]);
    assert_ne!(empty[PASSWORD_HEADER_LEN..], hello[PASSWORD_HEADER_LEN..]);
}

// -- Vector 4: tampering --

#[test]
fn v4_every_flipped_byte_fails_authentication() {
    let envelope = vector_envelope(b"Hello, World!");
    for index in 2..envelope.len() {
        let mut tampered = envelope.clone();
        tampered[index] ^= 0x01;
        assert_eq!(
            decrypt(&tampered, PASSWORD),
            Err(CryptorError::HmacMismatch),
            "byte {index}"
        );
    }
}

// -- Vector 5: truncation --

#[test]
fn v5_truncation_by_one_byte_fails_authentication() {
    let envelope = vector_envelope(b"Hello, World!");
    assert_eq!(
        decrypt(&envelope[..envelope.len() - 1], PASSWORD),
        Err(CryptorError::HmacMismatch)
    );
}

#[test]
fn v5_truncation_by_thirty_three_bytes_is_too_short() {
    let envelope = vector_envelope(b"Hello, World!");
    assert_eq!(envelope.len(), 82);
    // 49 remaining bytes: a full header but only 15 bytes after it.
    assert_eq!(
        decrypt(&envelope[..envelope.len() - 33], PASSWORD),
        Err(CryptorError::MessageTooShort)
    );
}

// -- Vector 6: wrong password --

#[test]
fn v6_wrong_password_fails_authentication() {
    let envelope = vector_envelope(b"Hello, World!");
    assert_eq!(
        decrypt(&envelope, "wrongpassword"),
        Err(CryptorError::HmacMismatch)
    );
}
