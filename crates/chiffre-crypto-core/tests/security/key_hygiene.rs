//! Key material must never leak through diagnostic formatting.

use chiffre_crypto_core::{key_for_password, KeyMaterial};

#[test]
fn key_material_debug_and_display_are_masked() {
    let key = KeyMaterial::from([0xAB; 32]);
    assert_eq!(format!("{key:?}"), "KeyMaterial(***)");
    assert_eq!(key.to_string(), "KeyMaterial(***)");
}

#[test]
fn derived_key_formatting_reveals_no_bytes() {
    let key = key_for_password(b"hunter2", &[0x01; 8]);
    let debug = format!("{key:?}");
    // No byte of the actual key may appear in the output.
    for byte in key.expose() {
        assert!(
            !debug.contains(&format!("{byte:02x}")) || debug == "KeyMaterial(***)",
            "debug output must not embed key bytes"
        );
    }
    assert_eq!(debug, "KeyMaterial(***)");
}

#[test]
fn expose_returns_the_wrapped_bytes() {
    let key = KeyMaterial::new([0xC4; 32]);
    assert_eq!(key.expose(), &[0xC4; 32]);
}
