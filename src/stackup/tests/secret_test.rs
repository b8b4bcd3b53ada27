//! Tests for the generated secret token.

use stackup::stack::secret::generate_secret;

#[test]
fn secret_is_64_hex_chars() {
    let secret = generate_secret();
    assert_eq!(secret.len(), 64);
    assert!(hex::decode(&secret).is_ok());
}

#[test]
fn each_run_gets_a_fresh_secret() {
    assert_ne!(generate_secret(), generate_secret());
}
