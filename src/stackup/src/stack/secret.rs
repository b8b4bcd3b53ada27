//! Random secret token for services that need a generated key.

use rand::RngCore;

/// 32 random bytes, hex-encoded. A fresh token per run; the materializer
/// renders it into the descriptor, never logs it.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
