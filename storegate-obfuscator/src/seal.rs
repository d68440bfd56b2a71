//! Value obfuscation using ChaCha20-Poly1305.
//!
//! The sealing key is derived from the installation identity: an
//! integrator-chosen salt, the app id, and the device fingerprint. Any of
//! the three changing (different app, different device, different build)
//! makes previously sealed values fail authentication — the contract a
//! cached license decision needs.
//!
//! Sealed format: `base64(nonce || ciphertext)`, nonce fresh per seal.

use crate::error::{ObfuscatorError, ObfuscatorResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of nonce in bytes (96 bits for ChaCha20-Poly1305).
const NONCE_SIZE: usize = 12;

/// Size of authentication tag in bytes.
const TAG_SIZE: usize = 16;

/// Minimum integrator salt length in bytes.
pub const SALT_MIN_LEN: usize = 8;

/// The derived sealing key, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
struct SealingKey {
    bytes: [u8; 32],
}

impl std::fmt::Debug for SealingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealingKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Seals and unseals string values bound to one installation identity.
#[derive(Debug, Clone)]
pub struct Obfuscator {
    key: SealingKey,
}

impl Obfuscator {
    /// Creates an obfuscator for the given installation identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the salt is shorter than [`SALT_MIN_LEN`].
    pub fn new(salt: &[u8], app_id: &str, device_id: &str) -> ObfuscatorResult<Self> {
        if salt.len() < SALT_MIN_LEN {
            return Err(ObfuscatorError::SaltTooShort {
                min: SALT_MIN_LEN,
                got: salt.len(),
            });
        }

        // Domain-separated hash of the three identity components.
        let mut hasher = Sha256::new();
        hasher.update(b"storegate-obfuscator-v1");
        hasher.update([salt.len() as u8]);
        hasher.update(salt);
        hasher.update([0u8]);
        hasher.update(app_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(device_id.as_bytes());
        let hash = hasher.finalize();

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);

        Ok(Self {
            key: SealingKey { bytes },
        })
    }

    /// Seals a value, producing a base64 string safe to write to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails.
    pub fn obfuscate(&self, value: &str) -> ObfuscatorResult<String> {
        let cipher = ChaCha20Poly1305::new(&self.key.bytes.into());

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, value.as_bytes())
            .map_err(|e| ObfuscatorError::Obfuscation(e.to_string()))?;

        let mut bytes = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        bytes.extend_from_slice(&nonce_bytes);
        bytes.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(&bytes))
    }

    /// Unseals a value previously produced by [`obfuscate`](Self::obfuscate)
    /// under the same installation identity.
    ///
    /// # Errors
    ///
    /// Returns [`ObfuscatorError::Validation`] if the value was tampered
    /// with or sealed under a different identity.
    pub fn unobfuscate(&self, sealed: &str) -> ObfuscatorResult<String> {
        let bytes = BASE64
            .decode(sealed)
            .map_err(|e| ObfuscatorError::Validation(format!("invalid base64: {e}")))?;

        if bytes.len() < NONCE_SIZE + TAG_SIZE {
            return Err(ObfuscatorError::Validation("sealed value too short".to_string()));
        }

        let cipher = ChaCha20Poly1305::new(&self.key.bytes.into());
        let nonce = Nonce::from_slice(&bytes[..NONCE_SIZE]);

        let plaintext = cipher.decrypt(nonce, &bytes[NONCE_SIZE..]).map_err(|_| {
            ObfuscatorError::Validation(
                "authentication failed (tampered, or wrong device or app)".to_string(),
            )
        })?;

        String::from_utf8(plaintext)
            .map_err(|e| ObfuscatorError::Validation(format!("invalid UTF-8: {e}")))
    }
}
