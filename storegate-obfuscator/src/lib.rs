//! Obfuscated local storage of license state.
//!
//! Cached license decisions are an attractive tampering target: flipping a
//! "denied" to "allowed" in a plain-text cache defeats the whole check.
//! This crate seals cached values with ChaCha20-Poly1305 under a key
//! derived from the installation identity (integrator salt, app id, device
//! fingerprint), so a cache copied from another device or edited in place
//! fails authentication instead of parsing.
//!
//! # Components
//!
//! - [`DeviceFingerprint`]: a stable per-device identifier
//! - [`Obfuscator`]: seals/unseals individual string values
//! - [`ObfuscatedStore`]: a file-backed string map with every value sealed

mod device;
mod error;
mod seal;
mod store;

pub use device::{DeviceFingerprint, DeviceInfo};
pub use error::{ObfuscatorError, ObfuscatorResult};
pub use seal::{Obfuscator, SALT_MIN_LEN};
pub use store::ObfuscatedStore;
