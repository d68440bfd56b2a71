//! Device fingerprinting for cache binding.
//!
//! The fingerprint ties obfuscated cache entries to the machine that wrote
//! them: a cache file copied to another device derives a different key and
//! fails to unseal. It combines several identifiers rather than relying on
//! any single one.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::env;

/// Information about the current device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Operating system name.
    pub os_name: String,
    /// CPU architecture.
    pub arch: String,
    /// Hostname.
    pub hostname: String,
}

impl DeviceInfo {
    /// Collects information about the current device.
    #[must_use]
    pub fn collect() -> Self {
        Self {
            os_name: env::consts::OS.to_string(),
            arch: env::consts::ARCH.to_string(),
            hostname: get_hostname(),
        }
    }
}

/// A stable identifier for this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFingerprint {
    /// Hash of the combined hardware identifiers.
    id: String,
}

impl DeviceFingerprint {
    /// Generates a fingerprint for the current device.
    ///
    /// Stable across reboots; changes if the machine identity changes
    /// (new machine id, renamed host).
    #[must_use]
    pub fn generate() -> Self {
        let combined = collect_identifiers().join("|");

        let mut hasher = Sha256::new();
        hasher.update(combined.as_bytes());
        let hash = hasher.finalize();

        Self {
            id: BASE64.encode(&hash[..16]),
        }
    }

    /// Returns the fingerprint ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns true if this fingerprint matches the current device.
    #[must_use]
    pub fn matches_current(&self) -> bool {
        self.id == Self::generate().id
    }
}

/// Collects the identifiers that feed the fingerprint hash.
fn collect_identifiers() -> Vec<String> {
    let mut ids = Vec::new();

    ids.push(env::consts::OS.to_string());
    ids.push(env::consts::ARCH.to_string());
    ids.push(get_hostname());

    if let Some(machine_id) = get_machine_id() {
        ids.push(machine_id);
    }

    if let Ok(user) = env::var("USER").or_else(|_| env::var("USERNAME")) {
        ids.push(user);
    }

    ids
}

fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Gets a platform-specific machine identifier, if one exists.
fn get_machine_id() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/etc/machine-id")
            .or_else(|_| std::fs::read_to_string("/var/lib/dbus/machine-id"))
            .ok()
            .map(|s| s.trim().to_string())
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .and_then(|output| {
                output
                    .lines()
                    .find(|l| l.contains("IOPlatformUUID"))
                    .and_then(|l| l.split('"').nth(3))
                    .map(String::from)
            })
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        None
    }
}
