//! Shared test helpers for policy tests.

#![allow(dead_code)]

use storegate_obfuscator::{ObfuscatedStore, Obfuscator};
use storegate_policy::ServerManagedPolicy;
use tempfile::TempDir;

/// A fixed "now" for deterministic window arithmetic.
pub const NOW: i64 = 1_700_000_000;

pub fn make_store(dir: &TempDir) -> ObfuscatedStore {
    let obfuscator = Obfuscator::new(&[0x42; 16], "com.example.app", "test-device").unwrap();
    ObfuscatedStore::open(dir.path().join("license.cache"), obfuscator).unwrap()
}

pub fn make_policy(dir: &TempDir) -> ServerManagedPolicy {
    ServerManagedPolicy::open(make_store(dir))
}
