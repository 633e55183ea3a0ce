//! Zeroizing byte container for plaintext and derived secrets
//!
//! Recovered packet payloads and shared secrets pass through this type so
//! that their backing memory is:
//! 1. Zeroed when dropped
//! 2. Never exposed through Debug output
//! 3. Locked against swapping where the platform allows it

use std::ops::{Deref, DerefMut};
use zeroize::Zeroize;

/// Byte buffer that zeroes its contents on drop
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SecureBytes(Vec<u8>);

impl SecureBytes {
    /// Take ownership of a vector and manage its memory securely
    pub fn new(data: Vec<u8>) -> Self {
        let secure = Self(data);
        secure.lock_memory();
        secure
    }

    /// Best-effort mlock; fails silently without the privilege
    #[cfg(unix)]
    fn lock_memory(&self) {
        unsafe {
            // Keeps decrypted payloads out of swap
            libc::mlock(self.0.as_ptr() as *const libc::c_void, self.0.len());
        }
    }

    #[cfg(not(unix))]
    fn lock_memory(&self) {}

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume self and return the inner vector
    /// WARNING: the returned Vec is no longer zeroed on drop
    pub fn into_vec(mut self) -> Vec<u8> {
        std::mem::take(&mut self.0)
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SecureBytes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for SecureBytes {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

// Secrets must never end up in logs via {:?}
impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.0.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}
