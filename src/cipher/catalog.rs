//! Cipher capability catalog for algorithm negotiation
//!
//! The transport layer owns one catalog instance, built once at startup.
//! Each entry pairs an SSH algorithm identifier with a constructor and an
//! availability flag, so negotiation can exclude ciphers the backend does
//! not support without ever attempting to construct them.

use super::chacha::{self, ChaChaCipher};
use super::{PacketCipher, CHACHA20_POLY1305_OPENSSH};
use crate::error::{Result, TransportCryptoError};

/// One negotiable cipher: identifier, key geometry, and constructor
pub struct CipherEntry {
    /// SSH algorithm name sent on the wire during negotiation
    pub id: &'static str,
    /// Key material the key exchange must produce for this cipher
    pub key_len: usize,
    /// Authentication tag appended to each packet
    pub tag_len: usize,
    available: bool,
    construct: fn(&[u8]) -> Result<Box<dyn PacketCipher>>,
}

impl CipherEntry {
    /// Whether the backend can actually instantiate this cipher
    pub fn is_available(&self) -> bool {
        self.available
    }
}

/// Table of every cipher this crate knows about
pub struct CipherCatalog {
    entries: Vec<CipherEntry>,
}

impl CipherCatalog {
    /// Build the catalog, querying backend availability once
    pub fn new() -> Self {
        Self {
            entries: vec![CipherEntry {
                id: CHACHA20_POLY1305_OPENSSH,
                key_len: chacha::KEY_LEN,
                tag_len: chacha::TAG_LEN,
                available: ChaChaCipher::is_available(),
                construct: |key| Ok(Box::new(ChaChaCipher::new(key)?)),
            }],
        }
    }

    /// Identifiers eligible for the negotiation list, in preference order
    pub fn supported(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|e| e.available)
            .map(|e| e.id)
            .collect()
    }

    /// Look up a cipher's negotiation parameters
    pub fn entry(&self, id: &str) -> Option<&CipherEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Instantiate a negotiated cipher from key-exchange output
    ///
    /// # Errors
    /// - UnknownCipher if the identifier was never in the table
    /// - BackendUnavailable if it is known but unsupported here
    /// - InvalidKeyLength if the key does not fit the cipher
    pub fn construct(&self, id: &str, key: &[u8]) -> Result<Box<dyn PacketCipher>> {
        let entry = self
            .entry(id)
            .ok_or_else(|| TransportCryptoError::UnknownCipher(id.to_string()))?;

        if !entry.available {
            return Err(TransportCryptoError::BackendUnavailable(id.to_string()));
        }

        (entry.construct)(key)
    }
}

impl Default for CipherCatalog {
    fn default() -> Self {
        Self::new()
    }
}
