//! Transport ciphers for the SSH packet layer
//!
//! This module provides:
//! - The `chacha20-poly1305@openssh.com` AEAD cipher
//! - A capability catalog the transport layer consults during algorithm
//!   negotiation
//! - The `PacketCipher` seam the per-direction transport state runs against

mod catalog;
mod chacha;

pub use catalog::{CipherCatalog, CipherEntry};
pub use chacha::{ChaChaCipher, HALF_KEY_LEN, HEADER_LEN, KEY_LEN, NONCE_LEN, TAG_LEN};

use crate::error::Result;
use crate::secure_bytes::SecureBytes;

/// SSH algorithm identifier for the ChaCha20-Poly1305 transport cipher
pub const CHACHA20_POLY1305_OPENSSH: &str = "chacha20-poly1305@openssh.com";

/// Packet-level AEAD operations the transport layer needs
///
/// Implementations are stateless across calls; all nonce bookkeeping lives
/// with the caller, one counter per transport direction.
pub trait PacketCipher: Send + Sync {
    /// Encrypt a packet and sign it, returning `(enc_header || enc_payload, tag)`
    fn encrypt_and_sign(
        &self,
        header: &[u8; HEADER_LEN],
        payload: &[u8],
        nonce: &[u8; NONCE_LEN],
    ) -> (Vec<u8>, [u8; TAG_LEN]);

    /// Decrypt only the packet-length header, before the tag is known
    fn decrypt_header(
        &self,
        enc_header: &[u8; HEADER_LEN],
        nonce: &[u8; NONCE_LEN],
    ) -> [u8; HEADER_LEN];

    /// Verify the packet tag, then decrypt and return the payload
    fn verify_and_decrypt(
        &self,
        enc_header: &[u8; HEADER_LEN],
        enc_payload: &[u8],
        nonce: &[u8; NONCE_LEN],
        tag: &[u8; TAG_LEN],
    ) -> Result<SecureBytes>;
}

impl PacketCipher for ChaChaCipher {
    fn encrypt_and_sign(
        &self,
        header: &[u8; HEADER_LEN],
        payload: &[u8],
        nonce: &[u8; NONCE_LEN],
    ) -> (Vec<u8>, [u8; TAG_LEN]) {
        ChaChaCipher::encrypt_and_sign(self, header, payload, nonce)
    }

    fn decrypt_header(
        &self,
        enc_header: &[u8; HEADER_LEN],
        nonce: &[u8; NONCE_LEN],
    ) -> [u8; HEADER_LEN] {
        ChaChaCipher::decrypt_header(self, enc_header, nonce)
    }

    fn verify_and_decrypt(
        &self,
        enc_header: &[u8; HEADER_LEN],
        enc_payload: &[u8],
        nonce: &[u8; NONCE_LEN],
        tag: &[u8; TAG_LEN],
    ) -> Result<SecureBytes> {
        ChaChaCipher::verify_and_decrypt(self, enc_header, enc_payload, nonce, tag)
    }
}
