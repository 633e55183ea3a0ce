//! Per-direction packet sealing and opening
//!
//! The cipher itself is stateless; what makes nonce reuse impossible is
//! this layer. Each transport direction owns one `DirectionState` holding
//! the negotiated cipher and a monotone packet sequence. The sequence is
//! incremented exactly once per sealed or opened packet, survives rekeying,
//! and refuses to wrap.
//!
//! Wire format per packet: `enc_header(4) || enc_payload(N) || tag(16)`.

use crate::cipher::{PacketCipher, HEADER_LEN, NONCE_LEN, TAG_LEN};
use crate::error::{Result, TransportCryptoError};
use crate::secure_bytes::SecureBytes;

/// Sealing or opening state for one transport direction
///
/// The encrypt and decrypt directions of a connection each get their own
/// instance; their sequences are independent and never shared.
pub struct DirectionState {
    cipher: Box<dyn PacketCipher>,
    seq: u64,
}

impl DirectionState {
    /// Start a direction at sequence zero with a freshly keyed cipher
    pub fn new(cipher: Box<dyn PacketCipher>) -> Self {
        Self { cipher, seq: 0 }
    }

    /// Current packet sequence number
    pub fn sequence(&self) -> u64 {
        self.seq
    }

    /// Nonce for the packet currently being processed
    fn nonce(&self) -> [u8; NONCE_LEN] {
        self.seq.to_be_bytes()
    }

    /// Encrypt, sign and frame one outgoing packet
    ///
    /// # Errors
    /// Returns SequenceOverflow instead of ever reusing a nonce; the
    /// connection must rekey or close long before this triggers.
    pub fn seal(&mut self, header: &[u8; HEADER_LEN], payload: &[u8]) -> Result<Vec<u8>> {
        let next = self
            .seq
            .checked_add(1)
            .ok_or(TransportCryptoError::SequenceOverflow)?;

        let (mut packet, tag) = self.cipher.encrypt_and_sign(header, payload, &self.nonce());
        packet.extend_from_slice(&tag);

        self.seq = next;
        Ok(packet)
    }

    /// Read the packet length out of an incoming encrypted header
    ///
    /// Does not advance the sequence: the framing layer calls this first to
    /// learn how many bytes to read, then hands the full packet to `open`.
    pub fn peek_packet_length(&self, enc_header: &[u8; HEADER_LEN]) -> u32 {
        u32::from_be_bytes(self.cipher.decrypt_header(enc_header, &self.nonce()))
    }

    /// Verify and decrypt one incoming packet
    ///
    /// The sequence advances only on success. An authentication failure is
    /// fatal to the connection and must never be retried, so leaving the
    /// sequence untouched afterwards is irrelevant but keeps the state
    /// honest.
    pub fn open(
        &mut self,
        enc_header: &[u8; HEADER_LEN],
        enc_payload: &[u8],
        tag: &[u8; TAG_LEN],
    ) -> Result<SecureBytes> {
        let next = self
            .seq
            .checked_add(1)
            .ok_or(TransportCryptoError::SequenceOverflow)?;

        let payload = self
            .cipher
            .verify_and_decrypt(enc_header, enc_payload, &self.nonce(), tag)?;

        self.seq = next;
        Ok(payload)
    }

    /// Swap in a fresh cipher after key exchange
    ///
    /// Sequence numbers span rekeying: they continue from where the old
    /// keys left off.
    pub fn rekey(&mut self, cipher: Box<dyn PacketCipher>) {
        self.cipher = cipher;
    }
}
