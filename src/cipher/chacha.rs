//! ChaCha20-Poly1305 Transport Cipher
//!
//! Implements the `chacha20-poly1305@openssh.com` construction used by the
//! SSH transport layer. Unlike the IETF AEAD, it runs two independent
//! ChaCha20 instances from one 64-byte key:
//! - The first half of the key encrypts packet payloads (counter 1) and
//!   derives the per-packet Poly1305 key (counter 0)
//! - The second half encrypts only the 4-byte packet-length header
//!   (counter 0), so framing can be read before the tag is verified
//!
//! The actual stream cipher and one-time MAC come from the audited
//! `chacha20` and `poly1305` crates; this module only does key splitting,
//! counter selection, and tag bookkeeping.

use chacha20::cipher::{KeyIvInit, StreamCipher, StreamCipherSeek};
use chacha20::ChaCha20Legacy;
use poly1305::universal_hash::KeyInit;
use poly1305::Poly1305;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{Result, TransportCryptoError};
use crate::secure_bytes::SecureBytes;

/// Combined key length: payload half plus header half (512 bits)
pub const KEY_LEN: usize = 64;

/// Length of each key half (256 bits)
pub const HALF_KEY_LEN: usize = 32;

/// Nonce length: the packet sequence number as 8 bytes
pub const NONCE_LEN: usize = 8;

/// Authentication tag length (128 bits)
pub const TAG_LEN: usize = 16;

/// Encrypted packet-length header, always exactly 4 bytes
pub const HEADER_LEN: usize = 4;

/// ChaCha20 keystream block size; counter n starts n blocks in
const CHACHA_BLOCK_LEN: u64 = 64;

/// Per-packet Poly1305 key, taken from keystream block 0
const POLY1305_KEY_LEN: usize = 32;

/// Run ChaCha20 over `data` in place with the given 64-bit block counter
///
/// The original ChaCha20 variant (8-byte nonce, 8-byte little-endian
/// counter) is what the SSH cipher uses; counter 0 is reserved for the
/// header and the Poly1305 key, counter 1 for the payload.
fn chacha20_xor(key: &[u8; HALF_KEY_LEN], data: &mut [u8], nonce: &[u8; NONCE_LEN], ctr: u64) {
    let mut cipher = ChaCha20Legacy::new(key.into(), nonce.into());
    cipher.seek(ctr * CHACHA_BLOCK_LEN);
    cipher.apply_keystream(data);
}

/// SSH ChaCha20-Poly1305 cipher for one transport direction
///
/// Stateless apart from the two key halves fixed at construction, so a
/// single instance may be used from multiple tasks on distinct packets.
///
/// # Security Notes
/// - The caller owns nonce uniqueness: reusing a nonce under the same key
///   destroys both confidentiality and forgery resistance. The transport
///   layer must feed a strictly increasing packet counter per direction
///   (see [`DirectionState`](crate::transport::DirectionState)).
/// - Rekeying constructs a new instance; key halves are zeroed on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct ChaChaCipher {
    /// key[0..32]: payload encryption and Poly1305 key derivation
    payload_key: [u8; HALF_KEY_LEN],
    /// key[32..64]: packet-length header encryption only
    header_key: [u8; HALF_KEY_LEN],
}

impl ChaChaCipher {
    /// Split a 64-byte transport key into its two halves
    ///
    /// The byte layout (first half payload, second half header) is fixed
    /// by the wire protocol and must not change.
    ///
    /// # Errors
    /// Returns InvalidKeyLength for anything other than 64 bytes
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() != KEY_LEN {
            return Err(TransportCryptoError::InvalidKeyLength {
                expected: KEY_LEN,
                actual: key.len(),
            });
        }

        let mut payload_key = [0u8; HALF_KEY_LEN];
        let mut header_key = [0u8; HALF_KEY_LEN];
        payload_key.copy_from_slice(&key[..HALF_KEY_LEN]);
        header_key.copy_from_slice(&key[HALF_KEY_LEN..]);

        Ok(Self {
            payload_key,
            header_key,
        })
    }

    /// Whether the host backend supports this cipher
    ///
    /// The software implementation is always compiled in, but negotiation
    /// queries this rather than assuming it.
    pub fn is_available() -> bool {
        true
    }

    /// Encrypt a packet and compute its authentication tag
    ///
    /// # Arguments
    /// * `header` - 4-byte plaintext packet-length field
    /// * `payload` - packet payload, may be empty
    /// * `nonce` - 8-byte packet sequence number, never reused per key
    ///
    /// # Returns
    /// `(enc_header || enc_payload, tag)`. Deterministic for fixed inputs;
    /// length-preserving apart from the separate 16-byte tag.
    pub fn encrypt_and_sign(
        &self,
        header: &[u8; HEADER_LEN],
        payload: &[u8],
        nonce: &[u8; NONCE_LEN],
    ) -> (Vec<u8>, [u8; TAG_LEN]) {
        let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
        out.extend_from_slice(header);
        chacha20_xor(&self.header_key, &mut out[..HEADER_LEN], nonce, 0);

        out.extend_from_slice(payload);
        chacha20_xor(&self.payload_key, &mut out[HEADER_LEN..], nonce, 1);

        let tag = self.packet_tag(&out, nonce);
        (out, tag)
    }

    /// Decrypt the packet-length header on its own
    ///
    /// The framing layer has to learn the packet length before the rest of
    /// the packet (and therefore the tag) has arrived, so this runs without
    /// authentication. The recovered length is only trusted to size the
    /// read; the full packet is still verified before use.
    pub fn decrypt_header(
        &self,
        enc_header: &[u8; HEADER_LEN],
        nonce: &[u8; NONCE_LEN],
    ) -> [u8; HEADER_LEN] {
        let mut header = *enc_header;
        chacha20_xor(&self.header_key, &mut header, nonce, 0);
        header
    }

    /// Verify a packet's tag, then decrypt its payload
    ///
    /// The tag is recomputed over `enc_header || enc_payload` and compared
    /// in constant time. Nothing is decrypted unless the tag matches.
    ///
    /// # Errors
    /// Returns AuthenticationFailed on tag mismatch, with no plaintext and
    /// no detail about why - success or failure is the only observable.
    /// The transport must treat this as fatal and never retry.
    pub fn verify_and_decrypt(
        &self,
        enc_header: &[u8; HEADER_LEN],
        enc_payload: &[u8],
        nonce: &[u8; NONCE_LEN],
        tag: &[u8; TAG_LEN],
    ) -> Result<SecureBytes> {
        let mut signed = Vec::with_capacity(HEADER_LEN + enc_payload.len());
        signed.extend_from_slice(enc_header);
        signed.extend_from_slice(enc_payload);

        let expected = self.packet_tag(&signed, nonce);
        if !bool::from(expected[..].ct_eq(&tag[..])) {
            return Err(TransportCryptoError::AuthenticationFailed);
        }

        let mut plaintext = signed.split_off(HEADER_LEN);
        chacha20_xor(&self.payload_key, &mut plaintext, nonce, 1);
        Ok(SecureBytes::new(plaintext))
    }

    /// Compute the Poly1305 tag for a packet's encrypted bytes
    ///
    /// The one-time key is keystream block 0 of the payload key, so it is
    /// unique per nonce and never touches the header key.
    fn packet_tag(&self, data: &[u8], nonce: &[u8; NONCE_LEN]) -> [u8; TAG_LEN] {
        let mut poly_key = [0u8; POLY1305_KEY_LEN];
        chacha20_xor(&self.payload_key, &mut poly_key, nonce, 0);

        let tag = Poly1305::new(poly1305::Key::from_slice(&poly_key)).compute_unpadded(data);
        poly_key.zeroize();
        tag.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{thread_rng, Rng};

    const TEST_KEY: [u8; KEY_LEN] = [0x42u8; KEY_LEN];
    const TEST_NONCE: [u8; NONCE_LEN] = [0, 0, 0, 0, 0, 0, 0, 7];

    fn cipher() -> ChaChaCipher {
        ChaChaCipher::new(&TEST_KEY).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let header = [0, 0, 0, 28];
        let payload = b"this is the packet payload..";

        let (ciphertext, tag) = cipher().encrypt_and_sign(&header, payload, &TEST_NONCE);
        assert_eq!(ciphertext.len(), HEADER_LEN + payload.len());

        let enc_header: [u8; HEADER_LEN] = ciphertext[..HEADER_LEN].try_into().unwrap();
        let recovered = cipher()
            .verify_and_decrypt(&enc_header, &ciphertext[HEADER_LEN..], &TEST_NONCE, &tag)
            .unwrap();

        assert_eq!(&*recovered, payload);
        assert_eq!(cipher().decrypt_header(&enc_header, &TEST_NONCE), header);
    }

    #[test]
    fn test_zero_length_payload() {
        let header = [0, 0, 0, 0];

        let (ciphertext, tag) = cipher().encrypt_and_sign(&header, b"", &TEST_NONCE);
        assert_eq!(ciphertext.len(), HEADER_LEN);

        let enc_header: [u8; HEADER_LEN] = ciphertext[..HEADER_LEN].try_into().unwrap();
        let recovered = cipher()
            .verify_and_decrypt(&enc_header, &[], &TEST_NONCE, &tag)
            .unwrap();

        assert!(recovered.is_empty());
    }

    #[test]
    fn test_deterministic_for_fixed_inputs() {
        let header = [0, 0, 0, 12];
        let payload = b"same payload";

        let (ct1, tag1) = cipher().encrypt_and_sign(&header, payload, &TEST_NONCE);
        let (ct2, tag2) = cipher().encrypt_and_sign(&header, payload, &TEST_NONCE);

        assert_eq!(ct1, ct2);
        assert_eq!(tag1, tag2);
    }

    #[test]
    fn test_different_nonces_produce_different_ciphertext() {
        let header = [0, 0, 0, 12];
        let payload = b"same payload";
        let other_nonce = [0, 0, 0, 0, 0, 0, 0, 8];

        let (ct1, _) = cipher().encrypt_and_sign(&header, payload, &TEST_NONCE);
        let (ct2, _) = cipher().encrypt_and_sign(&header, payload, &other_nonce);

        assert_ne!(ct1, ct2);
    }

    #[test]
    fn test_bit_flips_are_detected() {
        let header = [0, 0, 0, 16];
        let payload = b"tamper detection";
        let (ciphertext, tag) = cipher().encrypt_and_sign(&header, payload, &TEST_NONCE);

        let mut rng = thread_rng();
        for _ in 0..64 {
            let mut ct = ciphertext.clone();
            let mut t = tag;

            // Flip one random bit somewhere in enc_header, enc_payload or tag
            let pos = rng.gen_range(0..ct.len() + t.len());
            let bit = 1u8 << rng.gen_range(0..8);
            if pos < ct.len() {
                ct[pos] ^= bit;
            } else {
                t[pos - ct.len()] ^= bit;
            }

            let enc_header: [u8; HEADER_LEN] = ct[..HEADER_LEN].try_into().unwrap();
            let result =
                cipher().verify_and_decrypt(&enc_header, &ct[HEADER_LEN..], &TEST_NONCE, &t);
            assert!(matches!(
                result,
                Err(TransportCryptoError::AuthenticationFailed)
            ));
        }
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let header = [0, 0, 0, 6];
        let (ciphertext, tag) = cipher().encrypt_and_sign(&header, b"secret", &TEST_NONCE);

        let other = ChaChaCipher::new(&[0x43u8; KEY_LEN]).unwrap();
        let enc_header: [u8; HEADER_LEN] = ciphertext[..HEADER_LEN].try_into().unwrap();
        let result = other.verify_and_decrypt(&enc_header, &ciphertext[HEADER_LEN..], &TEST_NONCE, &tag);

        assert!(result.is_err());
    }

    #[test]
    fn test_key_halves_are_independent() {
        let header = [0, 0, 0, 9];
        let payload = b"separated";

        let mut header_half_changed = TEST_KEY;
        header_half_changed[HALF_KEY_LEN] ^= 0xFF;
        let mut payload_half_changed = TEST_KEY;
        payload_half_changed[0] ^= 0xFF;

        let (base_ct, _) = cipher().encrypt_and_sign(&header, payload, &TEST_NONCE);
        let (hdr_ct, _) = ChaChaCipher::new(&header_half_changed)
            .unwrap()
            .encrypt_and_sign(&header, payload, &TEST_NONCE);
        let (pay_ct, _) = ChaChaCipher::new(&payload_half_changed)
            .unwrap()
            .encrypt_and_sign(&header, payload, &TEST_NONCE);

        // Changing the header half must not affect the payload bytes,
        // and changing the payload half must not affect the header bytes
        assert_eq!(&base_ct[HEADER_LEN..], &hdr_ct[HEADER_LEN..]);
        assert_ne!(&base_ct[..HEADER_LEN], &hdr_ct[..HEADER_LEN]);
        assert_eq!(&base_ct[..HEADER_LEN], &pay_ct[..HEADER_LEN]);
        assert_ne!(&base_ct[HEADER_LEN..], &pay_ct[HEADER_LEN..]);
    }

    #[test]
    fn test_invalid_key_length_rejected() {
        assert!(matches!(
            ChaChaCipher::new(&[0u8; 32]),
            Err(TransportCryptoError::InvalidKeyLength {
                expected: KEY_LEN,
                actual: 32
            })
        ));
        assert!(ChaChaCipher::new(&[0u8; 65]).is_err());
        assert!(ChaChaCipher::new(b"").is_err());
    }

    #[test]
    fn test_golden_vector_zero_key() {
        // Pinned against a reference implementation: all-zero key and
        // nonce, zero header, payload "ping"
        let cipher = ChaChaCipher::new(&[0u8; KEY_LEN]).unwrap();
        let nonce = [0u8; NONCE_LEN];

        let (ciphertext, tag) = cipher.encrypt_and_sign(&[0u8; HEADER_LEN], b"ping", &nonce);

        assert_eq!(hex::encode(&ciphertext), "76b8e0adef6e89d9");
        assert_eq!(hex::encode(tag), "0e594937cc78fda749411977daa5b18a");

        let enc_header: [u8; HEADER_LEN] = ciphertext[..HEADER_LEN].try_into().unwrap();
        let recovered = cipher
            .verify_and_decrypt(&enc_header, &ciphertext[HEADER_LEN..], &nonce, &tag)
            .unwrap();
        assert_eq!(&*recovered, b"ping");
    }

    #[test]
    fn test_header_decrypts_before_verification() {
        // Framing reads the length with only the first 4 bytes on hand
        let header = [0, 0, 1, 44];
        let (ciphertext, _) = cipher().encrypt_and_sign(&header, b"not yet received", &TEST_NONCE);

        let enc_header: [u8; HEADER_LEN] = ciphertext[..HEADER_LEN].try_into().unwrap();
        assert_eq!(cipher().decrypt_header(&enc_header, &TEST_NONCE), header);
    }
}
