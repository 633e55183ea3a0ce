//! Curve25519 Diffie-Hellman for SSH key exchange
//!
//! One ephemeral keypair per key exchange; the secret is consumed when the
//! shared secret is derived and never leaves the library. Curve448 is part
//! of the SSH algorithm space but has no audited backend here, so it is
//! only queryable as unavailable.

use rand::rngs::OsRng;
use x25519_dalek::{EphemeralSecret, PublicKey};

use crate::error::{Result, TransportCryptoError};
use crate::secure_bytes::SecureBytes;

/// X25519 public key length (32 bytes)
pub const CURVE25519_PUBLIC_LEN: usize = 32;

/// Which Montgomery curve a key exchange runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KexCurve {
    Curve25519,
    Curve448,
}

impl KexCurve {
    /// SSH key exchange algorithm name
    pub fn algorithm(&self) -> &'static str {
        match self {
            KexCurve::Curve25519 => "curve25519-sha256",
            KexCurve::Curve448 => "curve448-sha512",
        }
    }

    /// Whether the backend supports this exchange
    pub fn is_available(&self) -> bool {
        matches!(self, KexCurve::Curve25519)
    }
}

/// One side of a Curve25519 key exchange
pub struct Curve25519Dh {
    secret: EphemeralSecret,
    public: PublicKey,
}

impl Curve25519Dh {
    /// Generate a fresh ephemeral keypair
    pub fn new() -> Self {
        let secret = EphemeralSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// The public value to send in the key exchange message
    pub fn public_bytes(&self) -> [u8; CURVE25519_PUBLIC_LEN] {
        self.public.to_bytes()
    }

    /// Derive the shared secret from the peer's public value
    ///
    /// Consumes the keypair - each exchange uses a fresh one.
    ///
    /// # Errors
    /// Returns KeyExchangeFailed if the peer sent a low-order point and the
    /// shared secret degenerates to all zeroes.
    pub fn shared_secret(
        self,
        peer_public: &[u8; CURVE25519_PUBLIC_LEN],
    ) -> Result<SecureBytes> {
        let peer = PublicKey::from(*peer_public);
        let shared = self.secret.diffie_hellman(&peer);

        if !shared.was_contributory() {
            return Err(TransportCryptoError::KeyExchangeFailed(
                "Peer public key produced an all-zero shared secret".to_string(),
            ));
        }

        Ok(SecureBytes::new(shared.as_bytes().to_vec()))
    }
}

impl Default for Curve25519Dh {
    fn default() -> Self {
        Self::new()
    }
}
