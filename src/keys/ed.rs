//! Edwards-curve DSA keys for SSH authentication
//!
//! Thin shims over ed25519-dalek, keyed by a curve tag rather than a class
//! hierarchy. Ed448 is part of the SSH algorithm space and is kept in the
//! tag so negotiation can name it, but this backend has no audited
//! implementation for it - constructing an Ed448 key reports
//! BackendUnavailable instead.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::error::{Result, TransportCryptoError};
use crate::secure_bytes::SecureBytes;

/// Ed25519 private key seed length (32 bytes)
pub const ED25519_SEED_LEN: usize = 32;

/// Ed25519 signature length (64 bytes)
pub const ED25519_SIGNATURE_LEN: usize = 64;

/// Which Edwards curve a key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdCurve {
    Ed25519,
    Ed448,
}

impl EdCurve {
    /// SSH public key algorithm name
    pub fn algorithm(&self) -> &'static str {
        match self {
            EdCurve::Ed25519 => "ssh-ed25519",
            EdCurve::Ed448 => "ssh-ed448",
        }
    }

    /// Whether the backend can construct keys on this curve
    pub fn is_available(&self) -> bool {
        matches!(self, EdCurve::Ed25519)
    }

    /// Private key seed length in bytes
    pub fn seed_len(&self) -> usize {
        match self {
            EdCurve::Ed25519 => 32,
            EdCurve::Ed448 => 57,
        }
    }

    /// Signature length in bytes
    pub fn signature_len(&self) -> usize {
        match self {
            EdCurve::Ed25519 => 64,
            EdCurve::Ed448 => 114,
        }
    }
}

/// An EdDSA private key, tagged by curve
pub enum EdDsaPrivateKey {
    Ed25519(SigningKey),
}

impl EdDsaPrivateKey {
    /// Generate a new random key on the given curve
    pub fn generate(curve: EdCurve) -> Result<Self> {
        match curve {
            EdCurve::Ed25519 => Ok(Self::Ed25519(SigningKey::generate(&mut OsRng))),
            EdCurve::Ed448 => Err(TransportCryptoError::BackendUnavailable(
                curve.algorithm().to_string(),
            )),
        }
    }

    /// Reconstruct a key from its raw seed encoding
    pub fn from_bytes(curve: EdCurve, seed: &[u8]) -> Result<Self> {
        match curve {
            EdCurve::Ed25519 => {
                if seed.len() != ED25519_SEED_LEN {
                    return Err(TransportCryptoError::KeyGenerationFailed(format!(
                        "Invalid Ed25519 seed length: expected {}, got {}",
                        ED25519_SEED_LEN,
                        seed.len()
                    )));
                }

                let mut seed_bytes = [0u8; ED25519_SEED_LEN];
                seed_bytes.copy_from_slice(seed);
                let signing = SigningKey::from_bytes(&seed_bytes);
                seed_bytes.zeroize();

                Ok(Self::Ed25519(signing))
            }
            EdCurve::Ed448 => Err(TransportCryptoError::BackendUnavailable(
                curve.algorithm().to_string(),
            )),
        }
    }

    pub fn curve(&self) -> EdCurve {
        match self {
            Self::Ed25519(_) => EdCurve::Ed25519,
        }
    }

    /// Sign a block of data; signature length depends on the curve
    pub fn sign(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Ed25519(signing) => signing.sign(data).to_bytes().to_vec(),
        }
    }

    /// The matching public key
    pub fn public_key(&self) -> EdDsaPublicKey {
        match self {
            Self::Ed25519(signing) => EdDsaPublicKey::Ed25519(signing.verifying_key()),
        }
    }

    /// Raw public key encoding
    pub fn public_value(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(signing) => signing.verifying_key().to_bytes().to_vec(),
        }
    }

    /// Raw private seed encoding, in zeroizing memory
    pub fn private_value(&self) -> SecureBytes {
        match self {
            Self::Ed25519(signing) => SecureBytes::new(signing.to_bytes().to_vec()),
        }
    }
}

/// An EdDSA public key, tagged by curve
pub enum EdDsaPublicKey {
    Ed25519(VerifyingKey),
}

impl EdDsaPublicKey {
    /// Reconstruct a public key from its raw point encoding
    pub fn from_bytes(curve: EdCurve, public: &[u8]) -> Result<Self> {
        match curve {
            EdCurve::Ed25519 => {
                let point: [u8; 32] = public.try_into().map_err(|_| {
                    TransportCryptoError::KeyGenerationFailed(format!(
                        "Invalid Ed25519 public key length: expected 32, got {}",
                        public.len()
                    ))
                })?;

                let verifying = VerifyingKey::from_bytes(&point).map_err(|_| {
                    TransportCryptoError::KeyGenerationFailed(
                        "Invalid Ed25519 point encoding".to_string(),
                    )
                })?;

                Ok(Self::Ed25519(verifying))
            }
            EdCurve::Ed448 => Err(TransportCryptoError::BackendUnavailable(
                curve.algorithm().to_string(),
            )),
        }
    }

    pub fn curve(&self) -> EdCurve {
        match self {
            Self::Ed25519(_) => EdCurve::Ed25519,
        }
    }

    /// Check a signature over a block of data
    ///
    /// An invalid or malformed signature is an expected outcome, so this
    /// returns false rather than an error.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        match self {
            Self::Ed25519(verifying) => {
                let Ok(sig) = Signature::from_slice(signature) else {
                    return false;
                };
                verifying.verify(data, &sig).is_ok()
            }
        }
    }

    /// Raw point encoding
    pub fn public_value(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(verifying) => verifying.to_bytes().to_vec(),
        }
    }

    /// Public key as a single OpenSSH authorized_keys line
    /// Format: "<algorithm> <base64-encoded-blob> <comment>"
    pub fn to_openssh(&self, comment: &str) -> String {
        let algorithm = self.curve().algorithm().as_bytes();
        let point = self.public_value();

        // Blob layout: [u32 len][algorithm name][u32 len][raw point]
        let mut blob = Vec::with_capacity(8 + algorithm.len() + point.len());
        blob.extend_from_slice(&(algorithm.len() as u32).to_be_bytes());
        blob.extend_from_slice(algorithm);
        blob.extend_from_slice(&(point.len() as u32).to_be_bytes());
        blob.extend_from_slice(&point);

        use base64::{engine::general_purpose::STANDARD, Engine as _};
        format!(
            "{} {} {}",
            self.curve().algorithm(),
            STANDARD.encode(&blob),
            comment
        )
    }
}
