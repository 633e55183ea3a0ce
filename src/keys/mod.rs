//! Asymmetric key material for the SSH transport
//!
//! This module provides:
//! - EdDSA signing and verification keys for host/user authentication
//! - Curve25519 ephemeral Diffie-Hellman for key exchange
//!
//! Signature math and scalar multiplication live in ed25519-dalek and
//! x25519-dalek; these types only carry curve tags, raw encodings, and the
//! error surface the transport expects.

mod dh;
mod ed;

pub use dh::{Curve25519Dh, KexCurve, CURVE25519_PUBLIC_LEN};
pub use ed::{
    EdCurve, EdDsaPrivateKey, EdDsaPublicKey, ED25519_SEED_LEN, ED25519_SIGNATURE_LEN,
};
