//! SSH transport cipher and key-exchange primitives
//!
//! This crate provides the cryptographic layer an SSH transport sits on:
//! - The `chacha20-poly1305@openssh.com` packet cipher with its split-key,
//!   encrypt-header-first construction
//! - A cipher capability catalog for algorithm negotiation
//! - EdDSA and Curve25519 key shims for authentication and key exchange
//! - Per-direction packet sequence state that defends nonce uniqueness
//!
//! All primitives (ChaCha20, Poly1305, Ed25519, X25519) come from audited
//! external crates; this crate only adapts them to the SSH wire conventions.

pub mod cipher;
pub mod error;
pub mod keys;
pub mod secure_bytes;
pub mod transport;

pub use error::{Result, TransportCryptoError};
pub use secure_bytes::SecureBytes;
