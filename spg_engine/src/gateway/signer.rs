//! Signing and verification of gateway payloads.
//!
//! `tag = base64(digest(secret || payload || secret))`. Verification recomputes the tag and compares in constant
//! time.
use std::{fmt::Display, str::FromStr};

use sha1::{Digest, Sha1};
use sha2::Sha256;
use spg_common::Secret;
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// The digest the gateway's v3 protocol uses.
    #[default]
    Sha1,
    Sha256,
}

impl Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sha1 => write!(f, "sha1"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Unsupported signature algorithm: {0}")]
pub struct UnsupportedAlgorithm(String);

impl FromStr for SignatureAlgorithm {
    type Err = UnsupportedAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(UnsupportedAlgorithm(other.to_string())),
        }
    }
}

fn wrapped_digest<D: Digest>(secret: &str, payload: &str) -> Vec<u8> {
    let mut hasher = D::new();
    hasher.update(secret.as_bytes());
    hasher.update(payload.as_bytes());
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}

pub fn sign(algorithm: SignatureAlgorithm, secret: &str, payload: &str) -> String {
    let digest = match algorithm {
        SignatureAlgorithm::Sha1 => wrapped_digest::<Sha1>(secret, payload),
        SignatureAlgorithm::Sha256 => wrapped_digest::<Sha256>(secret, payload),
    };
    base64::encode(digest)
}

pub fn verify(algorithm: SignatureAlgorithm, secret: &str, payload: &str, signature: &str) -> bool {
    let expected = sign(algorithm, secret, payload);
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}

/// Holds the merchant's private key so that callers never need to handle it directly.
#[derive(Clone, Debug)]
pub struct GatewaySigner {
    algorithm: SignatureAlgorithm,
    secret: Secret<String>,
}

impl GatewaySigner {
    pub fn new(algorithm: SignatureAlgorithm, secret: Secret<String>) -> Self {
        Self { algorithm, secret }
    }

    pub fn sign(&self, payload: &str) -> String {
        sign(self.algorithm, self.secret.reveal(), payload)
    }

    pub fn verify(&self, payload: &str, signature: &str) -> bool {
        verify(self.algorithm, self.secret.reveal(), payload, signature)
    }
}
