//! # Gateway protocol
//!
//! Everything needed to talk to the external payment gateway, without any I/O:
//!
//! * [`codec`] turns request and notification records into the opaque `data` string and back.
//! * [`signer`] computes and checks the `signature` that accompanies every `data` string.
//! * [`reference`] generates the per-order token the gateway knows our orders by.
//! * [`objects`] holds the wire records and the signed checkout bundle handed to the presentation layer.
//!
//! The gateway signs `base64(digest(private_key + data + private_key))`. This construction is kept for wire
//! compatibility only.
pub mod codec;
mod config;
pub mod objects;
pub mod reference;
pub mod signer;

pub use codec::{decode, encode, DecodeError, EncodeError};
pub use config::GatewayConfig;
pub use objects::{CheckoutForm, FormField, GatewayNotification, GatewayRequest, SignedCheckout};
pub use reference::{GatewayReference, ReferenceError};
pub use signer::{sign, verify, GatewaySigner, SignatureAlgorithm};
