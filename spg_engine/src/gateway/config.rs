use spg_common::{Secret, DEFAULT_CURRENCY_CODE};

use crate::{
    db_types::OrderId,
    gateway::{GatewaySigner, SignatureAlgorithm},
};

pub const DEFAULT_CHECKOUT_URL: &str = "https://www.liqpay.ua/api/3/checkout";
pub const DEFAULT_API_VERSION: &str = "3";
pub const DEFAULT_PUBLIC_URL: &str = "http://127.0.0.1:8360";

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// The merchant's public key, sent in the clear with every request.
    pub public_key: String,
    /// The shared signing secret.
    pub private_key: Secret<String>,
    /// When true, requests carry `sandbox=1` and the gateway takes no real money. Only ever set from configuration.
    pub sandbox: bool,
    pub currency: String,
    pub api_version: String,
    /// Where the browser posts the signed checkout form.
    pub checkout_url: String,
    /// The externally visible base URL of this storefront, used to build the return and callback URLs.
    pub public_url: String,
    pub signature_algorithm: SignatureAlgorithm,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            public_key: String::default(),
            private_key: Secret::default(),
            sandbox: false,
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            checkout_url: DEFAULT_CHECKOUT_URL.to_string(),
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            signature_algorithm: SignatureAlgorithm::default(),
        }
    }
}

impl GatewayConfig {
    pub fn signer(&self) -> GatewaySigner {
        GatewaySigner::new(self.signature_algorithm, self.private_key.clone())
    }

    /// The page the customer's browser is sent back to after paying
    pub fn result_url(&self, order_id: OrderId) -> String {
        format!("{}/payment/return/{}", self.base_url(), order_id.value())
    }

    /// The webhook the gateway posts payment notifications to
    pub fn server_url(&self) -> String {
        format!("{}/payment/callback", self.base_url())
    }

    fn base_url(&self) -> &str {
        self.public_url.trim_end_matches('/')
    }
}
