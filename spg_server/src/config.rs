use std::env;

use log::*;
use spg_common::{parse_boolean_flag, Secret, DEFAULT_CURRENCY_CODE};
use spg_engine::gateway::{GatewayConfig, SignatureAlgorithm};

use crate::errors::ServerError;

const DEFAULT_SPG_HOST: &str = "127.0.0.1";
const DEFAULT_SPG_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/spg_store.db";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Payment gateway credentials and endpoints
    pub gateway: GatewayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SPG_HOST.to_string(),
            port: DEFAULT_SPG_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SPG_HOST").ok().unwrap_or_else(|| DEFAULT_SPG_HOST.into());
        let port = env::var("SPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SPG_PORT. {e} Using the default, {DEFAULT_SPG_PORT}, instead."
                    );
                    DEFAULT_SPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SPG_PORT);
        let database_url = env::var("SPG_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ SPG_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let public_url = env::var("SPG_PUBLIC_URL").ok().unwrap_or_else(|| {
            let url = format!("http://{host}:{port}");
            warn!(
                "🪛️ SPG_PUBLIC_URL is not set. The gateway will be told to call back to {url}, which is probably \
                 not reachable from the internet."
            );
            url
        });
        let gateway = gateway_config_from_env(public_url);
        Self { host, port, database_url, gateway }
    }

    /// Refuses configurations that cannot take payments. There are no default keys.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.gateway.public_key.trim().is_empty() {
            return Err(ServerError::ConfigurationError("SPG_GATEWAY_PUBLIC_KEY is not set".into()));
        }
        if self.gateway.private_key.is_blank() {
            return Err(ServerError::ConfigurationError("SPG_GATEWAY_PRIVATE_KEY is not set".into()));
        }
        if self.gateway.sandbox {
            warn!("🪛️ The payment gateway is in SANDBOX mode. No real payments will be taken.");
        }
        Ok(())
    }
}

fn gateway_config_from_env(public_url: String) -> GatewayConfig {
    let defaults = GatewayConfig::default();
    let public_key = env::var("SPG_GATEWAY_PUBLIC_KEY").ok().unwrap_or_else(|| {
        error!("🪛️ SPG_GATEWAY_PUBLIC_KEY is not set. Please set it to the merchant public key for the gateway.");
        String::default()
    });
    let private_key = env::var("SPG_GATEWAY_PRIVATE_KEY").ok().unwrap_or_else(|| {
        error!("🪛️ SPG_GATEWAY_PRIVATE_KEY is not set. Please set it to the merchant signing key for the gateway.");
        String::default()
    });
    let sandbox = parse_boolean_flag(env::var("SPG_GATEWAY_SANDBOX").ok(), false);
    let currency = env::var("SPG_GATEWAY_CURRENCY").ok().unwrap_or_else(|| DEFAULT_CURRENCY_CODE.to_string());
    let checkout_url = env::var("SPG_GATEWAY_CHECKOUT_URL").ok().unwrap_or(defaults.checkout_url);
    let api_version = env::var("SPG_GATEWAY_API_VERSION").ok().unwrap_or(defaults.api_version);
    let signature_algorithm = env::var("SPG_GATEWAY_SIGNATURE_ALGORITHM")
        .ok()
        .map(|s| {
            s.parse::<SignatureAlgorithm>().unwrap_or_else(|e| {
                error!("🪛️ {e}. Using the default, {}, instead.", SignatureAlgorithm::default());
                SignatureAlgorithm::default()
            })
        })
        .unwrap_or_default();
    info!("🪛️ Gateway: {checkout_url} (API v{api_version}), {currency}, {signature_algorithm} signatures");
    GatewayConfig {
        public_key,
        private_key: Secret::new(private_key),
        sandbox,
        currency,
        api_version,
        checkout_url,
        public_url,
        signature_algorithm,
    }
}
