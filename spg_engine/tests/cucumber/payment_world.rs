use cucumber::World;
use log::*;
use spg_common::Secret;
use spg_engine::{
    gateway::{GatewayConfig, SignedCheckout},
    test_utils::prepare_env::{create_database, random_db_path, run_migrations},
    CallbackApi,
    CallbackOutcome,
    CheckoutApi,
    PaymentFlowError,
    SqliteDatabase,
};

pub const TEST_PRIVATE_KEY: &str = "cucumber_private_key";

#[derive(Default, Debug, World)]
pub struct PaymentWorld {
    pub system: Option<PaymentSystem>,
    pub checkout: Option<SignedCheckout>,
    pub last_callback: Option<Result<CallbackOutcome, PaymentFlowError>>,
}

#[derive(Debug)]
pub struct PaymentSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub config: GatewayConfig,
}

impl PaymentWorld {
    pub fn system(&self) -> &PaymentSystem {
        self.system.as_ref().expect("Payment system not initialised")
    }

    pub fn checkout(&self) -> &SignedCheckout {
        self.checkout.as_ref().expect("No checkout has happened yet")
    }

    pub fn last_callback(&self) -> &Result<CallbackOutcome, PaymentFlowError> {
        self.last_callback.as_ref().expect("No callback has been sent yet")
    }
}

impl PaymentSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        create_database(&url).await;
        run_migrations(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 1).await.expect("Error creating connection to database");
        debug!("Created database: {url}");
        let config = GatewayConfig {
            public_key: "sandbox_i00000000001".into(),
            private_key: Secret::new(TEST_PRIVATE_KEY.to_string()),
            sandbox: true,
            ..Default::default()
        };
        Self { db_path: url, db, config }
    }

    pub fn checkout_api(&self) -> CheckoutApi<SqliteDatabase> {
        CheckoutApi::new(self.db.clone(), self.config.clone())
    }

    pub fn callback_api(&self) -> CallbackApi<SqliteDatabase> {
        CallbackApi::new(self.db.clone(), self.config.signer())
    }
}
