use cucumber::given;
use spg_engine::db_types::ProductId;

use crate::cucumber::{payment_world::PaymentSystem, PaymentWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut PaymentWorld) {
    let system = PaymentSystem::new().await;
    world.system = Some(system);
}

#[given(expr = "{word} checks out products {string}")]
async fn checkout_products(world: &mut PaymentWorld, payer: String, products: String) {
    let cart = products
        .split(',')
        .map(|s| ProductId(s.trim().parse::<i64>().expect("Product ids must be integers")))
        .collect::<Vec<_>>();
    let checkout = world.system().checkout_api().checkout(&cart, &payer).await.expect("Error during checkout");
    world.checkout = Some(checkout);
}
