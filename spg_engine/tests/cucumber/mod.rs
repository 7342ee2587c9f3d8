mod payment_world;
mod setups;

pub use payment_world::PaymentWorld;
