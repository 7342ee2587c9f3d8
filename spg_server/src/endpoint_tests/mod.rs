mod callback;
mod helpers;
mod mocks;
mod payment_return;
mod storefront;
