mod stripe;

pub use stripe::*;

use async_trait::async_trait;

use crate::error::{AppError, Result};

/// Currency used for every intent; prices are stored in dollars.
pub const DEFAULT_CURRENCY: &str = "usd";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

/// Creates payment intents with an external provider.
#[async_trait]
pub trait PaymentIntents: Send + Sync {
    /// `amount` is in minor units (cents).
    async fn create_intent(&self, amount: u64, currency: &str) -> Result<PaymentIntent>;
}

/// Stand-in used when no provider key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredProvider;

#[async_trait]
impl PaymentIntents for UnconfiguredProvider {
    async fn create_intent(&self, _amount: u64, _currency: &str) -> Result<PaymentIntent> {
        Err(AppError::PaymentProvider(
            "no payment provider configured (set STRIPE_SECRET_KEY)".into(),
        ))
    }
}
