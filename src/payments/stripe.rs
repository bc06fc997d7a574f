use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{PaymentIntent, PaymentIntents};
use crate::error::{AppError, Result};

const STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(Debug, Deserialize)]
struct CreateIntentResponse {
    id: String,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    secret_key: String,
    api_base: String,
}

impl StripeClient {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            secret_key: secret_key.into(),
            api_base: STRIPE_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API host (e.g. a local mock).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn intent_form(amount: u64, currency: &str) -> Vec<(&'static str, String)> {
        vec![
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
            ("payment_method_types[]", "card".to_string()),
        ]
    }
}

#[async_trait]
impl PaymentIntents for StripeClient {
    async fn create_intent(&self, amount: u64, currency: &str) -> Result<PaymentIntent> {
        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&Self::intent_form(amount, currency))
            .send()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("Stripe API error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<StripeErrorResponse>(&error_text)
                .ok()
                .and_then(|e| e.error.message.or(e.error.error_type))
                .unwrap_or(error_text);
            return Err(AppError::PaymentProvider(format!(
                "Stripe API error ({}): {}",
                status, detail
            )));
        }

        let intent: CreateIntentResponse = response.json().await.map_err(|e| {
            AppError::PaymentProvider(format!("Failed to parse Stripe response: {}", e))
        })?;

        let client_secret = intent.client_secret.ok_or_else(|| {
            AppError::PaymentProvider("Stripe response has no client_secret".into())
        })?;

        tracing::info!(intent_id = %intent.id, amount, currency, "Created payment intent");

        Ok(PaymentIntent {
            id: intent.id,
            client_secret,
        })
    }
}
