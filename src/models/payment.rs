use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::Document;
use crate::models::{DeleteResult, InsertOneResult};

#[derive(Debug, Deserialize)]
pub struct CreatePaymentIntent {
    /// Price in major currency units
    pub price: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentCreated {
    pub client_secret: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecorded {
    pub insert_res: InsertOneResult,
    pub delete_res: DeleteResult,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// Cart ids a payment consumes. Non-string entries are ignored.
pub fn payment_cart_ids(payment: &Document) -> Vec<String> {
    match payment.get("cartIds") {
        Some(Value::Array(ids)) => ids
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_cart_ids() {
        let payment = json!({"cartIds": ["c1", 7, "c2"]});
        let ids = payment_cart_ids(payment.as_object().unwrap());
        assert_eq!(ids, vec!["c1", "c2"]);

        let payment = json!({"email": "a@x.com"});
        assert!(payment_cart_ids(payment.as_object().unwrap()).is_empty());
    }
}
