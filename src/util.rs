//! Shared utility functions for the Bistro application.

use axum::http::HeaderMap;

/// Extract a Bearer token from the Authorization header.
///
/// Returns the token string without the "Bearer " prefix, or None if
/// the header is missing, malformed, or empty after the prefix.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

/// Convert a price in major currency units (dollars) to minor units (cents).
///
/// Returns None for prices that cannot be charged (negative, NaN, infinite,
/// or too large to represent).
pub fn price_to_minor_units(price: f64) -> Option<u64> {
    if !price.is_finite() || price < 0.0 {
        return None;
    }
    let cents = (price * 100.0).round();
    if cents > u64::MAX as f64 {
        return None;
    }
    Some(cents as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert("Authorization", HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer_token(&headers), Some("abc.def"));

        headers.insert("Authorization", HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert("Authorization", HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn test_price_to_minor_units_rounds() {
        assert_eq!(price_to_minor_units(12.5), Some(1250));
        assert_eq!(price_to_minor_units(0.0), Some(0));
        // 19.99 * 100 is 1998.9999999999998 in floating point
        assert_eq!(price_to_minor_units(19.99), Some(1999));
        assert_eq!(price_to_minor_units(0.005), Some(1));
    }

    #[test]
    fn test_price_to_minor_units_rejects_invalid() {
        assert_eq!(price_to_minor_units(-1.0), None);
        assert_eq!(price_to_minor_units(f64::NAN), None);
        assert_eq!(price_to_minor_units(f64::INFINITY), None);
    }
}
