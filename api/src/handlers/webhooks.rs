//! Webhook handlers
//!
//! Handler for Stripe webhooks. Payloads are verified with HMAC-SHA256
//! against the configured webhook secret before anything is parsed.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use uuid::Uuid;

use crate::app::StripeEventResult;
use crate::error::AppError;
use crate::AppState;

/// Stripe webhook envelope (the fields this API consumes)
#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: StripeCheckoutSession,
}

/// The checkout session object inside a `checkout.session.completed` event
#[derive(Debug, Deserialize)]
pub struct StripeCheckoutSession {
    /// Order id, set as the session's client reference
    #[serde(default)]
    pub client_reference_id: Option<String>,
    #[serde(default)]
    pub amount_total: Option<i64>,
}

/// Verify HMAC-SHA256 signature
fn verify_signature(payload: &[u8], signature: Option<&str>, secret: &Option<String>) -> bool {
    let Some(secret) = secret else {
        // No secret configured, skip verification (development mode)
        tracing::warn!("Stripe webhook secret not configured, skipping signature verification");
        return true;
    };

    let Some(sig_header) = signature else {
        tracing::warn!("No signature provided in webhook request");
        return false;
    };

    let expected_hex = sig_header.strip_prefix("sha256=").unwrap_or(sig_header);

    type HmacSha256 = Hmac<Sha256>;
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => {
            tracing::error!("Invalid webhook secret key");
            return false;
        }
    };

    mac.update(payload);

    let expected_bytes = match hex::decode(expected_hex) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Invalid signature format");
            return false;
        }
    };

    mac.verify_slice(&expected_bytes).is_ok()
}

/// POST /webhooks/stripe
///
/// Handle Stripe webhook events. Only `checkout.session.completed` changes
/// state; everything else is acknowledged and ignored.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok());

    if !verify_signature(&body, signature, &state.config.stripe_webhook_secret) {
        return Err(AppError::Unauthorized);
    }

    let event: StripeEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Malformed webhook payload: {}", e)))?;

    if event.event_type != "checkout.session.completed" {
        tracing::debug!(event_type = %event.event_type, "Ignoring Stripe event");
        return Ok(StatusCode::OK);
    }

    let session = event.data.object;
    let order_id = session
        .client_reference_id
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or_else(|| {
            AppError::BadRequest("Checkout session carries no order reference".to_string())
        })?;
    let amount = session.amount_total.ok_or_else(|| {
        AppError::BadRequest("Checkout session carries no amount".to_string())
    })?;

    match state
        .order_service
        .process_stripe_event(&event.id, &order_id.into(), amount)
        .await?
    {
        StripeEventResult::Processed(payment) => {
            tracing::info!(order = %payment.order_id, event = %event.id, "Stripe payment recorded");
        }
        StripeEventResult::Duplicate => {
            tracing::debug!(event = %event.id, "Duplicate Stripe event acknowledged");
        }
    }

    Ok(StatusCode::OK)
}
