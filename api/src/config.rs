use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Secret used to sign access tokens (HMAC-SHA256)
    pub token_secret: String,
    /// Access token lifetime in seconds
    pub token_ttl_secs: i64,
    /// Webhook secret for verifying Stripe webhooks (HMAC-SHA256)
    pub stripe_webhook_secret: Option<String>,
    /// Base URL for the API (used in responses that reference resources)
    pub api_base_url: String,
    /// Green tokens required per seed token on conversion
    pub green_per_seed: i64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            token_secret: env::var("TOKEN_SECRET")
                .unwrap_or_else(|_| "dev-secret-not-for-production".to_string()),
            token_ttl_secs: env::var("TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400),
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").ok(),
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            green_per_seed: env::var("GREEN_PER_SEED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
        }
    }

    /// Check if Stripe webhook verification is configured
    pub fn stripe_webhooks_enabled(&self) -> bool {
        self.stripe_webhook_secret.is_some()
    }
}
