use std::env;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub cors_allow_origin: String,

    /// Secret used to sign and verify session JWTs.
    pub jwt_secret: String,
    /// Session lifetime, e.g. "24h", "7d", "30m".
    pub jwt_expires_in: String,

    /// Directory where validated image uploads land.
    pub upload_dir: String,

    // Payment processor (hosted checkout)
    pub payment_api_base_url: String,
    pub payment_secret_key: String,
    /// Where the processor redirects after checkout; `{CHECKOUT_SESSION_ID}`
    /// is substituted by the processor.
    pub checkout_success_url: String,
    pub checkout_cancel_url: String,

    // Transactional email provider
    pub email_api_base_url: String,
    pub email_api_key: String,
    pub email_from: String,
    pub email_to: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/cms".to_string()),
            cors_allow_origin: env::var("CORS_ALLOW_ORIGIN").unwrap_or_else(|_| "*".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            jwt_expires_in: env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| "24h".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            payment_api_base_url: env::var("PAYMENT_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.stripe.com/v1".to_string()),
            payment_secret_key: env::var("PAYMENT_SECRET_KEY").unwrap_or_default(),
            checkout_success_url: env::var("CHECKOUT_SUCCESS_URL").unwrap_or_else(|_| {
                "http://localhost:3000/ebook/success?session_id={CHECKOUT_SESSION_ID}".to_string()
            }),
            checkout_cancel_url: env::var("CHECKOUT_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:3000/ebook".to_string()),
            email_api_base_url: env::var("EMAIL_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.resend.com".to_string()),
            email_api_key: env::var("EMAIL_API_KEY").unwrap_or_default(),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "noreply@example.org".to_string()),
            email_to: env::var("EMAIL_TO").unwrap_or_else(|_| "contact@example.org".to_string()),
        })
    }
}
