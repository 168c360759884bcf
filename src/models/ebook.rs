use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A purchasable item. `file_path` is attached to the checkout session as
/// opaque metadata and only handed back once the session is paid.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ebook {
    pub id: String,
    pub title: String,
    pub price_cents: i64,
    pub currency: String,
    pub file_path: String,
    pub published: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub item_id: String,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Verification result; file metadata is omitted for unpaid sessions.
#[derive(Debug, Serialize, PartialEq)]
pub struct VerifyResponse {
    pub paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

impl VerifyResponse {
    pub fn unpaid() -> Self {
        VerifyResponse {
            paid: false,
            file_path: None,
            title: None,
            item_id: None,
            customer_email: None,
        }
    }
}
