use crate::config::Config;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::ebook::{Ebook, VerifyResponse};
use serde::Deserialize;

/// Hosted-checkout boundary. The processor owns the payment page; this
/// service only creates sessions carrying the item id and file location as
/// opaque metadata, and reads them back after payment.
pub struct PaymentService<'a> {
    db: &'a Database,
    config: &'a Config,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CheckoutSession {
    #[allow(dead_code)]
    id: String,
    url: Option<String>,
    payment_status: Option<String>,
    #[serde(default)]
    metadata: SessionMetadata,
    customer_details: Option<CustomerDetails>,
}

#[derive(Debug, Default, Deserialize)]
struct SessionMetadata {
    item_id: Option<String>,
    file_path: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CustomerDetails {
    email: Option<String>,
}

impl<'a> PaymentService<'a> {
    pub fn new(db: &'a Database, config: &'a Config) -> Self {
        PaymentService {
            db,
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn get_ebook(&self, item_id: &str) -> AppResult<Ebook> {
        let ebook = sqlx::query_as::<_, Ebook>(
            r#"
            SELECT id, title, price_cents, currency, file_path, published,
                   created_at, updated_at
            FROM ebook
            WHERE id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.db.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item '{}' not found", item_id)))?;

        Ok(ebook)
    }

    /// Creates a hosted checkout session and returns its redirect URL.
    pub async fn create_checkout_session(&self, item_id: &str) -> AppResult<String> {
        let ebook = self.get_ebook(item_id).await?;

        if !ebook.published {
            return Err(AppError::NotFound(format!(
                "Item '{}' not found",
                item_id
            )));
        }
        if ebook.price_cents <= 0 {
            return Err(AppError::Validation(
                "Item has no price configured".to_string(),
            ));
        }

        let amount = ebook.price_cents.to_string();
        let params: Vec<(&str, &str)> = vec![
            ("mode", "payment"),
            ("success_url", &self.config.checkout_success_url),
            ("cancel_url", &self.config.checkout_cancel_url),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", &ebook.currency),
            ("line_items[0][price_data][unit_amount]", &amount),
            ("line_items[0][price_data][product_data][name]", &ebook.title),
            ("metadata[item_id]", &ebook.id),
            ("metadata[file_path]", &ebook.file_path),
            ("metadata[title]", &ebook.title),
        ];

        let response = self
            .client
            .post(format!(
                "{}/checkout/sessions",
                self.config.payment_api_base_url
            ))
            .basic_auth(&self.config.payment_secret_key, None::<&str>)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Checkout session creation failed ({}): {}", status, body);
            return Err(AppError::ExternalService(
                "Failed to create checkout session".to_string(),
            ));
        }

        let session: CheckoutSession = response.json().await?;

        session.url.ok_or_else(|| {
            AppError::ExternalService("Checkout session has no redirect URL".to_string())
        })
    }

    /// Looks up a session and reports payment status. File metadata is only
    /// included once the session is actually paid.
    pub async fn verify_session(&self, session_id: &str) -> AppResult<VerifyResponse> {
        let response = self
            .client
            .get(format!(
                "{}/checkout/sessions/{}",
                self.config.payment_api_base_url, session_id
            ))
            .basic_auth(&self.config.payment_secret_key, None::<&str>)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("Checkout session not found".to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Checkout session lookup failed: {}", status);
            return Err(AppError::ExternalService(
                "Failed to verify checkout session".to_string(),
            ));
        }

        let session: CheckoutSession = response.json().await?;
        Ok(verify_response_from(session))
    }
}

fn verify_response_from(session: CheckoutSession) -> VerifyResponse {
    if session.payment_status.as_deref() != Some("paid") {
        return VerifyResponse::unpaid();
    }

    VerifyResponse {
        paid: true,
        file_path: session.metadata.file_path,
        title: session.metadata.title,
        item_id: session.metadata.item_id,
        customer_email: session.customer_details.and_then(|c| c.email),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(payment_status: &str) -> CheckoutSession {
        CheckoutSession {
            id: "cs_test_1".to_string(),
            url: None,
            payment_status: Some(payment_status.to_string()),
            metadata: SessionMetadata {
                item_id: Some("ebook-1".to_string()),
                file_path: Some("files/ebook-1.pdf".to_string()),
                title: Some("The Handbook".to_string()),
            },
            customer_details: Some(CustomerDetails {
                email: Some("buyer@example.org".to_string()),
            }),
        }
    }

    #[test]
    fn test_unpaid_session_exposes_no_metadata() {
        let result = verify_response_from(session("unpaid"));
        assert_eq!(result, VerifyResponse::unpaid());
        assert!(result.file_path.is_none());
    }

    #[test]
    fn test_paid_session_returns_metadata() {
        let result = verify_response_from(session("paid"));
        assert!(result.paid);
        assert_eq!(result.file_path.as_deref(), Some("files/ebook-1.pdf"));
        assert_eq!(result.item_id.as_deref(), Some("ebook-1"));
        assert_eq!(result.customer_email.as_deref(), Some("buyer@example.org"));
    }

    #[test]
    fn test_missing_status_treated_as_unpaid() {
        let mut s = session("paid");
        s.payment_status = None;
        assert_eq!(verify_response_from(s), VerifyResponse::unpaid());
    }
}
