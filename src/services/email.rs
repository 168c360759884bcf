use crate::config::Config;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Contact-form payload. Every field is required non-empty and is checked
/// before any network call.
#[derive(Debug, Deserialize, Validate)]
pub struct EmailMessage {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid reply-to address is required"))]
    pub reply_to: String,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: String,
    to: Vec<&'a str>,
    reply_to: &'a str,
    subject: &'a str,
    text: &'a str,
}

pub struct EmailService<'a> {
    config: &'a Config,
    client: reqwest::Client,
}

impl<'a> EmailService<'a> {
    pub fn new(config: &'a Config) -> Self {
        EmailService {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        message
            .validate()
            .map_err(|e| AppError::Validation(flatten_validation_errors(&e)))?;

        let body = SendRequest {
            from: format!("{} <{}>", message.name, self.config.email_from),
            to: vec![&self.config.email_to],
            reply_to: &message.reply_to,
            subject: &message.subject,
            text: &message.message,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.config.email_api_base_url))
            .bearer_auth(&self.config.email_api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            tracing::error!("Email dispatch failed ({}): {}", status, detail);
            return Err(AppError::ExternalService(
                "Failed to send email".to_string(),
            ));
        }

        tracing::info!("Contact email dispatched (subject: {})", message.subject);
        Ok(())
    }
}

/// One user-facing message per violated rule, first rule wins per field.
fn flatten_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .filter_map(|errs| errs.first())
        .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            name: "Ada".to_string(),
            reply_to: "ada@example.org".to_string(),
            subject: "Hello".to_string(),
            message: "A question about enrollment.".to_string(),
        }
    }

    #[test]
    fn test_valid_message_passes() {
        assert!(message().validate().is_ok());
    }

    #[test]
    fn test_empty_fields_rejected() {
        let mut m = message();
        m.name = String::new();
        assert!(m.validate().is_err());

        let mut m = message();
        m.subject = String::new();
        assert!(m.validate().is_err());

        let mut m = message();
        m.message = String::new();
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_malformed_reply_to_rejected() {
        let mut m = message();
        m.reply_to = "not-an-address".to_string();
        let err = m.validate().unwrap_err();
        assert!(flatten_validation_errors(&err).contains("reply-to"));
    }
}
