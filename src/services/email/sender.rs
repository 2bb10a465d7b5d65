// Email Sender - delivery to the email provider
// One attempt per message; the lead-notification path deliberately never
// retries, so the sender stays retry-free

use super::types::{EmailError, EmailMessage, ResendEmailPayload};
use reqwest::Client;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Generic email sender that handles delivery to the Resend API
#[derive(Clone)]
pub struct EmailSender {
    client: Arc<Client>,
    api_key: String,
    api_url: String,
}

impl EmailSender {
    /// Create a new email sender for the Resend API
    pub fn new_resend(api_key: String, api_url: String) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key,
            api_url,
        }
    }

    /// Send an email message
    #[instrument(skip(self, message), fields(to = ?message.to, subject = %message.subject))]
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        let payload: ResendEmailPayload = message.into();

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(res) if res.status().is_success() => {
                info!("Email sent successfully");
                Ok(())
            },
            Ok(res) => {
                let status = res.status();
                let error_text = res
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());

                error!(
                    "Failed to send email. Status: {}, Error: {}",
                    status, error_text
                );

                if status.is_server_error() {
                    Err(EmailError::ServiceUnavailable)
                } else {
                    Err(EmailError::SendError(format!(
                        "Email send failed with status {}: {}",
                        status, error_text
                    )))
                }
            },
            Err(e) => {
                error!("Network error while sending email: {:?}", e);
                Err(EmailError::SendError(format!("Network error: {}", e)))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_message_builder() {
        let message = EmailMessage::new(
            "sender@example.com".to_string(),
            vec!["recipient@example.com".to_string()],
            "Test Subject".to_string(),
            "<h1>Test</h1>".to_string(),
        )
        .with_text("Test".to_string())
        .with_reply_to("reply@example.com".to_string());

        assert_eq!(message.from, "sender@example.com");
        assert_eq!(message.to, vec!["recipient@example.com"]);
        assert_eq!(message.subject, "Test Subject");
        assert_eq!(message.html, "<h1>Test</h1>");
        assert_eq!(message.text, Some("Test".to_string()));
        assert_eq!(message.reply_to, Some("reply@example.com".to_string()));
    }

    #[test]
    fn test_resend_payload_conversion() {
        let message = EmailMessage::new(
            "sender@example.com".to_string(),
            vec!["recipient@example.com".to_string()],
            "Test Subject".to_string(),
            "<h1>Test</h1>".to_string(),
        );

        let payload: ResendEmailPayload = message.into();
        assert_eq!(payload.from, "sender@example.com");
        assert_eq!(payload.to, vec!["recipient@example.com"]);
        assert!(payload.text.is_none());
        assert!(payload.reply_to.is_none());
    }
}
