// Email Service Module - orchestrates builders and sender

pub mod builders;
pub mod sender;
pub mod types;

use self::types::EmailBuilder;
use crate::app_config::EmailConfig;
use anyhow::Result;
use builders::LeadNotificationEmailBuilder;
use handlebars::Handlebars;
use sender::EmailSender;
use std::sync::Arc;
use tracing::{info, instrument};

/// Email service for outbound notifications
#[derive(Clone)]
pub struct EmailService {
    sender: EmailSender,
    config: EmailConfig,
    templates: Arc<Handlebars<'static>>,
}

impl EmailService {
    /// Create a new email service instance
    pub fn new(config: EmailConfig) -> Result<Self> {
        let mut templates = Handlebars::new();
        Self::register_templates(&mut templates)?;

        let sender =
            EmailSender::new_resend(config.resend_api_key.clone(), config.resend_api_url.clone());

        Ok(Self {
            sender,
            config,
            templates: Arc::new(templates),
        })
    }

    /// Register all email templates
    fn register_templates(templates: &mut Handlebars) -> Result<(), types::EmailError> {
        let lead_notification_template =
            include_str!("../../../templates/email/lead_notification.html");
        templates
            .register_template_string("lead_notification", lead_notification_template)
            .map_err(|e| types::EmailError::TemplateError(e.to_string()))?;

        Ok(())
    }

    /// Whether a sending credential is configured at all
    pub fn is_configured(&self) -> bool {
        !self.config.resend_api_key.is_empty()
    }

    /// Send the new-lead notification to a listing's agent.
    ///
    /// One attempt, no retry. The caller decides what the outcome means; this
    /// method never panics and never blocks lead persistence.
    #[instrument(skip(self, lead_message))]
    #[allow(clippy::too_many_arguments)]
    pub async fn send_lead_notification(
        &self,
        agent_email: &str,
        agent_name: &str,
        lead_name: &str,
        lead_email: &str,
        lead_phone: Option<&str>,
        lead_message: Option<&str>,
        listing_address: &str,
    ) -> Result<(), types::EmailError> {
        if !self.is_configured() {
            return Err(types::EmailError::ConfigError(
                "RESEND_API_KEY not set".to_string(),
            ));
        }

        info!("Sending lead notification to {}", agent_email);

        let builder = LeadNotificationEmailBuilder::new(
            agent_email,
            agent_name,
            lead_name,
            lead_email,
            lead_phone,
            lead_message,
            listing_address,
            &self.config,
            &self.templates,
        );

        let message = builder.build()?;
        self.sender.send(message).await
    }
}

// Re-export commonly used types for convenience
pub use types::{EmailError, EmailMessage};

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> EmailConfig {
        EmailConfig {
            resend_api_key: "test_key".to_string(),
            resend_api_url: "https://api.resend.com/emails".to_string(),
            from_email: "notifications@test.app".to_string(),
            from_name: "Shutterlist".to_string(),
        }
    }

    #[test]
    fn test_email_service_creation() {
        let service = EmailService::new(create_test_config());
        assert!(service.is_ok());
    }

    #[test]
    fn test_unconfigured_service_detected() {
        let mut config = create_test_config();
        config.resend_api_key = String::new();
        let service = EmailService::new(config).unwrap();
        assert!(!service.is_configured());
    }
}
