// Email Builders - each builder knows how to construct its email type

use super::types::{EmailBuilder, EmailError, EmailMessage, LeadNotificationData};
use crate::app_config::EmailConfig;
use handlebars::Handlebars;
use tracing::instrument;

/// Builder for the new-lead notification sent to a listing's agent
pub struct LeadNotificationEmailBuilder<'a> {
    agent_email: &'a str,
    agent_name: &'a str,
    lead_name: &'a str,
    lead_email: &'a str,
    lead_phone: Option<&'a str>,
    lead_message: Option<&'a str>,
    listing_address: &'a str,
    config: &'a EmailConfig,
    templates: &'a Handlebars<'a>,
}

impl<'a> LeadNotificationEmailBuilder<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        agent_email: &'a str,
        agent_name: &'a str,
        lead_name: &'a str,
        lead_email: &'a str,
        lead_phone: Option<&'a str>,
        lead_message: Option<&'a str>,
        listing_address: &'a str,
        config: &'a EmailConfig,
        templates: &'a Handlebars<'a>,
    ) -> Self {
        Self {
            agent_email,
            agent_name,
            lead_name,
            lead_email,
            lead_phone,
            lead_message,
            listing_address,
            config,
            templates,
        }
    }
}

impl<'a> EmailBuilder for LeadNotificationEmailBuilder<'a> {
    #[instrument(skip(self))]
    fn build(&self) -> Result<EmailMessage, EmailError> {
        let data = LeadNotificationData {
            agent_name: self.agent_name.to_string(),
            lead_name: self.lead_name.to_string(),
            lead_email: self.lead_email.to_string(),
            lead_phone: self.lead_phone.map(str::to_string),
            lead_message: self.lead_message.map(str::to_string),
            listing_address: self.listing_address.to_string(),
            app_name: self.config.from_name.clone(),
        };

        let html = self
            .templates
            .render("lead_notification", &data)
            .map_err(|e| EmailError::TemplateError(e.to_string()))?;

        // Plain text version for clients that prefer it
        let mut text = format!(
            "Hi {},\n\n\
            {} is interested in {}.\n\n\
            Email: {}\n",
            self.agent_name, self.lead_name, self.listing_address, self.lead_email
        );
        if let Some(phone) = self.lead_phone {
            text.push_str(&format!("Phone: {}\n", phone));
        }
        if let Some(message) = self.lead_message {
            text.push_str(&format!("\nMessage:\n{}\n", message));
        }
        text.push_str(&format!("\nSent via {}", self.config.from_name));

        Ok(EmailMessage::new(
            format!("{} <{}>", self.config.from_name, self.config.from_email),
            vec![self.agent_email.to_string()],
            format!("New Lead for {}", self.listing_address),
            html,
        )
        .with_text(text)
        .with_reply_to(self.lead_email.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmailConfig {
        EmailConfig {
            resend_api_key: "test_key".to_string(),
            resend_api_url: "https://api.resend.com/emails".to_string(),
            from_email: "notifications@test.app".to_string(),
            from_name: "Shutterlist".to_string(),
        }
    }

    fn test_templates() -> Handlebars<'static> {
        let mut templates = Handlebars::new();
        templates
            .register_template_string(
                "lead_notification",
                include_str!("../../../templates/email/lead_notification.html"),
            )
            .unwrap();
        templates
    }

    #[test]
    fn test_lead_notification_build() {
        let config = test_config();
        let templates = test_templates();
        let builder = LeadNotificationEmailBuilder::new(
            "agent@realty.com",
            "Dana Reyes",
            "Sam Buyer",
            "sam@example.com",
            Some("555-0100"),
            Some("Is the roof new?"),
            "123 Main Street, Austin TX",
            &config,
            &templates,
        );

        let message = builder.build().unwrap();
        assert_eq!(message.to, vec!["agent@realty.com"]);
        assert_eq!(message.subject, "New Lead for 123 Main Street, Austin TX");
        assert!(message.html.contains("Sam Buyer"));
        assert!(message.html.contains("555-0100"));
        assert!(message.html.contains("Is the roof new?"));
        assert_eq!(message.reply_to, Some("sam@example.com".to_string()));
    }

    #[test]
    fn test_lead_notification_without_optionals() {
        let config = test_config();
        let templates = test_templates();
        let builder = LeadNotificationEmailBuilder::new(
            "agent@realty.com",
            "Dana Reyes",
            "Sam Buyer",
            "sam@example.com",
            None,
            None,
            "9 Pine Ct",
            &config,
            &templates,
        );

        let message = builder.build().unwrap();
        assert!(!message.html.contains("Phone:"));
        assert!(!message.text.as_deref().unwrap_or("").contains("Phone:"));
    }
}
