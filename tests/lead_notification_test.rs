// Lead notification dispatch semantics and email rendering

use handlebars::Handlebars;

use shutterlist_backend::app_config::EmailConfig;
use shutterlist_backend::services::email::builders::LeadNotificationEmailBuilder;
use shutterlist_backend::services::email::types::EmailBuilder;
use shutterlist_backend::NotificationOutcome;

fn email_config() -> EmailConfig {
    EmailConfig {
        resend_api_key: "test_key".to_string(),
        resend_api_url: "https://api.resend.com/emails".to_string(),
        from_email: "notifications@shutterlist.app".to_string(),
        from_name: "Shutterlist".to_string(),
    }
}

fn templates() -> Handlebars<'static> {
    let mut templates = Handlebars::new();
    templates
        .register_template_string(
            "lead_notification",
            include_str!("../templates/email/lead_notification.html"),
        )
        .unwrap();
    templates
}

#[test]
fn test_notified_flag_follows_outcome() {
    // Only a successful attempt marks the lead notified; a skipped or failed
    // attempt leaves the flag false and the lead intact
    assert!(NotificationOutcome::Sent.notified());
    assert!(!NotificationOutcome::Skipped.notified());
    assert!(!NotificationOutcome::Failed.notified());
}

#[test]
fn test_notification_email_content() {
    let config = email_config();
    let templates = templates();

    let builder = LeadNotificationEmailBuilder::new(
        "dana@reyesrealty.com",
        "Dana Reyes",
        "Sam Buyer",
        "sam@example.com",
        Some("555-0142"),
        Some("Can we tour this weekend?"),
        "123 Main Street, Austin TX",
        &config,
        &templates,
    );

    let message = builder.build().unwrap();

    assert_eq!(message.subject, "New Lead for 123 Main Street, Austin TX");
    assert_eq!(message.to, vec!["dana@reyesrealty.com".to_string()]);
    assert_eq!(message.from, "Shutterlist <notifications@shutterlist.app>");
    // Replies go straight to the buyer
    assert_eq!(message.reply_to.as_deref(), Some("sam@example.com"));

    assert!(message.html.contains("Sam Buyer"));
    assert!(message.html.contains("sam@example.com"));
    assert!(message.html.contains("555-0142"));
    assert!(message.html.contains("Can we tour this weekend?"));
    assert!(message.html.contains("123 Main Street, Austin TX"));
}

#[test]
fn test_notification_email_omits_empty_optionals() {
    let config = email_config();
    let templates = templates();

    let builder = LeadNotificationEmailBuilder::new(
        "dana@reyesrealty.com",
        "Dana Reyes",
        "Quiet Buyer",
        "quiet@example.com",
        None,
        None,
        "9 Pine Ct",
        &config,
        &templates,
    );

    let message = builder.build().unwrap();
    assert!(!message.html.contains("Phone"));

    let text = message.text.expect("plain text part present");
    assert!(!text.contains("Phone:"));
    assert!(!text.contains("Message:"));
}
