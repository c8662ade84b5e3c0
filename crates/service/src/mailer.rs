//! Outbound transactional mail.
//!
//! The contact form triggers one notification email to the practice. Mail
//! goes through the Resend HTTP API; without an API key a no-op mailer is
//! wired instead so local development keeps working.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::contacts::ContactForm;
use crate::errors::ServiceError;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Provider-agnostic outbound message.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub reply_to: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), ServiceError>;
}

pub struct ResendMailer {
    http: reqwest::Client,
    api_key: String,
}

impl ResendMailer {
    pub fn new(api_key: String) -> Self {
        Self { http: reqwest::Client::new(), api_key }
    }
}

#[derive(Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), ServiceError> {
        let payload = ResendPayload {
            from: &email.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
            reply_to: email.reply_to.as_deref(),
        };
        let resp = self
            .http
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ServiceError::Mail(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Mail(format!("resend responded {status}: {body}")));
        }
        info!(to = %email.to, subject = %email.subject, "notification email sent");
        Ok(())
    }
}

/// Swallows every message; wired when no mail API key is configured.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), ServiceError> {
        warn!(to = %email.to, subject = %email.subject, "mail disabled; dropping notification");
        Ok(())
    }
}

/// Builds the practice-facing notification for one contact submission.
pub struct Notifier {
    mailer: std::sync::Arc<dyn Mailer>,
    from: String,
    to: String,
    site_name: String,
}

impl Notifier {
    pub fn new(
        mailer: std::sync::Arc<dyn Mailer>,
        from: String,
        to: String,
        site_name: String,
    ) -> Self {
        Self { mailer, from, to, site_name }
    }

    pub async fn contact_submitted(&self, form: &ContactForm) -> Result<(), ServiceError> {
        if self.to.trim().is_empty() {
            warn!("mail.notify_to not configured; skipping contact notification");
            return Ok(());
        }
        let email = contact_notification(&self.site_name, &self.from, &self.to, form);
        self.mailer.send(&email).await
    }
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn contact_notification(
    site_name: &str,
    from: &str,
    to: &str,
    form: &ContactForm,
) -> OutgoingEmail {
    let full_name = format!("{} {}", form.first_name.trim(), form.last_name.trim());
    let mut html = format!(
        "<h2>Nouvelle demande de contact</h2>\
         <p><strong>Nom :</strong> {}</p>\
         <p><strong>E-mail :</strong> {}</p>",
        escape_html(&full_name),
        escape_html(&form.email),
    );
    if let Some(phone) = form.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        html.push_str(&format!("<p><strong>Téléphone :</strong> {}</p>", escape_html(phone)));
    }
    if let Some(subject) = form.subject.as_deref().filter(|s| !s.trim().is_empty()) {
        html.push_str(&format!("<p><strong>Objet :</strong> {}</p>", escape_html(subject)));
    }
    html.push_str(&format!(
        "<p><strong>Message :</strong></p><p>{}</p>",
        escape_html(form.message.trim()).replace('\n', "<br>"),
    ));
    if !form.attachments.is_empty() {
        html.push_str(&format!(
            "<p><strong>Pièces jointes :</strong> {}</p>",
            form.attachments.len()
        ));
    }
    OutgoingEmail {
        from: from.to_string(),
        to: to.to_string(),
        subject: format!("[{site_name}] Nouvelle demande de {full_name}"),
        html,
        reply_to: Some(form.email.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::ContactForm;

    fn form() -> ContactForm {
        ContactForm {
            first_name: "Marie".into(),
            last_name: "Dupont".into(),
            email: "marie@example.fr".into(),
            phone: Some("0612345678".into()),
            subject: None,
            message: "Bonjour,\nje souhaite un bilan.".into(),
            attachments: vec![],
        }
    }

    #[test]
    fn notification_carries_reply_to_and_escapes_html() {
        let mut f = form();
        f.subject = Some("<script>alert(1)</script>".into());
        let email = contact_notification("Cabinet Test", "site@example.fr", "diet@example.fr", &f);
        assert_eq!(email.reply_to.as_deref(), Some("marie@example.fr"));
        assert!(email.subject.contains("Marie Dupont"));
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("&lt;script&gt;"));
        assert!(email.html.contains("je souhaite un bilan.</p>") || email.html.contains("<br>"));
    }

    #[tokio::test]
    async fn noop_mailer_always_succeeds() {
        let email = contact_notification("Cabinet", "a@b.fr", "c@d.fr", &form());
        assert!(NoopMailer.send(&email).await.is_ok());
    }
}
