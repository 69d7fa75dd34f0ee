// src/mailer.rs

use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Missing mail credentials: {0}")]
    MissingCredentials(&'static str),
}

/// A rendered report ready to go out.
pub struct OutgoingReport<'a> {
    pub recipient: &'a str,
    pub subject: &'a str,
    pub html: String,
    pub text: String,
}

pub struct BrevoMailer {
    api_key: String,
    sender_email: String,
    sender_name: String,
    client: Client,
}

#[derive(Serialize)]
struct BrevoSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct BrevoRecipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoPayload<'a> {
    sender: BrevoSender<'a>,
    to: Vec<BrevoRecipient<'a>>,
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

impl BrevoMailer {
    pub fn new(
        api_key: Option<String>,
        sender_email: Option<String>,
        sender_name: String,
        timeout: Duration,
    ) -> Result<Self, MailerError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(MailerError::MissingCredentials("BREVO_API_KEY is not set"))?;
        let sender_email = sender_email
            .filter(|e| !e.trim().is_empty())
            .ok_or(MailerError::MissingCredentials("REPORT_SENDER_EMAIL is not set"))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        Ok(Self {
            api_key,
            sender_email,
            sender_name,
            client,
        })
    }

    pub fn send_report(&self, report: &OutgoingReport<'_>) -> Result<(), MailerError> {
        let payload = BrevoPayload {
            sender: BrevoSender {
                name: &self.sender_name,
                email: &self.sender_email,
            },
            to: vec![BrevoRecipient {
                email: report.recipient,
            }],
            subject: report.subject,
            html_content: &report.html,
            text_content: &report.text,
        };

        let resp = self
            .client
            .post(BREVO_SEND_URL)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(MailerError::ApiError(format!(
                "Failed to send email: {status} - {error_body}"
            )));
        }

        Ok(())
    }
}

/// Subject line for a report with `count` properties.
pub fn report_subject(count: usize) -> String {
    format!("Summit County Property Report - {count} Properties Modified")
}
