//! Outbound email and SMS dispatch.
//!
//! Every attempt, successful or not, writes one communication-log row.
//! Provider failures never escape as errors: they come back as a
//! `DispatchOutcome` with `succeeded == false` so the UI can show the
//! provider's message next to the logged attempt. Sends are not retried
//! automatically; the admin resends from the log, and each resend is its
//! own logged attempt.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;

use crate::config::Config;
use crate::db::{CommChannel, Database};

/// Terminal result of one dispatch attempt.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub succeeded: bool,
    pub provider_response: String,
    /// Id of the communication-log row written for this attempt.
    pub log_id: String,
}

#[derive(Debug, Clone)]
pub struct EmailRequest {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Send an email through the configured HTTP provider.
///
/// Only a database failure is an `Err`; an unconfigured or failing provider
/// is a logged, unsuccessful outcome.
pub async fn send_email(
    config: &Config,
    db: &Database,
    request: &EmailRequest,
) -> Result<DispatchOutcome> {
    let attempt = match (&config.email_api_url, &config.email_api_key) {
        (Some(url), Some(key)) => {
            dispatch_email(url, key, &config.email_from, request).await
        }
        _ => Err("email provider is not configured".to_string()),
    };
    log_attempt(db, CommChannel::Email, &request.to, &request.subject, attempt)
}

async fn dispatch_email(
    url: &str,
    api_key: &str,
    from: &str,
    request: &EmailRequest,
) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .json(&json!({
            "from": from,
            "to": request.to,
            "subject": request.subject,
            "html": request.html,
        }))
        .send()
        .await
        .map_err(|e| format!("Failed to reach email provider: {}", e))?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status.is_success() {
        Ok(body)
    } else {
        Err(format!("Email provider error ({}): {}", status, body))
    }
}

/// Send an SMS via the Twilio messages API.
pub async fn send_sms(
    config: &Config,
    db: &Database,
    to: &str,
    text: &str,
) -> Result<DispatchOutcome> {
    let attempt = match (
        &config.twilio_account_sid,
        &config.twilio_auth_token,
        &config.twilio_sms_from,
    ) {
        (Some(sid), Some(token), Some(from)) => dispatch_sms(sid, token, from, to, text).await,
        _ => Err("SMS provider is not configured".to_string()),
    };
    log_attempt(db, CommChannel::Sms, to, text, attempt)
}

async fn dispatch_sms(
    account_sid: &str,
    auth_token: &str,
    from: &str,
    to: &str,
    text: &str,
) -> Result<String, String> {
    let client = reqwest::Client::new();

    // Twilio API endpoint for sending messages
    let url = format!(
        "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
        account_sid
    );

    let response = client
        .post(&url)
        .basic_auth(account_sid, Some(auth_token))
        .form(&[("From", from), ("To", to), ("Body", text)])
        .send()
        .await
        .map_err(|e| format!("Failed to reach Twilio API: {}", e))?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status.is_success() {
        Ok(body)
    } else {
        Err(format!("Twilio API error ({}): {}", status, body))
    }
}

fn log_attempt(
    db: &Database,
    channel: CommChannel,
    recipient: &str,
    subject_or_body: &str,
    attempt: Result<String, String>,
) -> Result<DispatchOutcome> {
    let (succeeded, provider_response) = match attempt {
        Ok(response) => (true, response),
        Err(message) => (false, message),
    };
    let entry = db
        .record_comm(channel, recipient, subject_or_body, succeeded, &provider_response)
        .context("Failed to log communication attempt")?;
    Ok(DispatchOutcome {
        succeeded,
        provider_response,
        log_id: entry.id,
    })
}
