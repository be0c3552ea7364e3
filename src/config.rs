use anyhow::{bail, Context, Result};

/// Which persistence adapter backs the content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentBackend {
    /// In-memory only; commits are lost on restart.
    Memory,
    /// Whole-file rewrite of the site's content source module.
    ModuleFile,
    /// Single remote document with top-level merge commits.
    Remote,
}

impl ContentBackend {
    pub fn parse(text: &str) -> Result<ContentBackend> {
        match text {
            "memory" => Ok(ContentBackend::Memory),
            "module-file" => Ok(ContentBackend::ModuleFile),
            "remote" => Ok(ContentBackend::Remote),
            other => bail!(
                "Unknown CONTENT_BACKEND '{}'. Expected memory, module-file or remote",
                other
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub admin_api_key: String,

    // Database
    pub database_path: String,

    // Content persistence
    pub content_backend: ContentBackend,
    pub content_module_path: String,
    pub remote_content_url: Option<String>,
    pub remote_content_api_key: Option<String>,
    pub remote_document_id: String,

    // Thread polling
    pub thread_poll_seconds: u64,

    // Email provider
    pub email_api_url: Option<String>,
    pub email_api_key: Option<String>,
    pub email_from: String,

    // SMS (Twilio)
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_sms_from: Option<String>,

    // Blob storage
    pub blob_storage_url: Option<String>,
    pub blob_storage_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            admin_api_key: std::env::var("ADMIN_API_KEY").context("ADMIN_API_KEY not set")?,

            // Database
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "backoffice.db".to_string()),

            // Content persistence
            content_backend: ContentBackend::parse(
                &std::env::var("CONTENT_BACKEND").unwrap_or_else(|_| "memory".to_string()),
            )?,
            content_module_path: std::env::var("CONTENT_MODULE_PATH")
                .unwrap_or_else(|_| "site-content.ts".to_string()),
            remote_content_url: std::env::var("REMOTE_CONTENT_URL").ok(),
            remote_content_api_key: std::env::var("REMOTE_CONTENT_API_KEY").ok(),
            remote_document_id: std::env::var("REMOTE_DOCUMENT_ID")
                .unwrap_or_else(|_| "site-content".to_string()),

            // Thread polling
            thread_poll_seconds: std::env::var("THREAD_POLL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),

            // Email provider
            email_api_url: std::env::var("EMAIL_API_URL").ok(),
            email_api_key: std::env::var("EMAIL_API_KEY").ok(),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "no-reply@example.com".to_string()),

            // SMS (Twilio)
            twilio_account_sid: std::env::var("TWILIO_ACCOUNT_SID").ok(),
            twilio_auth_token: std::env::var("TWILIO_AUTH_TOKEN").ok(),
            twilio_sms_from: std::env::var("TWILIO_SMS_FROM").ok(),

            // Blob storage
            blob_storage_url: std::env::var("BLOB_STORAGE_URL").ok(),
            blob_storage_api_key: std::env::var("BLOB_STORAGE_API_KEY").ok(),
        };

        if config.content_backend == ContentBackend::Remote && config.remote_content_url.is_none() {
            bail!("CONTENT_BACKEND=remote requires REMOTE_CONTENT_URL");
        }

        Ok(config)
    }
}

/// A fully defaulted config for unit tests: memory backend, no providers.
#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        port: 8080,
        admin_api_key: "test-admin-key".to_string(),
        database_path: ":memory:".to_string(),
        content_backend: ContentBackend::Memory,
        content_module_path: "site-content.ts".to_string(),
        remote_content_url: None,
        remote_content_api_key: None,
        remote_document_id: "site-content".to_string(),
        thread_poll_seconds: 5,
        email_api_url: None,
        email_api_key: None,
        email_from: "no-reply@example.com".to_string(),
        twilio_account_sid: None,
        twilio_auth_token: None,
        twilio_sms_from: None,
        blob_storage_url: None,
        blob_storage_api_key: None,
    }
}
