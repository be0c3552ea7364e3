//! Media library: uploads go to the external blob-storage collaborator,
//! records live in SQLite, and content fields reference assets by URL value
//! only.
//!
//! There is deliberately no reference integrity between the media table and
//! the content tree. Deleting an asset that a content field still points at
//! leaves a dangling URL; [`dangling_references`] reports those instead of
//! cascading.

use anyhow::{anyhow, Context, Result};
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::content::keywords::{matches_keyword, FILE_REFERENCE_KEYWORDS};
use crate::content::{ContentTree, Fields, Language, Node};
use crate::db::{Database, MediaItem};
use crate::retry::{with_retry, RetryConfig};

/// What the blob collaborator returns for a stored file.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredBlob {
    pub url: String,
    #[serde(rename = "fileId")]
    pub provider_file_id: Option<String>,
}

/// Thin client for the external blob-storage service. File content is never
/// inspected here; bytes go out, a URL comes back.
pub struct BlobStorage {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl BlobStorage {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        destination_hint: &str,
    ) -> Result<StoredBlob> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new()
            .part("file", part)
            .text("destination", destination_hint.to_string());

        let mut request = self
            .client
            .post(format!("{}/files", self.base_url))
            .multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .context("Failed to reach blob storage")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Blob storage error ({}): {}", status, body));
        }
        response
            .json::<StoredBlob>()
            .await
            .context("Blob storage returned an unexpected body")
    }

    /// Delete by provider file id. Idempotent on the provider side, so a
    /// transient failure is retried.
    pub async fn delete(&self, provider_file_id: &str) -> Result<()> {
        let url = format!("{}/files/{}", self.base_url, provider_file_id);
        with_retry(&RetryConfig::provider_call(), "blob delete", || async {
            let mut request = self.client.delete(&url);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }
            let response = request
                .send()
                .await
                .context("Failed to reach blob storage")?;
            let status = response.status();
            // Already gone is as good as deleted.
            if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
                Ok(())
            } else {
                Err(anyhow!("Blob storage error ({}) on delete", status))
            }
        })
        .await
    }
}

/// Upload a file and record it in the library.
pub async fn upload_media(
    blob: &BlobStorage,
    db: &Database,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<MediaItem> {
    let stored = blob.upload(file_name, bytes, "portfolio-media").await?;
    db.add_media(&stored.url, stored.provider_file_id.as_deref(), file_name)
}

/// Delete a media item: best-effort removal at the provider, then the
/// record. A provider failure is logged and does not keep the record alive;
/// the library reflects what the admin asked for.
pub async fn delete_media(blob: &BlobStorage, db: &Database, id: &str) -> Result<bool> {
    let Some(item) = db.get_media(id)? else {
        return Ok(false);
    };
    if let Some(provider_file_id) = &item.provider_file_id {
        if let Err(err) = blob.delete(provider_file_id).await {
            warn!(media = id, error = %err, "Blob deletion failed; removing record anyway");
        }
    }
    db.delete_media(id)
}

/// A content file-reference whose URL no longer matches any media record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    pub path: String,
    pub url: String,
}

/// Report content file-reference fields pointing at URLs absent from the
/// media library. Placeholder URLs are skipped; they never came from the
/// library. Purely diagnostic: nothing is repaired or deleted.
pub fn dangling_references(tree: &ContentTree, media: &[MediaItem]) -> Vec<DanglingReference> {
    let known: std::collections::HashSet<&str> = media.iter().map(|m| m.url.as_str()).collect();
    let mut dangling = Vec::new();
    for language in Language::all() {
        walk_fields(
            tree.branch(language),
            language.code().to_string(),
            &known,
            &mut dangling,
        );
    }
    dangling
}

fn walk_fields(
    fields: &Fields,
    prefix: String,
    known: &std::collections::HashSet<&str>,
    out: &mut Vec<DanglingReference>,
) {
    for (key, node) in fields {
        let path = format!("{}.{}", prefix, key);
        match node {
            Node::Text(value) => {
                let is_reference = matches_keyword(key, FILE_REFERENCE_KEYWORDS)
                    && value.starts_with("http")
                    && !value.contains("placehold.co");
                if is_reference && !known.contains(value.as_str()) {
                    out.push(DanglingReference {
                        path,
                        url: value.clone(),
                    });
                }
            }
            Node::Group(inner) => walk_fields(inner, path, known, out),
            Node::ItemList(items) => {
                for (i, element) in items.iter().enumerate() {
                    walk_fields(element, format!("{}.{}", path, i), known, out);
                }
            }
            Node::Flag(_) | Node::TextList(_) => {}
        }
    }
}
