//! Remote document store.
//!
//! The whole bilingual tree lives in one remote document at a fixed
//! identifier. `load` fetches it and, on first contact, seeds it from the
//! default tree with a conditional create so concurrent first-loaders
//! cannot overwrite each other's seed. `commit` writes with merge
//! semantics: top-level keys present in the request overwrite the remote
//! ones, keys absent are left untouched. That differs from the module-file
//! store's all-or-nothing rewrite; callers must not assume the adapters
//! have interchangeable partial-update behavior.

use async_trait::async_trait;
use reqwest::header::IF_NONE_MATCH;
use reqwest::{Method, RequestBuilder, StatusCode};
use tracing::info;

use crate::content::ContentTree;
use crate::retry::{with_retry_if, RetryConfig};
use crate::store::{ContentStore, StoreError};

pub struct RemoteDocStore {
    client: reqwest::Client,
    document_url: String,
    api_key: Option<String>,
    default: ContentTree,
}

impl RemoteDocStore {
    /// `base_url` is the document service root, e.g. `https://docs.example.com`.
    /// The tree is stored at `{base_url}/documents/{document_id}`.
    pub fn new(
        base_url: &str,
        document_id: &str,
        api_key: Option<String>,
        default: ContentTree,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            document_url: format!("{}/documents/{}", base_url.trim_end_matches('/'), document_id),
            api_key,
            default,
        }
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let builder = self.client.request(method, &self.document_url);
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn fetch(&self) -> Result<Option<ContentTree>, StoreError> {
        let response = self.request(Method::GET).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => Err(StoreError::Backend(format!(
                "document service returned {} on load",
                status
            ))),
        }
    }

    /// One-time initialization. The conditional create makes the seed
    /// idempotent: whichever racing loader wins creates the document, the
    /// loser gets a precondition failure and re-reads.
    async fn seed(&self) -> Result<ContentTree, StoreError> {
        info!("Remote content document missing; seeding from default tree");
        let response = self
            .request(Method::PUT)
            .header(IF_NONE_MATCH, "*")
            .json(&self.default)
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(self.default.clone()),
            StatusCode::PRECONDITION_FAILED => match self.fetch().await? {
                Some(tree) => Ok(tree),
                None => Err(StoreError::Backend(
                    "document vanished between seed conflict and re-read".to_string(),
                )),
            },
            status => Err(StoreError::Backend(format!(
                "document service returned {} on seed",
                status
            ))),
        }
    }
}

fn retryable(err: &StoreError) -> bool {
    match err {
        StoreError::Http(_) => true,
        StoreError::Backend(message) => message.contains("returned 5"),
        _ => false,
    }
}

#[async_trait]
impl ContentStore for RemoteDocStore {
    async fn load(&self) -> Result<ContentTree, StoreError> {
        let fetched = with_retry_if(
            &RetryConfig::remote_document(),
            "remote content load",
            || self.fetch(),
            retryable,
        )
        .await?;
        match fetched {
            Some(tree) => Ok(tree),
            None => self.seed().await,
        }
    }

    // Not retried here: a commit can be holding a stale snapshot, so the
    // caller re-loads before trying again.
    async fn commit(&self, tree: &ContentTree) -> Result<(), StoreError> {
        let response = self.request(Method::PATCH).json(tree).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let detail = response.text().await.unwrap_or_default();
        Err(StoreError::Backend(format!(
            "document service returned {} on commit: {}",
            status, detail
        )))
    }

    fn name(&self) -> &'static str {
        "remote-document"
    }
}
