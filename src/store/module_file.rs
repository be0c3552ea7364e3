//! Whole-file source module store.
//!
//! The published site imports its content from a single TypeScript module.
//! Committing rewrites that module wholesale: the full bilingual tree is
//! rendered as one exported literal plus a derived type alias. Rendering is
//! byte-reproducible for the same tree (field order is insertion order all
//! the way down), so generated diffs stay meaningful.
//!
//! The write goes to a temp file in the same directory and is renamed over
//! the target, so a failure mid-write leaves the previous module intact.
//! There is no merge and no partial-section commit.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

use crate::content::ContentTree;
use crate::store::{ContentStore, StoreError};

const HEADER: &str =
    "// Generated by the back office. Every commit rewrites this file wholesale.\n";
const EXPORT_NAME: &str = "siteContent";

static LITERAL_REGEX: OnceLock<Regex> = OnceLock::new();

fn literal_regex() -> &'static Regex {
    LITERAL_REGEX.get_or_init(|| {
        Regex::new(r"(?s)export const siteContent\s*=\s*(\{.*\})\s*as const;")
            .expect("literal pattern is valid")
    })
}

pub struct ModuleFileStore {
    path: PathBuf,
}

impl ModuleFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the module source for a tree. Pure; exposed for the export
    /// binary and for tests.
    pub fn render(tree: &ContentTree) -> Result<String, StoreError> {
        let literal = serde_json::to_string_pretty(tree)?;
        Ok(format!(
            "{HEADER}export const {EXPORT_NAME} = {literal} as const;\n\n\
             export type SiteContent = typeof {EXPORT_NAME};\n"
        ))
    }

    /// Pull the tree literal back out of module source.
    pub fn extract(source: &str) -> Result<ContentTree, StoreError> {
        let captures = literal_regex().captures(source).ok_or_else(|| {
            StoreError::Backend(format!(
                "content module does not contain an `export const {}` literal",
                EXPORT_NAME
            ))
        })?;
        Ok(serde_json::from_str(&captures[1])?)
    }
}

#[async_trait]
impl ContentStore for ModuleFileStore {
    async fn load(&self) -> Result<ContentTree, StoreError> {
        let source = tokio::fs::read_to_string(&self.path).await?;
        Self::extract(&source)
    }

    async fn commit(&self, tree: &ContentTree) -> Result<(), StoreError> {
        let rendered = Self::render(tree)?;
        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| StoreError::Backend("content module path has no file name".into()))?;
        let temp = self.path.with_file_name(format!("{}.tmp", file_name));
        tokio::fs::write(&temp, rendered.as_bytes()).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "module-file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::defaults::default_tree;
    use crate::content::path::{self, Path as ContentPath};
    use crate::content::Node;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ModuleFileStore {
        ModuleFileStore::new(dir.path().join("site-content.ts"))
    }

    // ==================== Rendering Tests ====================

    #[test]
    fn test_render_has_export_and_type_alias() {
        let rendered = ModuleFileStore::render(&default_tree()).expect("render");
        assert!(rendered.starts_with("// Generated"));
        assert!(rendered.contains("export const siteContent = {"));
        assert!(rendered.contains("} as const;"));
        assert!(rendered.contains("export type SiteContent = typeof siteContent;"));
    }

    #[test]
    fn test_render_is_byte_reproducible() {
        let tree = default_tree();
        let first = ModuleFileStore::render(&tree).expect("render");
        let second = ModuleFileStore::render(&tree).expect("render");
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_preserves_field_order() {
        let rendered = ModuleFileStore::render(&default_tree()).expect("render");
        let hero = rendered.find("\"hero\"").expect("hero section");
        let gallery = rendered.find("\"gallery\"").expect("gallery section");
        assert!(hero < gallery, "sections must render in insertion order");
    }

    #[test]
    fn test_extract_inverts_render() {
        let tree = default_tree();
        let rendered = ModuleFileStore::render(&tree).expect("render");
        let extracted = ModuleFileStore::extract(&rendered).expect("extract");
        assert_eq!(extracted, tree);
    }

    #[test]
    fn test_extract_rejects_foreign_source() {
        let result = ModuleFileStore::extract("export const somethingElse = 1;");
        assert!(result.is_err());
    }

    // ==================== Round-Trip Tests ====================

    #[tokio::test]
    async fn test_commit_then_load_round_trips() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        let edited = path::set(
            &default_tree(),
            &ContentPath::parse("en.about.bio").unwrap(),
            Node::text("Rewritten biography"),
        );

        store.commit(&edited).await.expect("commit");
        let loaded = store.load().await.expect("load");

        assert_eq!(loaded, edited);
    }

    #[tokio::test]
    async fn test_commit_overwrites_whole_file() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        store.commit(&default_tree()).await.expect("first commit");

        let edited = path::set(
            &default_tree(),
            &ContentPath::parse("en.hero.title").unwrap(),
            Node::text("Second"),
        );
        store.commit(&edited).await.expect("second commit");

        let source = std::fs::read_to_string(store.path()).expect("read");
        assert!(source.contains("Second"));
        assert!(!source.contains("Hi, I'm Suman"));
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        store.commit(&default_tree()).await.expect("commit");

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_error_not_panic() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_previous_content() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        store.commit(&default_tree()).await.expect("commit");

        // Committing through a store whose directory vanished must fail
        // without corrupting the original file.
        let doomed = ModuleFileStore::new(dir.path().join("missing-dir").join("content.ts"));
        assert!(doomed.commit(&default_tree()).await.is_err());

        let loaded = store.load().await.expect("load");
        assert_eq!(loaded, default_tree());
    }
}
