//! Render the bundled default content tree to the site's content module.
//!
//! Useful for bootstrapping a fresh checkout of the published site before
//! the back office has ever committed:
//!
//! ```bash
//! cargo run --bin export-content -- path/to/site-content.ts
//! ```

use anyhow::Result;

use portfolio_studio::content::defaults::default_tree;
use portfolio_studio::store::ModuleFileStore;

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "site-content.ts".to_string());

    let rendered = ModuleFileStore::render(&default_tree())?;
    std::fs::write(&path, rendered)?;

    println!("Wrote default content module to {}", path);
    Ok(())
}
