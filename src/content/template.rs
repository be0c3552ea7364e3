//! Template inference: synthesize a plausible new element when the editor
//! asks to add an item to a list without supplying one.
//!
//! Priority order: clone the shape of an existing sibling; otherwise fall
//! back to a hand-authored template selected by the list's field name (with
//! the ancestor section disambiguating generic names like `items`); otherwise
//! decline, which the caller surfaces as a warning rather than an error.

use tracing::warn;

use crate::content::form::humanize_key;
use crate::content::keywords::{
    matches_keyword, DUAL_WRITE_SECTIONS, PLACEHOLDER_IMAGE_URL, TEMPLATE_URL_KEYWORDS,
};
use crate::content::path::{self, Path};
use crate::content::{ContentTree, Fields, Node};
use crate::fields;

/// Result of an add-item request.
#[derive(Debug, Clone)]
pub struct AddItemOutcome {
    pub tree: ContentTree,
    /// False when no template could be inferred; `warning` says why.
    pub added: bool,
    /// True when the item was mirrored into both language branches.
    pub dual_write: bool,
    pub warning: Option<String>,
}

/// Infer a new element for the list at `path`. Deterministic: the same list
/// contents always produce the same template.
pub fn infer_item(tree: &ContentTree, path: &Path) -> Option<Node> {
    match path::get(tree, path) {
        Some(Node::ItemList(items)) if !items.is_empty() => {
            Some(Node::Group(blank_clone(&items[0])))
        }
        Some(Node::TextList(items)) if !items.is_empty() => {
            let name = path.field_name().unwrap_or("item");
            Some(Node::text(format!("New {}", humanize_key(name))))
        }
        Some(node) if node.is_list() => authored_template(path),
        Some(_) | None => None,
    }
}

/// Add an inferred item to the list at `path`. The shared gallery collection
/// is language-agnostic in the published site, so an append there is
/// mirrored into both branches in the same logical operation; every other
/// list is per-language.
pub fn add_list_item(tree: &ContentTree, path: &Path) -> AddItemOutcome {
    let declined = |warning: String| {
        warn!("{}", warning);
        AddItemOutcome {
            tree: tree.clone(),
            added: false,
            dual_write: false,
            warning: Some(warning),
        }
    };
    match path::get(tree, path) {
        Some(node) if node.is_list() => {}
        Some(node) => {
            return declined(format!(
                "'{}' is a {}, not a list; nothing was added",
                path,
                node.kind()
            ));
        }
        None => return declined(format!("No list exists at '{}'; nothing was added", path)),
    }
    let Some(item) = infer_item(tree, path) else {
        return declined(format!(
            "No item template known for list '{}'; nothing was added",
            path
        ));
    };

    if is_dual_write(path) {
        let first = path::insert_list_item(tree, path, item.clone());
        let mirrored = path.in_language(path.language.counterpart());
        let both = path::insert_list_item(&first, &mirrored, item);
        return AddItemOutcome {
            tree: both,
            added: true,
            dual_write: true,
            warning: None,
        };
    }

    AddItemOutcome {
        tree: path::insert_list_item(tree, path, item),
        added: true,
        dual_write: false,
        warning: None,
    }
}

fn is_dual_write(path: &Path) -> bool {
    path.section()
        .map(|section| DUAL_WRITE_SECTIONS.contains(&section))
        .unwrap_or(false)
}

/// Structural clone of an existing element with every value reset to an
/// empty representative: lists emptied, flags lowered, image fields given a
/// placeholder URL, and all other text set to "New <Field Name>".
fn blank_clone(element: &Fields) -> Fields {
    let mut blank = Fields::new();
    for (key, node) in element {
        let reset = match node {
            Node::Text(_) => {
                if matches_keyword(key, TEMPLATE_URL_KEYWORDS) {
                    Node::text(PLACEHOLDER_IMAGE_URL)
                } else {
                    Node::text(format!("New {}", humanize_key(key)))
                }
            }
            Node::Flag(_) => Node::Flag(false),
            Node::TextList(_) => Node::TextList(Vec::new()),
            Node::ItemList(_) => Node::ItemList(Vec::new()),
            Node::Group(inner) => Node::Group(blank_clone(inner)),
        };
        blank.insert(key.clone(), reset);
    }
    blank
}

/// Hand-authored templates for adding to a list that is currently empty.
/// Keyed by the list's field name; `items` is ambiguous and is resolved by
/// the ancestor section.
fn authored_template(path: &Path) -> Option<Node> {
    let field = path.field_name()?;
    let section = path.section().unwrap_or_default();
    let template = match (field, section) {
        ("jobs", _) => fields! {
            "role" => Node::text("New Role"),
            "company" => Node::text("Company"),
            "period" => Node::text("Year - Year"),
            "responsibilities" => Node::TextList(Vec::new()),
        },
        ("items", "services") => fields! {
            "icon" => Node::text("star"),
            "title" => Node::text("New Service"),
            "description" => Node::text("Describe this service"),
        },
        ("images", _) | ("items", "gallery") => fields! {
            "src" => Node::text(PLACEHOLDER_IMAGE_URL),
            "alt" => Node::text("New gallery image"),
        },
        ("posts", _) => fields! {
            "title" => Node::text("New Post"),
            "excerpt" => Node::text("A short summary of the post"),
            "content" => Node::text("Write the post here"),
            "image" => Node::text(PLACEHOLDER_IMAGE_URL),
            "tags" => Node::TextList(Vec::new()),
        },
        ("packages", _) => fields! {
            "name" => Node::text("New Package"),
            "price" => Node::text("$0"),
            "features" => Node::TextList(Vec::new()),
            "popular" => Node::Flag(false),
        },
        _ => return None,
    };
    Some(Node::Group(template))
}
