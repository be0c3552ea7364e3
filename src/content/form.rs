//! Form projection: derive an editable form description from a content
//! subtree.
//!
//! Descriptors are ephemeral. They are recomputed from the tree on every
//! render pass and never mutated directly; edits go through the mutation
//! engine against the descriptor's path.

use serde::Serialize;

use crate::content::keywords::{
    matches_keyword, ELEMENT_LABEL_KEYWORDS, FILE_REFERENCE_KEYWORDS, JOINED_LIST_KEYWORDS,
    JOIN_DELIMITER, LONG_TEXT_KEYWORDS, LONG_TEXT_THRESHOLD,
};
use crate::content::{ContentError, Fields, Node, Path, Segment};

/// Widget selected for one editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    ShortText,
    LongText,
    FileReference,
    List,
    Group,
}

/// One editable field derived from the tree.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    /// Dotted path the widget binds to.
    pub path: String,
    pub widget: WidgetKind,
    pub label: String,
    /// Present on text widgets: the current editable value. For a joined
    /// scalar list this is the delimiter-joined representation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Present on list and group widgets.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FieldDescriptor>,
}

/// Project the node at `path` into a form description. Returns `None` for
/// suppressed nodes (boolean flags) and for paths that resolve to nothing.
pub fn project(node: &Node, path: &Path) -> Option<FieldDescriptor> {
    let label = label_for(path);
    let field_name = path.field_name().unwrap_or_default().to_string();
    match node {
        Node::Flag(_) => None,
        Node::Text(value) => Some(FieldDescriptor {
            path: path.to_string(),
            widget: text_widget(&field_name, value),
            label,
            value: Some(value.clone()),
            children: Vec::new(),
        }),
        Node::TextList(items) => {
            if matches_keyword(&field_name, JOINED_LIST_KEYWORDS) {
                Some(FieldDescriptor {
                    path: path.to_string(),
                    widget: WidgetKind::ShortText,
                    label,
                    value: Some(items.join(JOIN_DELIMITER)),
                    children: Vec::new(),
                })
            } else {
                let children = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let child_path = path.child(Segment::Index(i));
                        FieldDescriptor {
                            path: child_path.to_string(),
                            widget: text_widget(&field_name, item),
                            label: format!("Item {}", i + 1),
                            value: Some(item.clone()),
                            children: Vec::new(),
                        }
                    })
                    .collect();
                Some(FieldDescriptor {
                    path: path.to_string(),
                    widget: WidgetKind::List,
                    label,
                    value: None,
                    children,
                })
            }
        }
        Node::ItemList(items) => {
            let children = items
                .iter()
                .enumerate()
                .map(|(i, element)| {
                    let child_path = path.child(Segment::Index(i));
                    let mut group = project_fields(element, &child_path);
                    group.label = element_label(element, i);
                    group
                })
                .collect();
            Some(FieldDescriptor {
                path: path.to_string(),
                widget: WidgetKind::List,
                label,
                value: None,
                children,
            })
        }
        Node::Group(fields) => Some(project_fields(fields, path)),
    }
}

fn project_fields(fields: &Fields, path: &Path) -> FieldDescriptor {
    let children = fields
        .iter()
        .filter_map(|(key, node)| project(node, &path.child(Segment::key(key.clone()))))
        .collect();
    FieldDescriptor {
        path: path.to_string(),
        widget: WidgetKind::Group,
        label: label_for(path),
        value: None,
        children,
    }
}

fn text_widget(field_name: &str, value: &str) -> WidgetKind {
    if matches_keyword(field_name, FILE_REFERENCE_KEYWORDS) {
        WidgetKind::FileReference
    } else if value.chars().count() > LONG_TEXT_THRESHOLD
        || matches_keyword(field_name, LONG_TEXT_KEYWORDS)
    {
        WidgetKind::LongText
    } else {
        WidgetKind::ShortText
    }
}

fn element_label(element: &Fields, index: usize) -> String {
    for key in ELEMENT_LABEL_KEYWORDS {
        if let Some(text) = element.get(*key).and_then(Node::as_text) {
            if !text.is_empty() {
                return text.to_string();
            }
        }
    }
    format!("Item {}", index + 1)
}

fn label_for(path: &Path) -> String {
    match path.segments.last() {
        Some(Segment::Key(key)) => humanize_key(key),
        Some(Segment::Index(i)) => format!("Item {}", i + 1),
        None => humanize_key(path.language.name()),
    }
}

/// Split camelCase boundaries and capitalize the first letter of each word:
/// `metaDescription` becomes `Meta Description`.
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for ch in key.chars() {
        if ch.is_uppercase() && prev_lower {
            out.push(' ');
        }
        if out.is_empty() || out.ends_with(' ') {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        prev_lower = ch.is_lowercase();
    }
    out
}

/// Split a joined scalar-list edit back into its elements. The inverse of
/// the comma-joined projection; rejects input that would not round-trip.
pub fn split_joined(input: &str) -> Result<Vec<String>, ContentError> {
    let parts: Vec<String> = input
        .split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();
    // The join delimiter is a comma; a surviving comma inside an element is
    // impossible, but leading/trailing whitespace loss would break the
    // round trip for whitespace-padded values. Trimmed parts always
    // round-trip, so the only rejected input is one whose elements would be
    // empty after trimming.
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    if parts.is_empty() {
        return Err(ContentError::Validation(
            "List value contains only delimiters".to_string(),
        ));
    }
    Ok(parts)
}
