//! The structured content tree.
//!
//! Site content is a deeply nested, heterogeneous tree shared by two language
//! branches. A position in the tree is one of a closed set of shapes, so the
//! engines that walk it (mutation, template inference, form projection) can
//! pattern-match exhaustively instead of duck-typing.
//!
//! The JSON form is untagged: a string, a bool, an array of strings, an array
//! of objects, or an object. An empty array deserializes as an empty
//! [`Node::TextList`]; the mutation engine upgrades it to an item list the
//! first time an object element is inserted.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::content::Language;

/// Insertion-ordered field mapping. Order is significant: the form engine
/// projects fields in this order and the file store serializes in this order.
pub type Fields = IndexMap<String, Node>;

/// One position in the content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// A freeform string leaf.
    Text(String),
    /// A boolean leaf. Internal flags only, never edited through the
    /// generic form surface.
    Flag(bool),
    /// An ordered list of string leaves.
    TextList(Vec<String>),
    /// An ordered list of objects, structurally homogeneous by convention.
    ItemList(Vec<Fields>),
    /// A nested mapping of named fields.
    Group(Fields),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Node {
        Node::Text(value.into())
    }

    /// Human-readable shape name for warnings and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Text(_) => "text",
            Node::Flag(_) => "flag",
            Node::TextList(_) => "text list",
            Node::ItemList(_) => "item list",
            Node::Group(_) => "group",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Fields> {
        match self {
            Node::Group(fields) => Some(fields),
            _ => None,
        }
    }

    /// True for either list shape, including an empty one.
    pub fn is_list(&self) -> bool {
        matches!(self, Node::TextList(_) | Node::ItemList(_))
    }

    /// Number of elements if this is a list.
    pub fn list_len(&self) -> Option<usize> {
        match self {
            Node::TextList(items) => Some(items.len()),
            Node::ItemList(items) => Some(items.len()),
            _ => None,
        }
    }
}

/// The full bilingual content document: one [`Fields`] mapping of sections
/// per language branch. Branches are structurally isomorphic by convention,
/// not by enforcement; [`ContentTree::parity_report`] surfaces divergence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTree {
    pub en: Fields,
    pub bn: Fields,
}

impl ContentTree {
    pub fn new(en: Fields, bn: Fields) -> Self {
        Self { en, bn }
    }

    pub fn branch(&self, language: Language) -> &Fields {
        match language {
            Language::En => &self.en,
            Language::Bn => &self.bn,
        }
    }

    pub fn branch_mut(&mut self, language: Language) -> &mut Fields {
        match language {
            Language::En => &mut self.en,
            Language::Bn => &mut self.bn,
        }
    }

    /// Section keys of a branch, in insertion order.
    pub fn section_keys(&self, language: Language) -> Vec<&str> {
        self.branch(language).keys().map(|k| k.as_str()).collect()
    }

    /// Paths (dotted, language-relative) where the two branches disagree in
    /// shape. Leaf string values are expected to differ and are not compared.
    /// Purely diagnostic: nothing rejects a commit over a non-empty report.
    pub fn parity_report(&self) -> Vec<String> {
        let mut mismatches = Vec::new();
        diff_fields(&self.en, &self.bn, String::new(), &mut mismatches);
        mismatches
    }
}

fn diff_fields(en: &Fields, bn: &Fields, prefix: String, out: &mut Vec<String>) {
    for (key, en_node) in en {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match bn.get(key) {
            None => out.push(format!("{} (missing in bn)", path)),
            Some(bn_node) => diff_nodes(en_node, bn_node, path, out),
        }
    }
    for key in bn.keys() {
        if !en.contains_key(key) {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            out.push(format!("{} (missing in en)", path));
        }
    }
}

fn diff_nodes(en: &Node, bn: &Node, path: String, out: &mut Vec<String>) {
    match (en, bn) {
        (Node::Text(_), Node::Text(_)) | (Node::Flag(_), Node::Flag(_)) => {}
        (Node::TextList(_), Node::TextList(_)) => {}
        (Node::ItemList(a), Node::ItemList(b)) => {
            // Element shape comparison only goes as deep as the first pair;
            // siblings are homogeneous by convention.
            if let (Some(first_en), Some(first_bn)) = (a.first(), b.first()) {
                diff_fields(first_en, first_bn, format!("{}.0", path), out);
            }
        }
        // An empty list deserializes as TextList regardless of its intended
        // element shape, so an empty-vs-item-list pair is not a mismatch.
        (Node::TextList(a), Node::ItemList(_)) if a.is_empty() => {}
        (Node::ItemList(_), Node::TextList(b)) if b.is_empty() => {}
        (Node::Group(a), Node::Group(b)) => diff_fields(a, b, path, out),
        (a, b) => out.push(format!("{} ({} vs {})", path, a.kind(), b.kind())),
    }
}

/// Convenience constructor for [`Fields`] used by defaults and tests.
#[macro_export]
macro_rules! fields {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut map = $crate::content::Fields::new();
        $( map.insert($key.to_string(), $value); )*
        map
    }};
}
