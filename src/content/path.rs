//! Path addressing and the mutation engine.
//!
//! A [`Path`] locates one node inside a [`ContentTree`]: a language branch,
//! then an ordered run of field names and list indices. The mutation
//! operations are pure: they take the tree by reference and return a new
//! tree, so a caller holding the old reference keeps seeing unchanged data.
//! The schema is not known statically, so every operation degrades to a
//! logged no-op on a shape mismatch instead of failing hard.

use anyhow::{bail, Result};
use tracing::warn;

use crate::content::{ContentTree, Fields, Language, Node};

/// One step of a path: a field name or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    pub fn key(name: impl Into<String>) -> Segment {
        Segment::Key(name.into())
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Key(k) => f.write_str(k),
            Segment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A location in the bilingual tree, rooted at a language branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    pub language: Language,
    pub segments: Vec<Segment>,
}

impl Path {
    pub fn new(language: Language, segments: Vec<Segment>) -> Self {
        Self { language, segments }
    }

    /// Parse a dotted path such as `en.services.items.0.title`. The first
    /// segment must be a language code; purely numeric segments become
    /// indices.
    pub fn parse(text: &str) -> Result<Path> {
        let mut parts = text.split('.');
        let lang_code = match parts.next() {
            Some(code) if !code.is_empty() => code,
            _ => bail!("Empty content path"),
        };
        let language = Language::from_code(lang_code)?;
        let mut segments = Vec::new();
        for part in parts {
            if part.is_empty() {
                bail!("Empty segment in content path '{}'", text);
            }
            match part.parse::<usize>() {
                Ok(index) => segments.push(Segment::Index(index)),
                Err(_) => segments.push(Segment::Key(part.to_string())),
            }
        }
        Ok(Path { language, segments })
    }

    /// First field-name segment, if any. This is the section key the path
    /// belongs to.
    pub fn section(&self) -> Option<&str> {
        self.segments.iter().find_map(|seg| match seg {
            Segment::Key(k) => Some(k.as_str()),
            Segment::Index(_) => None,
        })
    }

    /// Last field-name segment, skipping trailing indices. For a list path
    /// this is the list's own field name.
    pub fn field_name(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|seg| match seg {
            Segment::Key(k) => Some(k.as_str()),
            Segment::Index(_) => None,
        })
    }

    /// The same path in the other language branch.
    pub fn in_language(&self, language: Language) -> Path {
        Path {
            language,
            segments: self.segments.clone(),
        }
    }

    pub fn child(&self, segment: Segment) -> Path {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Path {
            language: self.language,
            segments,
        }
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.language.code())?;
        for seg in &self.segments {
            write!(f, ".{}", seg)?;
        }
        Ok(())
    }
}

// ==================== Read ====================

/// Resolve a path to the node it addresses. Soft-fails: any prefix miss or
/// shape mismatch yields `None`, never a panic.
///
/// Item-list elements are stored as bare field mappings; addressing one
/// directly yields it wrapped as a [`Node::Group`], and addressing a string
/// inside a text list yields a [`Node::Text`].
pub fn get(tree: &ContentTree, path: &Path) -> Option<Node> {
    let mut fields = tree.branch(path.language);
    let mut segs = path.segments.as_slice();
    loop {
        let (seg, rest) = segs.split_first()?;
        let Segment::Key(key) = seg else {
            return None; // index directly into a mapping
        };
        let node = fields.get(key)?;
        if rest.is_empty() {
            return Some(node.clone());
        }
        match descend(node, rest) {
            Descent::Node(found) => return Some(found),
            Descent::Fields(inner, remaining) => {
                fields = inner;
                segs = remaining;
            }
            Descent::Miss => return None,
        }
    }
}

enum Descent<'a> {
    /// Fully resolved to a node.
    Node(Node),
    /// Landed on a field mapping with segments still to walk.
    Fields(&'a Fields, &'a [Segment]),
    Miss,
}

fn descend<'a>(node: &'a Node, segs: &'a [Segment]) -> Descent<'a> {
    match node {
        Node::Group(inner) => Descent::Fields(inner, segs),
        Node::TextList(items) => match segs {
            [Segment::Index(i)] => items
                .get(*i)
                .map(|s| Descent::Node(Node::text(s.clone())))
                .unwrap_or(Descent::Miss),
            _ => Descent::Miss,
        },
        Node::ItemList(items) => match segs.split_first() {
            Some((Segment::Index(i), rest)) => match items.get(*i) {
                Some(element) if rest.is_empty() => Descent::Node(Node::Group(element.clone())),
                Some(element) => Descent::Fields(element, rest),
                None => Descent::Miss,
            },
            _ => Descent::Miss,
        },
        Node::Text(_) | Node::Flag(_) => Descent::Miss,
    }
}

// ==================== Write ====================

/// Set the node at `path`, creating missing intermediate containers lazily:
/// a sequence when the next segment is an index, a mapping otherwise.
/// Returns a new tree; the input is untouched. A shape mismatch along the
/// way leaves the returned tree identical to the input (plus a warning).
pub fn set(tree: &ContentTree, path: &Path, value: Node) -> ContentTree {
    let mut next = tree.clone();
    if path.segments.is_empty() {
        warn!(path = %path, "Refusing to replace an entire language branch");
        return next;
    }
    set_in_fields(next.branch_mut(path.language), &path.segments, value, path);
    next
}

fn set_in_fields(fields: &mut Fields, segs: &[Segment], value: Node, path: &Path) {
    let Some((Segment::Key(key), rest)) = segs.split_first() else {
        warn!(path = %path, "Cannot index into a field mapping");
        return;
    };
    if rest.is_empty() {
        fields.insert(key.clone(), value);
        return;
    }
    if !fields.contains_key(key) {
        fields.insert(key.clone(), empty_container(rest, &value));
    }
    if let Some(slot) = fields.get_mut(key) {
        set_in_node(slot, rest, value, path);
    }
}

fn set_in_node(node: &mut Node, segs: &[Segment], value: Node, path: &Path) {
    // An empty text list carries no element shape; the first object written
    // into (or through) it fixes the shape as an item list.
    if needs_promotion(node, segs, &value) {
        *node = Node::ItemList(Vec::new());
    }
    match (node, segs.split_first()) {
        (Node::Group(inner), Some((Segment::Key(_), _))) => {
            set_in_fields(inner, segs, value, path);
        }
        (Node::TextList(items), Some((Segment::Index(i), rest))) if rest.is_empty() => {
            match value {
                Node::Text(text) => {
                    // Writing past the end pads with empty strings so the
                    // value lands at the index the path names.
                    while items.len() <= *i {
                        items.push(String::new());
                    }
                    items[*i] = text;
                }
                other => {
                    warn!(path = %path, kind = other.kind(), "Cannot place this value in a text list");
                }
            }
        }
        (Node::ItemList(items), Some((Segment::Index(i), rest))) => {
            if rest.is_empty() {
                match value {
                    Node::Group(element) => {
                        while items.len() <= *i {
                            items.push(Fields::new());
                        }
                        items[*i] = element;
                    }
                    other => {
                        warn!(path = %path, kind = other.kind(), "Item list elements must be groups");
                    }
                }
            } else {
                while items.len() <= *i {
                    items.push(Fields::new());
                }
                set_in_fields(&mut items[*i], rest, value, path);
            }
        }
        (other, _) => {
            warn!(path = %path, kind = other.kind(), "Path does not fit the existing shape; edit ignored");
        }
    }
}

fn needs_promotion(node: &Node, segs: &[Segment], value: &Node) -> bool {
    match (node, segs.split_first()) {
        (Node::TextList(items), Some((Segment::Index(_), rest))) if items.is_empty() => {
            !rest.is_empty() || matches!(value, Node::Group(_))
        }
        _ => false,
    }
}

fn empty_container(segs: &[Segment], value: &Node) -> Node {
    match segs.first() {
        Some(Segment::Index(_)) => {
            let scalar_terminal =
                segs.len() == 1 && matches!(value, Node::Text(_) | Node::Flag(_));
            if scalar_terminal {
                Node::TextList(Vec::new())
            } else {
                Node::ItemList(Vec::new())
            }
        }
        _ => Node::Group(Fields::new()),
    }
}

/// Append `item` to the list at `path`. Returns a new tree; when the target
/// is missing or not a list the result is identical to the input.
pub fn insert_list_item(tree: &ContentTree, path: &Path, item: Node) -> ContentTree {
    let mut next = tree.clone();
    match resolve_mut(next.branch_mut(path.language), &path.segments) {
        Some(node) => append_item(node, item, path),
        None => warn!(path = %path, "No list at this path; insert ignored"),
    }
    next
}

fn append_item(node: &mut Node, item: Node, path: &Path) {
    if matches!((&*node, &item), (Node::TextList(items), Node::Group(_)) if items.is_empty()) {
        *node = Node::ItemList(Vec::new());
    }
    match (node, item) {
        (Node::TextList(items), Node::Text(text)) => items.push(text),
        (Node::ItemList(items), Node::Group(element)) => items.push(element),
        (target, item) => {
            warn!(
                path = %path,
                target = target.kind(),
                item = item.kind(),
                "Cannot append this item here; insert ignored"
            );
        }
    }
}

/// Remove the element at `index` from the list at `path`. Out-of-bounds or
/// non-list targets leave the returned tree identical to the input. Purely
/// structural: nothing else in the tree (or outside it) is touched.
pub fn delete_list_item(tree: &ContentTree, path: &Path, index: usize) -> ContentTree {
    let mut next = tree.clone();
    match resolve_mut(next.branch_mut(path.language), &path.segments) {
        Some(Node::TextList(items)) if index < items.len() => {
            items.remove(index);
        }
        Some(Node::ItemList(items)) if index < items.len() => {
            items.remove(index);
        }
        Some(node) => {
            warn!(path = %path, index, kind = node.kind(), "Delete out of range or not a list; ignored");
        }
        None => warn!(path = %path, "No list at this path; delete ignored"),
    }
    next
}

/// Walk to the node a path addresses, mutably. Positions that are not nodes
/// (a string inside a text list, an item-list element itself) resolve to
/// `None`; list operations never target those.
fn resolve_mut<'a>(fields: &'a mut Fields, segs: &[Segment]) -> Option<&'a mut Node> {
    let (seg, rest) = segs.split_first()?;
    let Segment::Key(key) = seg else {
        return None;
    };
    let node = fields.get_mut(key)?;
    if rest.is_empty() {
        return Some(node);
    }
    match node {
        Node::Group(inner) => resolve_mut(inner, rest),
        Node::ItemList(items) => match rest.split_first() {
            Some((Segment::Index(i), tail)) if !tail.is_empty() => {
                resolve_mut(items.get_mut(*i)?, tail)
            }
            _ => None,
        },
        _ => None,
    }
}
