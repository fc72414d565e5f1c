//! Domain entities: core data structures

use std::collections::BTreeMap;
use std::fmt;

/// Open, ordered attribute map of a menu node (label, url, target, dir, ...).
///
/// Values are passed through verbatim to template expansion.
pub type Attributes = BTreeMap<String, String>;

/// Separator used in `dir` attributes and request directories.
pub const PATH_SEPARATOR: char = '/';

/// Attribute keys with meaning to the tree builder.
pub mod keys {
    pub const LEVEL: &str = "level";
    pub const DIR: &str = "dir";
    pub const IF: &str = "if";
    pub const IF_TABLE: &str = "if_table";
    pub const IF_PRIV: &str = "if_priv";
    pub const LABEL: &str = "label";
    /// Synthetic key carrying the rendered sub-level markup.
    pub const SUBLEVEL: &str = "sublevel";
    /// Synthetic key carrying the node's position in the node list.
    pub const INDEX: &str = "index";
}

/// Whether a node has children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Branch,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Leaf => write!(f, "leaf"),
            NodeKind::Branch => write!(f, "branch"),
        }
    }
}

/// One accepted menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// 1-based depth in the tree
    pub level: usize,
    /// Index of the parent in the node list, None for top-level nodes
    pub parent: Option<usize>,
    /// Leaf until a later node is attached as a child
    pub kind: NodeKind,
    /// Caller-supplied attributes, verbatim
    pub attributes: Attributes,
    /// Normalised `dir` attribute (surrounding separators stripped)
    pub dir: Option<String>,
}

impl Node {
    pub fn new(level: usize, parent: Option<usize>, attributes: Attributes) -> Self {
        let dir = attributes.get(keys::DIR).map(|d| normalize_dir(d).to_string());
        Self {
            level,
            parent,
            kind: NodeKind::Leaf,
            attributes,
            dir,
        }
    }

    pub fn is_branch(&self) -> bool {
        self.kind == NodeKind::Branch
    }

    /// Home node: the raw `dir` is the bare separator.
    pub fn is_home(&self) -> bool {
        self.attributes.get(keys::DIR).is_some_and(|d| is_home_dir(d))
    }

    /// Label used for inspection output, falling back to the dir or url.
    pub fn display_label(&self) -> &str {
        self.attributes
            .get(keys::LABEL)
            .or_else(|| self.attributes.get("url"))
            .map(String::as_str)
            .or(self.dir.as_deref())
            .unwrap_or("<unnamed>")
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_label())
    }
}

/// Strip leading and trailing path separators.
/// `"shop/"` → `"shop"`, `"/shop"` → `"shop"`, `"/"` → `""`
///
/// Applied to both `dir` attributes and request directories.
pub fn normalize_dir(dir: &str) -> &str {
    dir.trim_matches(PATH_SEPARATOR)
}

/// `dir` that is empty once its trailing separator is stripped, i.e. `"/"`.
///
/// Decided on the raw attribute: a literal `""` is not home.
pub fn is_home_dir(raw: &str) -> bool {
    raw.strip_suffix(PATH_SEPARATOR) == Some("")
}

/// Whether `request_dir` is `dir` itself or lies below it.
///
/// Both sides are normalised first; an empty request matches nothing.
pub fn dir_matches(dir: &str, request_dir: &str) -> bool {
    let dir = normalize_dir(dir);
    let request_dir = normalize_dir(request_dir);
    if request_dir.is_empty() {
        return false;
    }
    match request_dir.strip_prefix(dir) {
        Some("") => true,
        Some(rest) => rest.starts_with(PATH_SEPARATOR),
        None => false,
    }
}

/// Truthiness of an `if` guard value.
///
/// Empty strings and the usual negative words evaluate to false.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty()
        || value == "0"
        || value.eq_ignore_ascii_case("false")
        || value.eq_ignore_ascii_case("no")
        || value.eq_ignore_ascii_case("off"))
}

/// Split a comma-separated guard list (`if_table = "users, orders"`).
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
