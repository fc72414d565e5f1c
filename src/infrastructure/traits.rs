//! Boundary traits for the menu collaborators
//!
//! The tree builder and renderer only talk to the outside world through
//! these traits, so services can be tested with in-memory implementations.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use regex::{Captures, Regex};

use crate::domain::entities::normalize_dir;
use crate::domain::Attributes;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Guard predicate for `if_table`.
pub trait TableCatalog: Send + Sync {
    /// True when every named table exists.
    fn tables_exist(&self, names: &[String]) -> bool;
}

/// Guard predicate for `if_priv`.
pub trait PrivilegeCheck: Send + Sync {
    fn has_privilege(&self, spec: &str) -> bool;
}

/// Source of the current request location.
pub trait RequestContext: Send + Sync {
    /// Directory of the current request, without surrounding separators.
    fn current_request_dir(&self) -> String;
}

/// Attribute substitution performed by the template engine.
pub trait TemplateExpander: Send + Sync {
    /// Replace placeholders in `template` with values from `attrs`.
    fn expand(&self, template: &str, attrs: &Attributes) -> String;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Table catalog backed by a fixed list of known tables.
#[derive(Debug, Default, Clone)]
pub struct ConfiguredTables {
    tables: HashSet<String>,
}

impl ConfiguredTables {
    pub fn new<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
        }
    }
}

impl TableCatalog for ConfiguredTables {
    fn tables_exist(&self, names: &[String]) -> bool {
        names.iter().all(|n| self.tables.contains(n))
    }
}

/// Privilege check backed by a fixed list of granted privileges.
///
/// A privilege string may list alternatives separated by `|`; any granted one passes.
#[derive(Debug, Default, Clone)]
pub struct ConfiguredPrivileges {
    granted: HashSet<String>,
}

impl ConfiguredPrivileges {
    pub fn new<I, S>(granted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            granted: granted.into_iter().map(Into::into).collect(),
        }
    }
}

impl PrivilegeCheck for ConfiguredPrivileges {
    fn has_privilege(&self, spec: &str) -> bool {
        spec.split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .any(|s| self.granted.contains(s))
    }
}

/// Request context with a fixed directory.
#[derive(Debug, Default, Clone)]
pub struct FixedRequestDir {
    dir: String,
}

impl FixedRequestDir {
    pub fn new(dir: impl AsRef<str>) -> Self {
        Self {
            dir: normalize_dir(dir.as_ref()).to_string(),
        }
    }
}

impl RequestContext for FixedRequestDir {
    fn current_request_dir(&self) -> String {
        self.dir.clone()
    }
}

/// Expands `{:=key}` placeholders; unknown keys expand to the empty string.
#[derive(Debug, Clone)]
pub struct PlaceholderExpander {
    placeholder: Regex,
}

impl Default for PlaceholderExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceholderExpander {
    pub fn new() -> Self {
        Self {
            placeholder: Regex::new(r"\{:=([A-Za-z0-9_.\-]+)\}")
                .expect("placeholder pattern is valid"),
        }
    }
}

impl TemplateExpander for PlaceholderExpander {
    fn expand(&self, template: &str, attrs: &Attributes) -> String {
        self.placeholder
            .replace_all(template, |caps: &Captures| {
                attrs.get(&caps[1]).cloned().unwrap_or_default()
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn given_known_and_unknown_placeholders_when_expanding_then_unknown_render_empty() {
        let expander = PlaceholderExpander::new();
        let out = expander.expand(
            r#"<a href="{:=url}" target="{:=target}">{:=label}</a>"#,
            &attrs(&[("url", "/shop"), ("label", "Shop")]),
        );
        assert_eq!(out, r#"<a href="/shop" target="">Shop</a>"#);
    }

    #[test]
    fn given_template_without_placeholders_when_expanding_then_unchanged() {
        let expander = PlaceholderExpander::new();
        assert_eq!(expander.expand("<li>{x}</li>", &Attributes::new()), "<li>{x}</li>");
    }

    #[test]
    fn given_table_list_when_checking_then_all_must_exist() {
        let catalog = ConfiguredTables::new(["users", "orders"]);
        assert!(catalog.tables_exist(&["users".into()]));
        assert!(catalog.tables_exist(&["users".into(), "orders".into()]));
        assert!(!catalog.tables_exist(&["users".into(), "invoices".into()]));
    }

    #[test]
    fn given_alternatives_when_checking_privilege_then_any_grants() {
        let privs = ConfiguredPrivileges::new(["editor"]);
        assert!(privs.has_privilege("admin | editor"));
        assert!(!privs.has_privilege("admin"));
        assert!(!privs.has_privilege(""));
    }

    #[test]
    fn given_request_dir_with_separators_when_created_then_trims_them() {
        let ctx = FixedRequestDir::new("/shop/cat/");
        assert_eq!(ctx.current_request_dir(), "shop/cat");
    }
}
