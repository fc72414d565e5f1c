//! Per-depth menu templates
//!
//! Each depth has its own header, footer, delimiter and item templates.
//! Depths without an explicit entry use the default set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::NodeKind;

/// Templates for one depth of the menu.
///
/// Item templates see the node's attributes plus three synthetic keys:
/// `sublevel` (rendered children, empty unless an active branch), `level`
/// and `index` (position in the node list). The synthetic keys take
/// precedence over user attributes of the same name in the template only;
/// the node's own attributes are never modified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LevelTemplates {
    /// Emitted once before a non-empty run of items
    pub header: String,
    /// Emitted once after a non-empty run of items
    pub footer: String,
    /// Inserted between consecutive items of the run
    pub delimiter: String,
    /// Inactive item
    pub item: String,
    /// Inactive branch, falls back to `item`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_item: Option<String>,
    /// Active item; `{:=sublevel}` receives the rendered children
    pub active_item: String,
    /// Active branch, falls back to `active_item`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_branch_item: Option<String>,
}

impl Default for LevelTemplates {
    fn default() -> Self {
        Self {
            header: "<ul>".into(),
            footer: "</ul>".into(),
            delimiter: String::new(),
            item: r#"<li><a href="{:=url}">{:=label}</a></li>"#.into(),
            branch_item: None,
            active_item: r#"<li class="active"><a href="{:=url}">{:=label}</a>{:=sublevel}</li>"#
                .into(),
            active_branch_item: None,
        }
    }
}

impl LevelTemplates {
    /// Pick the item template for a node.
    pub fn select(&self, active: bool, kind: NodeKind) -> &str {
        match (active, kind) {
            (true, NodeKind::Branch) => self
                .active_branch_item
                .as_deref()
                .unwrap_or(&self.active_item),
            (true, NodeKind::Leaf) => &self.active_item,
            (false, NodeKind::Branch) => self.branch_item.as_deref().unwrap_or(&self.item),
            (false, NodeKind::Leaf) => &self.item,
        }
    }
}

/// Template configuration for all depths.
///
/// `levels` is keyed by the depth as a string (`[templates.levels.2]` in TOML).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct TemplateSet {
    pub default: LevelTemplates,
    pub levels: BTreeMap<String, LevelTemplates>,
}

impl TemplateSet {
    pub fn for_level(&self, level: usize) -> &LevelTemplates {
        self.levels
            .get(&level.to_string())
            .unwrap_or(&self.default)
    }

    pub fn with_level(mut self, level: usize, templates: LevelTemplates) -> Self {
        self.levels.insert(level.to_string(), templates);
        self
    }

    /// Overlay per-level entries from `other`; a named level replaces ours.
    pub fn merge(&self, other: &RawTemplateSet) -> Self {
        let mut levels = self.levels.clone();
        for (level, templates) in &other.levels {
            levels.insert(level.clone(), templates.clone());
        }
        Self {
            default: other.default.clone().unwrap_or_else(|| self.default.clone()),
            levels,
        }
    }
}

/// Raw template config for layered merging (`None` → not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTemplateSet {
    pub default: Option<LevelTemplates>,
    pub levels: BTreeMap<String, LevelTemplates>,
}
