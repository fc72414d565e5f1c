//! Menu tree renderer
//!
//! Walks a [`MenuTree`] depth-first and expands per-depth templates. Only
//! branches on the active path are descended into.

use std::sync::Arc;

use itertools::Itertools;
use tracing::{instrument, trace};

use crate::application::ApplicationResult;
use crate::domain::entities::keys;
use crate::domain::{DomainError, MenuTree, TemplateSet};
use crate::infrastructure::traits::TemplateExpander;

/// Renders menu markup from a built tree.
pub struct TreeRenderer {
    templates: TemplateSet,
    expander: Option<Arc<dyn TemplateExpander>>,
}

impl TreeRenderer {
    pub fn new(templates: TemplateSet) -> Self {
        Self {
            templates,
            expander: None,
        }
    }

    pub fn with_expander(mut self, expander: Arc<dyn TemplateExpander>) -> Self {
        self.expander = Some(expander);
        self
    }

    /// Render the run of nodes sharing the level of the node at `start`.
    ///
    /// Returns an empty string when `start` is out of range.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn render(&self, tree: &MenuTree, start: usize) -> ApplicationResult<String> {
        self.render_until(tree, start, tree.len())
    }

    /// Like [`render`](Self::render), but never looks at nodes at or past `bound`.
    pub fn render_until(
        &self,
        tree: &MenuTree,
        start: usize,
        bound: usize,
    ) -> ApplicationResult<String> {
        let expander = self
            .expander
            .as_deref()
            .ok_or_else(|| DomainError::ConfigurationMissing("template expander".into()))?;
        let bound = bound.min(tree.len());
        Ok(self.render_level(tree, expander, start, bound).0)
    }

    /// Render one level run; returns the markup and the index where the run ended.
    fn render_level(
        &self,
        tree: &MenuTree,
        expander: &dyn TemplateExpander,
        start: usize,
        bound: usize,
    ) -> (String, usize) {
        let Some(first) = tree.get(start).filter(|_| start < bound) else {
            return (String::new(), start);
        };
        let base_level = first.level;
        let templates = self.templates.for_level(base_level);

        let mut items = Vec::new();
        let mut i = start;
        while i < bound {
            let Some(node) = tree.get(i) else { break };
            if node.level < base_level {
                break;
            }
            if node.level > base_level {
                // descendant of an inactive branch
                i += 1;
                continue;
            }

            let active = tree.is_active(i);
            let mut attrs = node.attributes.clone();
            attrs.insert(keys::LEVEL.into(), node.level.to_string());
            attrs.insert(keys::INDEX.into(), i.to_string());

            let next = if active && node.is_branch() {
                let end = tree.subtree_end(i).min(bound);
                let (sublevel, _) = self.render_level(tree, expander, i + 1, end);
                attrs.insert(keys::SUBLEVEL.into(), sublevel);
                end
            } else {
                attrs.insert(keys::SUBLEVEL.into(), String::new());
                i + 1
            };

            let template = templates.select(active, node.kind);
            items.push(expander.expand(template, &attrs));
            i = next;
        }

        trace!(base_level, items = items.len(), "rendered level");
        if items.is_empty() {
            return (String::new(), i);
        }
        let body = items.iter().join(&templates.delimiter);
        (format!("{}{}{}", templates.header, body, templates.footer), i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::TreeBuilder;
    use crate::application::ApplicationError;
    use crate::domain::{Attributes, LevelTemplates};
    use crate::infrastructure::traits::PlaceholderExpander;
    use crate::util::testing::guards_for_request;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn compact() -> TemplateSet {
        TemplateSet {
            default: LevelTemplates {
                header: "[".into(),
                footer: "]".into(),
                delimiter: ",".into(),
                item: "{:=label}".into(),
                branch_item: None,
                active_item: "*{:=label}{:=sublevel}".into(),
                active_branch_item: None,
            },
            ..TemplateSet::default()
        }
    }

    fn renderer() -> TreeRenderer {
        TreeRenderer::new(compact()).with_expander(Arc::new(PlaceholderExpander::new()))
    }

    #[test]
    fn given_no_expander_when_rendering_then_configuration_missing() {
        let tree = MenuTree::new();
        let result = TreeRenderer::new(compact()).render(&tree, 0);
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::ConfigurationMissing(_)))
        ));
    }

    #[test]
    fn given_empty_tree_when_rendering_then_empty_string() {
        assert_eq!(renderer().render(&MenuTree::new(), 0).unwrap(), "");
    }

    #[test]
    fn given_inactive_branch_when_rendering_then_children_are_skipped() {
        let mut builder = TreeBuilder::new(guards_for_request("about"));
        builder.add_node(1, attrs(&[("label", "shop"), ("dir", "shop")])).unwrap();
        builder.add_node(2, attrs(&[("label", "cat"), ("dir", "shop/cat")])).unwrap();
        builder.add_node(1, attrs(&[("label", "about"), ("dir", "about")])).unwrap();
        let tree = builder.finish();

        assert_eq!(renderer().render(&tree, 0).unwrap(), "[shop,*about]");
    }

    #[test]
    fn given_bound_when_rendering_then_stops_before_it() {
        let mut builder = TreeBuilder::new(guards_for_request(""));
        for label in ["a", "b", "c"] {
            builder.add_node(1, attrs(&[("label", label)])).unwrap();
        }
        let tree = builder.finish();
        assert_eq!(renderer().render_until(&tree, 0, 2).unwrap(), "[a,b]");
        assert_eq!(renderer().render(&tree, 1).unwrap(), "[b,c]");
    }
}
