//! Menu tree builder
//!
//! Reconstructs a tree from an ordered stream of "add node at level N" calls,
//! prunes subtrees whose guards fail and marks the active path.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::application::ApplicationResult;
use crate::domain::entities::{dir_matches, is_truthy, keys, split_list};
use crate::domain::{Attributes, DomainError, MenuTree, Node};
use crate::infrastructure::traits::{PrivilegeCheck, RequestContext, TableCatalog};

/// Collaborators consulted while ingesting nodes.
#[derive(Clone)]
pub struct Guards {
    /// Predicate for `if_table`
    pub tables: Arc<dyn TableCatalog>,
    /// Predicate for `if_priv`; `None` makes the guard an error
    pub privileges: Option<Arc<dyn PrivilegeCheck>>,
    /// Current request location for active-path marking
    pub request: Arc<dyn RequestContext>,
}

impl Guards {
    pub fn new(tables: Arc<dyn TableCatalog>, request: Arc<dyn RequestContext>) -> Self {
        Self {
            tables,
            privileges: None,
            request,
        }
    }

    pub fn with_tables(mut self, tables: Arc<dyn TableCatalog>) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_privileges(mut self, privileges: Arc<dyn PrivilegeCheck>) -> Self {
        self.privileges = Some(privileges);
        self
    }
}

/// Builds a [`MenuTree`] from `add_node` calls in document order.
///
/// One builder serves one menu build; the suppression state is per instance.
pub struct TreeBuilder {
    guards: Guards,
    tree: MenuTree,
    /// Nodes deeper than this level are dropped; 0 when nothing is suppressed
    ignore_level: usize,
}

impl TreeBuilder {
    pub fn new(guards: Guards) -> Self {
        Self {
            guards,
            tree: MenuTree::new(),
            ignore_level: 0,
        }
    }

    /// Add the next node of the menu.
    ///
    /// `level` 0 reads the level from the `level` attribute. Returns the
    /// node's index, or `None` when the node was pruned by a guard or lies
    /// inside a pruned subtree.
    #[instrument(level = "debug", skip(self, attrs))]
    pub fn add_node(&mut self, level: usize, attrs: Attributes) -> ApplicationResult<Option<usize>> {
        let level = resolve_level(level, &attrs)?;

        if self.ignore_level > 0 && level > self.ignore_level {
            trace!(level, ignore_level = self.ignore_level, "node inside pruned subtree");
            return Ok(None);
        }
        self.ignore_level = 0;

        let parent = self.resolve_parent(level)?;

        if !self.passes_guards(level, &attrs)? {
            self.ignore_level = level;
            return Ok(None);
        }

        let node = Node::new(level, parent, attrs);
        let active = self.is_on_active_path(&node);
        let idx = self.tree.push(node);
        if active {
            debug!(idx, "node on active path");
            self.tree.mark_active(idx);
        }
        debug!(idx, level, ?parent, "node accepted");
        Ok(Some(idx))
    }

    /// Add nodes in order, each carrying its level in the `level` attribute.
    pub fn add_all<I>(&mut self, items: I) -> ApplicationResult<()>
    where
        I: IntoIterator<Item = Attributes>,
    {
        for attrs in items {
            self.add_node(0, attrs)?;
        }
        Ok(())
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    /// End ingestion and hand out the finished tree.
    pub fn finish(self) -> MenuTree {
        self.tree
    }

    fn resolve_parent(&self, level: usize) -> ApplicationResult<Option<usize>> {
        let Some((prev_idx, prev)) = self.tree.last() else {
            return Ok(None);
        };

        let parent = match level.cmp(&prev.level) {
            Ordering::Greater if level == prev.level + 1 => Some(prev_idx),
            Ordering::Greater => {
                return Err(DomainError::invalid_level(
                    level as i64,
                    format!("skips a depth after a level {} node", prev.level),
                )
                .into())
            }
            Ordering::Equal => prev.parent,
            Ordering::Less if level == 1 => None,
            Ordering::Less => self
                .tree
                .find_previous_at_level(prev_idx, level)
                .and_then(|i| self.tree.get(i))
                .map(|n| n.parent)
                .ok_or_else(|| {
                    DomainError::invalid_level(level as i64, "no earlier node at this level")
                })?,
        };
        Ok(parent)
    }

    /// Evaluate `if`, `if_table` and `if_priv`; false prunes the node.
    fn passes_guards(&self, level: usize, attrs: &Attributes) -> ApplicationResult<bool> {
        if let Some(condition) = attrs.get(keys::IF) {
            if !is_truthy(condition) {
                debug!(level, condition, "pruned by if");
                return Ok(false);
            }
        }

        if let Some(tables) = attrs.get(keys::IF_TABLE) {
            let names = split_list(tables);
            if !names.is_empty() && !self.guards.tables.tables_exist(&names) {
                debug!(level, tables, "pruned by if_table");
                return Ok(false);
            }
        }

        if let Some(spec) = attrs.get(keys::IF_PRIV) {
            let check = self
                .guards
                .privileges
                .as_ref()
                .ok_or_else(|| DomainError::UnsupportedGuard {
                    guard: keys::IF_PRIV.to_string(),
                })?;
            if !check.has_privilege(spec) {
                debug!(level, spec, "pruned by if_priv");
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn is_on_active_path(&self, node: &Node) -> bool {
        if node.is_home() {
            return true;
        }
        let Some(dir) = node.dir.as_deref() else {
            return false;
        };
        dir_matches(dir, &self.guards.request.current_request_dir())
    }
}

/// Level from the argument, or from the `level` attribute when 0.
fn resolve_level(level: usize, attrs: &Attributes) -> ApplicationResult<usize> {
    if level > 0 {
        return Ok(level);
    }
    let Some(raw) = attrs.get(keys::LEVEL) else {
        return Err(DomainError::invalid_level(0, "no level given").into());
    };
    let parsed: i64 = raw
        .trim()
        .parse()
        .map_err(|_| DomainError::invalid_level(0, format!("level attribute '{raw}' is not a number")))?;
    if parsed < 1 {
        return Err(DomainError::invalid_level(parsed, "levels start at 1").into());
    }
    Ok(parsed as usize)
}
