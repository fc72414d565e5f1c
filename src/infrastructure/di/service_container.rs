//! Service container for dependency injection
//!
//! Wires settings into the menu builder and renderer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::application::services::{Guards, TreeBuilder, TreeRenderer};
use crate::application::{build_from_definition, load_definition, ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::MenuTree;
use crate::infrastructure::traits::{
    ConfiguredPrivileges, ConfiguredTables, FileSystem, FixedRequestDir, PlaceholderExpander,
    PrivilegeCheck, RealFileSystem, TableCatalog, TemplateExpander,
};

/// Container holding the collaborators of one menu build.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Table catalog for `if_table`
    pub tables: Arc<dyn TableCatalog>,

    /// Privilege check for `if_priv`, only when privileges are configured
    pub privileges: Option<Arc<dyn PrivilegeCheck>>,

    /// Template engine
    pub expander: Arc<dyn TemplateExpander>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with a custom filesystem (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let tables: Arc<dyn TableCatalog> =
            Arc::new(ConfiguredTables::new(settings.tables.iter().cloned()));
        let privileges = settings.privileges.as_ref().map(|granted| {
            Arc::new(ConfiguredPrivileges::new(granted.iter().cloned())) as Arc<dyn PrivilegeCheck>
        });
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            tables,
            privileges,
            expander: Arc::new(PlaceholderExpander::new()),
        }
    }

    /// A fresh builder for a request at `request_dir`.
    pub fn tree_builder(&self, request_dir: &str) -> TreeBuilder {
        let mut guards = Guards::new(
            Arc::clone(&self.tables),
            Arc::new(FixedRequestDir::new(request_dir)),
        );
        if let Some(privileges) = &self.privileges {
            guards = guards.with_privileges(Arc::clone(privileges));
        }
        TreeBuilder::new(guards)
    }

    pub fn renderer(&self) -> TreeRenderer {
        TreeRenderer::new(self.settings.templates.clone()).with_expander(Arc::clone(&self.expander))
    }

    /// Definition file to use: the explicit one, else the configured default.
    pub fn menu_file(&self, explicit: Option<&Path>) -> ApplicationResult<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.settings.menu_file.clone())
            .ok_or_else(|| ApplicationError::Config {
                message: "no menu file given and menu_file not configured".into(),
            })
    }

    /// Load a definition and build its tree for a request at `request_dir`.
    pub fn load_tree(&self, path: &Path, request_dir: &str) -> ApplicationResult<MenuTree> {
        debug!("load_tree: path={}, request_dir={}", path.display(), request_dir);
        let items = load_definition(self.fs.as_ref(), path)?;
        let mut builder = self.tree_builder(request_dir);
        build_from_definition(&mut builder, items)?;
        Ok(builder.finish())
    }
}
