//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/navtree/navtree.toml`
//! 3. Local config: `--config <file>` or `./.navtree.toml`
//! 4. Environment variables: `NAVTREE_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::entities::split_list;
use crate::domain::{RawTemplateSet, TemplateSet};

/// Unified configuration for navtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Default menu definition file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_file: Option<PathBuf>,
    /// Tables known to exist, consulted by `if_table`
    pub tables: Vec<String>,
    /// Granted privileges for `if_priv`; unset means no privilege check is available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privileges: Option<Vec<String>>,
    /// Per-depth templates
    pub templates: TemplateSet,
}

/// Raw settings for intermediate parsing (arrays are Option to detect "not specified").
///
/// Used during layered config merging to distinguish between:
/// - `None` → field not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub menu_file: Option<PathBuf>,
    pub tables: Option<Vec<String>>,
    pub privileges: Option<Vec<String>>,
    pub templates: RawTemplateSet,
}

/// Get the XDG config directory for navtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "navtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("navtree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".navtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Merge arrays with union semantics and negation support.
///
/// - Items from overlay are added to base
/// - Items prefixed with `!` remove the corresponding item from the result
/// - Duplicates are de-duplicated
///
/// # Examples
/// ```ignore
/// merge_array(&["users", "orders"], &["invoices"])  // → ["invoices", "orders", "users"]
/// merge_array(&["users", "orders"], &["!users"])    // → ["orders"]
/// ```
pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
    let mut result: HashSet<String> = base.iter().cloned().collect();

    for item in overlay {
        if let Some(negated) = item.strip_prefix('!') {
            result.remove(negated);
        } else {
            result.insert(item.clone());
        }
    }

    // Convert to sorted Vec for deterministic output
    let mut vec: Vec<String> = result.into_iter().collect();
    vec.sort();
    vec
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(menu_file) = &self.menu_file {
            let raw = menu_file.to_string_lossy();
            let expanded = shellexpand::full(raw.as_ref())
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            self.menu_file = Some(PathBuf::from(expanded));
        }
    }

    /// Merge overlay config onto self (base) with union semantics for arrays.
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Arrays: union merge with negation support
    /// - Templates: levels named by the overlay replace ours
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            menu_file: overlay.menu_file.clone().or_else(|| self.menu_file.clone()),
            tables: overlay
                .tables
                .as_ref()
                .map(|o| merge_array(&self.tables, o))
                .unwrap_or_else(|| self.tables.clone()),
            privileges: match (&self.privileges, &overlay.privileges) {
                (base, Some(o)) => Some(merge_array(base.as_deref().unwrap_or_default(), o)),
                (base, None) => base.clone(),
            },
            templates: self.templates.merge(&overlay.templates),
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            menu_file: global.menu_file.clone().or_else(|| self.menu_file.clone()),
            tables: global.tables.clone().unwrap_or_else(|| self.tables.clone()),
            privileges: global.privileges.clone().or_else(|| self.privileges.clone()),
            templates: self.templates.merge(&global.templates),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit local config file; when `None`, `./.navtree.toml` is used if present
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE (explicit user override)
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        let local_path = match local {
            Some(path) => {
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                Some(path.to_path_buf())
            }
            None => std::env::current_dir()
                .ok()
                .map(|cwd| local_config_path(&cwd))
                .filter(|p| p.exists()),
        };
        if let Some(path) = local_path {
            let raw = load_raw_settings(&path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply NAVTREE_* environment variables as explicit overrides.
    ///
    /// Lists are comma separated: `NAVTREE_TABLES=users,orders`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("NAVTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("menu_file") {
            settings.menu_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("tables") {
            settings.tables = split_list(&val);
        }
        if let Ok(val) = config.get_string("privileges") {
            settings.privileges = Some(split_list(&val));
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# navtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/navtree/navtree.toml  (defines your baseline)
#   Local:  ./.navtree.toml or --config     (project-specific additions)
#   Env:    NAVTREE_* environment variables (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global; "!name" removes an inherited item.

# Menu definition used when no file is given on the command line
# menu_file = "~/site/menu.toml"

# Tables known to exist (if_table guard)
# tables = ["users", "orders"]

# Granted privileges (if_priv guard). Leave unset to reject menus using if_priv.
# privileges = ["admin"]

# Templates for depths without their own entry
[templates.default]
header = "<ul>"
footer = "</ul>"
delimiter = ""
item = '<li><a href="{:=url}">{:=label}</a></li>'
active_item = '<li class="active"><a href="{:=url}">{:=label}</a>{:=sublevel}</li>'
# branch_item = '<li class="has-children"><a href="{:=url}">{:=label}</a></li>'
# active_branch_item = '<li class="open"><a href="{:=url}">{:=label}</a>{:=sublevel}</li>'

# Per-depth override
# [templates.levels.2]
# header = '<ul class="sub">'
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
