//! Menu definition files
//!
//! A definition is a TOML document with an ordered `[[item]]` array:
//!
//! ```toml
//! [[item]]
//! level = 1
//! label = "Shop"
//! url = "/shop/"
//! dir = "shop/"
//!
//! [[item]]
//! level = 2
//! label = "Orders"
//! url = "/shop/orders/"
//! dir = "shop/orders/"
//! if_table = "orders"
//! ```
//!
//! Scalar values are stringified; the `level` key is resolved by the builder.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::application::services::TreeBuilder;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Attributes;
use crate::infrastructure::traits::FileSystem;

#[derive(Debug, Deserialize)]
struct MenuDefinition {
    #[serde(default)]
    item: Vec<toml::Table>,
}

/// Parse definition content into attribute maps in document order.
pub fn parse_definition(content: &str, path: &Path) -> ApplicationResult<Vec<Attributes>> {
    let definition: MenuDefinition =
        toml::from_str(content).map_err(|e| ApplicationError::Definition {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    definition
        .item
        .into_iter()
        .enumerate()
        .map(|(n, table)| to_attributes(n, table, path))
        .collect()
}

/// Read and parse a definition file.
pub fn load_definition(fs: &dyn FileSystem, path: &Path) -> ApplicationResult<Vec<Attributes>> {
    debug!("load_definition: path={}", path.display());
    let content = fs
        .read_to_string(path)
        .with_path_context("read menu definition", path)?;
    parse_definition(&content, path)
}

/// Feed definition items into a builder in document order.
pub fn build_from_definition(
    builder: &mut TreeBuilder,
    items: Vec<Attributes>,
) -> ApplicationResult<()> {
    builder.add_all(items)
}

fn to_attributes(n: usize, table: toml::Table, path: &Path) -> ApplicationResult<Attributes> {
    table
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Datetime(d) => d.to_string(),
                toml::Value::Array(_) | toml::Value::Table(_) => {
                    return Err(ApplicationError::Definition {
                        path: path.to_path_buf(),
                        message: format!("item {}: '{}' must be a scalar value", n + 1, key),
                    })
                }
            };
            Ok((key, value))
        })
        .collect()
}
