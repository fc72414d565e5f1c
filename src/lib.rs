//! navtree: hierarchical navigation menus
//!
//! Menus are declared as a flat, ordered stream of "node at level N" entries.
//! [`TreeBuilder`](application::services::TreeBuilder) infers the tree,
//! prunes guarded subtrees and marks the path to the current request;
//! [`TreeRenderer`](application::services::TreeRenderer) turns the result
//! into markup using per-depth templates.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
