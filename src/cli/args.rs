//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Hierarchical navigation menus: build, inspect and render menu trees
#[derive(Parser, Debug)]
#[command(name = "navtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Local config file (default: ./.navtree.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Menu definition and request location shared by the menu commands.
#[derive(Args, Debug, Clone)]
pub struct MenuArgs {
    /// Menu definition file (default: menu_file from config)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Current request directory, e.g. "shop/cat"
    #[arg(short, long, default_value = "")]
    pub path: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render menu markup
    Render {
        #[command(flatten)]
        menu: MenuArgs,
        /// Render every branch expanded (sitemap)
        #[arg(long)]
        expand_all: bool,
        /// Index of the first node to render
        #[arg(long, default_value_t = 0)]
        start: usize,
    },

    /// Show the menu tree, active path highlighted
    Tree {
        #[command(flatten)]
        menu: MenuArgs,
    },

    /// Show the active path (breadcrumbs)
    Active {
        #[command(flatten)]
        menu: MenuArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
