//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use colored::Colorize;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, MenuArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::MenuTree;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Render {
            menu,
            expand_all,
            start,
        }) => cmd_render(&container, menu, *expand_all, *start),
        Some(Commands::Tree { menu }) => cmd_tree(&container, menu),
        Some(Commands::Active { menu }) => cmd_active(&container, menu),
        Some(Commands::Config { command }) => cmd_config(&container, cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `navtree --help`".to_string(),
        )),
    }
}

fn load_tree(container: &ServiceContainer, menu: &MenuArgs) -> CliResult<MenuTree> {
    let file = container.menu_file(menu.file.as_deref())?;
    Ok(container.load_tree(&file, &menu.path)?)
}

#[instrument(skip(container))]
fn cmd_render(
    container: &ServiceContainer,
    menu: &MenuArgs,
    expand_all: bool,
    start: usize,
) -> CliResult<()> {
    let tree = load_tree(container, menu)?;
    if start > 0 && start >= tree.len() {
        return Err(CliError::InvalidArgs(format!(
            "start index {} out of range (menu has {} nodes)",
            start,
            tree.len()
        )));
    }
    let tree = if expand_all { tree.expanded() } else { tree };
    let markup = container.renderer().render(&tree, start)?;
    output::info(&markup);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, menu: &MenuArgs) -> CliResult<()> {
    let tree = load_tree(container, menu)?;
    let view = tree.to_tree_with(|node, active| {
        let label = format!("{} [{}]", node.display_label(), node.kind);
        if active {
            label.green().bold().to_string()
        } else {
            label
        }
    });
    output::info(&view);
    output::detail(&format!(
        "{} nodes, depth {}, {} leaves",
        tree.len(),
        tree.depth(),
        tree.leaf_nodes().len()
    ));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_active(container: &ServiceContainer, menu: &MenuArgs) -> CliResult<()> {
    let tree = load_tree(container, menu)?;
    let crumbs = tree.breadcrumbs();
    debug!("active nodes: {}", crumbs.len());
    for (idx, node) in crumbs {
        let dir = node.dir.as_deref().unwrap_or("");
        output::active(&format!("{:>3}  {}  {}", idx, node.display_label(), dir));
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer, cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            output::header("Config files");
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unavailable>".to_string());
            output::detail(&format!("global: {}", global));
            let local = match &cli.config {
                Some(path) => path.clone(),
                None => local_config_path(Path::new(".")),
            };
            output::detail(&format!("local:  {}", local.display()));
            Ok(())
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(Path::new("."))
            };
            if path.exists() && !force {
                return Err(CliError::Usage(format!(
                    "{} already exists, use --force to overwrite",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
    }
}
