//! CLI module for Drawbook
//!
//! Provides the canvas commands:
//! - `list`, `new`, `show`: browse and create canvases
//! - `save`, `export`: move scenes between files and canvases
//! - `rename`, `delete`: manage canvases
//! - `theme`: show or set the theme for new canvases

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

pub mod canvas;

/// Drawbook CLI
#[derive(Parser, Debug)]
#[command(name = "drawbook")]
#[command(about = "Local canvas notebook")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List canvases, most recently modified first
    List,
    /// Create a new canvas
    New,
    /// Print a canvas as JSON
    Show { id: String },
    /// Replace a canvas' scene with the contents of a scene file
    Save {
        id: String,
        /// JSON file with `elements`, `appState` and `files`
        #[arg(long)]
        scene: PathBuf,
    },
    /// Write a canvas' scene to a file
    Export {
        id: String,
        #[arg(long)]
        out: PathBuf,
    },
    /// Rename a canvas (its id stays the same)
    Rename { id: String, name: String },
    /// Delete a canvas
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Show or set the theme used for new canvases
    Theme {
        #[arg(value_parser = ["light", "dark"])]
        value: Option<String>,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Theme { value }) => canvas::theme(&config, value),
        Some(cmd) => canvas::run(cmd, &config).await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
