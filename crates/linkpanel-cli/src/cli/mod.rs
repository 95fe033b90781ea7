//! CLI for the linkpanel metadata resolver and panel.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use linkpanel_core::config::{self, LinkPanelConfig};
use std::path::{Path, PathBuf};

use commands::{run_completions, run_manifest, run_panel, run_resolve, run_serve};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "linkpanel")]
#[command(about = "Application link panel: metadata resolver and panel view", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/linkpanel/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Serve the metadata endpoint until Ctrl+C.
    Serve {
        /// Listen address (overrides bind_addr from config).
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Resolve metadata for one application in-process and print the envelope.
    Resolve {
        /// Application name (default: "unknown").
        app: Option<String>,
    },

    /// Show the panel for an application and accept r/e/a/q commands on stdin.
    Panel {
        /// Application name (default: "unknown").
        app: Option<String>,

        /// Resolve in-process instead of calling the metadata endpoint.
        #[arg(long)]
        local: bool,

        /// Start expanded.
        #[arg(long)]
        expand: bool,
    },

    /// Print the host registration manifest as JSON.
    Manifest,

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn load_config(path: Option<&Path>) -> Result<LinkPanelConfig> {
    match path {
        Some(p) => config::load_from(p),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        if let CliCommand::Completions { shell } = cli.command {
            run_completions(shell);
            return Ok(());
        }

        let cfg = load_config(cli.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Serve { bind } => run_serve(&cfg, bind.as_deref()).await?,
            CliCommand::Resolve { app } => run_resolve(&cfg, app).await?,
            CliCommand::Panel { app, local, expand } => {
                run_panel(&cfg, app.as_deref(), local, expand).await?
            }
            CliCommand::Manifest => run_manifest(&cfg)?,
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
