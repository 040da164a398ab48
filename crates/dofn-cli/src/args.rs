use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dofn_adapter::AdapterOptions;

#[derive(Parser, Debug)]
#[command(name = "dofn", about = "Bundle a web application for DigitalOcean Functions")]
pub struct Args {
    /// Log debug output
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stage the framework output and bundle it into <out-dir>/server.js
    Build(ProjectArgs),
    /// Print (or write) the App Platform spec for the app
    AppSpec {
        #[command(flatten)]
        project: ProjectArgs,
        /// Write the spec to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct ProjectArgs {
    /// Path to dofn.toml (default: nearest one above the current directory)
    #[arg(long, env = "DOFN_CONFIG")]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub app_name: Option<String>,
    #[arg(long)]
    pub domain: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    /// Output directory (default: build)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

impl ProjectArgs {
    pub fn overrides(&self) -> AdapterOptions {
        AdapterOptions {
            app_name: self.app_name.clone(),
            domain: self.domain.clone(),
            region: self.region.clone(),
            out_dir: self.out_dir.clone(),
        }
    }
}
