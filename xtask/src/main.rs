// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Documentation build automation for the motion-sdk workspace
// Run with: cargo xtask <task>

mod commands;
mod helpers;
mod runner;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::docs::{DocsPipeline, PublishOptions};
use commands::docs_config::load_manifest;
use env_logger::{Builder, Env};
use helpers::print_error;
use runner::{CommandRunner, DryRunRunner, SystemRunner};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "xtask", version, about = "Documentation build tool for the motion-sdk workspace")]
struct Cli {
    /// Path to the docs manifest, relative to the workspace root.
    #[arg(long, global = true, default_value = "Docs.toml")]
    config: PathBuf,

    /// Print the external commands and file changes without performing them.
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    task: Option<Task>,
}

#[derive(Subcommand, Debug)]
enum Task {
    /// Clean, generate both documentation trees and copy static files.
    Build,
    /// Build, then push the rendered site to the pages branch.
    Publish(PublishArgs),
    /// Same as `build`.
    Default,
    /// Remove previous output.
    Clean,
    /// Run the documentation generator for every tree.
    Docs,
    /// Copy the root static files and write the landing page.
    Static,
}

#[derive(Args, Debug)]
struct PublishArgs {
    /// Git remote name or URL to push to.
    #[arg(long)]
    remote: Option<String>,
    /// Branch that hosts the pages.
    #[arg(long)]
    branch: Option<String>,
    /// Commit message for the pages commit.
    #[arg(long)]
    message: Option<String>,
}

/// The workspace root is the parent of this crate's directory.
fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    if let Err(e) = run(cli) {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = workspace_root();
    log::debug!("Workspace root: '{}'", root.display());

    let manifest = load_manifest(&root.join(&cli.config))?;
    let runner: &dyn CommandRunner = if cli.dry_run {
        &DryRunRunner
    } else {
        &SystemRunner
    };
    let pipeline = DocsPipeline::new(root, manifest, runner)?;

    match cli.task.unwrap_or(Task::Default) {
        Task::Build | Task::Default => pipeline.build(),
        Task::Publish(args) => pipeline.build_and_publish(&PublishOptions {
            remote: args.remote,
            branch: args.branch,
            message: args.message,
        }),
        Task::Clean => pipeline.clean(),
        Task::Docs => pipeline.generate(),
        Task::Static => pipeline.copy_static(),
    }
}
