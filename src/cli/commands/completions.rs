//! `snipbar completions` command - Shell completion scripts
//!
//! `source <(snipbar completions bash)` enables completion of subcommands and
//! filter flags such as `--pinned-first` or `--sort`.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;
use std::io;

use crate::cli::Cli;

/// Binary name completions are registered for
const BIN_NAME: &str = "snipbar";

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, BIN_NAME, &mut io::stdout());
    Ok(())
}
