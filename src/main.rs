mod cli;
mod config;
mod gmail;
mod logging;
mod mailbox;
mod ops;
mod sweep;

use anyhow::Result;
use clap::Parser as _;

use crate::{cli::Args, config::Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    cli::run(&args, &config).await
}
